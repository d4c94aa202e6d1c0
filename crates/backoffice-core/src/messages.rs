//! # User-Facing Messages
//!
//! Every string the dashboard shows to an operator lives here. The back office
//! is operated in Brazilian Portuguese, so the catalog is pt-BR.
//!
//! Messages are grouped per resource. Stores pick the group that matches the
//! resource they manage via [`ResourceMessages`].

// =============================================================================
// Per-Resource Message Groups
// =============================================================================

/// The success/failure messages a sync store emits for one resource.
///
/// ## Where They Appear
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  create()  ──► ok  ──► toast.success(create_success)                   │
/// │            └─► err ──► toast.error(server message | create_error)      │
/// │                                                                         │
/// │  fetch()   ──► err ──► error field + toast.error(server | load_error)  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceMessages {
    pub create_success: &'static str,
    pub update_success: &'static str,
    pub delete_success: &'static str,
    pub create_error: &'static str,
    pub update_error: &'static str,
    pub delete_error: &'static str,
    pub load_error: &'static str,
}

pub const CATEGORY: ResourceMessages = ResourceMessages {
    create_success: "Categoria criada com sucesso!",
    update_success: "Categoria atualizada com sucesso!",
    delete_success: "Categoria excluída com sucesso!",
    create_error: "Erro ao criar categoria",
    update_error: "Erro ao atualizar categoria",
    delete_error: "Erro ao excluir categoria",
    load_error: "Erro ao carregar categorias",
};

pub const PRODUCT: ResourceMessages = ResourceMessages {
    create_success: "Produto criado com sucesso!",
    update_success: "Produto atualizado com sucesso!",
    delete_success: "Produto excluído com sucesso!",
    create_error: "Erro ao criar produto",
    update_error: "Erro ao atualizar produto",
    delete_error: "Erro ao excluir produto",
    load_error: "Erro ao carregar produtos",
};

pub const SUBCATEGORY: ResourceMessages = ResourceMessages {
    create_success: "Subcategoria criada com sucesso!",
    update_success: "Subcategoria atualizada com sucesso!",
    delete_success: "Subcategoria excluída com sucesso!",
    create_error: "Erro ao criar subcategoria",
    update_error: "Erro ao atualizar subcategoria",
    delete_error: "Erro ao excluir subcategoria",
    load_error: "Erro ao carregar subcategorias",
};

// =============================================================================
// Domain Conflict Messages
// =============================================================================

pub const CATEGORY_DELETE_WITH_PRODUCTS: &str = "Não é possível excluir esta categoria porque existem produtos cadastrados nela. Remova ou transfira os produtos primeiro.";

pub const SUBCATEGORY_DELETE_WITH_PRODUCTS: &str = "Não é possível excluir esta subcategoria porque existem produtos vinculados a ela.";

pub const PRODUCT_INVALID_CATEGORY: &str = "A categoria selecionada não existe ou está inativa";

pub const PRODUCT_DUPLICATE_NAME: &str = "Já existe um produto cadastrado com este nome";

pub const SUBCATEGORY_LOAD_BY_CATEGORY_ERROR: &str = "Erro ao carregar subcategorias da categoria";

// =============================================================================
// Required-Field Messages
// =============================================================================

pub const CATEGORY_NAME_REQUIRED: &str = "Nome da categoria é obrigatório";
pub const CATEGORY_DESCRIPTION_REQUIRED: &str = "Descrição da categoria é obrigatória";
pub const CATEGORY_IMAGE_REQUIRED: &str = "Imagem é obrigatória para novas categorias";

pub const PRODUCT_NAME_REQUIRED: &str = "Nome do produto é obrigatório";
pub const PRODUCT_DESCRIPTION_REQUIRED: &str = "Descrição do produto é obrigatória";
pub const PRODUCT_CATEGORY_REQUIRED: &str = "Categoria é obrigatória";
pub const PRODUCT_PRICE_REQUIRED: &str = "Preço é obrigatório e deve ser maior que zero";
pub const PRODUCT_IMAGE_REQUIRED: &str = "Imagem é obrigatória para novos produtos";

pub const SUBCATEGORY_NAME_REQUIRED: &str = "Nome da subcategoria é obrigatório";
pub const SUBCATEGORY_CATEGORY_REQUIRED: &str = "Categoria da subcategoria é obrigatória";

pub const LOGIN_MISSING_FIELDS: &str = "Preencha todos os campos";

// =============================================================================
// Image Upload Messages
// =============================================================================

pub const IMAGE_MISSING: &str = "Nenhum arquivo selecionado";
pub const IMAGE_INVALID_TYPE: &str = "Tipo de arquivo inválido. Use JPG, PNG ou GIF";
pub const IMAGE_TOO_LARGE: &str = "Arquivo muito grande. Máximo 10MB";

// =============================================================================
// General
// =============================================================================

pub const CONNECTION_ERROR: &str = "Erro de conexão com o servidor";
pub const TOKEN_MISSING: &str = "Token não recebido do servidor";
pub const UNEXPECTED_ERROR: &str = "Erro inesperado";
pub const NO_DATA: &str = "Nenhum dado encontrado";
pub const NO_RESULTS: &str = "Nenhum resultado para os filtros atuais";
pub const NOT_INFORMED: &str = "Não informado";
