//! Subcategory REST service. Mutations are plain JSON, not multipart.

use async_trait::async_trait;
use backoffice_core::{CatalogId, Subcategory, SubcategoryDraft};
use serde_json::Value;
use tracing::{info, warn};

use super::{require_id, Resource, SubcategoryLookup};
use crate::envelope::unwrap_list;
use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::wire::{InboundSubcategory, SubcategoryPayload};

const ENDPOINT: &str = "/subcategorias";

/// `/subcategorias` over the shared HTTP client.
#[derive(Debug, Clone)]
pub struct SubcategoryService {
    http: HttpClient,
}

impl SubcategoryService {
    pub fn new(http: HttpClient) -> Self {
        SubcategoryService { http }
    }

    async fn fetch_list(&self, endpoint: &str, scope: Option<CatalogId>) -> ApiResult<Vec<Subcategory>> {
        let body: Value = self.http.execute_json(self.http.get(endpoint)).await?;
        let rows: Vec<InboundSubcategory> = unwrap_list(body, "subcategorias")?;

        let total = rows.len();
        let resolved: Vec<Subcategory> = rows
            .into_iter()
            .filter_map(|row| row.resolve(scope))
            .collect();

        if resolved.len() < total {
            warn!(
                dropped = total - resolved.len(),
                "Subcategories without a parent category were skipped"
            );
        }
        Ok(resolved)
    }
}

#[async_trait]
impl Resource for SubcategoryService {
    type Entity = Subcategory;

    async fn fetch_all(&self) -> ApiResult<Vec<Subcategory>> {
        self.fetch_list(ENDPOINT, None).await
    }

    async fn create(&self, draft: &SubcategoryDraft) -> ApiResult<()> {
        self.http
            .execute(self.http.post(ENDPOINT).json(&SubcategoryPayload::from(draft)))
            .await?;
        info!(name = %draft.name, "Subcategory created");
        Ok(())
    }

    async fn update(&self, draft: &SubcategoryDraft) -> ApiResult<()> {
        let id = require_id(draft.id, "subcategoria")?;
        self.http
            .execute(self.http.put(ENDPOINT).json(&SubcategoryPayload::from(draft)))
            .await?;
        info!(id, "Subcategory updated");
        Ok(())
    }

    async fn delete(&self, id: CatalogId) -> ApiResult<bool> {
        self.http
            .execute(self.http.delete(&format!("{}/{}", ENDPOINT, id)))
            .await?;
        info!(id, "Subcategory deleted");
        Ok(true)
    }
}

#[async_trait]
impl SubcategoryLookup for SubcategoryService {
    async fn fetch_by_category(&self, category_id: CatalogId) -> ApiResult<Vec<Subcategory>> {
        let endpoint = format!("/categorias/{}/subcategorias", category_id);
        self.fetch_list(&endpoint, Some(category_id)).await
    }
}
