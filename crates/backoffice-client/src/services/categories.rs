//! Category REST service.

use async_trait::async_trait;
use backoffice_core::{CatalogId, Category, CategoryDraft};
use serde_json::Value;
use tracing::info;

use super::{multipart_form, require_id, Resource};
use crate::envelope::unwrap_list;
use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::wire::{CategoryPayload, InboundCategory};

const ENDPOINT: &str = "/categorias";

/// `/categorias` over the shared HTTP client.
#[derive(Debug, Clone)]
pub struct CategoryService {
    http: HttpClient,
}

impl CategoryService {
    pub fn new(http: HttpClient) -> Self {
        CategoryService { http }
    }
}

#[async_trait]
impl Resource for CategoryService {
    type Entity = Category;

    async fn fetch_all(&self) -> ApiResult<Vec<Category>> {
        let body: Value = self.http.execute_json(self.http.get(ENDPOINT)).await?;
        let rows: Vec<InboundCategory> = unwrap_list(body, "categorias")?;
        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    async fn create(&self, draft: &CategoryDraft) -> ApiResult<()> {
        let form = multipart_form(&CategoryPayload::from(draft), draft.image.as_ref())?;
        self.http
            .execute(self.http.post(ENDPOINT).multipart(form))
            .await?;
        info!(name = %draft.name, "Category created");
        Ok(())
    }

    async fn update(&self, draft: &CategoryDraft) -> ApiResult<()> {
        let id = require_id(draft.id, "categoria")?;
        let form = multipart_form(&CategoryPayload::from(draft), draft.image.as_ref())?;
        self.http
            .execute(self.http.put(ENDPOINT).multipart(form))
            .await?;
        info!(id, with_image = draft.image.is_some(), "Category updated");
        Ok(())
    }

    async fn delete(&self, id: CatalogId) -> ApiResult<bool> {
        self.http
            .execute(self.http.delete(&format!("{}/{}", ENDPOINT, id)))
            .await?;
        info!(id, "Category deleted");
        Ok(true)
    }
}
