//! Product REST service.

use async_trait::async_trait;
use backoffice_core::{CatalogId, Product, ProductDraft};
use serde_json::Value;
use tracing::info;

use super::{multipart_form, require_id, Resource};
use crate::envelope::unwrap_list;
use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::wire::{InboundProduct, ProductPayload};

const ENDPOINT: &str = "/produtos";

/// `/produtos` over the shared HTTP client.
#[derive(Debug, Clone)]
pub struct ProductService {
    http: HttpClient,
}

impl ProductService {
    pub fn new(http: HttpClient) -> Self {
        ProductService { http }
    }
}

#[async_trait]
impl Resource for ProductService {
    type Entity = Product;

    async fn fetch_all(&self) -> ApiResult<Vec<Product>> {
        let body: Value = self.http.execute_json(self.http.get(ENDPOINT)).await?;
        let rows: Vec<InboundProduct> = unwrap_list(body, "produtos")?;
        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    async fn create(&self, draft: &ProductDraft) -> ApiResult<()> {
        let form = multipart_form(&ProductPayload::from(draft), draft.image.as_ref())?;
        self.http
            .execute(self.http.post(ENDPOINT).multipart(form))
            .await?;
        info!(name = %draft.name, price = %draft.price, "Product created");
        Ok(())
    }

    async fn update(&self, draft: &ProductDraft) -> ApiResult<()> {
        let id = require_id(draft.id, "produto")?;
        let form = multipart_form(&ProductPayload::from(draft), draft.image.as_ref())?;
        self.http
            .execute(self.http.put(ENDPOINT).multipart(form))
            .await?;
        info!(id, with_image = draft.image.is_some(), "Product updated");
        Ok(())
    }

    async fn delete(&self, id: CatalogId) -> ApiResult<bool> {
        self.http
            .execute(self.http.delete(&format!("{}/{}", ENDPOINT, id)))
            .await?;
        info!(id, "Product deleted");
        Ok(true)
    }
}
