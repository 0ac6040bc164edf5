use std::sync::Arc;

use practical_core::StoreError;
use tracing::instrument;

use crate::application::queries::GetProductQuery;
use crate::domain::model::Product;
use crate::domain::repository::ProductDomainService;

/// 商品查询处理器
pub struct ProductQueryHandler {
    domain_service: Arc<ProductDomainService>,
}

impl ProductQueryHandler {
    pub fn new(domain_service: Arc<ProductDomainService>) -> Self {
        Self { domain_service }
    }

    #[instrument(skip(self), fields(id = %query.id))]
    pub async fn handle_get_product(&self, query: GetProductQuery) -> Result<Product, StoreError> {
        self.domain_service.get(&query.id).await
    }
}
