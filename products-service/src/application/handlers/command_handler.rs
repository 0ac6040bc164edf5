use std::sync::Arc;

use practical_core::StoreError;
use tracing::instrument;

use crate::application::commands::CreateProductCommand;
use crate::domain::model::Product;
use crate::domain::repository::ProductDomainService;

/// 商品命令处理器
pub struct ProductCommandHandler {
    domain_service: Arc<ProductDomainService>,
}

impl ProductCommandHandler {
    pub fn new(domain_service: Arc<ProductDomainService>) -> Self {
        Self { domain_service }
    }

    #[instrument(skip(self), fields(name = %command.name, price = command.price))]
    pub async fn handle_create_product(&self, command: CreateProductCommand) -> Result<Product, StoreError> {
        self.domain_service.create(command.into()).await
    }
}
