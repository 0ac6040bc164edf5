use std::sync::Arc;

use practical_core::StoreError;
use practical_proto::products::product_service_server::ProductService;
use practical_proto::products::{
    CreateProductRequest, GetProductRequest, Product as ProtoProduct, ProductResponse,
};
use tonic::{Request, Response, Status};
use tracing::{debug, instrument, warn};

use crate::application::commands::CreateProductCommand;
use crate::application::handlers::{ProductCommandHandler, ProductQueryHandler};
use crate::application::queries::GetProductQuery;
use crate::domain::model::Product;

#[derive(Clone)]
pub struct ProductGrpcHandler {
    command_handler: Arc<ProductCommandHandler>,
    query_handler: Arc<ProductQueryHandler>,
}

impl ProductGrpcHandler {
    pub fn new(
        command_handler: Arc<ProductCommandHandler>,
        query_handler: Arc<ProductQueryHandler>,
    ) -> Self {
        Self {
            command_handler,
            query_handler,
        }
    }
}

#[tonic::async_trait]
impl ProductService for ProductGrpcHandler {
    #[instrument(skip(self, request))]
    async fn create_product(
        &self,
        request: Request<CreateProductRequest>,
    ) -> Result<Response<ProductResponse>, Status> {
        let req = request.into_inner();
        let command = CreateProductCommand {
            name: req.name,
            price: req.price,
        };

        let product = self
            .command_handler
            .handle_create_product(command)
            .await
            .map_err(|err| store_status("create product failed", err))?;

        Ok(Response::new(ProductResponse {
            product: Some(to_proto_product(&product)),
        }))
    }

    #[instrument(skip(self, request))]
    async fn get_product(
        &self,
        request: Request<GetProductRequest>,
    ) -> Result<Response<ProductResponse>, Status> {
        let query = GetProductQuery {
            id: request.into_inner().id,
        };

        let product = self
            .query_handler
            .handle_get_product(query)
            .await
            .map_err(|err| store_status("get product failed", err))?;

        Ok(Response::new(ProductResponse {
            product: Some(to_proto_product(&product)),
        }))
    }
}

pub fn to_proto_product(product: &Product) -> ProtoProduct {
    ProtoProduct {
        id: product.id.to_string(),
        name: product.name.clone(),
        price: product.price,
    }
}

fn store_status(context: &'static str, err: StoreError) -> Status {
    if err.is_not_found() {
        debug!(error = %err, "{}", context);
    } else {
        warn!(error = %err, "{}", context);
    }
    Status::from(err)
}

#[cfg(test)]
mod tests {
    use practical_core::{EntityId, Lifecycle};

    use super::*;

    #[test]
    fn test_to_proto_product_renders_decimal_id() {
        let product = Product {
            id: EntityId::new(42),
            name: "Widget".to_string(),
            price: 9.99,
            lifecycle: Lifecycle::created_now(),
        };

        let proto = to_proto_product(&product);
        assert_eq!(proto.id, "42");
        assert_eq!(proto.name, "Widget");
        assert_eq!(proto.price, 9.99);
    }

    #[test]
    fn test_store_errors_surface_raw_message() {
        let status = store_status("get product failed", StoreError::NotFound);
        assert_eq!(status.code(), tonic::Code::Unknown);
        assert_eq!(status.message(), "record not found");
    }
}
