//! 依赖装配

use std::sync::Arc;

use practical_core::storage::connect_postgres;
use practical_core::{
    AppConfig, BackoffPolicy, BootstrapError, Entity, EntityRepository, EntityService,
};
use tracing::info;

use crate::application::handlers::{ProductCommandHandler, ProductQueryHandler};
use crate::config::ProductsConfig;
use crate::domain::model::Product;
use crate::domain::repository::ProductRepositoryRef;
use crate::infrastructure::persistence::PostgresProductRepository;
use crate::interface::grpc::{ProductGrpcHandler, ProductGrpcServer};

/// 应用上下文
pub struct ApplicationContext {
    pub grpc_server: ProductGrpcServer,
}

/// 连接数据库、确保表结构，然后装配上下文
pub async fn initialize(app_config: &AppConfig) -> Result<ApplicationContext, BootstrapError> {
    let products_config = ProductsConfig::from_app_config(app_config);
    let policy = BackoffPolicy::from(&app_config.readiness);

    let pool = connect_postgres(
        &products_config.postgres_url,
        products_config.max_connections,
        policy,
    )
    .await?;

    let repository = PostgresProductRepository::new(pool);
    repository
        .ensure_schema()
        .await
        .map_err(|source| BootstrapError::Schema {
            table: Product::TABLE,
            source,
        })?;
    info!(table = Product::TABLE, "schema ensured");

    Ok(build_context(Arc::new(repository)))
}

/// 基于给定仓储装配上下文
pub fn build_context(repository: ProductRepositoryRef) -> ApplicationContext {
    let domain_service = Arc::new(EntityService::new(repository));
    let command_handler = Arc::new(ProductCommandHandler::new(domain_service.clone()));
    let query_handler = Arc::new(ProductQueryHandler::new(domain_service));

    let handler = ProductGrpcHandler::new(command_handler, query_handler);
    ApplicationContext {
        grpc_server: ProductGrpcServer::new(handler),
    }
}
