//! 依赖装配

use std::sync::Arc;

use practical_core::storage::connect_postgres;
use practical_core::{
    AppConfig, BackoffPolicy, BootstrapError, Entity, EntityRepository, EntityService,
};
use tracing::info;

use crate::application::handlers::{UserCommandHandler, UserQueryHandler};
use crate::config::UsersConfig;
use crate::domain::model::User;
use crate::domain::repository::UserRepositoryRef;
use crate::infrastructure::persistence::PostgresUserRepository;
use crate::interface::grpc::{UserGrpcHandler, UserGrpcServer};

/// 应用上下文
pub struct ApplicationContext {
    pub grpc_server: UserGrpcServer,
}

/// 连接数据库、确保表结构，然后装配上下文
pub async fn initialize(app_config: &AppConfig) -> Result<ApplicationContext, BootstrapError> {
    let users_config = UsersConfig::from_app_config(app_config);
    let policy = BackoffPolicy::from(&app_config.readiness);

    let pool = connect_postgres(
        &users_config.postgres_url,
        users_config.max_connections,
        policy,
    )
    .await?;

    let repository = PostgresUserRepository::new(pool);
    repository
        .ensure_schema()
        .await
        .map_err(|source| BootstrapError::Schema {
            table: User::TABLE,
            source,
        })?;
    info!(table = User::TABLE, "schema ensured");

    Ok(build_context(Arc::new(repository)))
}

/// 基于给定仓储装配上下文
pub fn build_context(repository: UserRepositoryRef) -> ApplicationContext {
    let domain_service = Arc::new(EntityService::new(repository));
    let command_handler = Arc::new(UserCommandHandler::new(domain_service.clone()));
    let query_handler = Arc::new(UserQueryHandler::new(domain_service));

    let handler = UserGrpcHandler::new(command_handler, query_handler);
    ApplicationContext {
        grpc_server: UserGrpcServer::new(handler),
    }
}
