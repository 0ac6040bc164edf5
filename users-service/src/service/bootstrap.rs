//! 应用启动器 - 负责依赖就绪、端口绑定与服务运行

use practical_core::service_names::{USERS_SERVICE, USERS_SERVICE_PORT};
use practical_core::{AppConfig, BootstrapError, ServiceIdentity, ServiceRuntime};
use tracing::info;

use crate::config::UsersConfig;
use crate::service::wire;

/// 应用启动器
pub struct ApplicationBootstrap;

impl ApplicationBootstrap {
    /// 运行应用的主入口点
    pub async fn run(config: &AppConfig) -> Result<(), BootstrapError> {
        Self::run_with_identity(config, Self::identity(config)).await
    }

    /// 默认身份：固定端口，通告地址取配置或服务名
    pub fn identity(config: &AppConfig) -> ServiceIdentity {
        let identity = ServiceIdentity::new(USERS_SERVICE, USERS_SERVICE_PORT);
        match UsersConfig::from_app_config(config).advertise_address {
            Some(address) => identity.with_advertise_address(address),
            None => identity,
        }
    }

    /// 依次完成：存储就绪 -> 绑定端口 -> 对外服务（注册由运行时在端口可用后完成）
    pub async fn run_with_identity(
        config: &AppConfig,
        identity: ServiceIdentity,
    ) -> Result<(), BootstrapError> {
        info!(service = identity.name(), port = identity.port(), "starting");

        let context = wire::initialize(config).await?;

        let runtime = ServiceRuntime::from_config(identity, config)?;
        let listener = runtime.bind().await?;
        let router = context.grpc_server.into_router().await;

        runtime.run(router, listener).await
    }
}
