//! # Users Service 入口
//!
//! 用户服务的启动入口，任何启动阶段的错误都以非零状态退出

use anyhow::Result;
use practical_core::load_config;
use practical_core::tracing::init_tracing_from_config;
use tracing::{error, info, warn};
use users_service::ApplicationBootstrap;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置，配置存在但无法解析时直接退出
    let app_config = match load_config(Some("config")) {
        Ok(cfg) => cfg,
        Err(err) => {
            init_tracing_from_config(None);
            error!(error = %err, "invalid configuration");
            return Err(err.into());
        }
    };
    init_tracing_from_config(Some(&app_config.logging));

    match &app_config.source {
        Some(path) => info!(path = %path.display(), "configuration loaded"),
        None => warn!("no configuration found, using defaults"),
    }

    if let Err(err) = ApplicationBootstrap::run(app_config).await {
        error!(error = %err, "users-service terminated");
        return Err(err.into());
    }

    Ok(())
}
