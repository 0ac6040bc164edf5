//! 配置管理器 - 负责环境变量覆盖
//!
//! 环境变量优先级最高：
//! - `CONSUL_HTTP_ADDR` / `CONSUL_HTTP_TOKEN` / `CONSUL_HTTP_SSL`：注册中心
//! - `USERS_DATABASE_URL` / `PRODUCTS_DATABASE_URL`：各实体服务的数据库

use std::env;

use tracing::debug;

use super::AppConfig;

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 使用进程环境变量覆盖配置
    pub fn apply_env_overrides(config: &mut AppConfig) {
        Self::apply_overrides(config, |key| env::var(key).ok());
    }

    /// 使用给定的变量来源覆盖配置，空值视为未设置
    pub fn apply_overrides<F>(config: &mut AppConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(address) = lookup("CONSUL_HTTP_ADDR") {
            debug!(%address, "registry address overridden by CONSUL_HTTP_ADDR");
            config.registry.address = Some(address);
        }
        if let Some(token) = lookup("CONSUL_HTTP_TOKEN") {
            config.registry.token = Some(token);
        }
        if let Some(ssl) = lookup("CONSUL_HTTP_SSL") {
            if matches!(ssl.to_ascii_lowercase().as_str(), "1" | "true") {
                config.registry.scheme = "https".to_string();
            }
        }

        if let Some(url) = lookup("USERS_DATABASE_URL") {
            config
                .services
                .users
                .get_or_insert_with(Default::default)
                .postgres_url = Some(url);
        }
        if let Some(url) = lookup("PRODUCTS_DATABASE_URL") {
            config
                .services
                .products
                .get_or_insert_with(Default::default)
                .postgres_url = Some(url);
        }
    }
}
