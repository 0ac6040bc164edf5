//! 服务注册模块
//!
//! 通过 Consul agent 的 HTTP 接口注册服务实例。注册记录携带 gRPC 协议级
//! 健康检查：agent 每 10 秒探测一次，持续失败 30 秒后自动注销实例。

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::identity::ServiceIdentity;

/// 默认 agent 地址
pub const DEFAULT_REGISTRY_ADDRESS: &str = "127.0.0.1:8500";

/// 健康检查间隔
pub const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(10);

/// 持续失败多久后注销
pub const DEREGISTER_CRITICAL_AFTER: Duration = Duration::from_secs(30);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// 健康检查描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthCheck {
    /// gRPC 健康检查目标 `host:port`
    #[serde(rename = "GRPC")]
    pub grpc: String,
    pub interval: String,
    pub deregister_critical_service_after: String,
}

/// 服务注册记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRegistration {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub address: String,
    pub port: u16,
    pub check: HealthCheck,
}

impl ServiceRegistration {
    /// 根据服务身份构建注册记录
    pub fn for_identity(identity: &ServiceIdentity) -> Self {
        let address = identity.advertise_address().to_string();
        let port = identity.port();
        Self {
            id: identity.instance_id(),
            name: identity.name().to_string(),
            check: HealthCheck {
                grpc: format!("{}:{}", address, port),
                interval: format_seconds(HEALTH_CHECK_INTERVAL),
                deregister_critical_service_after: format_seconds(DEREGISTER_CRITICAL_AFTER),
            },
            address,
            port,
        }
    }
}

fn format_seconds(duration: Duration) -> String {
    format!("{}s", duration.as_secs())
}

/// Consul agent 客户端
#[derive(Debug, Clone)]
pub struct ConsulRegistrar {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ConsulRegistrar {
    /// 从配置创建注册器
    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let address = config
            .address
            .as_deref()
            .filter(|address| !address.is_empty())
            .unwrap_or(DEFAULT_REGISTRY_ADDRESS);

        let base_url = if address.contains("://") {
            address.trim_end_matches('/').to_string()
        } else {
            format!("{}://{}", config.scheme, address.trim_end_matches('/'))
        };

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone().filter(|token| !token.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 探测 agent 是否可达（能返回集群 leader 即视为可用）
    pub async fn ping(&self) -> Result<(), RegistryError> {
        let request = self
            .client
            .get(format!("{}/v1/status/leader", self.base_url));
        self.send(request).await
    }

    /// 注册服务实例
    pub async fn register(&self, registration: &ServiceRegistration) -> Result<(), RegistryError> {
        debug!(instance_id = %registration.id, "sending service registration");
        let request = self
            .client
            .put(format!("{}/v1/agent/service/register", self.base_url))
            .json(registration);
        self.send(request).await?;

        info!(
            service = %registration.name,
            instance_id = %registration.id,
            address = %registration.address,
            port = registration.port,
            "service registered"
        );
        Ok(())
    }

    /// 注销服务实例
    pub async fn deregister(&self, instance_id: &str) -> Result<(), RegistryError> {
        let request = self.client.put(format!(
            "{}/v1/agent/service/deregister/{}",
            self.base_url, instance_id
        ));
        self.send(request).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<(), RegistryError> {
        let request = match &self.token {
            Some(token) => request.header("X-Consul-Token", token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(RegistryError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
