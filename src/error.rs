//! Practical Core 错误类型
//!
//! - `StoreError`：存储适配器返回给处理器的错误，原样透传给 RPC 调用方
//! - `BootstrapError`：启动阶段（以及监听、注册阶段）的致命错误
//! - `RegistryError`：注册中心 HTTP 交互错误

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tonic::Status;

/// 存储错误
///
/// 每个变体都携带驱动返回的原始消息，RPC 层不做二次翻译
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// 存储不可达（I/O、TLS、连接池超时或已关闭）
    #[error("{0}")]
    Connectivity(String),

    /// 违反唯一约束
    #[error("{0}")]
    UniqueViolation(String),

    /// 主键不存在或已软删除
    #[error("record not found")]
    NotFound,

    /// 其他数据库错误
    #[error("{0}")]
    Database(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation(_))
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, StoreError::Connectivity(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::UniqueViolation(db.message().to_string())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Connectivity(err.to_string()),
            _ => StoreError::Database(err.to_string()),
        }
    }
}

/// 处理器错误直接作为调用结果返回：统一使用 `Unknown`，只保留原始消息
impl From<StoreError> for Status {
    fn from(err: StoreError) -> Self {
        Status::unknown(err.to_string())
    }
}

/// 注册中心错误
#[derive(Debug, Error)]
pub enum RegistryError {
    /// 传输层错误（连接失败、超时等）
    #[error("registry request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 注册中心返回非 2xx
    #[error("registry rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// 启动错误，全部视为致命
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// 依赖在最大等待时间内未就绪
    #[error("{dependency} not ready after {waited:?}: {last_error}")]
    ReadinessTimeout {
        dependency: &'static str,
        waited: Duration,
        last_error: String,
    },

    /// 表结构无法与声明的实体对齐
    #[error("schema reconciliation failed for table {table}: {source}")]
    Schema {
        table: &'static str,
        #[source]
        source: StoreError,
    },

    /// 端口绑定失败
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// 服务注册失败
    #[error("service registration failed: {0}")]
    Registration(#[from] RegistryError),

    /// 监听器异常退出
    #[error("gRPC listener failed: {0}")]
    Serve(String),

    /// 配置无效
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "record not found");
    }

    #[test]
    fn test_pool_failures_map_to_connectivity() {
        assert!(StoreError::from(sqlx::Error::PoolTimedOut).is_connectivity());
        assert!(StoreError::from(sqlx::Error::PoolClosed).is_connectivity());

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(StoreError::from(sqlx::Error::Io(io)).is_connectivity());
    }

    #[test]
    fn test_other_errors_map_to_database() {
        let err = StoreError::from(sqlx::Error::Protocol("unexpected message".to_string()));
        assert!(matches!(err, StoreError::Database(ref msg) if msg.contains("unexpected message")));
    }

    #[test]
    fn test_status_keeps_raw_message() {
        let err = StoreError::UniqueViolation(
            "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
        );
        let status = Status::from(err);
        assert_eq!(status.code(), tonic::Code::Unknown);
        assert_eq!(
            status.message(),
            "duplicate key value violates unique constraint \"users_email_key\""
        );
    }
}
