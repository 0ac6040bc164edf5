//! Practical Core 公共库
//!
//! 为实体服务提供统一的配置加载、日志初始化、通用实体契约、
//! 依赖就绪探测、服务注册以及服务运行时

pub mod config;
pub mod entity;
pub mod error;
pub mod identity;
pub mod readiness;
pub mod registry;
pub mod runtime;
pub mod service_names;
pub mod storage;
pub mod tracing;

pub use config::{
    AppConfig, ConfigManager, EntityServiceConfig, LoggingConfig, ReadinessConfig,
    RegistryConfig, load_config, load_config_from_source,
};
pub use entity::{
    Entity, EntityId, EntityRepository, EntityRepositoryRef, EntityService, InMemoryRepository,
    Lifecycle,
};
pub use error::{BootstrapError, RegistryError, StoreError};
pub use identity::ServiceIdentity;
pub use readiness::{BackoffPolicy, wait_until_ready};
pub use registry::{ConsulRegistrar, HealthCheck, ServiceRegistration};
pub use runtime::ServiceRuntime;
