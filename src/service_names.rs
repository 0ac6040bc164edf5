//! 微服务服务名与端口定义模块
//!
//! 服务注册、健康检查目标和实例 ID 都由这里的常量派生，
//! 端口按服务类型静态分配，运行时不可修改。
//!
//! ## 使用方式
//!
//! ```rust
//! use practical_core::service_names::*;
//! use practical_core::ServiceIdentity;
//!
//! let identity = ServiceIdentity::new(USERS_SERVICE, USERS_SERVICE_PORT);
//! assert_eq!(identity.instance_id(), "users-service-50051");
//! ```

/// 用户服务名
///
/// 同时作为容器内可解析的主机名，用于注册地址
pub const USERS_SERVICE: &str = "users-service";

/// 用户服务 gRPC 端口
pub const USERS_SERVICE_PORT: u16 = 50051;

/// 商品服务名
pub const PRODUCTS_SERVICE: &str = "products-service";

/// 商品服务 gRPC 端口
pub const PRODUCTS_SERVICE_PORT: u16 = 50052;
