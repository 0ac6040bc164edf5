//! 用户服务
//!
//! 暴露 `CreateUser` / `GetUser` 两个 gRPC 接口，后备存储为 PostgreSQL 的 `users` 表

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;
pub mod service;

pub use service::ApplicationBootstrap;
