//! Practical 协议定义
//!
//! 由 `build.rs` 在构建时从 `proto/` 生成，服务端与客户端代码均已启用

/// 用户服务协议
pub mod users {
    tonic::include_proto!("users");
}

/// 商品服务协议
pub mod products {
    tonic::include_proto!("products");
}
