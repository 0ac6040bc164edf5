//! 服务实例身份
//!
//! 进程启动时构造一次，之后以引用传给各组件

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// 服务实例身份（名称、端口、对外通告地址）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    name: &'static str,
    port: u16,
    advertise_address: String,
}

impl ServiceIdentity {
    /// 创建身份，通告地址默认为服务名本身
    pub fn new(name: &'static str, port: u16) -> Self {
        Self {
            name,
            port,
            advertise_address: name.to_string(),
        }
    }

    /// 覆盖通告地址（空字符串忽略）
    pub fn with_advertise_address(mut self, address: impl Into<String>) -> Self {
        let address = address.into();
        if !address.is_empty() {
            self.advertise_address = address;
        }
        self
    }

    /// 替换端口（监听使用临时端口时，按实际绑定的端口注册）
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn advertise_address(&self) -> &str {
        &self.advertise_address
    }

    /// 实例 ID：`<serviceName>-<port>`
    pub fn instance_id(&self) -> String {
        format!("{}-{}", self.name, self.port)
    }

    /// 监听地址：所有网卡上的固定端口
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_id_format() {
        let identity = ServiceIdentity::new("products-service", 50052);
        assert_eq!(identity.instance_id(), "products-service-50052");
    }

    #[test]
    fn test_advertise_address_defaults_to_name() {
        let identity = ServiceIdentity::new("users-service", 50051);
        assert_eq!(identity.advertise_address(), "users-service");

        let identity = identity.with_advertise_address("");
        assert_eq!(identity.advertise_address(), "users-service");

        let identity = identity.with_advertise_address("10.0.0.7");
        assert_eq!(identity.advertise_address(), "10.0.0.7");
    }

    #[test]
    fn test_with_port_changes_instance_id() {
        let identity = ServiceIdentity::new("users-service", 0).with_port(40123);
        assert_eq!(identity.instance_id(), "users-service-40123");
    }

    #[test]
    fn test_bind_addr_uses_port() {
        let identity = ServiceIdentity::new("users-service", 50051);
        assert_eq!(identity.bind_addr().to_string(), "0.0.0.0:50051");
    }
}
