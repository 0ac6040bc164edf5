//! 服务运行时
//!
//! 负责监听器与一次性注册任务的生命周期：
//! 1. 监听器在后台任务中开始服务
//! 2. 注册任务确认端口可连接、注册中心可达后发送唯一一次注册
//! 3. 运行时同时观察两者：注册失败或监听器退出都作为致命错误返回
//! 4. 收到停止信号后优雅停机，已注册（或注册请求已发出）的实例执行注销

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinError;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::server::Router;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::{BootstrapError, RegistryError};
use crate::identity::ServiceIdentity;
use crate::readiness::{BackoffPolicy, wait_until_ready};
use crate::registry::{ConsulRegistrar, ServiceRegistration};

/// 停机时等待进行中的注册请求的上限
const REGISTRATION_DRAIN: Duration = Duration::from_secs(5);

/// 服务运行时
pub struct ServiceRuntime {
    identity: ServiceIdentity,
    registrar: Option<ConsulRegistrar>,
    readiness: BackoffPolicy,
}

impl ServiceRuntime {
    /// 创建不带注册器的运行时
    pub fn new(identity: ServiceIdentity, readiness: BackoffPolicy) -> Self {
        Self {
            identity,
            registrar: None,
            readiness,
        }
    }

    pub fn with_registrar(mut self, registrar: ConsulRegistrar) -> Self {
        self.registrar = Some(registrar);
        self
    }

    /// 按应用配置创建运行时（注册中心启用时附带注册器）
    pub fn from_config(
        identity: ServiceIdentity,
        config: &AppConfig,
    ) -> Result<Self, BootstrapError> {
        let runtime = Self::new(identity, BackoffPolicy::from(&config.readiness));
        if !config.registry.enabled {
            info!(
                service = runtime.identity.name(),
                "service registry disabled, skipping registration"
            );
            return Ok(runtime);
        }

        let registrar = ConsulRegistrar::from_config(&config.registry)?;
        Ok(runtime.with_registrar(registrar))
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    /// 绑定服务端口
    pub async fn bind(&self) -> Result<TcpListener, BootstrapError> {
        let addr = self.identity.bind_addr();
        TcpListener::bind(addr)
            .await
            .map_err(|source| BootstrapError::Bind { addr, source })
    }

    /// 运行直到 Ctrl+C
    pub async fn run(self, router: Router, listener: TcpListener) -> Result<(), BootstrapError> {
        self.run_until(router, listener, async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// 运行直到 `shutdown` 完成，或监听器/注册任务失败
    pub async fn run_until<F>(
        self,
        router: Router,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), BootstrapError>
    where
        F: Future<Output = ()> + Send,
    {
        let local_addr = listener.local_addr().map_err(|source| BootstrapError::Bind {
            addr: self.identity.bind_addr(),
            source,
        })?;
        let identity = self.identity.clone().with_port(local_addr.port());
        let service = identity.name();

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let mut server = tokio::spawn(async move {
            router
                .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
                    let _ = stop_rx.await;
                })
                .await
        });
        info!(service, addr = %local_addr, "gRPC listener accepting connections");

        let register_sent = Arc::new(AtomicBool::new(false));
        let mut registration = tokio::spawn(register_when_listening(
            self.registrar.clone(),
            ServiceRegistration::for_identity(&identity),
            probe_addr(local_addr),
            self.readiness,
            register_sent.clone(),
        ));

        let mut registered: Option<ServiceRegistration> = None;
        let mut registration_pending = true;
        let mut server_running = true;
        tokio::pin!(shutdown);

        let outcome = loop {
            tokio::select! {
                result = &mut server => {
                    server_running = false;
                    break Err(listener_failure(result));
                }
                result = &mut registration, if registration_pending => {
                    registration_pending = false;
                    match result {
                        Ok(Ok(record)) => registered = record,
                        Ok(Err(err)) => break Err(err),
                        Err(err) => {
                            break Err(BootstrapError::Serve(format!("registration task failed: {err}")));
                        }
                    }
                }
                _ = &mut shutdown => {
                    info!(service, "shutdown signal received");
                    break Ok(());
                }
            }
        };

        // 注册请求已发出时等它返回，超时则按实例 ID 注销
        let mut deregister_id = registered.map(|record| record.id);
        if registration_pending {
            if register_sent.load(Ordering::Acquire) {
                match tokio::time::timeout(REGISTRATION_DRAIN, &mut registration).await {
                    Ok(Ok(Ok(record))) => deregister_id = record.map(|record| record.id),
                    Ok(Ok(Err(BootstrapError::Registration(RegistryError::Rejected { .. })))) => {}
                    _ => {
                        registration.abort();
                        deregister_id = Some(identity.instance_id());
                    }
                }
            } else {
                registration.abort();
            }
        }

        let _ = stop_tx.send(());
        if server_running {
            match server.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(service, error = %err, "listener reported error during shutdown"),
                Err(err) => warn!(service, error = %err, "listener task failed during shutdown"),
            }
        }

        if let (Some(registrar), Some(instance_id)) = (&self.registrar, &deregister_id) {
            match registrar.deregister(instance_id).await {
                Ok(()) => info!(%instance_id, "service deregistered"),
                Err(err) => warn!(%instance_id, error = %err, "failed to deregister service"),
            }
        }

        info!(service, "service stopped");
        outcome
    }
}

/// 一次性注册任务：端口可连接、注册中心可达之后才注册
async fn register_when_listening(
    registrar: Option<ConsulRegistrar>,
    record: ServiceRegistration,
    listen_addr: SocketAddr,
    policy: BackoffPolicy,
    register_sent: Arc<AtomicBool>,
) -> Result<Option<ServiceRegistration>, BootstrapError> {
    let Some(registrar) = registrar else {
        return Ok(None);
    };

    wait_until_ready("grpc listener", policy, || TcpStream::connect(listen_addr)).await?;
    wait_until_ready("registry", policy, || registrar.ping()).await?;
    register_sent.store(true, Ordering::Release);
    registrar.register(&record).await?;

    Ok(Some(record))
}

fn listener_failure(result: Result<Result<(), tonic::transport::Error>, JoinError>) -> BootstrapError {
    match result {
        Ok(Ok(())) => BootstrapError::Serve("listener stopped unexpectedly".to_string()),
        Ok(Err(err)) => BootstrapError::Serve(err.to_string()),
        Err(err) => BootstrapError::Serve(err.to_string()),
    }
}

/// 监听在通配地址时，通过回环地址探测
fn probe_addr(local_addr: SocketAddr) -> SocketAddr {
    let ip = match local_addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, local_addr.port())
}
