//! 依赖就绪探测
//!
//! 以带上限的指数退避反复执行探测，超过最长等待时间后返回
//! [`BootstrapError::ReadinessTimeout`]，携带最后一次探测的错误。

use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::ReadinessConfig;
use crate::error::BootstrapError;

/// 退避策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    initial_backoff: Duration,
    max_backoff: Duration,
    max_wait: Duration,
}

impl BackoffPolicy {
    pub fn new(initial_backoff: Duration, max_backoff: Duration, max_wait: Duration) -> Self {
        Self {
            initial_backoff,
            max_backoff: max_backoff.max(initial_backoff),
            max_wait,
        }
    }

    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// 第 `attempt` 次失败后的等待间隔（从 0 开始）
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.min(16)).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from(&ReadinessConfig::default())
    }
}

impl From<&ReadinessConfig> for BackoffPolicy {
    fn from(config: &ReadinessConfig) -> Self {
        Self::new(
            Duration::from_millis(config.initial_backoff_ms),
            Duration::from_millis(config.max_backoff_ms),
            Duration::from_millis(config.max_wait_ms),
        )
    }
}

/// 等待依赖就绪
///
/// 每次探测都受剩余等待时间约束，探测本身挂起也不会突破上限。
pub async fn wait_until_ready<T, E, F, Fut>(
    dependency: &'static str,
    policy: BackoffPolicy,
    mut probe: F,
) -> Result<T, BootstrapError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let started = Instant::now();
    let mut attempt = 0u32;

    loop {
        let remaining = policy.max_wait.saturating_sub(started.elapsed());
        let last_error = match tokio::time::timeout(remaining, probe()).await {
            Ok(Ok(value)) => {
                if attempt > 0 {
                    info!(
                        dependency,
                        attempts = attempt + 1,
                        waited = ?started.elapsed(),
                        "dependency ready"
                    );
                }
                return Ok(value);
            }
            Ok(Err(err)) => err.to_string(),
            Err(_) => "probe timed out".to_string(),
        };

        let waited = started.elapsed();
        if waited >= policy.max_wait {
            return Err(BootstrapError::ReadinessTimeout {
                dependency,
                waited,
                last_error,
            });
        }

        let delay = policy
            .backoff(attempt)
            .min(policy.max_wait.saturating_sub(waited));
        debug!(dependency, attempt, ?delay, error = %last_error, "dependency not ready, retrying");
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
