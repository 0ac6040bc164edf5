//! PostgreSQL 连接与表结构校验
//!
//! 连接池在启动时建立一次并由实体服务独占；建立连接前通过
//! [`wait_until_ready`] 反复探测数据库，直到可用或超时。

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::error::{BootstrapError, StoreError};
use crate::readiness::{BackoffPolicy, wait_until_ready};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// 连接 PostgreSQL，就绪前按退避策略重试
pub async fn connect_postgres(
    url: &str,
    max_connections: Option<u32>,
    policy: BackoffPolicy,
) -> Result<PgPool, BootstrapError> {
    let max_connections = max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS);

    let pool = wait_until_ready("storage", policy, || async move {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(url)
            .await
            .map_err(StoreError::from)?;
        ping(&pool).await?;
        Ok::<_, StoreError>(pool)
    })
    .await?;

    info!(max_connections, "connected to postgres");
    Ok(pool)
}

/// 数据库连通性探测
pub async fn ping(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// 校验表中包含全部声明的列，且列类型一致
///
/// `columns` 为 `(列名, information_schema 中的 data_type)`。表已存在但结构
/// 不同（例如由旧版本创建）时，`CREATE TABLE IF NOT EXISTS` 不会报错，需要在
/// 这里显式发现
pub async fn ensure_columns(
    pool: &PgPool,
    table: &str,
    columns: &[(&str, &str)],
) -> Result<(), StoreError> {
    let existing: Vec<(String, String)> = sqlx::query_as(
        "SELECT column_name::text, data_type::text FROM information_schema.columns \
         WHERE table_schema = current_schema() AND table_name = $1",
    )
    .bind(table)
    .fetch_all(pool)
    .await?;

    let drift = schema_drift(&existing, columns);
    if drift.is_empty() {
        Ok(())
    } else {
        Err(StoreError::Database(format!(
            "table {} does not match declared columns: {}",
            table,
            drift.join(", ")
        )))
    }
}

fn schema_drift(existing: &[(String, String)], declared: &[(&str, &str)]) -> Vec<String> {
    declared
        .iter()
        .filter_map(|(column, expected)| {
            match existing.iter().find(|(name, _)| name == column) {
                None => Some(format!("{column} missing")),
                Some((_, actual)) if !actual.eq_ignore_ascii_case(expected) => {
                    Some(format!("{column} is {actual}, expected {expected}"))
                }
                Some(_) => None,
            }
        })
        .collect()
}
