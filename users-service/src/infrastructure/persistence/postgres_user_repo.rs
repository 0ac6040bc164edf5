use async_trait::async_trait;
use chrono::{DateTime, Utc};
use practical_core::storage::ensure_columns;
use practical_core::{Entity, EntityId, EntityRepository, Lifecycle, StoreError};
use sqlx::{FromRow, PgPool};

use crate::domain::model::{NewUser, User};

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    created_at TIMESTAMPTZ,
    updated_at TIMESTAMPTZ,
    deleted_at TIMESTAMPTZ,
    name TEXT,
    email TEXT,
    CONSTRAINT users_email_key UNIQUE (email)
)
"#;

const CREATE_DELETED_AT_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_users_deleted_at ON users (deleted_at)";

/// 列名与 information_schema 中的 data_type
const COLUMNS: &[(&str, &str)] = &[
    ("id", "bigint"),
    ("created_at", "timestamp with time zone"),
    ("updated_at", "timestamp with time zone"),
    ("deleted_at", "timestamp with time zone"),
    ("name", "text"),
    ("email", "text"),
];

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: Option<String>,
    email: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: EntityId::new(row.id),
            name: row.name.unwrap_or_default(),
            email: row.email.unwrap_or_default(),
            lifecycle: Lifecycle::new(
                row.created_at.unwrap_or_default(),
                row.updated_at.unwrap_or_default(),
                row.deleted_at,
            ),
        }
    }
}

/// 基于 PostgreSQL 的用户仓储
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityRepository<User> for PostgresUserRepository {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        sqlx::query(CREATE_DELETED_AT_INDEX_SQL)
            .execute(&self.pool)
            .await?;
        ensure_columns(&self.pool, User::TABLE, COLUMNS).await
    }

    async fn insert(&self, draft: NewUser) -> Result<User, StoreError> {
        let (id, created_at, updated_at): (i64, DateTime<Utc>, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO users (name, email, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(User::assemble(
            EntityId::new(id),
            draft,
            Lifecycle::new(created_at, updated_at, None),
        ))
    }

    async fn find_by_id(&self, id: EntityId) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, created_at, updated_at, deleted_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::from).ok_or(StoreError::NotFound)
    }

    async fn soft_delete(&self, id: EntityId) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.value())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
