use async_trait::async_trait;
use chrono::{DateTime, Utc};
use practical_core::storage::ensure_columns;
use practical_core::{Entity, EntityId, EntityRepository, Lifecycle, StoreError};
use sqlx::{FromRow, PgPool};

use crate::domain::model::{NewProduct, Product};

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id BIGSERIAL PRIMARY KEY,
    created_at TIMESTAMPTZ,
    updated_at TIMESTAMPTZ,
    deleted_at TIMESTAMPTZ,
    name TEXT,
    price DOUBLE PRECISION
)
"#;

const CREATE_DELETED_AT_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_products_deleted_at ON products (deleted_at)";

/// 列名与 information_schema 中的 data_type
const COLUMNS: &[(&str, &str)] = &[
    ("id", "bigint"),
    ("created_at", "timestamp with time zone"),
    ("updated_at", "timestamp with time zone"),
    ("deleted_at", "timestamp with time zone"),
    ("name", "text"),
    ("price", "double precision"),
];

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: Option<String>,
    price: Option<f64>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: EntityId::new(row.id),
            name: row.name.unwrap_or_default(),
            price: row.price.unwrap_or_default(),
            lifecycle: Lifecycle::new(
                row.created_at.unwrap_or_default(),
                row.updated_at.unwrap_or_default(),
                row.deleted_at,
            ),
        }
    }
}

/// 基于 PostgreSQL 的商品仓储
#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityRepository<Product> for PostgresProductRepository {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        sqlx::query(CREATE_DELETED_AT_INDEX_SQL)
            .execute(&self.pool)
            .await?;
        ensure_columns(&self.pool, Product::TABLE, COLUMNS).await
    }

    async fn insert(&self, draft: NewProduct) -> Result<Product, StoreError> {
        let (id, created_at, updated_at): (i64, DateTime<Utc>, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO products (name, price, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(&draft.name)
        .bind(draft.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(Product::assemble(
            EntityId::new(id),
            draft,
            Lifecycle::new(created_at, updated_at, None),
        ))
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, price, created_at, updated_at, deleted_at
            FROM products
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::from).ok_or(StoreError::NotFound)
    }

    async fn soft_delete(&self, id: EntityId) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_with_null_columns() {
        let product = Product::from(ProductRow {
            id: 3,
            name: None,
            price: None,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        });

        assert_eq!(product.id, EntityId::new(3));
        assert!(product.name.is_empty());
        assert_eq!(product.price, 0.0);
        assert!(!product.lifecycle.is_deleted());
    }

    #[test]
    fn test_declared_columns_match_create_statement() {
        for (column, _) in COLUMNS {
            assert!(CREATE_TABLE_SQL.contains(column), "missing {column}");
        }
    }
}
