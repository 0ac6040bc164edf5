//! 需要真实 PostgreSQL：`PRODUCTS_DATABASE_URL=postgres://... cargo test -- --ignored`

use std::time::Duration;

use practical_core::storage::connect_postgres;
use practical_core::{BackoffPolicy, EntityRepository};
use products_service::domain::model::NewProduct;
use products_service::infrastructure::persistence::PostgresProductRepository;

async fn repository() -> PostgresProductRepository {
    let url = std::env::var("PRODUCTS_DATABASE_URL").expect("PRODUCTS_DATABASE_URL not set");
    let policy = BackoffPolicy::new(
        Duration::from_millis(100),
        Duration::from_millis(500),
        Duration::from_secs(5),
    );
    let pool = connect_postgres(&url, Some(2), policy).await.unwrap();
    PostgresProductRepository::new(pool)
}

#[tokio::test]
#[ignore = "requires PostgreSQL (PRODUCTS_DATABASE_URL)"]
async fn test_schema_is_idempotent() {
    let repo = repository().await;
    repo.ensure_schema().await.unwrap();
    repo.ensure_schema().await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (PRODUCTS_DATABASE_URL)"]
async fn test_price_round_trips_as_double() {
    let repo = repository().await;
    repo.ensure_schema().await.unwrap();

    let created = repo
        .insert(NewProduct {
            name: "Widget".to_string(),
            price: 9.99,
        })
        .await
        .unwrap();

    let fetched = repo.find_by_id(created.id).await.unwrap();
    assert_eq!(fetched.name, "Widget");
    assert_eq!(fetched.price, 9.99);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (PRODUCTS_DATABASE_URL)"]
async fn test_soft_delete_hides_row() {
    let repo = repository().await;
    repo.ensure_schema().await.unwrap();

    let created = repo
        .insert(NewProduct {
            name: "Gone".to_string(),
            price: -1.0,
        })
        .await
        .unwrap();

    repo.soft_delete(created.id).await.unwrap();
    assert!(repo.find_by_id(created.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore = "requires PostgreSQL (PRODUCTS_DATABASE_URL)"]
async fn test_existing_table_with_wrong_price_type_is_rejected() {
    let url = std::env::var("PRODUCTS_DATABASE_URL").expect("PRODUCTS_DATABASE_URL not set");
    let policy = BackoffPolicy::new(
        Duration::from_millis(100),
        Duration::from_millis(500),
        Duration::from_secs(5),
    );
    // 单连接，保证 search_path 对后续语句生效
    let pool = connect_postgres(&url, Some(1), policy).await.unwrap();
    let schema = format!("drift_{}", std::process::id());
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {schema}"))
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(&format!("SET search_path TO {schema}"))
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE products (id BIGSERIAL PRIMARY KEY, created_at TIMESTAMPTZ, \
         updated_at TIMESTAMPTZ, deleted_at TIMESTAMPTZ, name TEXT, price TEXT)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let err = PostgresProductRepository::new(pool.clone())
        .ensure_schema()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("price is text"), "{err}");

    sqlx::query(&format!("DROP SCHEMA {schema} CASCADE"))
        .execute(&pool)
        .await
        .unwrap();
}
