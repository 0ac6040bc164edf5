pub mod postgres_product_repo;

pub use postgres_product_repo::PostgresProductRepository;
