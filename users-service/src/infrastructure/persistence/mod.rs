pub mod postgres_user_repo;

pub use postgres_user_repo::PostgresUserRepository;
