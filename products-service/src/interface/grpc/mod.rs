pub mod handler;
pub mod server;

pub use handler::ProductGrpcHandler;
pub use server::ProductGrpcServer;
