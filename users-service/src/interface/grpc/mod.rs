pub mod handler;
pub mod server;

pub use handler::UserGrpcHandler;
pub use server::UserGrpcServer;
