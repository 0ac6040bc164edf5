pub mod command_handler;
pub mod query_handler;

pub use command_handler::ProductCommandHandler;
pub use query_handler::ProductQueryHandler;
