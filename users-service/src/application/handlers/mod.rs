pub mod command_handler;
pub mod query_handler;

pub use command_handler::UserCommandHandler;
pub use query_handler::UserQueryHandler;
