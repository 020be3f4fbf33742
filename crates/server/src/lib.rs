pub mod config;
pub mod server;

pub use server::Server;
pub use server::ServerResult;
