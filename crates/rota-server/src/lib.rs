pub mod dto;
pub mod error;
pub mod handlers;
pub mod rotation;
pub mod server;

pub use rotation::RotationConfig;
pub use server::{build_router, start, AppState, ServerConfig, ServerHandle};
