//! CLI command implementations.

mod config;
mod rooms;
mod seed;
mod serve;

pub use config::run_config;
pub use rooms::run_rooms;
pub use seed::run_seed;
pub use serve::run_serve;
