pub mod config;
pub mod error;
pub mod models;

pub use config::AppConfig;
pub use error::{CoreError, ExitCode, Result};
pub use models::*;
