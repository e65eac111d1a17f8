pub mod commands;
pub mod config;
pub mod models;
pub mod plugins;
pub mod product_manager;
pub mod scheduler;
pub mod scraper;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use utils::error::{AppError, Result};
