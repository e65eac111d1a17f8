pub mod error;
pub mod format;

pub use error::{AppError, Result};
pub use format::{format_price, parse_brl, parse_user_price};
