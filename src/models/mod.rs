pub mod notification;
pub mod product;

// Re-exports for convenience
pub use notification::{Notification, NotificationKind};
pub use product::{NewProduct, Product, store_id_from_url};
