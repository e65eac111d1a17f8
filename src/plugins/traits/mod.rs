pub mod extractor;
pub mod notifier;

pub use extractor::{Extraction, Extractor};
pub use notifier::NotificationSink;
