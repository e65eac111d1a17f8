pub mod extractors;
pub mod manager;
pub mod notifiers;
pub mod traits;

pub use extractors::StoreExtractor;
pub use manager::ExtractorRegistry;
pub use traits::{Extraction, Extractor, NotificationSink};
