pub mod loader;
pub mod processor;
pub mod relationships;

pub use processor::{BatchStats, Processor, ProcessorConfig, EXTRACTION_VERSION};
pub use relationships::seed_known_relationships;
