pub mod classifier;
pub mod corrector;
pub mod extractor;
pub mod junk;

pub use classifier::{classify, Classification, PdfQuality};
pub use corrector::correct_ocr_errors;
pub use extractor::{ExtractionError, ExtractionResult, ExtractionStats, PdfExtractor};
pub use junk::junk_reason;
