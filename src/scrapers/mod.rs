pub mod detail_resolver;
pub mod discovery;
pub mod http_client;

pub use detail_resolver::{resolve_detail, DetailMetadata, DetailResolution};
pub use discovery::{discover, known_type_codes, DiscoveryConfig, DiscoveryStats};
pub use http_client::HttpClient;
