pub mod diesel_models;
pub mod migrations;
pub mod pg_tls;
pub mod pool;
pub mod retry;
pub mod store;
pub mod util;

pub use pool::{DbError, PgPool};
pub use store::Store;
