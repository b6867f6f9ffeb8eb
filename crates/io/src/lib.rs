// Row store backends and store bootstrapping

pub mod open;
pub mod sqlite;

pub use open::open_store;
pub use sqlite::SqliteRowStore;

/// Settings database schema version
/// Increment when the table layout changes in a way old versions can't read
pub const SCHEMA_VERSION: u32 = 1;
