// Configuration loading

pub mod store;

pub use store::{ConfigError, StoreConfig};
