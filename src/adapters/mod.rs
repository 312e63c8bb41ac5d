// Adapters layer: concrete implementations for external systems (operator HTTP API, storage).

pub mod http;
pub mod storage;

pub use storage::LocalStorage;
