pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::LocalStorage;
pub use config::TomlConfig;
pub use core::{etl::EtlEngine, pipeline::RoutePipeline};
pub use utils::error::{EtlError, Result};
