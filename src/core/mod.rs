pub mod classifier;
pub mod etl;
pub mod pipeline;
pub mod request_builder;
pub mod writer;

pub use crate::domain::model::{ClassifiedRecord, FetchedBatch, WriteSummary};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
