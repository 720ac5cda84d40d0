//! Loading and summarizing the four-school EC growth experiment.

pub mod analysis;
pub mod cache;
pub mod dataset;
pub mod error;
pub mod export;
pub mod loader;
pub mod logger;
pub mod resolver;
pub mod workbook;

pub use cache::DatasetCache;
pub use dataset::{Dataset, DatasetLoader};
pub use error::GrowforgeError;
