pub mod builder;
pub mod tables;

pub use builder::DatasetLoader;
pub use tables::{Dataset, Diagnostics, LoadWarning, SourceFile};
