pub mod environment;
pub mod file_formats;
pub mod growth;
pub mod school;
