//! Trackplan Loader - Definition discovery and the validation pipeline
//!
//! This crate finds definition files, decodes them into documents and runs
//! them through aggregation, validation and graph construction.

#![allow(clippy::result_large_err)]

pub mod dir;
pub mod error;
pub mod load;
pub mod locate;
pub mod memory;
pub mod pipeline;
pub mod traits;

pub use dir::DirSource;
pub use error::{LoaderError, LoaderResult, ParseError};
pub use load::parse_document;
pub use locate::{locate, DEFAULT_EXTENSIONS};
pub use memory::MemorySource;
pub use pipeline::{
    FailureReport, Loaded, Pipeline, PipelineOptions, Report, RunError, RunOutcome, RunStats,
};
pub use traits::DefinitionSource;
