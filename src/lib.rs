//! Cleaning and analysis pipeline for the global layoffs dataset.

pub mod analysis;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod records;

pub use error::{PipelineError, Result};
pub use records::LayoffRecord;
