//! Bank review analytics pipeline: ingestion through the insights report.

pub mod config;
pub mod output;
pub mod pipeline;

pub use config::PipelineConfig;
pub use output::{keyword_rows, output_rows, write_json, ResultFormatter};
pub use pipeline::{Annotator, PipelineOrchestrator, PipelineOutput};
