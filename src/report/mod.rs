//! Report module - console summaries and the JSON run report

pub mod quality_report;
pub mod summary;

pub use quality_report::*;
pub use summary::*;
