//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod export;

pub use export::{ExportService, ModelExport};
