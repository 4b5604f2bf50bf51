//! Application layer: services and use cases
//!
//! This layer wires configuration into the domain builder and serializer.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use services::{ExportService, ModelExport};
