//! Assessment use-cases and export

pub mod exporter;
pub mod service;

pub use exporter::{AssessmentExporter, ExportFormat, ExportOutput};
pub use service::{AssessmentResult, AssessmentService};
