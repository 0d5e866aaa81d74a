//! Business logic and use cases

pub mod assessments;
pub mod audit;
pub mod identity;

pub use assessments::{AssessmentResult, AssessmentService, ExportFormat};
pub use audit::AuditService;
pub use identity::{AuthResult, UserService};
