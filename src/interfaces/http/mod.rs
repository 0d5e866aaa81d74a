//! HTTP interface — REST API, auth middleware and Swagger UI

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use common::{ApiResponse, PaginatedResponse, ValidatedJson};
pub use router::{create_api_router, ApiDoc};
