//! # Velocity Credit Assessment Service
//!
//! Credit scoring and risk assessment service for loan applicants.
//! Operators rate five factors on fixed lookup tables; the service computes
//! a weighted composite score, assigns a risk category with a product
//! recommendation, and keeps an auditable history of every assessment.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, the scoring model and repository traits
//! - **application**: Business logic and use cases
//! - **infrastructure**: External concerns (database, crypto)
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Cross-cutting helpers

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
