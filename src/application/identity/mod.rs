//! Identity and user management use-cases

pub mod service;

pub use service::{AuthResult, UserService};
