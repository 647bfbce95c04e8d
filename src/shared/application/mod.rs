/// Shared application layer patterns
///
/// This module contains application-level abstractions used across
/// multiple bounded contexts.
pub mod auth_context;
pub mod pagination;

pub use auth_context::AuthContext;
pub use pagination::*;
