// Shared Kernel - Domain Driven Design
// Following Clean Architecture + Hexagonal Architecture patterns

pub mod application; // Caller context, pagination
pub mod domain; // Natural keys shared by both aggregates
pub mod errors; // Shared error types
pub mod infrastructure; // Database, configuration, in-memory store
pub mod utils; // Logging and input validation

// Re-exports for convenience
pub use application::{AuthContext, PaginatedResult, PaginationParams};
pub use errors::{AppError, AppResult};
pub use infrastructure::database::Database;
