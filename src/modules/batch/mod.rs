pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{BatchMembershipManager, BatchService};
pub use domain::{Batch, BatchRepository, NewBatch};
pub use infrastructure::BatchRepositoryImpl;
