pub mod entities;
pub mod repositories;
pub mod services;

pub use entities::{Batch, NewBatch};
pub use repositories::BatchRepository;
