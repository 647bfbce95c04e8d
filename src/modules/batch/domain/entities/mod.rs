pub mod batch;

pub use batch::{Batch, NewBatch};
