pub mod batch;
pub mod bovine;
