pub mod batch_repository;

pub use batch_repository::BatchRepository;
