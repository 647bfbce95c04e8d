pub mod batch_repository_impl;

pub use batch_repository_impl::BatchRepositoryImpl;
