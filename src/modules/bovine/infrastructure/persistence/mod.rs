pub mod bovine_repository_impl;

pub use bovine_repository_impl::BovineRepositoryImpl;
