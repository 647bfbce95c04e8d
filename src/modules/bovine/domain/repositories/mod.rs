pub mod bovine_repository;

pub use bovine_repository::BovineRepository;
