pub mod entities;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::{Bovine, BovineSearchCriteria, BovineUpdate, NewBovine};
pub use repositories::BovineRepository;
pub use services::LifecycleValidator;
pub use value_objects::{BovineStatus, Category, Sex};
