pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::BovineService;
pub use domain::{
    Bovine, BovineRepository, BovineSearchCriteria, BovineStatus, BovineUpdate, Category,
    LifecycleValidator, NewBovine, Sex,
};
pub use infrastructure::BovineRepositoryImpl;
