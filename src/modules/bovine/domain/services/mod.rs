pub mod lifecycle_validator;

pub use lifecycle_validator::LifecycleValidator;
