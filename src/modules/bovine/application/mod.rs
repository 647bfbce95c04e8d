pub mod service;

pub use service::BovineService;
