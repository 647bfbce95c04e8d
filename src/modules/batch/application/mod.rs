pub mod membership_manager;
pub mod service;

pub use membership_manager::BatchMembershipManager;
pub use service::BatchService;
