pub mod bovine_status;
pub mod category;
pub mod sex;

pub use bovine_status::BovineStatus;
pub use category::Category;
pub use sex::Sex;
