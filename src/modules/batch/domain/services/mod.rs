pub mod membership;

pub use membership::{link, unlink};
