pub mod bovine;

pub use bovine::{Bovine, BovineSearchCriteria, BovineUpdate, NewBovine};
