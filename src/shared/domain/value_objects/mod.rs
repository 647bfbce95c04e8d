mod registry_keys;

pub use registry_keys::{BatchKey, BovineKey};
