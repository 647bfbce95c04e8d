use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Natural key of a bovine: its tag within an establishment.
///
/// Both components compare case-insensitively, the spelling given at creation is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BovineKey {
    pub tag: String,
    pub establishment_cuig: String,
}

/// Natural key of a batch: its name within an establishment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchKey {
    pub batch_name: String,
    pub establishment_cuig: String,
}

impl BovineKey {
    pub fn new(tag: impl Into<String>, establishment_cuig: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            establishment_cuig: establishment_cuig.into(),
        }
    }

    fn normalized(&self) -> (String, String) {
        (
            self.tag.to_lowercase(),
            self.establishment_cuig.to_lowercase(),
        )
    }
}

impl BatchKey {
    pub fn new(batch_name: impl Into<String>, establishment_cuig: impl Into<String>) -> Self {
        Self {
            batch_name: batch_name.into(),
            establishment_cuig: establishment_cuig.into(),
        }
    }

    fn normalized(&self) -> (String, String) {
        (
            self.batch_name.to_lowercase(),
            self.establishment_cuig.to_lowercase(),
        )
    }
}

macro_rules! case_insensitive_key {
    ($key:ty) => {
        impl PartialEq for $key {
            fn eq(&self, other: &Self) -> bool {
                self.normalized() == other.normalized()
            }
        }

        impl Eq for $key {}

        impl Hash for $key {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.normalized().hash(state);
            }
        }

        impl PartialOrd for $key {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $key {
            fn cmp(&self, other: &Self) -> Ordering {
                self.normalized().cmp(&other.normalized())
            }
        }
    };
}

case_insensitive_key!(BovineKey);
case_insensitive_key!(BatchKey);

impl fmt::Display for BovineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.tag, self.establishment_cuig)
    }
}

impl fmt::Display for BatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.batch_name, self.establishment_cuig)
    }
}
