use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::shared::domain::value_objects::{BatchKey, BovineKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: Uuid,
    pub batch_name: String,
    pub establishment_cuig: String,
    pub description: Option<String>,
    pub creation_date: DateTime<Utc>,
    /// Member bovines. Only the membership primitives mutate it.
    pub(crate) members: BTreeSet<BovineKey>,
}

/// Request to create a batch, optionally seeded with bovine tags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBatch {
    pub batch_name: String,
    pub establishment_cuig: String,
    pub description: Option<String>,
    #[serde(default)]
    pub bovine_tags: Vec<String>,
}

impl Batch {
    pub fn new(batch_name: String, establishment_cuig: String, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            batch_name,
            establishment_cuig,
            description: description.filter(|d| !d.trim().is_empty()),
            creation_date: Utc::now(),
            members: BTreeSet::new(),
        }
    }

    pub fn key(&self) -> BatchKey {
        BatchKey::new(self.batch_name.clone(), self.establishment_cuig.clone())
    }

    pub fn members(&self) -> &BTreeSet<BovineKey> {
        &self.members
    }

    pub fn has_member(&self, bovine: &BovineKey) -> bool {
        self.members.contains(bovine)
    }

    pub fn member_tags(&self) -> Vec<String> {
        self.members.iter().map(|m| m.tag.clone()).collect()
    }

    /// Replaces the member set wholesale. Used by stores when rehydrating an aggregate.
    pub fn with_members(mut self, members: impl IntoIterator<Item = BovineKey>) -> Self {
        self.members = members.into_iter().collect();
        self
    }
}
