use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::log_debug;
use crate::modules::batch::domain::{entities::batch::Batch, repositories::BatchRepository};
use crate::modules::bovine::domain::{
    entities::bovine::{Bovine, BovineSearchCriteria},
    repositories::BovineRepository,
};
use crate::shared::application::{PaginatedResult, PaginationParams};
use crate::shared::domain::value_objects::{BatchKey, BovineKey};
use crate::shared::errors::{AppError, AppResult};

/// Registry storage kept in process memory.
///
/// Implements both repository ports over case-insensitive natural keys, with the same
/// uniqueness rules as the database. Deleting an aggregate drops it from the other side's
/// membership sets, like the cascading join table does.
#[derive(Default)]
pub struct InMemoryRegistryStore {
    bovines: DashMap<BovineKey, Bovine>,
    batches: DashMap<BatchKey, Batch>,
}

impl InMemoryRegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bovine_count(&self) -> usize {
        self.bovines.len()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }
}

#[async_trait]
impl BovineRepository for InMemoryRegistryStore {
    async fn find_by_tag_and_cuig(&self, tag: &str, cuig: &str) -> AppResult<Option<Bovine>> {
        let key = BovineKey::new(tag, cuig);
        Ok(self.bovines.get(&key).map(|entry| entry.value().clone()))
    }

    async fn find_by_tags(&self, tags: &[String]) -> AppResult<Vec<Bovine>> {
        let wanted: HashSet<String> = tags.iter().map(|t| t.to_lowercase()).collect();

        let mut found: Vec<Bovine> = self
            .bovines
            .iter()
            .filter(|entry| wanted.contains(&entry.tag.to_lowercase()))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by(|a, b| a.key().cmp(&b.key()));
        Ok(found)
    }

    async fn insert(&self, bovine: &Bovine) -> AppResult<Bovine> {
        match self.bovines.entry(bovine.key()) {
            Entry::Occupied(_) => Err(AppError::AlreadyExists(format!(
                "The bovine with tag {} already exists",
                bovine.tag
            ))),
            Entry::Vacant(slot) => {
                slot.insert(bovine.clone());
                Ok(bovine.clone())
            }
        }
    }

    async fn save(&self, bovine: &Bovine) -> AppResult<Bovine> {
        self.bovines.insert(bovine.key(), bovine.clone());
        Ok(bovine.clone())
    }

    async fn save_all(&self, bovines: &[Bovine]) -> AppResult<Vec<Bovine>> {
        log_debug!("In-memory store saving {} bovines", bovines.len());
        for bovine in bovines {
            self.bovines.insert(bovine.key(), bovine.clone());
        }
        Ok(bovines.to_vec())
    }

    async fn delete(&self, bovine: &Bovine) -> AppResult<()> {
        let key = bovine.key();
        self.bovines.remove(&key);
        for mut batch in self.batches.iter_mut() {
            batch.members.remove(&key);
        }
        Ok(())
    }

    async fn search(
        &self,
        criteria: &BovineSearchCriteria,
        pagination: &PaginationParams,
    ) -> AppResult<PaginatedResult<Bovine>> {
        let mut matching: Vec<Bovine> = self
            .bovines
            .iter()
            .filter(|entry| criteria.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        matching.sort_by(|a, b| a.key().cmp(&b.key()));

        Ok(PaginatedResult::from_all(matching, pagination))
    }
}

#[async_trait]
impl BatchRepository for InMemoryRegistryStore {
    async fn find_by_name_and_cuig(&self, name: &str, cuig: &str) -> AppResult<Option<Batch>> {
        let key = BatchKey::new(name, cuig);
        Ok(self.batches.get(&key).map(|entry| entry.value().clone()))
    }

    async fn find_all(&self) -> AppResult<Vec<Batch>> {
        let mut all: Vec<Batch> = self.batches.iter().map(|e| e.value().clone()).collect();
        all.sort_by_key(|b| b.creation_date);
        Ok(all)
    }

    async fn find_all_by_cuig(&self, cuig: &str) -> AppResult<Vec<Batch>> {
        let cuig = cuig.to_lowercase();
        let mut owned: Vec<Batch> = self
            .batches
            .iter()
            .filter(|entry| entry.establishment_cuig.to_lowercase() == cuig)
            .map(|entry| entry.value().clone())
            .collect();
        owned.sort_by_key(|b| b.creation_date);
        Ok(owned)
    }

    async fn insert(&self, batch: &Batch) -> AppResult<Batch> {
        match self.batches.entry(batch.key()) {
            Entry::Occupied(_) => Err(AppError::AlreadyExists(format!(
                "The batch with name {} already exists",
                batch.batch_name
            ))),
            Entry::Vacant(slot) => {
                slot.insert(batch.clone());
                Ok(batch.clone())
            }
        }
    }

    async fn save(&self, batch: &Batch) -> AppResult<Batch> {
        self.batches.insert(batch.key(), batch.clone());
        Ok(batch.clone())
    }

    async fn delete(&self, batch: &Batch) -> AppResult<()> {
        let key = batch.key();
        self.batches.remove(&key);
        for mut bovine in self.bovines.iter_mut() {
            bovine.batches.remove(&key);
        }
        Ok(())
    }
}
