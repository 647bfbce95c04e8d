use std::sync::Arc;

use crate::modules::batch::domain::{
    entities::batch::{Batch, NewBatch},
    repositories::batch_repository::BatchRepository,
    services::membership::{link, unlink},
};
use crate::modules::bovine::domain::{
    entities::bovine::Bovine, repositories::bovine_repository::BovineRepository,
};
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::LogContext;
use crate::shared::utils::Validator;
use crate::{log_info, log_warn};

/// Keeps batches and bovines pointing at each other while members come and go.
///
/// Every operation mutates both aggregates through [`link`] / [`unlink`] and then persists
/// whatever changed, batch first.
pub struct BatchMembershipManager {
    bovine_repo: Arc<dyn BovineRepository>,
    batch_repo: Arc<dyn BatchRepository>,
}

impl BatchMembershipManager {
    pub fn new(bovine_repo: Arc<dyn BovineRepository>, batch_repo: Arc<dyn BatchRepository>) -> Self {
        Self {
            bovine_repo,
            batch_repo,
        }
    }

    pub async fn create_batch(&self, new_batch: NewBatch) -> AppResult<Batch> {
        Validator::validate_batch_name(&new_batch.batch_name)?;
        Validator::validate_cuig(&new_batch.establishment_cuig)?;

        let mut batch = Batch::new(
            new_batch.batch_name,
            new_batch.establishment_cuig,
            new_batch.description,
        );

        let mut bovines = self.resolve(&new_batch.bovine_tags).await?;
        for bovine in bovines.iter_mut() {
            link(bovine, &mut batch);
        }

        let saved = self.batch_repo.insert(&batch).await?;
        if !bovines.is_empty() {
            self.bovine_repo.save_all(&bovines).await?;
        }

        LogContext::membership_change(
            "create",
            &saved.batch_name,
            bovines.len(),
            new_batch.bovine_tags.len(),
        );
        log_info!(
            "Created batch {} for establishment {} with {} members",
            saved.batch_name,
            saved.establishment_cuig,
            saved.members().len()
        );

        Ok(saved)
    }

    pub async fn add_members(&self, mut batch: Batch, tags: &[String]) -> AppResult<Batch> {
        let mut changed = Vec::new();
        for mut bovine in self.resolve(tags).await? {
            if link(&mut bovine, &mut batch) {
                changed.push(bovine);
            }
        }

        self.persist(&batch, &changed).await?;
        LogContext::membership_change("add", &batch.batch_name, changed.len(), tags.len());

        Ok(batch)
    }

    pub async fn remove_members(&self, mut batch: Batch, tags: &[String]) -> AppResult<Batch> {
        let mut changed = Vec::new();
        for mut bovine in self.resolve(tags).await? {
            if unlink(&mut bovine, &mut batch) {
                changed.push(bovine);
            }
        }

        self.persist(&batch, &changed).await?;
        LogContext::membership_change("remove", &batch.batch_name, changed.len(), tags.len());

        Ok(batch)
    }

    /// Detach every member, persist them, then drop the batch itself.
    pub async fn delete_batch(&self, mut batch: Batch) -> AppResult<()> {
        let member_tags = batch.member_tags();

        let mut detached = Vec::new();
        for mut bovine in self.resolve(&member_tags).await? {
            if batch.has_member(&bovine.key()) && unlink(&mut bovine, &mut batch) {
                detached.push(bovine);
            }
        }

        if !detached.is_empty() {
            self.bovine_repo.save_all(&detached).await?;
        }
        LogContext::membership_change(
            "delete",
            &batch.batch_name,
            detached.len(),
            member_tags.len(),
        );

        self.batch_repo.delete(&batch).await?;
        log_info!(
            "Deleted batch {} of establishment {}",
            batch.batch_name,
            batch.establishment_cuig
        );

        Ok(())
    }

    /// Remove the bovine from every batch it belongs to, persisting those batches.
    ///
    /// Returns how many batches were updated.
    pub async fn detach_bovine(&self, bovine: &mut Bovine) -> AppResult<usize> {
        let memberships: Vec<_> = bovine.batches().iter().cloned().collect();
        let requested = memberships.len();
        let mut detached = 0;

        for key in memberships {
            let found = self
                .batch_repo
                .find_by_name_and_cuig(&key.batch_name, &key.establishment_cuig)
                .await?;

            match found {
                Some(mut batch) => {
                    if unlink(bovine, &mut batch) {
                        self.batch_repo.save(&batch).await?;
                        detached += 1;
                    }
                }
                None => log_warn!("Bovine {} references missing batch {}", bovine.key(), key),
            }
        }

        LogContext::membership_change("detach", &bovine.tag, detached, requested);
        Ok(detached)
    }

    async fn resolve(&self, tags: &[String]) -> AppResult<Vec<Bovine>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }
        self.bovine_repo.find_by_tags(tags).await
    }

    async fn persist(&self, batch: &Batch, bovines: &[Bovine]) -> AppResult<()> {
        self.batch_repo.save(batch).await?;
        if !bovines.is_empty() {
            self.bovine_repo.save_all(bovines).await?;
        }
        Ok(())
    }
}
