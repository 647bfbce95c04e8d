use std::sync::Arc;

use super::membership_manager::BatchMembershipManager;
use crate::modules::batch::domain::{
    entities::batch::{Batch, NewBatch},
    repositories::batch_repository::BatchRepository,
};
use crate::shared::application::AuthContext;
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_info};

pub struct BatchService {
    batch_repo: Arc<dyn BatchRepository>,
    membership: Arc<BatchMembershipManager>,
}

impl BatchService {
    pub fn new(batch_repo: Arc<dyn BatchRepository>, membership: Arc<BatchMembershipManager>) -> Self {
        Self {
            batch_repo,
            membership,
        }
    }

    pub async fn register(&self, auth: &AuthContext, new_batch: NewBatch) -> AppResult<Batch> {
        log_info!(
            "Registering batch {} for establishment {}",
            new_batch.batch_name,
            new_batch.establishment_cuig
        );

        auth.ensure_same_establishment(&new_batch.establishment_cuig)?;

        let existing = self
            .batch_repo
            .find_by_name_and_cuig(&new_batch.batch_name, &new_batch.establishment_cuig)
            .await?;
        if existing.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "The batch with name {} already exists",
                new_batch.batch_name
            )));
        }

        self.membership.create_batch(new_batch).await
    }

    pub async fn get(&self, auth: &AuthContext, name: &str, cuig: Option<&str>) -> AppResult<Batch> {
        let cuig = auth.resolve_cuig(cuig);
        log_debug!("Retrieving batch {} of establishment {}", name, cuig);
        self.find(name, &cuig).await
    }

    pub async fn delete(&self, auth: &AuthContext, name: &str, cuig: Option<&str>) -> AppResult<()> {
        let cuig = auth.resolve_cuig(cuig);
        log_info!("Deleting batch {} of establishment {}", name, cuig);

        let batch = self.find(name, &cuig).await?;
        self.membership.delete_batch(batch).await
    }

    pub async fn add_bovines(
        &self,
        auth: &AuthContext,
        name: &str,
        cuig: Option<&str>,
        tags: &[String],
    ) -> AppResult<Batch> {
        let cuig = auth.resolve_cuig(cuig);
        log_info!("Adding {} bovines to batch {} of establishment {}", tags.len(), name, cuig);

        let batch = self.find(name, &cuig).await?;
        self.membership.add_members(batch, tags).await
    }

    pub async fn remove_bovines(
        &self,
        auth: &AuthContext,
        name: &str,
        cuig: Option<&str>,
        tags: &[String],
    ) -> AppResult<Batch> {
        let cuig = auth.resolve_cuig(cuig);
        log_info!(
            "Removing {} bovines from batch {} of establishment {}",
            tags.len(),
            name,
            cuig
        );

        let batch = self.find(name, &cuig).await?;
        self.membership.remove_members(batch, tags).await
    }

    /// Admins see every batch; everybody else only their establishment's.
    pub async fn list(&self, auth: &AuthContext) -> AppResult<Vec<Batch>> {
        if auth.admin {
            self.batch_repo.find_all().await
        } else {
            self.batch_repo.find_all_by_cuig(&auth.cuig).await
        }
    }

    async fn find(&self, name: &str, cuig: &str) -> AppResult<Batch> {
        self.batch_repo
            .find_by_name_and_cuig(name, cuig)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Batch with name {} doesn't exist", name)))
    }
}
