use async_trait::async_trait;

use crate::modules::batch::domain::entities::batch::Batch;
use crate::shared::errors::AppResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BatchRepository: Send + Sync {
    async fn find_by_name_and_cuig(&self, name: &str, cuig: &str) -> AppResult<Option<Batch>>;
    async fn find_all(&self) -> AppResult<Vec<Batch>>;
    async fn find_all_by_cuig(&self, cuig: &str) -> AppResult<Vec<Batch>>;
    /// Store a new batch. Fails with `AlreadyExists` when the name is taken in the establishment.
    async fn insert(&self, batch: &Batch) -> AppResult<Batch>;
    /// Persist the batch including its member set.
    async fn save(&self, batch: &Batch) -> AppResult<Batch>;
    async fn delete(&self, batch: &Batch) -> AppResult<()>;
}
