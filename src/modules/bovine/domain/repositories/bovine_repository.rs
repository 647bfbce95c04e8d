use async_trait::async_trait;

use crate::modules::bovine::domain::entities::bovine::{Bovine, BovineSearchCriteria};
use crate::shared::application::{PaginatedResult, PaginationParams};
use crate::shared::errors::AppResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BovineRepository: Send + Sync {
    /// Lookup by natural key, both components case-insensitive.
    async fn find_by_tag_and_cuig(&self, tag: &str, cuig: &str) -> AppResult<Option<Bovine>>;

    /// Bovines whose tag is in `tags`, whatever their establishment. Unknown tags are skipped.
    async fn find_by_tags(&self, tags: &[String]) -> AppResult<Vec<Bovine>>;

    /// Store a new bovine. Fails with `AlreadyExists` when the natural key is taken.
    async fn insert(&self, bovine: &Bovine) -> AppResult<Bovine>;

    /// Persist the bovine including its batch memberships.
    async fn save(&self, bovine: &Bovine) -> AppResult<Bovine>;

    async fn save_all(&self, bovines: &[Bovine]) -> AppResult<Vec<Bovine>>;

    async fn delete(&self, bovine: &Bovine) -> AppResult<()>;

    async fn search(
        &self,
        criteria: &BovineSearchCriteria,
        pagination: &PaginationParams,
    ) -> AppResult<PaginatedResult<Bovine>>;
}
