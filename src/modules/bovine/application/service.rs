use std::sync::Arc;

use crate::modules::batch::application::membership_manager::BatchMembershipManager;
use crate::modules::bovine::domain::{
    entities::bovine::{Bovine, BovineSearchCriteria, BovineUpdate, NewBovine},
    repositories::bovine_repository::BovineRepository,
    services::lifecycle_validator::LifecycleValidator,
};
use crate::shared::application::{AuthContext, PaginatedResult, PaginationParams};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::TimedOperation;
use crate::shared::utils::Validator;
use crate::{log_debug, log_info};

pub struct BovineService {
    bovine_repo: Arc<dyn BovineRepository>,
    membership: Arc<BatchMembershipManager>,
    default_page_size: u32,
}

impl BovineService {
    pub fn new(
        bovine_repo: Arc<dyn BovineRepository>,
        membership: Arc<BatchMembershipManager>,
        default_page_size: u32,
    ) -> Self {
        Self {
            bovine_repo,
            membership,
            default_page_size,
        }
    }

    pub async fn register(&self, auth: &AuthContext, new_bovine: NewBovine) -> AppResult<Bovine> {
        log_info!(
            "Registering bovine {} for establishment {}",
            new_bovine.tag,
            new_bovine.establishment_cuig
        );

        Validator::validate_tag(&new_bovine.tag)?;
        Validator::validate_cuig(&new_bovine.establishment_cuig)?;
        auth.ensure_same_establishment(&new_bovine.establishment_cuig)?;

        let existing = self
            .bovine_repo
            .find_by_tag_and_cuig(&new_bovine.tag, &new_bovine.establishment_cuig)
            .await?;
        if existing.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "The bovine with tag {} already exists",
                new_bovine.tag
            )));
        }

        LifecycleValidator::validate_creation(&new_bovine)?;

        self.bovine_repo.insert(&Bovine::new(new_bovine)).await
    }

    pub async fn get(&self, auth: &AuthContext, tag: &str, cuig: Option<&str>) -> AppResult<Bovine> {
        let cuig = auth.resolve_cuig(cuig);
        log_debug!("Retrieving bovine {} of establishment {}", tag, cuig);
        self.find(tag, &cuig).await
    }

    /// Fails with a validation error when the bovine is dead or sold.
    pub async fn check_usable(
        &self,
        auth: &AuthContext,
        tag: &str,
        cuig: Option<&str>,
    ) -> AppResult<Bovine> {
        let bovine = self.get(auth, tag, cuig).await?;
        LifecycleValidator::validate_for_usage(&bovine)?;
        Ok(bovine)
    }

    pub async fn update(
        &self,
        auth: &AuthContext,
        tag: &str,
        cuig: Option<&str>,
        update: BovineUpdate,
    ) -> AppResult<Bovine> {
        let cuig = auth.resolve_cuig(cuig);
        log_info!("Updating bovine {} of establishment {}", tag, cuig);

        let mut bovine = self.find(tag, &cuig).await?;
        LifecycleValidator::validate_update(&update, &bovine)?;

        update.apply_to(&mut bovine);
        self.bovine_repo.save(&bovine).await
    }

    pub async fn delete(&self, auth: &AuthContext, tag: &str, cuig: Option<&str>) -> AppResult<()> {
        let cuig = auth.resolve_cuig(cuig);
        log_info!("Deleting bovine {} of establishment {}", tag, cuig);

        let mut bovine = self.find(tag, &cuig).await?;
        let detached = self.membership.detach_bovine(&mut bovine).await?;
        log_debug!("Bovine {} detached from {} batches", tag, detached);

        self.bovine_repo.delete(&bovine).await
    }

    /// Example-match search. Non-admins always search their own establishment.
    pub async fn search(
        &self,
        auth: &AuthContext,
        criteria: BovineSearchCriteria,
        pagination: Option<PaginationParams>,
    ) -> AppResult<PaginatedResult<Bovine>> {
        let timer = TimedOperation::new("bovine_search");
        let mut criteria = criteria.normalized();
        if !auth.admin {
            criteria.establishment_cuig = Some(auth.cuig.clone());
        }

        let pagination = match pagination {
            Some(p) => PaginationParams::new(p.page, p.size)?,
            None => PaginationParams::new(0, self.default_page_size)?,
        };

        let page = self.bovine_repo.search(&criteria, &pagination).await?;
        log_debug!(
            "Search matched {} bovines, returning page {} of {}",
            page.total_elements,
            page.page,
            page.total_pages
        );
        timer.finish();
        Ok(page)
    }

    /// Bovines carrying any of `tags`. Non-admins only see their establishment's.
    pub async fn list_by_tags(&self, auth: &AuthContext, tags: &[String]) -> AppResult<Vec<Bovine>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let bovines = self.bovine_repo.find_by_tags(tags).await?;
        Ok(bovines
            .into_iter()
            .filter(|b| auth.is_on_the_same_establishment(&b.establishment_cuig))
            .collect())
    }

    async fn find(&self, tag: &str, cuig: &str) -> AppResult<Bovine> {
        self.bovine_repo
            .find_by_tag_and_cuig(tag, cuig)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Bovine with tag {} doesn't exist", tag)))
    }
}
