pub mod modules;
mod schema;
pub mod shared;

use modules::{
    batch::{BatchMembershipManager, BatchRepository, BatchRepositoryImpl, BatchService},
    bovine::{BovineRepository, BovineRepositoryImpl, BovineService},
};
use shared::application::PaginationParams;
use shared::errors::AppResult;
use shared::infrastructure::{Database, InMemoryRegistryStore, RegistryConfig};
use shared::utils::init_logger;
use std::sync::Arc;

/// Fully wired registry: both application services over one pair of repositories.
pub struct RegistryServices {
    pub bovine_service: Arc<BovineService>,
    pub batch_service: Arc<BatchService>,
    pub membership: Arc<BatchMembershipManager>,
}

impl RegistryServices {
    pub fn new(
        bovine_repo: Arc<dyn BovineRepository>,
        batch_repo: Arc<dyn BatchRepository>,
        default_page_size: u32,
    ) -> Self {
        let membership = Arc::new(BatchMembershipManager::new(
            Arc::clone(&bovine_repo),
            Arc::clone(&batch_repo),
        ));

        let bovine_service = Arc::new(BovineService::new(
            bovine_repo,
            Arc::clone(&membership),
            default_page_size,
        ));
        let batch_service = Arc::new(BatchService::new(batch_repo, Arc::clone(&membership)));

        Self {
            bovine_service,
            batch_service,
            membership,
        }
    }

    /// Services backed by process memory, no database needed.
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryRegistryStore::new());
        Self::new(
            store.clone(),
            store,
            PaginationParams::default().size,
        )
    }

    /// Read configuration from the environment, connect to PostgreSQL, apply pending
    /// migrations and wire the services.
    pub fn initialize() -> AppResult<Self> {
        init_logger();

        let config = RegistryConfig::from_env()?;
        let database = Arc::new(Database::new(&config)?);
        database.run_pending_migrations()?;

        let status = database.pool_status();
        log::info!(
            "Registry database ready ({} of {} connections open, {} idle)",
            status.connections,
            status.max_size,
            status.idle_connections
        );

        Ok(Self::new(
            Arc::new(BovineRepositoryImpl::new(Arc::clone(&database))),
            Arc::new(BatchRepositoryImpl::new(database)),
            config.default_page_size,
        ))
    }
}
