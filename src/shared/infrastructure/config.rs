use crate::shared::application::pagination::MAX_PAGE_SIZE;
use crate::shared::errors::AppError;
use std::env;

const DEFAULT_PAGE_SIZE: u32 = 3;
const MAX_POOL_SIZE: u32 = 20;

/// Runtime configuration, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub database_url: String,
    pub max_pool_size: u32,
    pub min_idle: u32,
    pub default_page_size: u32,
}

impl RegistryConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").map_err(|_| {
            AppError::DatabaseError("DATABASE_URL environment variable not found".to_string())
        })?;
        Self::validate_database_url(&database_url)?;

        let max_pool_size = match env::var("DATABASE_MAX_POOL_SIZE") {
            Ok(raw) => Self::parse_positive("DATABASE_MAX_POOL_SIZE", &raw)?.min(MAX_POOL_SIZE),
            Err(_) => Self::default_pool_size(),
        };

        let default_page_size = match env::var("REGISTRY_DEFAULT_PAGE_SIZE") {
            Ok(raw) => Self::parse_page_size(&raw)?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            database_url,
            max_pool_size,
            min_idle: std::cmp::max(1, max_pool_size / 4),
            default_page_size,
        })
    }

    fn validate_database_url(url: &str) -> Result<(), AppError> {
        if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
            return Err(AppError::DatabaseError(
                "Invalid database URL format. Must start with postgres:// or postgresql://"
                    .to_string(),
            ));
        }
        Ok(())
    }

    fn parse_positive(name: &str, raw: &str) -> Result<u32, AppError> {
        match raw.trim().parse::<u32>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(AppError::InvalidInput(format!(
                "{} must be a positive integer, got '{}'",
                name, raw
            ))),
        }
    }

    fn parse_page_size(raw: &str) -> Result<u32, AppError> {
        let size = Self::parse_positive("REGISTRY_DEFAULT_PAGE_SIZE", raw)?;
        if size > MAX_PAGE_SIZE {
            return Err(AppError::InvalidInput(format!(
                "REGISTRY_DEFAULT_PAGE_SIZE cannot exceed {}, got {}",
                MAX_PAGE_SIZE, size
            )));
        }
        Ok(size)
    }

    /// Pool size derived from available CPUs, capped for a single registry instance.
    fn default_pool_size() -> u32 {
        let cpu_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        std::cmp::min(cpu_count as u32 * 2, MAX_POOL_SIZE)
    }

    /// Host part of the database URL, safe to log.
    pub fn database_host(&self) -> &str {
        self.database_url
            .rsplit('@')
            .next()
            .unwrap_or("unknown_host")
    }
}
