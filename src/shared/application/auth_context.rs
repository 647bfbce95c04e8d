/// Resolved caller identity, built by the authentication layer and handed to every service call.
///
/// Services never look up the current user on their own; whatever establishment scope an
/// operation runs under is derived from this value.
use serde::{Deserialize, Serialize};

use crate::shared::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub cuig: String,
    pub admin: bool,
}

impl AuthContext {
    pub fn user(cuig: impl Into<String>) -> Self {
        Self {
            cuig: cuig.into(),
            admin: false,
        }
    }

    pub fn admin(cuig: impl Into<String>) -> Self {
        Self {
            cuig: cuig.into(),
            admin: true,
        }
    }

    /// Establishment an operation should run against.
    ///
    /// Admins may target any establishment they name; everybody else is pinned to their own,
    /// whatever they asked for.
    pub fn resolve_cuig(&self, requested: Option<&str>) -> String {
        match requested.map(str::trim) {
            Some(cuig) if self.admin && !cuig.is_empty() => cuig.to_string(),
            _ => self.cuig.clone(),
        }
    }

    pub fn is_on_the_same_establishment(&self, cuig: &str) -> bool {
        self.admin || self.cuig.eq_ignore_ascii_case(cuig)
    }

    pub fn ensure_same_establishment(&self, cuig: &str) -> AppResult<()> {
        if self.is_on_the_same_establishment(cuig) {
            Ok(())
        } else {
            Err(AppError::Unauthorized(format!(
                "Cannot operate on establishment {} from establishment {}",
                cuig, self.cuig
            )))
        }
    }
}
