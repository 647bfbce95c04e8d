use regex::Regex;
use std::sync::OnceLock;

use crate::shared::errors::AppError;

static BATCH_NAME_PATTERN: OnceLock<Regex> = OnceLock::new();

fn batch_name_pattern() -> &'static Regex {
    BATCH_NAME_PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_]+$").expect("batch name pattern is a valid regex")
    })
}

/// True when the value is absent or only whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

pub struct Validator;

impl Validator {
    pub fn validate_tag(tag: &str) -> Result<(), AppError> {
        if tag.trim().is_empty() {
            return Err(AppError::InvalidInput("Tag is required".to_string()));
        }
        if tag.len() > 100 {
            return Err(AppError::InvalidInput(
                "Tag too long (max 100 characters)".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_cuig(cuig: &str) -> Result<(), AppError> {
        if cuig.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Establishment is required".to_string(),
            ));
        }
        if cuig.len() > 100 {
            return Err(AppError::InvalidInput(
                "Establishment too long (max 100 characters)".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_batch_name(name: &str) -> Result<(), AppError> {
        if name.is_empty() {
            return Err(AppError::InvalidInput(
                "Batch Name is required".to_string(),
            ));
        }
        if name.len() > 100 {
            return Err(AppError::InvalidInput(
                "Batch name too long (max 100 characters)".to_string(),
            ));
        }
        if !batch_name_pattern().is_match(name) {
            return Err(AppError::InvalidInput(
                "Batch name cannot contain spaces or special characters".to_string(),
            ));
        }
        Ok(())
    }
}
