/// Pagination support for search queries
///
/// Pages are zero-indexed, matching the `current-page` convention of the registry API.
use serde::{Deserialize, Serialize};

use crate::shared::errors::{AppError, AppResult};

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination parameters for queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: u32,
    pub size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self { page: 0, size: 3 }
    }
}

impl PaginationParams {
    pub fn new(page: u32, size: u32) -> AppResult<Self> {
        if size == 0 {
            return Err(AppError::InvalidInput(
                "Page size must be positive".to_string(),
            ));
        }
        if size > MAX_PAGE_SIZE {
            return Err(AppError::InvalidInput(format!(
                "Page size cannot exceed {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(Self { page, size })
    }

    /// Calculate offset for database queries
    pub fn offset(&self) -> i64 {
        self.page as i64 * self.size as i64
    }

    /// Get limit for database queries
    pub fn limit(&self) -> i64 {
        self.size as i64
    }
}

/// Paginated result wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub page: u32,
    pub size: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total_elements: u64, params: &PaginationParams) -> Self {
        let total_pages = total_elements.div_ceil(params.size.max(1) as u64) as u32;

        Self {
            items,
            total_elements,
            total_pages,
            page: params.page,
            size: params.size,
        }
    }

    /// Page through an already materialized, already filtered result set.
    pub fn from_all(all: Vec<T>, params: &PaginationParams) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(params.offset() as usize)
            .take(params.limit() as usize)
            .collect();
        Self::new(items, total, params)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_indexed() {
        let params = PaginationParams::new(2, 10).unwrap();
        assert_eq!(params.offset(), 20);
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn rejects_out_of_range_sizes() {
        assert!(matches!(
            PaginationParams::new(0, 0),
            Err(AppError::InvalidInput(_))
        ));
        assert!(PaginationParams::new(0, MAX_PAGE_SIZE + 1).is_err());
    }

    #[test]
    fn from_all_slices_and_counts_pages() {
        let params = PaginationParams::new(1, 3).unwrap();
        let page = PaginatedResult::from_all((1..=7).collect::<Vec<_>>(), &params);

        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total_elements, 7);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let params = PaginationParams::new(5, 3).unwrap();
        let page = PaginatedResult::from_all(vec![1, 2], &params);
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 1);
    }
}
