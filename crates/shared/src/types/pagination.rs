//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Largest page size a request may ask for.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_size() -> u32 {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
        }
    }
}

impl PageRequest {
    /// Creates a page request, replacing a zero page or size by its default
    /// and capping the size at [`MAX_PAGE_SIZE`].
    #[must_use]
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: if page == 0 { default_page() } else { page },
            size: if size == 0 {
                default_size()
            } else {
                size.min(MAX_PAGE_SIZE)
            },
        }
    }

    /// Returns a copy with zero values replaced by defaults and the size capped.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self::new(self.page, self.size)
    }

    /// Calculates the offset for database queries.
    ///
    /// Never exceeds `i64::MAX`, the largest offset the database driver binds.
    #[must_use]
    pub fn offset(&self) -> u64 {
        let max = i64::MAX.unsigned_abs();
        u64::from(self.page.saturating_sub(1))
            .saturating_mul(u64::from(self.size))
            .min(max)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

/// Pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub size: u32,
    /// Total number of items across all pages.
    pub total_item: u64,
    /// Total number of pages, `ceil(total_item / size)`.
    pub total_page: u64,
}

impl PageMeta {
    /// Builds paging metadata for a page of `size` items out of `total_item`.
    ///
    /// An empty result has zero pages.
    #[must_use]
    pub fn new(page: u32, size: u32, total_item: u64) -> Self {
        let total_page = if size == 0 {
            0
        } else {
            total_item.div_ceil(u64::from(size))
        };

        Self {
            page,
            size,
            total_item,
            total_page,
        }
    }

    /// Metadata for a single page holding every item.
    #[must_use]
    pub fn single_page(total_item: usize) -> Self {
        let total_item = u64::try_from(total_item).unwrap_or(u64::MAX);
        Self {
            page: 1,
            size: u32::try_from(total_item).unwrap_or(u32::MAX),
            total_item,
            total_page: 1,
        }
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
