//! This modules defines the common functionality for paging data.

use serde::Serialize;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of items per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a client may request.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl PaginationConfig {
    /// Resolve the requested page and page size, filling in defaults.
    ///
    /// Zero values fall back to the defaults and the page size is capped at
    /// [PaginationConfig::max_page_size].
    pub fn resolve(&self, page: Option<u64>, limit: Option<u64>) -> PageRequest {
        let page = page.filter(|&page| page > 0).unwrap_or(self.default_page);
        let limit = limit
            .filter(|&limit| limit > 0)
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size);

        PageRequest { page, limit }
    }
}

/// A resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// The 1-based page number.
    pub page: u64,
    /// The number of items per page.
    pub limit: u64,
}

impl PageRequest {
    /// The number of rows to skip, saturating at [u64::MAX] for huge pages.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Pagination metadata sent alongside a page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Describe `request` given that there are `total_items` matching rows.
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(request.limit);

        Self {
            current_page: request.page,
            total_pages,
            total_items,
            items_per_page: request.limit,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::pagination::{PageRequest, Pagination, PaginationConfig};

    #[test]
    fn resolve_uses_defaults() {
        let config = PaginationConfig::default();

        let got = config.resolve(None, None);

        assert_eq!(got, PageRequest { page: 1, limit: 20 });
    }

    #[test]
    fn resolve_caps_limit() {
        let config = PaginationConfig::default();

        let got = config.resolve(Some(2), Some(1000));

        assert_eq!(got, PageRequest { page: 2, limit: 100 });
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(PageRequest { page: 3, limit: 20 }.offset(), 40);
    }

    #[test]
    fn offset_saturates_for_huge_pages() {
        let page = PageRequest {
            page: u64::MAX,
            limit: 2,
        };

        assert_eq!(page.offset(), u64::MAX);
    }

    #[test]
    fn pagination_on_middle_page() {
        let got = Pagination::new(PageRequest { page: 2, limit: 10 }, 25);

        assert_eq!(
            got,
            Pagination {
                current_page: 2,
                total_pages: 3,
                total_items: 25,
                items_per_page: 10,
                has_next: true,
                has_prev: true,
            }
        );
    }

    #[test]
    fn pagination_with_no_items() {
        let got = Pagination::new(PageRequest { page: 1, limit: 20 }, 0);

        assert_eq!(got.total_pages, 0);
        assert!(!got.has_next);
        assert!(!got.has_prev);
    }
}
