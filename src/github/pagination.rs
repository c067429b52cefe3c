//! Page requests and paging limits for GitHub list endpoints.
//!
//! GitHub list endpoints are 1-based and accept at most 100 items per page.
//! [`PageRequest`] carries one validated request; [`PaginationPolicy`]
//! describes how far a statistics fetch may walk before giving up.

use super::error::StatsError;

/// Largest page size GitHub accepts.
pub const MAX_PER_PAGE: u8 = 100;

/// Default page cap for direct repository pull request listings.
pub const DEFAULT_REPOSITORY_PAGE_CAP: u32 = 5;

/// Default page cap for the heavier issue search endpoint.
pub const DEFAULT_SEARCH_PAGE_CAP: u32 = 3;

fn validate_pagination_params(page: u32, per_page: u8) -> Result<(), StatsError> {
    if page == 0 {
        return Err(StatsError::InvalidPagination {
            message: "page must be at least 1".to_owned(),
        });
    }

    if per_page == 0 {
        return Err(StatsError::InvalidPagination {
            message: "per_page must be at least 1".to_owned(),
        });
    }

    if per_page > MAX_PER_PAGE {
        return Err(StatsError::InvalidPagination {
            message: format!("per_page must not exceed {MAX_PER_PAGE}"),
        });
    }

    Ok(())
}

/// A single validated page request.
///
/// # Example
///
/// ```
/// use prstats::github::PageRequest;
///
/// let request = PageRequest::new(2, 50).expect("valid page request");
/// assert_eq!(request.page(), 2);
/// assert!(PageRequest::new(0, 50).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u8,
}

impl PageRequest {
    /// Creates a page request.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::InvalidPagination` when `page` is zero or
    /// `per_page` is outside `1..=100`.
    pub fn new(page: u32, per_page: u8) -> Result<Self, StatsError> {
        validate_pagination_params(page, per_page)?;
        Ok(Self { page, per_page })
    }

    /// Returns the page number (1-based).
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the number of items per page.
    #[must_use]
    pub const fn per_page(self) -> u8 {
        self.per_page
    }

    /// Returns true if this is the first page.
    #[must_use]
    pub const fn is_first_page(self) -> bool {
        self.page == 1
    }
}

/// Page size and hard page cap for one paginated walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    per_page: u8,
    max_pages: u32,
}

impl PaginationPolicy {
    /// Creates a policy.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::InvalidPagination` when `per_page` is outside
    /// `1..=100` or `max_pages` is zero.
    pub fn new(per_page: u8, max_pages: u32) -> Result<Self, StatsError> {
        validate_pagination_params(1, per_page)?;
        if max_pages == 0 {
            return Err(StatsError::InvalidPagination {
                message: "page cap must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            per_page,
            max_pages,
        })
    }

    /// Policy for `GET /repos/{owner}/{repo}/pulls`.
    #[must_use]
    pub const fn repository_listing() -> Self {
        Self {
            per_page: MAX_PER_PAGE,
            max_pages: DEFAULT_REPOSITORY_PAGE_CAP,
        }
    }

    /// Policy for `GET /search/issues`.
    #[must_use]
    pub const fn search() -> Self {
        Self {
            per_page: MAX_PER_PAGE,
            max_pages: DEFAULT_SEARCH_PAGE_CAP,
        }
    }

    /// Items requested per page.
    #[must_use]
    pub const fn per_page(self) -> u8 {
        self.per_page
    }

    /// Maximum number of pages requested.
    #[must_use]
    pub const fn max_pages(self) -> u32 {
        self.max_pages
    }

    /// Iterates the page requests permitted by this policy, in order.
    pub fn pages(self) -> impl Iterator<Item = PageRequest> {
        (1..=self.max_pages).map(move |page| PageRequest {
            page,
            per_page: self.per_page,
        })
    }
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self::repository_listing()
    }
}
