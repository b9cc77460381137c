//! Page request validation and page state invariants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::numbers::{PageMarker, page_numbers};

/// Page size used when a caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Upper bound accepted for a single page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors raised by [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are 1-based; zero was requested.
    #[error("page must be at least 1")]
    ZeroPage,
    /// The page size is zero or larger than [`MAX_PAGE_SIZE`].
    #[error("page size must be between 1 and {max}, got {actual}")]
    PageSizeOutOfRange {
        /// Largest accepted page size.
        max: u32,
        /// Page size supplied by the caller.
        actual: u32,
    },
}

/// Validated request for one page of an ordered collection.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= page_size <= MAX_PAGE_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "PageRequestDto")]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Validate and build a page request.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when either bound is violated.
    pub const fn new(page: u32, page_size: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(PageRequestError::PageSizeOutOfRange {
                max: MAX_PAGE_SIZE,
                actual: page_size,
            });
        }
        Ok(Self { page, page_size })
    }

    /// First page with the given size, clamping the size into range.
    #[must_use]
    pub const fn first(page_size: u32) -> Self {
        let page_size = if page_size == 0 {
            1
        } else if page_size > MAX_PAGE_SIZE {
            MAX_PAGE_SIZE
        } else {
            page_size
        };
        Self { page: 1, page_size }
    }

    /// Requested 1-based page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested number of items per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items preceding the requested page.
    #[must_use]
    pub fn offset(&self) -> usize {
        let offset = u64::from(self.page - 1) * u64::from(self.page_size);
        usize::try_from(offset).unwrap_or(usize::MAX)
    }

    pub(crate) fn limit(&self) -> usize {
        usize::try_from(self.page_size).unwrap_or(usize::MAX)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageRequestDto {
    page: u32,
    page_size: u32,
}

impl TryFrom<PageRequestDto> for PageRequest {
    type Error = PageRequestError;

    fn try_from(value: PageRequestDto) -> Result<Self, Self::Error> {
        Self::new(value.page, value.page_size)
    }
}

/// Errors raised by [`PageState::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageStateError {
    /// Current page or total pages were zero.
    #[error("current page and total pages must be at least 1")]
    ZeroPage,
    /// Page size was zero.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    /// Current page exceeds the number of pages.
    #[error("current page {current} exceeds total pages {total}")]
    CurrentPastEnd {
        /// Current page supplied by the caller.
        current: u32,
        /// Total number of pages.
        total: u32,
    },
}

/// Position of a list view within its result set.
///
/// ## Invariants
/// - `current_page >= 1`, `total_pages >= 1`, `page_size > 0`
/// - `current_page <= total_pages`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    current_page: u32,
    total_pages: u32,
    page_size: u32,
}

impl PageState {
    /// Validate and build a page state.
    ///
    /// # Errors
    /// Returns [`PageStateError`] when an invariant is violated.
    pub const fn new(
        current_page: u32,
        total_pages: u32,
        page_size: u32,
    ) -> Result<Self, PageStateError> {
        if current_page == 0 || total_pages == 0 {
            return Err(PageStateError::ZeroPage);
        }
        if page_size == 0 {
            return Err(PageStateError::ZeroPageSize);
        }
        if current_page > total_pages {
            return Err(PageStateError::CurrentPastEnd {
                current: current_page,
                total: total_pages,
            });
        }
        Ok(Self {
            current_page,
            total_pages,
            page_size,
        })
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Number of pages in the result set.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Items per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Page link strip for this state.
    #[must_use]
    pub fn page_numbers(&self) -> Vec<PageMarker> {
        page_numbers(self.current_page, self.total_pages)
    }
}
