//! Page-number generation and page envelope primitives.
//!
//! List endpoints and list screens share three concerns:
//!
//! - validating the requested page and page size ([`PageRequest`]);
//! - slicing an ordered collection into a [`Page`] envelope that reports
//!   `total`, `page`, `pageSize` and `totalPages`;
//! - rendering a bounded strip of page links with ellipsis markers
//!   ([`page_numbers`]).
//!
//! # Example
//!
//! ```
//! use pagination::{Page, PageMarker, PageRequest, page_numbers};
//!
//! let request = PageRequest::new(2, 10).expect("valid request");
//! let page = Page::paginate(1..=25, request);
//! assert_eq!(page.items.len(), 10);
//! assert_eq!(page.total_pages, 3);
//!
//! let strip = page_numbers(5, 20);
//! assert_eq!(strip.first(), Some(&PageMarker::Page(1)));
//! assert_eq!(strip.last(), Some(&PageMarker::Page(20)));
//! ```

mod envelope;
mod numbers;
mod request;

pub use envelope::Page;
pub use numbers::{MAX_VISIBLE_PAGES, PageMarker, page_numbers};
pub use request::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest, PageRequestError, PageState, PageStateError,
};
