//! Page envelope returned by list endpoints.

use serde::{Deserialize, Serialize};

use crate::request::{PageRequest, PageState};

/// One page of an ordered collection plus the totals a list view needs.
///
/// Serialises as `{items, total, page, pageSize, totalPages}`.
///
/// ## Invariants
/// - `total_pages == max(1, ceil(total / page_size))`
/// - `items.len() <= page_size`; it is empty when `page > total_pages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on the requested page, in collection order.
    pub items: Vec<T>,
    /// Number of items across every page.
    pub total: usize,
    /// Requested 1-based page.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Number of pages; never less than one.
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Slice `items` into the page described by `request`.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    ///
    /// let request = PageRequest::new(3, 10).expect("valid request");
    /// let page = Page::paginate(1..=25, request);
    /// assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
    /// assert_eq!(page.total_pages, 3);
    /// ```
    pub fn paginate(items: impl IntoIterator<Item = T>, request: PageRequest) -> Self {
        let all: Vec<T> = items.into_iter().collect();
        let total = all.len();
        let items = all
            .into_iter()
            .skip(request.offset())
            .take(request.limit())
            .collect();
        Self {
            items,
            total,
            page: request.page(),
            page_size: request.page_size(),
            total_pages: Self::total_pages_for(total, request.page_size()),
        }
    }

    /// Number of pages needed for `total` items, at least one.
    #[must_use]
    pub fn total_pages_for(total: usize, page_size: u32) -> u32 {
        let size = usize::try_from(page_size).unwrap_or(usize::MAX).max(1);
        let pages = total.div_ceil(size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Page state for link rendering, or `None` when the page lies past the
    /// end of the collection.
    #[must_use]
    pub fn state(&self) -> Option<PageState> {
        PageState::new(self.page, self.total_pages, self.page_size).ok()
    }

    /// Transform every item while keeping the totals.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 10)]
    #[case(2, 10)]
    #[case(3, 5)]
    #[case(4, 0)]
    fn paginates_twenty_five_items(#[case] page: u32, #[case] expected_len: usize) {
        let request = PageRequest::new(page, 10).expect("valid request");
        let envelope = Page::paginate(0..25, request);
        assert_eq!(envelope.total, 25);
        assert_eq!(envelope.total_pages, 3);
        assert_eq!(envelope.items.len(), expected_len);
    }

    #[rstest]
    fn empty_collection_reports_one_page() {
        let envelope = Page::paginate(Vec::<u8>::new(), PageRequest::default());
        assert_eq!(envelope.total, 0);
        assert_eq!(envelope.total_pages, 1);
        assert!(envelope.items.is_empty());
        assert!(envelope.state().is_some());
    }

    #[rstest]
    fn page_past_the_end_has_no_state() {
        let request = PageRequest::new(4, 10).expect("valid request");
        let envelope = Page::paginate(0..25, request);
        assert!(envelope.state().is_none());
    }

    #[rstest]
    fn map_preserves_totals() {
        let request = PageRequest::new(2, 2).expect("valid request");
        let envelope = Page::paginate(1..=5, request).map(|n| n * 10);
        assert_eq!(envelope.items, vec![30, 40]);
        assert_eq!(envelope.total, 5);
        assert_eq!(envelope.total_pages, 3);
    }

    #[rstest]
    fn serialises_with_camel_case_keys() {
        let request = PageRequest::new(1, 2).expect("valid request");
        let value = serde_json::to_value(Page::paginate(["a", "b", "c"], request))
            .expect("serialise page");
        assert_eq!(
            value,
            serde_json::json!({
                "items": ["a", "b"],
                "total": 3,
                "page": 1,
                "pageSize": 2,
                "totalPages": 2,
            })
        );
    }
}
