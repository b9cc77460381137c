//! Page link strip generation.

use serde::{Deserialize, Serialize};

/// Largest page count rendered without collapsing into ellipses.
pub const MAX_VISIBLE_PAGES: u32 = 7;

/// Pages kept visible next to either end before an ellipsis is inserted.
const EDGE_WINDOW: u32 = 4;

/// One entry of a page link strip.
///
/// Serialises untagged: a page becomes its number and an ellipsis becomes
/// `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageMarker {
    /// A clickable, 1-based page index.
    Page(u32),
    /// A gap standing in for the hidden page range.
    Ellipsis,
}

impl PageMarker {
    /// Page index carried by this marker, if any.
    #[must_use]
    pub const fn page(self) -> Option<u32> {
        match self {
            Self::Page(page) => Some(page),
            Self::Ellipsis => None,
        }
    }

    /// Whether this marker is an ellipsis gap.
    #[must_use]
    pub const fn is_ellipsis(self) -> bool {
        matches!(self, Self::Ellipsis)
    }
}

/// Build the page link strip for `current` out of `total` pages.
///
/// Up to [`MAX_VISIBLE_PAGES`] pages are listed verbatim. Longer ranges keep
/// the first and last page and a window around `current`:
///
/// - `current <= 4`: `1 2 3 4 5 … total`
/// - `current >= total - 3`: `1 … total-4 … total`
/// - otherwise: `1 … current-1 current current+1 … total`
///
/// A `current` outside `1..=total` is clamped into range. The function is
/// pure; identical inputs always yield identical strips.
///
/// # Examples
/// ```
/// use pagination::{PageMarker, page_numbers};
///
/// assert_eq!(page_numbers(1, 1), vec![PageMarker::Page(1)]);
/// assert_eq!(
///     page_numbers(6, 12),
///     vec![
///         PageMarker::Page(1),
///         PageMarker::Ellipsis,
///         PageMarker::Page(5),
///         PageMarker::Page(6),
///         PageMarker::Page(7),
///         PageMarker::Ellipsis,
///         PageMarker::Page(12),
///     ],
/// );
/// ```
#[must_use]
pub fn page_numbers(current: u32, total: u32) -> Vec<PageMarker> {
    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(PageMarker::Page).collect();
    }

    let current = current.clamp(1, total);
    let mut markers = Vec::new();
    if current <= EDGE_WINDOW {
        markers.extend((1..=EDGE_WINDOW + 1).map(PageMarker::Page));
        markers.push(PageMarker::Ellipsis);
        markers.push(PageMarker::Page(total));
    } else if current >= total - (EDGE_WINDOW - 1) {
        markers.push(PageMarker::Page(1));
        markers.push(PageMarker::Ellipsis);
        markers.extend((total - EDGE_WINDOW..=total).map(PageMarker::Page));
    } else {
        markers.push(PageMarker::Page(1));
        markers.push(PageMarker::Ellipsis);
        markers.extend((current - 1..=current + 1).map(PageMarker::Page));
        markers.push(PageMarker::Ellipsis);
        markers.push(PageMarker::Page(total));
    }
    markers
}
