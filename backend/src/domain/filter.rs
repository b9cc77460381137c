//! Filter/search predicate evaluation over typed records.
//!
//! [`filter`] keeps the order of its input and returns the records that
//! satisfy every present criterion. Records expose their filterable
//! dimensions through [`Filterable`]; a record that has no value for a
//! constrained dimension does not match.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Optional constraints applied to a record list.
///
/// Absent fields do not constrain. Blank strings are treated as absent by
/// [`FilterCriteria::normalized`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Case-insensitive substring over the record's text fields.
    pub keyword: Option<String>,
    /// Sector, role or position, matched exactly.
    pub category: Option<String>,
    /// Location or city, matched exactly.
    pub location: Option<String>,
    /// Lifecycle status, matched exactly.
    pub status: Option<String>,
    /// Tender or advertisement type, matched exactly.
    pub kind: Option<String>,
    /// Earliest relevant date, inclusive.
    pub date_from: Option<NaiveDate>,
    /// Latest relevant date, inclusive.
    pub date_to: Option<NaiveDate>,
    /// Verified suppliers only, or unverified only.
    pub is_verified: Option<bool>,
    /// Featured suppliers only, or non-featured only.
    pub is_featured: Option<bool>,
    /// Lowest accepted rating, inclusive.
    pub min_rating: Option<f32>,
}

impl FilterCriteria {
    /// Whether no dimension is constrained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Replace blank text criteria with `None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|text| !text.trim().is_empty())
        }
        Self {
            keyword: present(self.keyword),
            category: present(self.category),
            location: present(self.location),
            status: present(self.status),
            kind: present(self.kind),
            ..self
        }
    }

    /// Whether `record` satisfies every present criterion.
    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        self.matches_keyword(record)
            && exact(self.category.as_deref(), record.category())
            && exact(self.location.as_deref(), record.location())
            && exact(self.status.as_deref(), record.status())
            && exact(self.kind.as_deref(), record.kind())
            && self.matches_dates(record)
            && equal(self.is_verified, record.is_verified())
            && equal(self.is_featured, record.is_featured())
            && self
                .min_rating
                .is_none_or(|min| record.rating().is_some_and(|rating| rating >= min))
    }

    fn matches_keyword<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        let Some(keyword) = self.keyword.as_deref() else {
            return true;
        };
        let needle = keyword.to_lowercase();
        record
            .search_fields()
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_dates<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        if self.date_from.is_none() && self.date_to.is_none() {
            return true;
        }
        record.relevant_date().is_some_and(|date| {
            self.date_from.is_none_or(|from| date >= from)
                && self.date_to.is_none_or(|to| date <= to)
        })
    }
}

fn exact(wanted: Option<&str>, actual: Option<&str>) -> bool {
    wanted.is_none_or(|wanted| actual == Some(wanted))
}

fn equal(wanted: Option<bool>, actual: Option<bool>) -> bool {
    wanted.is_none_or(|wanted| actual == Some(wanted))
}

/// Filterable dimensions of a record type.
///
/// Dimensions a record type does not have keep the default `None`.
pub trait Filterable {
    /// Text fields searched by the keyword criterion.
    fn search_fields(&self) -> Vec<&str>;

    /// Sector, role or position.
    fn category(&self) -> Option<&str> {
        None
    }

    /// Location or city.
    fn location(&self) -> Option<&str> {
        None
    }

    /// Lifecycle status.
    fn status(&self) -> Option<&str> {
        None
    }

    /// Tender or advertisement type.
    fn kind(&self) -> Option<&str> {
        None
    }

    /// Date compared against `dateFrom` and `dateTo`.
    fn relevant_date(&self) -> Option<NaiveDate> {
        None
    }

    /// Verification flag.
    fn is_verified(&self) -> Option<bool> {
        None
    }

    /// Featured flag.
    fn is_featured(&self) -> Option<bool> {
        None
    }

    /// Rating between 0 and 5.
    fn rating(&self) -> Option<f32> {
        None
    }

    /// Creation instant used by [`SortOrder::Newest`].
    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

impl<T: Filterable + ?Sized> Filterable for &T {
    fn search_fields(&self) -> Vec<&str> {
        (**self).search_fields()
    }

    fn category(&self) -> Option<&str> {
        (**self).category()
    }

    fn location(&self) -> Option<&str> {
        (**self).location()
    }

    fn status(&self) -> Option<&str> {
        (**self).status()
    }

    fn kind(&self) -> Option<&str> {
        (**self).kind()
    }

    fn relevant_date(&self) -> Option<NaiveDate> {
        (**self).relevant_date()
    }

    fn is_verified(&self) -> Option<bool> {
        (**self).is_verified()
    }

    fn is_featured(&self) -> Option<bool> {
        (**self).is_featured()
    }

    fn rating(&self) -> Option<f32> {
        (**self).rating()
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        (**self).created_at()
    }
}

/// Keep the records matching `criteria`, in input order.
///
/// Empty criteria return the input unchanged.
///
/// # Examples
/// ```
/// use ci_tender::domain::filter::{FilterCriteria, Filterable, filter};
///
/// struct Note(&'static str);
///
/// impl Filterable for Note {
///     fn search_fields(&self) -> Vec<&str> {
///         vec![self.0]
///     }
/// }
///
/// let criteria = FilterCriteria {
///     keyword: Some("ROUTE".to_owned()),
///     ..FilterCriteria::default()
/// };
/// let kept = filter([Note("Route de Bouaké"), Note("Forage")], &criteria);
/// assert_eq!(kept.len(), 1);
/// ```
pub fn filter<R, I>(records: I, criteria: &FilterCriteria) -> Vec<R>
where
    R: Filterable,
    I: IntoIterator<Item = R>,
{
    if criteria.is_empty() {
        return records.into_iter().collect();
    }
    records
        .into_iter()
        .filter(|record| criteria.matches(record))
        .collect()
}

/// Ordering applied to a filtered list before pagination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Store order.
    #[default]
    Unsorted,
    /// Most recently created first.
    Newest,
    /// Highest rating first; unrated records last.
    TopRated,
}

impl SortOrder {
    /// Parse a query-string label such as `top-rated`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "unsorted" => Some(Self::Unsorted),
            "newest" => Some(Self::Newest),
            "top-rated" => Some(Self::TopRated),
            _ => None,
        }
    }

    /// Sort `records` in place; ties keep their relative order.
    pub fn apply<R: Filterable>(self, records: &mut [R]) {
        match self {
            Self::Unsorted => {}
            Self::Newest => records.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
            Self::TopRated => records.sort_by(|a, b| by_rating(b.rating(), a.rating())),
        }
    }
}

fn by_rating(left: Option<f32>, right: Option<f32>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}
