//! List query-string parsing.
//!
//! ```text
//! GET /api/v1/tenders?keyword=route&location=Abidjan&sort=newest&page=2&pageSize=10
//! ```
//!
//! Blank parameters are treated as absent. Unparseable values are reported
//! together as a `validation_failed` error with per-parameter details.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::NaiveDate;
use pagination::{DEFAULT_PAGE_SIZE, PageRequest};
use serde::Deserialize;

use crate::domain::filter::{FilterCriteria, SortOrder};
use crate::domain::ports::ListQuery;
use crate::domain::validation::{ErrorKind, FieldViolations};
use crate::domain::Error;

/// Raw list parameters as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListParams {
    /// Case-insensitive text search.
    pub keyword: Option<String>,
    /// Sector, role or position.
    pub category: Option<String>,
    /// Location or city.
    pub location: Option<String>,
    /// Record status label.
    pub status: Option<String>,
    /// Tender or advertisement type; `type` is accepted too.
    #[serde(alias = "type")]
    pub kind: Option<String>,
    /// Earliest relevant date, `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// Latest relevant date, `YYYY-MM-DD`.
    pub date_to: Option<String>,
    /// `true` or `false`.
    pub is_verified: Option<String>,
    /// `true` or `false`.
    pub is_featured: Option<String>,
    /// Lowest accepted rating.
    pub min_rating: Option<String>,
    /// `unsorted`, `newest` or `top-rated`.
    pub sort: Option<String>,
    /// 1-based page number.
    pub page: Option<String>,
    /// Items per page.
    pub page_size: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

struct Parser {
    violations: FieldViolations,
}

impl Parser {
    fn parse<T>(
        &mut self,
        name: &str,
        value: Option<String>,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Option<T> {
        let text = present(value)?;
        let parsed = parse(&text);
        if parsed.is_none() {
            self.violations
                .insert(name, BTreeSet::from([ErrorKind::InvalidFormat]));
        }
        parsed
    }
}

fn from_str<T: FromStr>(text: &str) -> Option<T> {
    text.parse().ok()
}

impl TryFrom<ListParams> for ListQuery {
    type Error = Error;

    fn try_from(params: ListParams) -> Result<Self, Self::Error> {
        let mut parser = Parser {
            violations: FieldViolations::default(),
        };
        let criteria = FilterCriteria {
            keyword: present(params.keyword),
            category: present(params.category),
            location: present(params.location),
            status: present(params.status),
            kind: present(params.kind),
            date_from: parser.parse("dateFrom", params.date_from, from_str::<NaiveDate>),
            date_to: parser.parse("dateTo", params.date_to, from_str::<NaiveDate>),
            is_verified: parser.parse("isVerified", params.is_verified, from_str::<bool>),
            is_featured: parser.parse("isFeatured", params.is_featured, from_str::<bool>),
            min_rating: parser.parse("minRating", params.min_rating, |text| {
                from_str::<f32>(text).filter(|rating| rating.is_finite())
            }),
        };
        let sort = parser
            .parse("sort", params.sort, SortOrder::from_label)
            .unwrap_or_default();
        let page = parser.parse("page", params.page, from_str::<u32>).unwrap_or(1);
        let page_size = parser
            .parse("pageSize", params.page_size, from_str::<u32>)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let page = match PageRequest::new(page, page_size) {
            Ok(request) => request,
            Err(err) => {
                let field = match err {
                    pagination::PageRequestError::ZeroPage => "page",
                    pagination::PageRequestError::PageSizeOutOfRange { .. } => "pageSize",
                };
                parser
                    .violations
                    .insert(field, BTreeSet::from([ErrorKind::InvalidFormat]));
                PageRequest::default()
            }
        };
        if !parser.violations.is_empty() {
            return Err(parser.violations.into_error());
        }
        Ok(Self {
            criteria,
            sort,
            page,
        })
    }
}
