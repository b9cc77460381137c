//! Driving port for CRUD-shaped record access.
//!
//! Inbound adapters (HTTP handlers, form submit handlers) call this trait
//! without knowing which store backs it.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};

use crate::domain::filter::{FilterCriteria, SortOrder};
use crate::domain::{Error, Record, RecordId};

/// Filtered, sorted and paginated list request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    /// Constraints applied before pagination.
    pub criteria: FilterCriteria,
    /// Ordering applied after filtering.
    pub sort: SortOrder,
    /// Requested page.
    pub page: PageRequest,
}

/// Distinct values offered by list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    /// Sorted distinct categories (sectors, roles or positions).
    pub categories: Vec<String>,
    /// Sorted distinct locations.
    pub locations: Vec<String>,
}

/// CRUD operations over one record family.
///
/// Every failure is returned as an [`Error`] whose code is one of
/// `NotFound`, `ValidationFailed`, `Unauthorized`, `Forbidden` or
/// `ServerError`. Calls are not retried.
#[async_trait]
pub trait RecordFacade<R: Record>: Send + Sync {
    /// Page of records matching `query`.
    async fn list(&self, query: &ListQuery) -> Result<Page<R>, Error>;

    /// Record with `id`.
    async fn get(&self, id: RecordId) -> Result<R, Error>;

    /// Validate `input` and store a new record.
    async fn create(&self, input: R::Input) -> Result<R, Error>;

    /// Apply `input` to the record with `id` and validate the result.
    async fn update(&self, id: RecordId, input: R::Input) -> Result<R, Error>;

    /// Remove the record with `id`.
    async fn delete(&self, id: RecordId) -> Result<(), Error>;

    /// Distinct categories and locations across every record.
    async fn facets(&self) -> Result<Facets, Error>;
}
