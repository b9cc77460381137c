//! Record facade service.
//!
//! Implements [`RecordFacade`] over any [`RecordRepository`]: payloads are
//! checked against the record schema, identifiers and timestamps are
//! assigned here, and repository failures become `ServerError`.

use std::collections::BTreeSet;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;
use serde_json::json;
use tracing::{debug, error, info};

use crate::domain::filter::{Filterable, filter};
use crate::domain::ports::{Facets, ListQuery, RecordFacade, RecordRepository, RecordRepositoryError};
use crate::domain::{Error, Record, RecordId, RecordKind};

/// Facade over one record family.
pub struct RecordService<R, Repo: ?Sized> {
    repository: Arc<Repo>,
    clock: Arc<dyn Clock>,
    record: PhantomData<fn() -> R>,
}

impl<R, Repo: ?Sized> RecordService<R, Repo> {
    /// Create a service over `repository`, stamping records with `clock`.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use ci_tender::domain::{RecordService, Tender};
    /// use ci_tender::outbound::memory::InMemoryRecordStore;
    ///
    /// let service: RecordService<Tender, _> =
    ///     RecordService::new(Arc::new(InMemoryRecordStore::<Tender>::default()), Arc::new(DefaultClock));
    /// # let _ = service;
    /// ```
    pub fn new(repository: Arc<Repo>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            record: PhantomData,
        }
    }
}

impl<R, Repo: ?Sized> Clone for RecordService<R, Repo> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            record: PhantomData,
        }
    }
}

fn map_repository_error(kind: RecordKind, failure: RecordRepositoryError) -> Error {
    error!(%kind, error = %failure, "record store failure");
    match failure {
        RecordRepositoryError::Connection { message } => {
            Error::server_error(format!("{kind} store unavailable: {message}"))
        }
        RecordRepositoryError::Query { message } => {
            Error::server_error(format!("{kind} store error: {message}"))
        }
    }
}

fn not_found(kind: RecordKind, id: RecordId) -> Error {
    Error::not_found(format!("{kind} {id} not found")).with_details(json!({ "id": id }))
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    values
        .flatten()
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

impl<R, Repo> RecordService<R, Repo>
where
    R: Record,
    Repo: RecordRepository<R> + ?Sized,
{
    async fn find(&self, id: RecordId) -> Result<R, Error> {
        self.repository
            .find(id)
            .await
            .map_err(|failure| map_repository_error(R::KIND, failure))?
            .ok_or_else(|| not_found(R::KIND, id))
    }

    async fn all(&self) -> Result<Vec<R>, Error> {
        self.repository
            .all()
            .await
            .map_err(|failure| map_repository_error(R::KIND, failure))
    }
}

#[async_trait]
impl<R, Repo> RecordFacade<R> for RecordService<R, Repo>
where
    R: Record,
    Repo: RecordRepository<R> + ?Sized,
{
    async fn list(&self, query: &ListQuery) -> Result<Page<R>, Error> {
        let criteria = query.criteria.clone().normalized();
        let mut matched = filter(self.all().await?, &criteria);
        query.sort.apply(&mut matched);
        let page = Page::paginate(matched, query.page);
        debug!(
            kind = %R::KIND,
            total = page.total,
            page = page.page,
            "listed records"
        );
        Ok(page)
    }

    async fn get(&self, id: RecordId) -> Result<R, Error> {
        self.find(id).await
    }

    async fn create(&self, input: R::Input) -> Result<R, Error> {
        R::check_draft(&input)?;
        let record = R::build(RecordId::random(), input, self.clock.utc());
        self.repository
            .insert(record.clone())
            .await
            .map_err(|failure| map_repository_error(R::KIND, failure))?;
        info!(kind = %R::KIND, id = %record.id(), "record created");
        Ok(record)
    }

    async fn update(&self, id: RecordId, input: R::Input) -> Result<R, Error> {
        let mut record = self.find(id).await?;
        record.apply(input);
        record.check()?;
        record.touch(self.clock.utc());
        let replaced = self
            .repository
            .replace(record.clone())
            .await
            .map_err(|failure| map_repository_error(R::KIND, failure))?;
        if !replaced {
            return Err(not_found(R::KIND, id));
        }
        info!(kind = %R::KIND, %id, "record updated");
        Ok(record)
    }

    async fn delete(&self, id: RecordId) -> Result<(), Error> {
        let removed = self
            .repository
            .remove(id)
            .await
            .map_err(|failure| map_repository_error(R::KIND, failure))?;
        if !removed {
            return Err(not_found(R::KIND, id));
        }
        info!(kind = %R::KIND, %id, "record deleted");
        Ok(())
    }

    async fn facets(&self) -> Result<Facets, Error> {
        let records = self.all().await?;
        Ok(Facets {
            categories: distinct(records.iter().map(Filterable::category)),
            locations: distinct(records.iter().map(Filterable::location)),
        })
    }
}
