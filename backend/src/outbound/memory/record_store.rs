//! In-memory [`RecordRepository`] adapter.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{RecordRepository, RecordRepositoryError};
use crate::domain::{Record, RecordId};

/// Records of one family held in insertion order.
///
/// Clones share the same collection, so one store can back the facade and
/// the advertisement rotation at once.
#[derive(Debug)]
pub struct InMemoryRecordStore<R> {
    records: Arc<RwLock<Vec<R>>>,
}

impl<R> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<R> Clone for InMemoryRecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<R: Record> InMemoryRecordStore<R> {
    /// Store seeded with `records`.
    pub fn with_records(records: impl IntoIterator<Item = R>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records.into_iter().collect())),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl<R: Record> RecordRepository<R> for InMemoryRecordStore<R> {
    async fn all(&self) -> Result<Vec<R>, RecordRepositoryError> {
        Ok(self.records.read().await.clone())
    }

    async fn find(&self, id: RecordId) -> Result<Option<R>, RecordRepositoryError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.id() == id).cloned())
    }

    async fn insert(&self, record: R) -> Result<(), RecordRepositoryError> {
        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.id() == record.id()) {
            return Err(RecordRepositoryError::query(format!(
                "duplicate {} id {}",
                R::KIND,
                record.id()
            )));
        }
        records.push(record);
        Ok(())
    }

    async fn replace(&self, record: R) -> Result<bool, RecordRepositoryError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|existing| existing.id() == record.id()) {
            Some(slot) => {
                *slot = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: RecordId) -> Result<bool, RecordRepositoryError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| record.id() != id);
        Ok(records.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Record, Tender, TenderInput};
    use crate::test_support::{FixtureClock, tender_input};
    use mockable::Clock;
    use rstest::{fixture, rstest};

    #[fixture]
    fn tenders() -> Vec<Tender> {
        let now = FixtureClock::default().utc();
        (0..3)
            .map(|index| Tender::build(RecordId::random(), tender_input(index), now))
            .collect()
    }

    #[rstest]
    #[tokio::test]
    async fn keeps_insertion_order(tenders: Vec<Tender>) {
        let store = InMemoryRecordStore::default();
        for tender in &tenders {
            store.insert(tender.clone()).await.expect("insert");
        }
        assert_eq!(store.all().await.expect("all"), tenders);
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_duplicate_ids(tenders: Vec<Tender>) {
        let store = InMemoryRecordStore::with_records(tenders.clone());
        let err = store
            .insert(tenders[0].clone())
            .await
            .expect_err("duplicate id");
        assert!(matches!(err, RecordRepositoryError::Query { .. }));
        assert_eq!(store.len().await, 3);
    }

    #[rstest]
    #[tokio::test]
    async fn replace_and_remove_report_absence(tenders: Vec<Tender>) {
        let store = InMemoryRecordStore::with_records(tenders.clone());
        let mut edited = tenders[1].clone();
        edited.apply(TenderInput {
            location: Some("San-Pédro".to_owned()),
            ..TenderInput::default()
        });
        assert!(store.replace(edited.clone()).await.expect("replace"));
        assert_eq!(store.find(edited.id).await.expect("find"), Some(edited));

        assert!(store.remove(tenders[0].id).await.expect("remove"));
        assert!(!store.remove(tenders[0].id).await.expect("second remove"));
        assert_eq!(store.find(tenders[0].id).await.expect("find"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn clones_share_records(tenders: Vec<Tender>) {
        let store = InMemoryRecordStore::default();
        let clone = store.clone();
        clone.insert(tenders[0].clone()).await.expect("insert");
        assert!(!store.is_empty().await);
    }
}
