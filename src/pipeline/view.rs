use crate::api::{Backend, Resource};
use crate::error::Res;
use crate::model::Record;
use crate::pipeline::aggregate::{summarize, Summary};
use crate::pipeline::filter::{self, FilterCriteria};
use crate::pipeline::sort::{sort, SortKey};
use crate::pipeline::store::RecordStore;
use chrono::{DateTime, Local, TimeZone};
use tracing::{debug, info};

/// The payment-history view: one store, the current criteria and the current sort key.
///
/// Nothing derived is cached. `visible` and `summary` rerun the whole chain from the raw store,
/// so changing criteria or sort can never leave a stale result behind.
#[derive(Debug, Default, Clone)]
pub struct View {
    store: RecordStore,
    criteria: FilterCriteria,
    sort: SortKey,
}

impl View {
    pub fn new(criteria: FilterCriteria, sort: SortKey) -> Self {
        Self {
            store: RecordStore::new(),
            criteria,
            sort,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// Re-fetches the raw records. Returns the number of raw records now held.
    pub async fn reload(&mut self, backend: &mut (dyn Backend + Send)) -> Res<usize> {
        let count = self.store.load(backend).await?.len();
        debug!("View reloaded with {count} payments");
        Ok(count)
    }

    /// Deletes a payment and then re-syncs from the backend. Local state is never edited
    /// directly, so what is shown afterwards is exactly what the backend holds.
    pub async fn delete(&mut self, backend: &mut (dyn Backend + Send), id: &str) -> Res<usize> {
        backend.delete(Resource::Payments, id).await?;
        info!("Deleted payment '{id}'");
        self.reload(backend).await
    }

    /// The filtered and sorted records, evaluated against the local clock.
    pub fn visible(&self) -> Vec<Record> {
        self.visible_at(Local::now())
    }

    pub fn visible_at<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Vec<Record> {
        let filtered = filter::apply_at(self.store.records(), &self.criteria, now);
        sort(&filtered, self.sort)
    }

    /// Count and total of the filtered records.
    pub fn summary(&self) -> Summary {
        self.summary_at(Local::now())
    }

    pub fn summary_at<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Summary {
        summarize(&filter::apply_at(
            self.store.records(),
            &self.criteria,
            now,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TestBackend;
    use crate::pipeline::filter::DateRange;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.id()).collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 25, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_visible_follows_criteria_and_sort() {
        let mut backend = TestBackend::default();
        let mut view = View::new(
            FilterCriteria::new("", "UPI", DateRange::None),
            SortKey::AmountDesc,
        );
        view.reload(&mut backend).await.unwrap();
        assert_eq!(
            ids(&view.visible_at(now())),
            vec!["TXN-1001", "TXN-1005", "TXN-1004"]
        );

        view.set_sort(SortKey::Oldest);
        assert_eq!(
            ids(&view.visible_at(now())),
            vec!["TXN-1001", "TXN-1004", "TXN-1005"]
        );

        view.set_criteria(FilterCriteria::new("asha", "", DateRange::Month));
        assert_eq!(ids(&view.visible_at(now())), vec!["TXN-1005"]);
    }

    #[tokio::test]
    async fn test_summary_is_over_filtered_records() {
        let mut backend = TestBackend::default();
        let mut view = View::new(FilterCriteria::default(), SortKey::Newest);
        view.reload(&mut backend).await.unwrap();

        let all = view.summary_at(now());
        assert_eq!(all.count, 6);
        assert_eq!(all.total.value(), Decimal::from_str("7097.5").unwrap());

        view.set_criteria(FilterCriteria::new("", "Cash", DateRange::None));
        let cash = view.summary_at(now());
        assert_eq!(cash.count, 2);
        assert_eq!(cash.total.value(), Decimal::from(1000));
    }

    #[tokio::test]
    async fn test_delete_resyncs_from_backend() {
        let mut backend = TestBackend::default();
        let mut view = View::default();
        view.reload(&mut backend).await.unwrap();
        let remaining = view.delete(&mut backend, "TXN-1002").await.unwrap();
        assert_eq!(remaining, 5);
        assert!(view
            .store()
            .records()
            .iter()
            .all(|r| r.id() != "TXN-1002"));
    }

    #[tokio::test]
    async fn test_failed_delete_does_not_touch_store() {
        let mut backend = TestBackend::default();
        let mut view = View::default();
        view.reload(&mut backend).await.unwrap();
        assert!(view.delete(&mut backend, "TXN-9999").await.is_err());
        assert_eq!(view.store().records().len(), 6);
    }
}
