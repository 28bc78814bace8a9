use crate::error::Error;
use crate::model::{CanonicalRecord, DeleteSummary};
use crate::prompt::ConfirmAction;
use rayon::prelude::*;
use std::sync::Mutex;
use tracing::{error, info};

/// Default cap on simultaneously in-flight delete operations.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 10;

const CONFIRM_PROMPT: &str = "Proceed to delete these duplicate items?";

/// Deletes one record by its external id. `Ok(true)` is a confirmed
/// deletion; `Ok(false)` and transport errors are per-item failures.
pub trait ItemDeleter: Send + Sync {
    fn delete_item(&self, id: &str) -> Result<bool, Error>;
}

/// Deletes the discarded records through `deleter`, at most `max_in_flight`
/// operations at a time.
///
/// The operator must confirm before any delete is issued; a declined
/// confirmation performs zero deletions and returns the zero summary as a
/// normal outcome. Records without an id are skipped silently. A failed
/// deletion never aborts or blocks the rest of the batch; every submitted
/// id contributes to the aggregate exactly once. The call returns only
/// after the whole batch has completed.
pub fn delete_discarded(
    deleter: &dyn ItemDeleter,
    discarded: &[CanonicalRecord],
    confirm: &dyn ConfirmAction,
    max_in_flight: usize,
) -> Result<DeleteSummary, Error> {
    if !confirm.confirm(CONFIRM_PROMPT)? {
        info!("Operation canceled.");
        return Ok(DeleteSummary::default());
    }

    let ids: Vec<&str> = discarded
        .iter()
        .filter_map(|record| record.id.as_deref())
        .collect();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(max_in_flight.max(1))
        .build()?;

    let summary = Mutex::new(DeleteSummary::default());

    pool.install(|| {
        ids.par_iter().for_each(|&id| {
            let deleted = match deleter.delete_item(id) {
                Ok(success) => success,
                Err(err) => {
                    error!("Delete request for '{}' failed: {}", id, err);
                    false
                }
            };

            let mut summary = summary.lock().unwrap();
            if deleted {
                summary.succeeded += 1;
                info!("Item deletion {}: {} successfully deleted", summary.succeeded, id);
            } else {
                summary.failed += 1;
                summary.failed_ids.push(id.to_string());
            }
        });
    });

    Ok(summary.into_inner().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{AlwaysConfirm, NeverConfirm};
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn record(id: Option<&str>) -> CanonicalRecord {
        CanonicalRecord {
            id: id.map(String::from),
            name: None,
            username: Some("bob".to_string()),
            password: Some("h1".to_string()),
            revision_date: "2024-01-05T00:00:00Z".parse::<DateTime<Utc>>().unwrap(),
            creation_date: "2023-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap(),
            deleted_date: None,
            uri: Some("x.com".to_string()),
            totp: None,
            item_type: 1,
        }
    }

    /// In-memory deleter that fails ids containing "bad" and records calls.
    struct FakeDeleter {
        calls: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_observed: AtomicUsize,
    }

    impl FakeDeleter {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_observed: AtomicUsize::new(0),
            }
        }
    }

    impl ItemDeleter for FakeDeleter {
        fn delete_item(&self, id: &str) -> Result<bool, Error> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_observed.fetch_max(current, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(5));
            self.calls.lock().unwrap().push(id.to_string());
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if id.contains("bad") {
                Ok(false)
            } else if id.contains("broken") {
                Err(Error::Other("connection reset".to_string()))
            } else {
                Ok(true)
            }
        }
    }

    #[test]
    fn test_aggregate_covers_every_submitted_item_exactly_once() {
        let deleter = FakeDeleter::new();
        let records: Vec<_> = ["a", "b", "bad-1", "c", "broken-1"]
            .iter()
            .map(|id| record(Some(*id)))
            .collect();

        let summary = delete_discarded(&deleter, &records, &AlwaysConfirm, 4).unwrap();

        assert_eq!(summary.succeeded + summary.failed, records.len());
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.failed, summary.failed_ids.len());
        let mut failed = summary.failed_ids.clone();
        failed.sort();
        assert_eq!(failed, vec!["bad-1", "broken-1"]);
    }

    #[test]
    fn test_declined_confirmation_issues_zero_deletes() {
        let deleter = FakeDeleter::new();
        let records = vec![record(Some("a")), record(Some("b"))];

        let summary = delete_discarded(&deleter, &records, &NeverConfirm, 4).unwrap();

        assert_eq!(summary, DeleteSummary::default());
        assert!(deleter.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_records_without_id_are_skipped_silently() {
        let deleter = FakeDeleter::new();
        let records = vec![record(None), record(Some("a")), record(None)];

        let summary = delete_discarded(&deleter, &records, &AlwaysConfirm, 4).unwrap();

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(deleter.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_in_flight_deletes_stay_under_cap() {
        let deleter = FakeDeleter::new();
        let records: Vec<_> = (0..24)
            .map(|i| {
                let id = format!("id-{}", i);
                record(Some(id.as_str()))
            })
            .collect();

        let summary = delete_discarded(&deleter, &records, &AlwaysConfirm, 3).unwrap();

        assert_eq!(summary.succeeded, 24);
        assert!(deleter.max_observed.load(Ordering::SeqCst) <= 3);
    }

    #[test]
    fn test_empty_batch_returns_zero_summary() {
        let deleter = FakeDeleter::new();
        let summary = delete_discarded(&deleter, &[], &AlwaysConfirm, 4).unwrap();
        assert_eq!(summary, DeleteSummary::default());
    }
}
