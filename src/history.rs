//! history.rs — bounded in-memory log of past news requests.
//!
//! Append-only and insertion-ordered; once the configured capacity is
//! exceeded the oldest record is dropped. Recording is best-effort: it must
//! never abort the request pipeline.

use std::sync::{Mutex, MutexGuard};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One past request. `topic`/`filterBy` are `None` when the raw body did
/// not carry them as strings (failed validations keep the raw values).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub topic: Option<String>,
    pub filter_by: Option<String>,
    /// ISO-8601 timestamp taken at recording time.
    pub requested_at: String,
    pub failed: bool,
}

#[derive(Debug)]
pub struct HistoryLog {
    inner: Mutex<Vec<HistoryRecord>>,
    cap: usize,
}

impl HistoryLog {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: cap.min(10_000),
        }
    }

    /// Append one record, evicting the oldest if the log is full.
    pub fn record(&self, topic: Option<&str>, filter_by: Option<&str>, failed: bool) {
        let entry = HistoryRecord {
            topic: topic.map(str::to_string),
            filter_by: filter_by.map(str::to_string),
            requested_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            failed,
        };

        let mut v = self.lock();
        v.push(entry);
        if v.len() > self.cap {
            v.remove(0);
        }
    }

    /// Full history, oldest first.
    pub fn snapshot(&self) -> Vec<HistoryRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Recording must not panic even if another holder panicked mid-push,
    // so a poisoned lock is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, Vec<HistoryRecord>> {
        match self.inner.lock() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_append_in_insertion_order() {
        let log = HistoryLog::with_capacity(10);
        log.record(Some("bitcoin"), Some("relevancy"), false);
        log.record(Some("ethereum"), Some("popularity"), false);

        let rows = log.snapshot();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].topic.as_deref(), Some("bitcoin"));
        assert_eq!(rows[1].topic.as_deref(), Some("ethereum"));
    }

    #[test]
    fn eviction_drops_exactly_the_oldest() {
        let log = HistoryLog::with_capacity(3);
        for topic in ["a", "b", "c", "d", "e"] {
            log.record(Some(topic), None, false);
        }

        let rows = log.snapshot();
        assert_eq!(rows.len(), 3, "length never exceeds the cap");
        let topics: Vec<_> = rows.iter().map(|r| r.topic.as_deref()).collect();
        assert_eq!(
            topics,
            vec![Some("c"), Some("d"), Some("e")],
            "survivors keep their relative order"
        );
    }

    #[test]
    fn failed_records_keep_raw_absent_values() {
        let log = HistoryLog::with_capacity(5);
        log.record(None, None, true);

        let rows = log.snapshot();
        assert_eq!(rows[0].topic, None);
        assert_eq!(rows[0].filter_by, None);
        assert!(rows[0].failed);
    }

    #[test]
    fn requested_at_is_valid_rfc3339() {
        let log = HistoryLog::with_capacity(1);
        log.record(Some("bitcoin"), Some("publishedAt"), false);

        let rows = log.snapshot();
        chrono::DateTime::parse_from_rfc3339(&rows[0].requested_at)
            .expect("requestedAt must parse as RFC 3339");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let log = HistoryLog::with_capacity(1);
        log.record(Some("bitcoin"), Some("relevancy"), false);

        let json = serde_json::to_value(log.snapshot()).expect("serialize history");
        let row = &json[0];
        assert!(row.get("filterBy").is_some());
        assert!(row.get("requestedAt").is_some());
        assert_eq!(row.get("failed"), Some(&serde_json::json!(false)));
    }
}
