use crate::model::CanonicalRecord;
use std::collections::HashSet;

/// Checks that every discarded record is still represented among the kept
/// records by its (uri, username) pair. The password digest is deliberately
/// excluded: the survivor's password represents the whole group, and this
/// audit exists to catch grouping bugs, not to re-verify identity keys.
///
/// Returns the discarded records with no kept counterpart ("orphans").
/// Orphans are a warning, not a failure — but they must be surfaced to the
/// operator before anything destructive runs.
pub fn find_orphans<'a>(
    kept: &[CanonicalRecord],
    discarded: &'a [CanonicalRecord],
) -> Vec<&'a CanonicalRecord> {
    let kept_pairs: HashSet<_> = kept.iter().map(|record| record.partial_key()).collect();

    discarded
        .iter()
        .filter(|record| !kept_pairs.contains(&record.partial_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedupe::dedupe_records;
    use chrono::{DateTime, Utc};

    fn record(id: &str, uri: &str, username: &str, password: &str, revision: &str) -> CanonicalRecord {
        CanonicalRecord {
            id: Some(id.to_string()),
            name: None,
            username: Some(username.to_string()),
            password: Some(password.to_string()),
            revision_date: revision.parse::<DateTime<Utc>>().unwrap(),
            creation_date: "2023-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap(),
            deleted_date: None,
            uri: Some(uri.to_string()),
            totp: None,
            item_type: 1,
        }
    }

    #[test]
    fn test_correct_dedupe_pass_has_no_orphans() {
        let records = vec![
            record("a", "x.com", "bob", "h1", "2024-01-03T00:00:00Z"),
            record("b", "x.com", "bob", "h1", "2024-01-05T00:00:00Z"),
            record("c", "y.com", "alice", "h2", "2024-01-01T00:00:00Z"),
        ];

        let outcome = dedupe_records(records);
        let orphans = find_orphans(&outcome.kept, &outcome.discarded);
        assert!(orphans.is_empty());
    }

    #[test]
    fn test_detects_discarded_record_without_kept_pair() {
        let kept = vec![record("k", "x.com", "bob", "h1", "2024-01-05T00:00:00Z")];
        let discarded = vec![
            record("match", "x.com", "bob", "h1", "2024-01-03T00:00:00Z"),
            record("orphan", "z.com", "carol", "h9", "2024-01-02T00:00:00Z"),
        ];

        let orphans = find_orphans(&kept, &discarded);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id.as_deref(), Some("orphan"));
    }

    #[test]
    fn test_pair_match_ignores_password_digest() {
        // Different digest but same (uri, username): still accounted for.
        let kept = vec![record("k", "x.com", "bob", "h1", "2024-01-05T00:00:00Z")];
        let discarded = vec![record("d", "x.com", "bob", "other-digest", "2024-01-03T00:00:00Z")];

        assert!(find_orphans(&kept, &discarded).is_empty());
    }

    #[test]
    fn test_empty_discarded_set_has_no_orphans() {
        let kept = vec![record("k", "x.com", "bob", "h1", "2024-01-05T00:00:00Z")];
        assert!(find_orphans(&kept, &[]).is_empty());
    }
}
