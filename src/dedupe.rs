use crate::model::{CanonicalRecord, IdentityKey};
use std::collections::HashMap;
use tracing::debug;

/// Complete partition of the input into survivors and redundant copies.
#[derive(Debug, Clone)]
pub struct DedupeOutcome {
    pub kept: Vec<CanonicalRecord>,
    pub discarded: Vec<CanonicalRecord>,
    pub total: usize,
    pub with_totp: usize,
    pub without_totp: usize,
}

impl DedupeOutcome {
    /// Zero duplicates after grouping: a terminal, successful short-circuit.
    pub fn nothing_to_do(&self) -> bool {
        self.discarded.is_empty()
    }
}

/// Groups records by identity key and picks one survivor per group.
///
/// Survivor selection sorts each group descending on revisionDate, then
/// creationDate, then TOTP presence (a record with TOTP outranks one
/// without — a policy choice, not an identity property). The sort is stable,
/// so fully tied records resolve by input order. Every input record lands in
/// exactly one of the two output sequences.
pub fn dedupe_records(records: Vec<CanonicalRecord>) -> DedupeOutcome {
    let total = records.len();

    let mut groups: HashMap<IdentityKey, Vec<CanonicalRecord>> = HashMap::new();
    for record in records {
        groups.entry(record.identity_key()).or_default().push(record);
    }
    debug!("{} identity groups from {} records", groups.len(), total);

    let mut kept = Vec::new();
    let mut discarded = Vec::new();
    let mut with_totp = 0usize;
    let mut without_totp = 0usize;

    for (_, mut group) in groups {
        for record in &group {
            if record.totp.is_some() {
                with_totp += 1;
            } else {
                without_totp += 1;
            }
        }

        group.sort_by(|a, b| {
            (b.revision_date, b.creation_date, b.totp.is_some()).cmp(&(
                a.revision_date,
                a.creation_date,
                a.totp.is_some(),
            ))
        });

        let mut members = group.into_iter();
        // Non-empty by construction: every group has at least the record
        // that created it.
        if let Some(survivor) = members.next() {
            kept.push(survivor);
        }
        discarded.extend(members);
    }

    DedupeOutcome {
        kept,
        discarded,
        total,
        with_totp,
        without_totp,
    }
}
