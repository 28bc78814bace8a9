use crate::artifacts;
use crate::client::ItemSource;
use crate::config::AppConfig;
use crate::dedupe::{self, DedupeOutcome};
use crate::deleter::{self, ItemDeleter};
use crate::error::Error;
use crate::model::{CanonicalRecord, DeleteSummary};
use crate::normalize;
use crate::prompt::ConfirmAction;
use crate::reconcile;
use crate::sanitize;
use colored::*;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Drives the full pipeline: fetch → sanitize → normalize → dedupe →
/// reconcile → artifacts → confirm → delete.
pub struct DedupeEngine {
    config: AppConfig,
}

#[derive(Debug)]
pub struct RunReport {
    pub total: usize,
    pub unique: usize,
    pub duplicates: usize,
    pub orphans: usize,
    pub fetch_duration: Duration,
    pub dedupe_duration: Duration,
    /// None when nothing was discarded, so deletion never ran.
    pub deletion: Option<DeleteSummary>,
}

impl DedupeEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Fetches raw items, hashes sensitive values, and flattens to canonical
    /// records. A transport failure on fetch is surfaced as a warning and
    /// yields an empty working set rather than aborting the run.
    fn fetch_canonical<S: ItemSource>(&self, source: &S) -> Result<Vec<CanonicalRecord>, Error> {
        let raw_items = match source.get_items(
            self.config.folder_id.as_deref(),
            self.config.search.as_deref(),
        ) {
            Ok(items) => items,
            Err(err) => {
                warn!("Fetching vault items failed: {}; proceeding with an empty set", err);
                Vec::new()
            }
        };
        debug!("Fetched {} login items", raw_items.len());

        let sanitized: Vec<_> = raw_items
            .into_iter()
            .map(|mut item| {
                sanitize::hash_sensitive_values(&mut item);
                item
            })
            .collect();

        normalize::normalize_items(&sanitized)
    }

    /// Fetch, sanitize and flatten only, writing the canonical records to the
    /// configured export file. Returns the number of records written.
    pub fn export<S: ItemSource>(&self, source: &S) -> Result<usize, Error> {
        let records = self.fetch_canonical(source)?;
        artifacts::write_records(Path::new(&self.config.export_path), &records)?;
        info!(
            "Exported {} records to {}",
            format!("{}", records.len()).green(),
            self.config.export_path
        );
        Ok(records.len())
    }

    /// Full pipeline against the live API, ending in confirmation-gated
    /// deletion of the discarded records.
    pub fn run<C>(&self, client: &C, confirm: &dyn ConfirmAction) -> Result<RunReport, Error>
    where
        C: ItemSource + ItemDeleter,
    {
        info!("Fetching vault items...");
        let fetch_start = Instant::now();
        let records = self.fetch_canonical(client)?;
        let fetch_duration = fetch_start.elapsed();
        debug!(
            "Fetch completed in {:.2}s — {} records",
            fetch_duration.as_secs_f64(),
            records.len(),
        );

        let dedupe_start = Instant::now();
        let (outcome, orphans) = self.dedupe_and_reconcile(records)?;
        let dedupe_duration = dedupe_start.elapsed();

        let mut report = RunReport {
            total: outcome.total,
            unique: outcome.kept.len(),
            duplicates: outcome.discarded.len(),
            orphans,
            fetch_duration,
            dedupe_duration,
            deletion: None,
        };

        if outcome.nothing_to_do() {
            info!("No duplicates found; nothing to delete.");
            return Ok(report);
        }

        let summary = deleter::delete_discarded(
            client,
            &outcome.discarded,
            confirm,
            self.config.max_concurrent_deletes,
        )?;
        print_delete_summary(&summary);
        report.deletion = Some(summary);

        Ok(report)
    }

    /// Dedup + reconciliation over a previously exported record file. Writes
    /// the kept/discarded artifacts but never touches the API.
    pub fn dedupe_file(&self, input: &Path) -> Result<RunReport, Error> {
        let records = artifacts::read_records(input)?;
        let logins: Vec<_> = records.into_iter().filter(|r| r.is_login()).collect();

        let dedupe_start = Instant::now();
        let (outcome, orphans) = self.dedupe_and_reconcile(logins)?;
        let dedupe_duration = dedupe_start.elapsed();

        if outcome.nothing_to_do() {
            info!("No duplicates found.");
        }

        Ok(RunReport {
            total: outcome.total,
            unique: outcome.kept.len(),
            duplicates: outcome.discarded.len(),
            orphans,
            fetch_duration: Duration::ZERO,
            dedupe_duration,
            deletion: None,
        })
    }

    /// Shared middle of the pipeline: partition, audit, persist, report.
    fn dedupe_and_reconcile(
        &self,
        records: Vec<CanonicalRecord>,
    ) -> Result<(DedupeOutcome, usize), Error> {
        let outcome = dedupe::dedupe_records(records);
        debug!(
            "{} records with TOTP, {} without",
            outcome.with_totp, outcome.without_totp,
        );

        artifacts::write_records(Path::new(&self.config.kept_path), &outcome.kept)?;
        artifacts::write_records(Path::new(&self.config.discarded_path), &outcome.discarded)?;

        info!("Total vault items: {}", format!("{}", outcome.total).cyan());
        info!("Unique items: {}", format!("{}", outcome.kept.len()).green());
        info!("Duplicate items: {}", format!("{}", outcome.discarded.len()).red());

        let orphans = reconcile::find_orphans(&outcome.kept, &outcome.discarded);
        if orphans.is_empty() {
            debug!("All discarded records have matching kept records.");
        } else {
            warn!(
                "{} discarded records have no matching kept record:",
                format!("{}", orphans.len()).red()
            );
            for orphan in &orphans {
                warn!(
                    "  orphan id={:?} uri={:?} username={:?}",
                    orphan.id, orphan.uri, orphan.username,
                );
            }
        }
        let orphan_count = orphans.len();

        Ok((outcome, orphan_count))
    }
}

fn print_delete_summary(summary: &DeleteSummary) {
    info!(
        "Deletion summary: {} items successfully deleted.",
        format!("{}", summary.succeeded).green()
    );
    if summary.failed > 0 {
        warn!(
            "{} deletions failed. Failed ids: {:?}",
            format!("{}", summary.failed).red(),
            summary.failed_ids,
        );
    } else {
        info!("All deletions were successful.");
    }
}
