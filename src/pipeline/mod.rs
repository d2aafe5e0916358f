pub mod dedup;
pub mod loader;
pub mod normalize;
pub mod project;
pub mod resolve;

use crate::config::CleaningRules;
use crate::error::Result;
use crate::records::LayoffRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};
use uuid::Uuid;

use normalize::{NormalizeIssues, Normalizer};
use resolve::ResolveOutcome;

/// Bookkeeping for one complete cleaning run.
#[derive(Debug, Serialize)]
pub struct CleanSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub source_rows: usize,
    pub duplicates_removed: usize,
    pub issues: NormalizeIssues,
    pub imputed_industries: usize,
    pub dropped_rows: usize,
    pub output_rows: usize,
}

/// The cleaning pipeline: load, dedupe, normalize, resolve, project.
///
/// Stages run strictly in order over one exclusively owned working set; the
/// whole run either completes or fails on a fatal load error. Field-level
/// problems are absorbed by the stages and surface only as summary counts.
pub struct Pipeline {
    rules: CleaningRules,
}

impl Pipeline {
    pub fn new(rules: CleaningRules) -> Self {
        Self { rules }
    }

    pub fn with_default_rules() -> Self {
        Self::new(CleaningRules::default())
    }

    /// Runs all five cleaning stages over the source file.
    #[instrument(skip(self), fields(input = %input.display()))]
    pub fn run(&self, input: &Path) -> Result<(Vec<LayoffRecord>, CleanSummary)> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!("🚀 Starting cleaning run {}", run_id);

        // Stage 1: load the source verbatim
        let raw = loader::load(input)?;
        let source_rows = raw.len();
        info!("📥 Loaded {} source rows", source_rows);

        // Stage 2: drop exact duplicates
        let deduped = dedup::dedup(raw);
        info!("🧹 Removed {} exact duplicates", deduped.removed);

        // Stage 3: trim, fix and coerce fields
        let normalized = Normalizer::new(&self.rules).normalize(deduped.records);
        info!(
            "🔧 Normalized {} records ({} date and {} number fields nulled)",
            normalized.records.len(),
            normalized.issues.unparseable_dates,
            normalized.issues.unparseable_numbers
        );

        // Stage 4: impute industries, drop uninformative rows
        let mut working = normalized.records;
        let resolved: ResolveOutcome = resolve::resolve(&mut working, &self.rules);
        info!(
            "🩹 Imputed {} industries, dropped {} uninformative rows",
            resolved.imputed_industries, resolved.dropped_rows
        );

        // Stage 5: strip pipeline mechanics
        let records = project::project(working);
        let finished_at = Utc::now();
        info!("✅ Cleaning run {} produced {} records", run_id, records.len());

        let summary = CleanSummary {
            run_id,
            started_at,
            finished_at,
            source_rows,
            duplicates_removed: deduped.removed,
            issues: normalized.issues,
            imputed_industries: resolved.imputed_industries,
            dropped_rows: resolved.dropped_rows,
            output_rows: records.len(),
        };
        Ok((records, summary))
    }
}

/// Writes the cleaned record set as CSV, creating parent directories.
pub fn write_clean_csv(records: &[LayoffRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!("💾 Wrote {} cleaned records to {}", records.len(), path.display());
    Ok(())
}

/// Reads a previously cleaned CSV back for analysis.
pub fn read_clean_csv(path: &Path) -> Result<Vec<LayoffRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<LayoffRecord>() {
        records.push(row?);
    }
    Ok(records)
}
