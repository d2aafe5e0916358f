use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One source row exactly as it appears in the CSV: every field is raw text,
/// no trimming or coercion applied. This is the shape the Loader emits and
/// the Deduplicator partitions on (full nine-attribute tuple equality).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawRecord {
    pub company: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub total_laid_off: Option<String>,
    pub percentage_laid_off: Option<String>,
    pub date: Option<String>,
    pub stage: Option<String>,
    pub country: Option<String>,
    pub funds_raised_millions: Option<String>,
}

/// A typed working-set record produced by the Normalizer and mutated in
/// place by the Missing-Value Resolver.
///
/// `row_num` is a pipeline mechanic (the record's ordinal in the deduped
/// working set, used for stable ordering and per-row diagnostics); the
/// Projector strips it before the final record set is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingRecord {
    pub row_num: usize,
    pub company: String,
    pub location: String,
    pub industry: Option<String>,
    pub total_laid_off: Option<i64>,
    /// Percentage on a 0-100 scale, rounded to 2 decimal places.
    pub percentage_laid_off: Option<f64>,
    pub event_date: Option<NaiveDate>,
    pub stage: Option<String>,
    pub country: String,
    pub funds_raised_millions: Option<i64>,
}

/// A fully cleaned layoff event, the pipeline's final output shape.
///
/// Serializes back to the source column layout (the date column keeps its
/// source header name) so the cleaned CSV is a drop-in replacement for the
/// raw file in downstream reporting tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoffRecord {
    pub company: String,
    pub location: String,
    pub industry: Option<String>,
    pub total_laid_off: Option<i64>,
    pub percentage_laid_off: Option<f64>,
    #[serde(rename = "date")]
    pub event_date: Option<NaiveDate>,
    pub stage: Option<String>,
    pub country: String,
    pub funds_raised_millions: Option<i64>,
}

impl From<WorkingRecord> for LayoffRecord {
    fn from(rec: WorkingRecord) -> Self {
        LayoffRecord {
            company: rec.company,
            location: rec.location,
            industry: rec.industry,
            total_laid_off: rec.total_laid_off,
            percentage_laid_off: rec.percentage_laid_off,
            event_date: rec.event_date,
            stage: rec.stage,
            country: rec.country,
            funds_raised_millions: rec.funds_raised_millions,
        }
    }
}
