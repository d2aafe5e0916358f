use crate::config::CleaningRules;
use crate::records::{RawRecord, WorkingRecord};
use chrono::NaiveDate;
use tracing::{debug, instrument};

/// Per-field issue counters accumulated while normalizing. Field-level
/// failures null the field and are tallied here; they never abort the run.
#[derive(Debug, Default, Clone, PartialEq, serde::Serialize)]
pub struct NormalizeIssues {
    pub unparseable_dates: usize,
    pub unparseable_numbers: usize,
    pub location_fixes: usize,
    pub industry_collapses: usize,
    pub country_fixes: usize,
}

/// Outcome of the normalization stage.
#[derive(Debug)]
pub struct NormalizeOutcome {
    pub records: Vec<WorkingRecord>,
    pub issues: NormalizeIssues,
}

/// Applies the per-field cleaning rules: whitespace trimming, encoding and
/// spelling fixups from the rule tables, and coercion of dates, percentages
/// and counts into their canonical types.
pub struct Normalizer<'a> {
    rules: &'a CleaningRules,
}

impl<'a> Normalizer<'a> {
    pub fn new(rules: &'a CleaningRules) -> Self {
        Self { rules }
    }

    /// Normalizes the whole working set, assigning each record its ordinal.
    #[instrument(skip_all, fields(records = raw.len()))]
    pub fn normalize(&self, raw: Vec<RawRecord>) -> NormalizeOutcome {
        let mut issues = NormalizeIssues::default();
        let records = raw
            .into_iter()
            .enumerate()
            .map(|(i, record)| self.normalize_one(i + 1, record, &mut issues))
            .collect::<Vec<_>>();

        debug!(
            "Normalized {} records ({} bad dates, {} bad numbers)",
            records.len(),
            issues.unparseable_dates,
            issues.unparseable_numbers
        );
        NormalizeOutcome { records, issues }
    }

    fn normalize_one(
        &self,
        row_num: usize,
        raw: RawRecord,
        issues: &mut NormalizeIssues,
    ) -> WorkingRecord {
        let company = clean_text(raw.company).unwrap_or_default();

        let location = match clean_text(raw.location) {
            Some(loc) => match self.rules.fix_location(&loc) {
                Some(fixed) => {
                    issues.location_fixes += 1;
                    fixed.to_string()
                }
                None => loc,
            },
            None => String::new(),
        };

        let industry = clean_text(raw.industry).map(|ind| match self.rules.canonical_industry(&ind)
        {
            Some(canonical) if canonical != ind => {
                issues.industry_collapses += 1;
                canonical.to_string()
            }
            _ => ind,
        });

        let country = match clean_text(raw.country) {
            Some(c) => {
                let stripped = self.rules.normalize_country(&c);
                if stripped != c {
                    issues.country_fixes += 1;
                }
                stripped.to_string()
            }
            None => String::new(),
        };

        let event_date = clean_text(raw.date).and_then(|text| match self.parse_date(&text) {
            Some(date) => Some(date),
            None => {
                issues.unparseable_dates += 1;
                debug!("Row {}: unparseable date '{}'", row_num, text);
                None
            }
        });

        let percentage_laid_off =
            clean_text(raw.percentage_laid_off).and_then(|text| match text.parse::<f64>() {
                Ok(value) => Some(rescale_percentage(value)),
                Err(_) => {
                    issues.unparseable_numbers += 1;
                    debug!("Row {}: unparseable percentage '{}'", row_num, text);
                    None
                }
            });

        let total_laid_off = clean_text(raw.total_laid_off)
            .and_then(|text| parse_count(&text, row_num, "total_laid_off", issues));
        let funds_raised_millions = clean_text(raw.funds_raised_millions)
            .and_then(|text| parse_count(&text, row_num, "funds_raised_millions", issues));

        WorkingRecord {
            row_num,
            company,
            location,
            industry,
            total_laid_off,
            percentage_laid_off,
            event_date,
            stage: clean_text(raw.stage),
            country,
            funds_raised_millions,
        }
    }

    /// Parses the source date pattern, falling back to ISO so that an
    /// already-cleaned file re-runs cleanly through the pipeline.
    fn parse_date(&self, text: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(text, &self.rules.date_format)
            .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
            .ok()
    }
}

/// Trims a raw text field, mapping blanks and the literal `NULL` marker the
/// source file uses to a true missing value.
fn clean_text(value: Option<String>) -> Option<String> {
    let trimmed = value?.trim().to_string();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(trimmed)
    }
}

/// Rescales a source 0-1 fraction to a 0-100 percentage, rounded to two
/// decimal places. Values already above 1 are taken as percentages and only
/// rounded, so normalizing twice is a fixed point for any percentage above
/// 1%. The ambiguity is inherent to the two scales: a value at or below 1 is
/// always read as a fraction, so a cleaned sub-1% value (say 0.75, meaning
/// 0.75%) would be rescaled again if the cleaned file were re-run.
fn rescale_percentage(value: f64) -> f64 {
    let pct = if value <= 1.0 { value * 100.0 } else { value };
    (pct * 100.0).round() / 100.0
}

fn parse_count(
    text: &str,
    row_num: usize,
    field: &str,
    issues: &mut NormalizeIssues,
) -> Option<i64> {
    // Some exports render integer columns as floats ("1300.0")
    let parsed = text
        .parse::<i64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().map(|v| v.round() as i64));
    if parsed.is_none() {
        issues.unparseable_numbers += 1;
        debug!("Row {}: unparseable {} '{}'", row_num, field, text);
    }
    parsed
}
