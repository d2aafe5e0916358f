use crate::config::CleaningRules;
use crate::records::WorkingRecord;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Outcome of the missing-value resolution stage.
#[derive(Debug, Default, Clone, PartialEq, serde::Serialize)]
pub struct ResolveOutcome {
    pub imputed_industries: usize,
    pub dropped_rows: usize,
}

/// Fills recoverable missing values and deletes uninformative rows.
///
/// Two independent rules:
/// 1. A record with no industry inherits one from another record of the same
///    company. When siblings disagree, the lexicographically greatest value
///    wins, which keeps the result independent of record order. If no
///    sibling supplies a value, the manual override table is consulted;
///    otherwise the field stays null.
/// 2. A record with neither total_laid_off nor percentage_laid_off carries
///    no layoff-magnitude signal and is deleted.
///
/// Numeric fields are never imputed: no reliable inference exists for
/// total_laid_off, percentage_laid_off, funds_raised_millions or stage.
#[instrument(skip_all, fields(records = records.len()))]
pub fn resolve(records: &mut Vec<WorkingRecord>, rules: &CleaningRules) -> ResolveOutcome {
    let mut outcome = ResolveOutcome::default();

    // Best-known industry per company, from records that have one
    let mut known: HashMap<String, String> = HashMap::new();
    for record in records.iter() {
        if let Some(industry) = &record.industry {
            let key = record.company.to_lowercase();
            match known.get(&key) {
                Some(existing) if existing >= industry => {}
                _ => {
                    known.insert(key, industry.clone());
                }
            }
        }
    }

    for record in records.iter_mut() {
        if record.industry.is_none() {
            let sibling = known.get(&record.company.to_lowercase()).cloned();
            let resolved =
                sibling.or_else(|| rules.override_industry(&record.company).map(String::from));
            if let Some(industry) = resolved {
                debug!("Row {}: imputed industry '{}'", record.row_num, industry);
                record.industry = Some(industry);
                outcome.imputed_industries += 1;
            }
        }
    }

    let before = records.len();
    records.retain(|r| r.total_laid_off.is_some() || r.percentage_laid_off.is_some());
    outcome.dropped_rows = before - records.len();

    debug!(
        "Resolver imputed {} industries, dropped {} uninformative rows",
        outcome.imputed_industries, outcome.dropped_rows
    );
    outcome
}
