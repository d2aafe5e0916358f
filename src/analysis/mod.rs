//! Read-only aggregation queries over the cleaned record set.
//!
//! Every query is a pure function of its input slice: no mutation, no
//! shared state, deterministic output including sort order. Null fields are
//! excluded from sums rather than treated as zero.

use crate::records::LayoffRecord;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

/// Earliest and latest event dates in the set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

pub fn date_range(records: &[LayoffRecord]) -> Option<DateRange> {
    let mut dates = records.iter().filter_map(|r| r.event_date);
    let first = dates.next()?;
    let (earliest, latest) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some(DateRange { earliest, latest })
}

/// Whole-dataset sums, nulls excluded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetTotals {
    pub total_laid_off: i64,
    pub funds_raised_millions: i64,
}

pub fn dataset_totals(records: &[LayoffRecord]) -> DatasetTotals {
    DatasetTotals {
        total_laid_off: records.iter().filter_map(|r| r.total_laid_off).sum(),
        funds_raised_millions: records.iter().filter_map(|r| r.funds_raised_millions).sum(),
    }
}

/// Number of full-company shutdowns (100% of staff laid off).
pub fn full_shutdown_count(records: &[LayoffRecord]) -> usize {
    records
        .iter()
        .filter(|r| r.percentage_laid_off == Some(100.0))
        .count()
}

/// One group in a grouped-sum query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub total_laid_off: i64,
}

fn grouped_totals<F>(records: &[LayoffRecord], key_fn: F) -> Vec<GroupTotal>
where
    F: Fn(&LayoffRecord) -> Option<String>,
{
    let mut sums: HashMap<String, i64> = HashMap::new();
    for record in records {
        if let (Some(key), Some(total)) = (key_fn(record), record.total_laid_off) {
            *sums.entry(key).or_insert(0) += total;
        }
    }
    let mut groups: Vec<GroupTotal> = sums
        .into_iter()
        .map(|(key, total_laid_off)| GroupTotal {
            key,
            total_laid_off,
        })
        .collect();
    // Descending by sum; key breaks ties so output order is deterministic
    groups.sort_by(|a, b| {
        b.total_laid_off
            .cmp(&a.total_laid_off)
            .then_with(|| a.key.cmp(&b.key))
    });
    groups
}

pub fn totals_by_company(records: &[LayoffRecord]) -> Vec<GroupTotal> {
    grouped_totals(records, |r| Some(r.company.clone()))
}

pub fn totals_by_industry(records: &[LayoffRecord]) -> Vec<GroupTotal> {
    grouped_totals(records, |r| r.industry.clone())
}

pub fn totals_by_country(records: &[LayoffRecord]) -> Vec<GroupTotal> {
    grouped_totals(records, |r| Some(r.country.clone()))
}

/// One month bucket with its running cumulative total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// `YYYY-MM`
    pub month: String,
    pub laid_off: i64,
    pub running_total: i64,
}

/// Month-bucketed layoff sums in chronological order, with a cumulative
/// running total. Records without a date are excluded.
pub fn monthly_running_totals(records: &[LayoffRecord]) -> Vec<MonthlyTotal> {
    let mut sums: HashMap<(i32, u32), i64> = HashMap::new();
    for record in records {
        if let (Some(date), Some(total)) = (record.event_date, record.total_laid_off) {
            *sums.entry((date.year(), date.month())).or_insert(0) += total;
        }
    }
    let mut months: Vec<((i32, u32), i64)> = sums.into_iter().collect();
    months.sort_by_key(|(month, _)| *month);

    let mut running_total = 0;
    months
        .into_iter()
        .map(|((year, month), laid_off)| {
            running_total += laid_off;
            MonthlyTotal {
                month: format!("{year:04}-{month:02}"),
                laid_off,
                running_total,
            }
        })
        .collect()
}

/// One company's rank within its year partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCompany {
    pub year: i32,
    pub company: String,
    pub total_laid_off: i64,
    pub rank: usize,
}

/// Top-N companies per year by total laid off, using competition ranking:
/// tied totals share a rank, and the next distinct total's rank skips the
/// size of the tie group. Undated records are excluded (they belong to no
/// year partition).
pub fn top_companies_per_year(records: &[LayoffRecord], n: usize) -> Vec<RankedCompany> {
    let mut sums: HashMap<(i32, String), i64> = HashMap::new();
    for record in records {
        if let (Some(date), Some(total)) = (record.event_date, record.total_laid_off) {
            *sums.entry((date.year(), record.company.clone())).or_insert(0) += total;
        }
    }

    let mut by_year: HashMap<i32, Vec<(String, i64)>> = HashMap::new();
    for ((year, company), total) in sums {
        by_year.entry(year).or_default().push((company, total));
    }

    let mut years: Vec<i32> = by_year.keys().copied().collect();
    years.sort_unstable();

    let mut ranked = Vec::new();
    for year in years {
        let mut companies = by_year.remove(&year).unwrap_or_default();
        companies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut prev_total = None;
        let mut rank = 0;
        for (position, (company, total_laid_off)) in companies.into_iter().enumerate() {
            if prev_total != Some(total_laid_off) {
                rank = position + 1;
                prev_total = Some(total_laid_off);
            }
            if rank > n {
                break;
            }
            ranked.push(RankedCompany {
                year,
                company,
                total_laid_off,
                rank,
            });
        }
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        company: &str,
        industry: Option<&str>,
        total: Option<i64>,
        date: Option<NaiveDate>,
    ) -> LayoffRecord {
        LayoffRecord {
            company: company.to_string(),
            location: "Seattle".to_string(),
            industry: industry.map(String::from),
            total_laid_off: total,
            percentage_laid_off: None,
            event_date: date,
            stage: None,
            country: "United States".to_string(),
            funds_raised_millions: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_ignores_null_dates() {
        let records = vec![
            record("A", None, Some(1), Some(date(2022, 3, 1))),
            record("B", None, Some(1), None),
            record("C", None, Some(1), Some(date(2023, 1, 15))),
        ];
        let range = date_range(&records).unwrap();
        assert_eq!(range.earliest, date(2022, 3, 1));
        assert_eq!(range.latest, date(2023, 1, 15));

        assert_eq!(date_range(&[record("A", None, Some(1), None)]), None);
    }

    #[test]
    fn test_totals_exclude_nulls() {
        let mut funded = record("A", None, Some(100), None);
        funded.funds_raised_millions = Some(50);
        let records = vec![funded, record("B", None, None, None)];

        let totals = dataset_totals(&records);
        assert_eq!(totals.total_laid_off, 100);
        assert_eq!(totals.funds_raised_millions, 50);
    }

    #[test]
    fn test_full_shutdown_count() {
        let mut shutdown = record("A", None, Some(100), None);
        shutdown.percentage_laid_off = Some(100.0);
        let mut partial = record("B", None, Some(10), None);
        partial.percentage_laid_off = Some(15.0);
        let records = vec![shutdown, partial, record("C", None, Some(5), None)];

        assert_eq!(full_shutdown_count(&records), 1);
    }

    #[test]
    fn test_grouped_industry_sums_sorted_descending() {
        let records = vec![
            record("A", Some("Retail"), Some(100), None),
            record("B", Some("Retail"), Some(50), None),
            record("C", Some("Tech"), Some(30), None),
            record("D", None, Some(999), None), // no industry: excluded
        ];

        let groups = totals_by_industry(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "Retail");
        assert_eq!(groups[0].total_laid_off, 150);
        assert_eq!(groups[1].key, "Tech");
        assert_eq!(groups[1].total_laid_off, 30);
    }

    #[test]
    fn test_monthly_running_totals_chronological() {
        let records = vec![
            record("A", None, Some(30), Some(date(2023, 2, 10))),
            record("B", None, Some(100), Some(date(2022, 12, 5))),
            record("C", None, Some(20), Some(date(2022, 12, 20))),
        ];

        let months = monthly_running_totals(&records);
        assert_eq!(
            months,
            vec![
                MonthlyTotal {
                    month: "2022-12".to_string(),
                    laid_off: 120,
                    running_total: 120,
                },
                MonthlyTotal {
                    month: "2023-02".to_string(),
                    laid_off: 30,
                    running_total: 150,
                },
            ]
        );
    }

    #[test]
    fn test_competition_ranking_skips_after_ties() {
        let records = vec![
            record("A", None, Some(100), Some(date(2023, 1, 1))),
            record("B", None, Some(100), Some(date(2023, 2, 1))),
            record("C", None, Some(80), Some(date(2023, 3, 1))),
            record("D", None, Some(60), Some(date(2023, 4, 1))),
        ];

        let ranked = top_companies_per_year(&records, 5);
        let ranks: Vec<(&str, usize)> = ranked
            .iter()
            .map(|r| (r.company.as_str(), r.rank))
            .collect();
        // A and B tie at rank 1; C takes rank 3, not 2
        assert_eq!(ranks, vec![("A", 1), ("B", 1), ("C", 3), ("D", 4)]);
    }

    #[test]
    fn test_top_n_filter_respects_rank_not_row_count() {
        let records = vec![
            record("A", None, Some(100), Some(date(2023, 1, 1))),
            record("B", None, Some(100), Some(date(2023, 2, 1))),
            record("C", None, Some(80), Some(date(2023, 3, 1))),
        ];

        // With N=2, the two rank-1 companies survive but rank-3 does not
        let ranked = top_companies_per_year(&records, 2);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.rank <= 2));
    }

    #[test]
    fn test_ranking_partitions_by_year() {
        let records = vec![
            record("A", None, Some(100), Some(date(2022, 6, 1))),
            record("A", None, Some(40), Some(date(2023, 6, 1))),
            record("B", None, Some(70), Some(date(2023, 7, 1))),
        ];

        let ranked = top_companies_per_year(&records, 1);
        assert_eq!(ranked.len(), 2);
        assert_eq!((ranked[0].year, ranked[0].company.as_str()), (2022, "A"));
        assert_eq!((ranked[1].year, ranked[1].company.as_str()), (2023, "B"));
    }
}
