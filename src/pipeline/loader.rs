use crate::error::{PipelineError, Result};
use crate::records::RawRecord;
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, warn};

/// The nine columns the source file must carry. Header order is free; a
/// missing column is a schema mismatch and aborts the run before any stage.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "company",
    "location",
    "industry",
    "total_laid_off",
    "percentage_laid_off",
    "date",
    "stage",
    "country",
    "funds_raised_millions",
];

/// Reads the source CSV into the working set, verbatim.
///
/// No trimming, no coercion, no filtering happens here; the record shape
/// mirrors the source exactly. Rows the CSV reader cannot decode at all are
/// skipped with a warning rather than aborting the run.
pub fn load(path: &Path) -> Result<Vec<RawRecord>> {
    // `flexible(true)` tolerates rows with varying column counts instead of
    // failing hard on minor format issues.
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        let present = headers
            .iter()
            .any(|h| h.trim().eq_ignore_ascii_case(column));
        if !present {
            return Err(PipelineError::MissingColumn(column.to_string()));
        }
    }

    // Deserialization maps headers exactly, so rewrite them in the same
    // trimmed, lowercased form the schema check accepted
    let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    reader.set_headers(csv::StringRecord::from(normalized));

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<RawRecord>().enumerate() {
        match row {
            Ok(record) => records.push(record),
            Err(e) => {
                // +2: one for the header line, one for 1-based numbering
                warn!("Skipping undecodable row {}: {}", i + 2, e);
            }
        }
    }

    debug!("Loaded {} raw records from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_preserves_fields_verbatim() {
        let file = write_csv(
            "company,location,industry,total_laid_off,percentage_laid_off,date,stage,country,funds_raised_millions\n\
             Acme ,Seattle,Retail,100,0.15,3/6/2023,Series B,United States.,120\n",
        );

        let records = load(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        // Whitespace and the trailing period survive the loader untouched
        assert_eq!(records[0].company.as_deref(), Some("Acme "));
        assert_eq!(records[0].country.as_deref(), Some("United States."));
        assert_eq!(records[0].percentage_laid_off.as_deref(), Some("0.15"));
    }

    #[test]
    fn test_load_empty_fields_become_none() {
        let file = write_csv(
            "company,location,industry,total_laid_off,percentage_laid_off,date,stage,country,funds_raised_millions\n\
             Acme,Seattle,,,,,,United States,\n",
        );

        let records = load(file.path()).unwrap();
        assert_eq!(records[0].industry, None);
        assert_eq!(records[0].total_laid_off, None);
        assert_eq!(records[0].date, None);
    }

    #[test]
    fn test_load_accepts_case_variant_headers() {
        let file = write_csv(
            "Company,Location,Industry,Total_Laid_Off,Percentage_Laid_Off,Date,Stage,Country,Funds_Raised_Millions\n\
             Acme,Seattle,Retail,100,0.15,3/6/2023,Series B,United States,120\n",
        );

        let records = load(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        // Fields map by name even though the header casing differs
        assert_eq!(records[0].company.as_deref(), Some("Acme"));
        assert_eq!(records[0].total_laid_off.as_deref(), Some("100"));
        assert_eq!(records[0].date.as_deref(), Some("3/6/2023"));
    }

    #[test]
    fn test_load_missing_column_is_fatal() {
        let file = write_csv("company,location,industry\nAcme,Seattle,Retail\n");

        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn(_)));
    }

    #[test]
    fn test_load_unreadable_source_is_fatal() {
        let err = load(Path::new("/nonexistent/layoffs.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Csv(_)));
    }
}
