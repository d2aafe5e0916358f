use crate::records::{LayoffRecord, WorkingRecord};

/// Drops the working-only `row_num` mechanic, yielding the final record set.
/// Pure column projection: the row count never changes here.
pub fn project(records: Vec<WorkingRecord>) -> Vec<LayoffRecord> {
    records.into_iter().map(LayoffRecord::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_keeps_every_row() {
        let records = vec![
            WorkingRecord {
                row_num: 1,
                company: "Acme".to_string(),
                location: "Seattle".to_string(),
                industry: Some("Retail".to_string()),
                total_laid_off: Some(100),
                percentage_laid_off: Some(15.0),
                event_date: None,
                stage: None,
                country: "United States".to_string(),
                funds_raised_millions: Some(120),
            },
            WorkingRecord {
                row_num: 2,
                company: "Beta".to_string(),
                location: "Berlin".to_string(),
                industry: None,
                total_laid_off: Some(50),
                percentage_laid_off: None,
                event_date: None,
                stage: None,
                country: "Germany".to_string(),
                funds_raised_millions: None,
            },
        ];

        let projected = project(records);
        assert_eq!(projected.len(), 2);
        assert_eq!(projected[0].company, "Acme");
        assert_eq!(projected[1].funds_raised_millions, None);
    }
}
