//! CSV repository for cleaning-activity logs and their media links.

use anyhow::Result;
use shared::CleaningLog;

use super::connection::CsvConnection;
use crate::domain::date_range::date_prefix;

const CLEANING_LOGS: &str = "cleaning_logs";

#[derive(Clone)]
pub struct CleaningRepository {
    connection: CsvConnection,
}

impl CleaningRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    pub fn list(&self) -> Result<Vec<CleaningLog>> {
        self.connection.read_table(CLEANING_LOGS)
    }

    pub fn store(&self, log: CleaningLog) -> Result<()> {
        self.connection.append_row(CLEANING_LOGS, log)
    }

    pub fn for_date_and_area(&self, date: &str, area: &str) -> Result<Vec<CleaningLog>> {
        let rows = self.list()?;
        Ok(rows
            .into_iter()
            .filter(|r| {
                date_prefix(&r.log_date) == date_prefix(date)
                    && r.area.eq_ignore_ascii_case(area)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_for_date_and_area() {
        let temp_dir = tempdir().unwrap();
        let conn = CsvConnection::new(temp_dir.path().to_path_buf()).unwrap();
        let repo = CleaningRepository::new(conn);

        for (date, area) in [("2024-04-01", "vessel"), ("2024-04-01", "prep"), ("2024-04-02", "vessel")] {
            repo.store(CleaningLog {
                log_date: date.to_string(),
                area: area.to_string(),
                photo_url: String::new(),
                video_url: String::new(),
                remarks: String::new(),
                created_by: "cleaner".to_string(),
            })
            .unwrap();
        }

        assert_eq!(repo.for_date_and_area("2024-04-01", "Vessel").unwrap().len(), 1);
        assert_eq!(repo.for_date_and_area("2024-04-01", "prep").unwrap().len(), 1);
        assert!(repo.for_date_and_area("2024-04-03", "vessel").unwrap().is_empty());
    }
}
