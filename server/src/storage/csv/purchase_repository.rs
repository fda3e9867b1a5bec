//! CSV repository for day-requirement headers and lines.

use anyhow::Result;
use shared::{DayRequirementHeader, DayRequirementLine};

use super::connection::CsvConnection;
use crate::domain::date_range::date_prefix;
use crate::storage::traits::PurchaseStorage;

const HEADERS: &str = "day_requirement_headers";
const LINES: &str = "day_requirement_lines";

#[derive(Clone)]
pub struct PurchaseRepository {
    connection: CsvConnection,
}

impl PurchaseRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

impl PurchaseStorage for PurchaseRepository {
    fn store_header(&self, header: &DayRequirementHeader) -> Result<()> {
        self.connection.append_row(HEADERS, header.clone())
    }

    fn store_line(&self, line: &DayRequirementLine) -> Result<()> {
        self.connection.append_row(LINES, line.clone())
    }

    fn list_headers(&self) -> Result<Vec<DayRequirementHeader>> {
        self.connection.read_table(HEADERS)
    }

    fn list_lines(&self) -> Result<Vec<DayRequirementLine>> {
        self.connection.read_table(LINES)
    }

    fn header_exists_for_date(&self, date: &str) -> Result<bool> {
        let headers = self.list_headers()?;
        Ok(headers
            .iter()
            .any(|h| date_prefix(&h.day_req_date) == date_prefix(date)))
    }

    fn lines_by_purchase(&self, purc_id: &str) -> Result<Vec<DayRequirementLine>> {
        let lines = self.list_lines()?;
        Ok(lines.into_iter().filter(|l| l.purc_id == purc_id).collect())
    }
}
