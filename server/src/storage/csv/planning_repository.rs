//! CSV repositories for the delivery-planning tables: schedules and
//! per-mosque requirements.

use anyhow::Result;
use shared::{RequirementRow, ScheduleRow};

use super::connection::CsvConnection;
use crate::domain::date_range::date_prefix;

const SCHEDULES: &str = "schedules";
const REQUIREMENTS: &str = "requirements";

#[derive(Clone)]
pub struct ScheduleRepository {
    connection: CsvConnection,
}

impl ScheduleRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    pub fn list(&self) -> Result<Vec<ScheduleRow>> {
        self.connection.read_table(SCHEDULES)
    }

    pub fn store(&self, row: ScheduleRow) -> Result<()> {
        self.connection.append_row(SCHEDULES, row)
    }

    pub fn store_many(&self, new_rows: Vec<ScheduleRow>) -> Result<()> {
        let mut rows: Vec<ScheduleRow> = self.connection.read_table(SCHEDULES)?;
        rows.extend(new_rows);
        self.connection.write_table(SCHEDULES, &rows)
    }

    /// Schedules whose date matches `date` by date-prefix compare.
    pub fn for_date(&self, date: &str) -> Result<Vec<ScheduleRow>> {
        let rows = self.list()?;
        Ok(rows
            .into_iter()
            .filter(|r| date_prefix(&r.schd_date) == date_prefix(date))
            .collect())
    }

    /// Rewrite the recipe type of every schedule row on a date.
    pub fn update_recipe_for_date(&self, date: &str, recipe_type: &str, recipe_code: &str) -> Result<bool> {
        let mut rows = self.list()?;
        let mut changed = false;
        for row in rows.iter_mut() {
            if date_prefix(&row.schd_date) == date_prefix(date) {
                row.recipe_type = recipe_type.to_string();
                row.recipe_code = recipe_code.to_string();
                changed = true;
            }
        }
        if changed {
            self.connection.write_table(SCHEDULES, &rows)?;
        }
        Ok(changed)
    }
}

#[derive(Clone)]
pub struct RequirementRepository {
    connection: CsvConnection,
}

impl RequirementRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    pub fn list(&self) -> Result<Vec<RequirementRow>> {
        self.connection.read_table(REQUIREMENTS)
    }

    pub fn store_many(&self, new_rows: Vec<RequirementRow>) -> Result<()> {
        let mut rows: Vec<RequirementRow> = self.connection.read_table(REQUIREMENTS)?;
        rows.extend(new_rows);
        self.connection.write_table(REQUIREMENTS, &rows)
    }

    pub fn for_date(&self, date: &str) -> Result<Vec<RequirementRow>> {
        let rows = self.list()?;
        Ok(rows
            .into_iter()
            .filter(|r| date_prefix(&r.req_date) == date_prefix(date))
            .collect())
    }

    pub fn update(&self, date: &str, masjid_code: &str, req_qty: f64) -> Result<bool> {
        let mut rows = self.list()?;
        let mut changed = false;
        for row in rows.iter_mut() {
            if date_prefix(&row.req_date) == date_prefix(date) && row.masjid_code == masjid_code {
                row.req_qty = req_qty;
                changed = true;
            }
        }
        if changed {
            self.connection.write_table(REQUIREMENTS, &rows)?;
        }
        Ok(changed)
    }

    /// Delete by (date, masjid_code). Returns true when a row was removed.
    pub fn delete(&self, date: &str, masjid_code: &str) -> Result<bool> {
        let rows = self.list()?;
        let before = rows.len();
        let remaining: Vec<RequirementRow> = rows
            .into_iter()
            .filter(|r| !(date_prefix(&r.req_date) == date_prefix(date) && r.masjid_code == masjid_code))
            .collect();
        let removed = remaining.len() < before;
        if removed {
            self.connection.write_table(REQUIREMENTS, &remaining)?;
        }
        Ok(removed)
    }
}
