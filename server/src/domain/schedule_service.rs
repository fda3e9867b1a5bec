//! Delivery-schedule service: which recipe is cooked on which date.

use anyhow::{bail, Result};
use log::info;

use shared::{
    CreateSchedulesRequest, CreateSchedulesResponse, ScheduleRow, UpdateScheduleRequest,
};

use crate::domain::date_range::{date_prefix, parse_date};
use crate::storage::csv::{CsvConnection, MasterRepository, ScheduleRepository};

#[derive(Clone)]
pub struct ScheduleService {
    repository: ScheduleRepository,
    master_repository: MasterRepository,
}

impl ScheduleService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            repository: ScheduleRepository::new(connection.clone()),
            master_repository: MasterRepository::new(connection),
        }
    }

    pub fn list(&self) -> Result<Vec<ScheduleRow>> {
        self.repository.list()
    }

    /// Create one schedule row per requested date, all for the same recipe
    /// type. Dates already carrying this recipe are skipped and counted
    /// rather than failing the batch.
    pub fn create_many(&self, request: CreateSchedulesRequest) -> Result<CreateSchedulesResponse> {
        if request.schd_dates.is_empty() {
            bail!("At least one schedule date is required");
        }

        let recipe = self
            .master_repository
            .get_recipe_type(&request.recipe_type)?
            .ok_or_else(|| anyhow::anyhow!("Unknown recipe type \"{}\"", request.recipe_type))?;

        let existing = self.repository.list()?;
        let mut skipped = 0usize;
        let mut rows: Vec<ScheduleRow> = Vec::new();
        for date in &request.schd_dates {
            parse_date(date)?;
            let duplicate = existing.iter().any(|row| {
                date_prefix(&row.schd_date) == date_prefix(date)
                    && row.recipe_type.trim().eq_ignore_ascii_case(recipe.recipe_type.trim())
            });
            if duplicate {
                skipped += 1;
                continue;
            }

            rows.push(ScheduleRow {
                schd_date: date_prefix(date).to_string(),
                recipe_type: recipe.recipe_type.clone(),
                recipe_code: recipe.recipe_code.clone(),
                created_by: request.created_by.clone(),
            });
        }

        let created_count = rows.len();
        if created_count > 0 {
            self.repository.store_many(rows)?;
        }
        info!(
            "Created {} schedule(s) for {}, skipped {} duplicate(s)",
            created_count, recipe.recipe_type, skipped
        );

        Ok(CreateSchedulesResponse {
            created_count,
            skipped_duplicates: skipped,
        })
    }

    /// Change the recipe scheduled on a date.
    pub fn update(&self, request: UpdateScheduleRequest) -> Result<()> {
        parse_date(&request.schd_date)?;

        let recipe = self
            .master_repository
            .get_recipe_type(&request.recipe_type)?
            .ok_or_else(|| anyhow::anyhow!("Unknown recipe type \"{}\"", request.recipe_type))?;

        let changed = self.repository.update_recipe_for_date(
            &request.schd_date,
            &recipe.recipe_type,
            &recipe.recipe_code,
        )?;
        if !changed {
            bail!("No schedule found for {}", date_prefix(&request.schd_date));
        }

        info!("Updated schedule {} -> {}", date_prefix(&request.schd_date), recipe.recipe_type);
        Ok(())
    }
}
