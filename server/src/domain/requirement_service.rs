//! Delivery-requirement service: how much each mosque needs on each date.
//!
//! Bulk creation expands a from/to range across the submitted mosque
//! entries. Pairs that already exist are skipped and counted rather than
//! failing the batch, so re-submitting an overlapping range only fills the
//! gaps.

use anyhow::{bail, Result};
use log::info;

use shared::{
    CreateRequirementsRequest, CreateRequirementsResponse, DeleteRequirementRequest,
    RequirementEntry, RequirementRow, UpdateRequirementRequest,
};

use crate::domain::date_range::{self, date_prefix, format_date, parse_date};
use crate::storage::csv::{CsvConnection, MasterRepository, RequirementRepository};

#[derive(Clone)]
pub struct RequirementService {
    repository: RequirementRepository,
    master_repository: MasterRepository,
}

impl RequirementService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            repository: RequirementRepository::new(connection.clone()),
            master_repository: MasterRepository::new(connection),
        }
    }

    pub fn list(&self) -> Result<Vec<RequirementRow>> {
        self.repository.list()
    }

    pub fn create_bulk(&self, request: CreateRequirementsRequest) -> Result<CreateRequirementsResponse> {
        let from = parse_date(&request.req_date_from)?;
        let to = parse_date(&request.req_date_to)?;

        let entries: Vec<RequirementEntry> = request
            .entries
            .into_iter()
            .filter(|e| !e.masjid_name.trim().is_empty() && e.req_qty > 0.0)
            .collect();
        if entries.is_empty() {
            bail!("At least one complete mosque entry is required");
        }

        let locations = self.master_repository.list_locations()?;
        let mut resolved = Vec::new();
        for entry in &entries {
            let location = locations
                .iter()
                .find(|l| l.masjid_name.eq_ignore_ascii_case(entry.masjid_name.trim()))
                .ok_or_else(|| anyhow::anyhow!("Unknown mosque \"{}\"", entry.masjid_name))?;
            resolved.push((location.clone(), entry.req_qty));
        }

        let existing = self.repository.list()?;
        let expanded = date_range::expand(from, to, &resolved);

        let mut skipped = 0usize;
        let mut rows = Vec::new();
        for (day, (location, req_qty)) in expanded {
            let day_str = format_date(day);
            let already_exists = existing.iter().any(|rec| {
                date_prefix(&rec.req_date) == day_str
                    && rec.masjid_name.eq_ignore_ascii_case(&location.masjid_name)
            });
            if already_exists {
                skipped += 1;
                continue;
            }

            rows.push(RequirementRow {
                req_date: day_str,
                masjid_name: location.masjid_name.clone(),
                masjid_code: location.masjid_code.clone(),
                req_qty,
                created_by: request.created_by.clone(),
            });
        }

        let created_count = rows.len();
        if created_count > 0 {
            self.repository.store_many(rows)?;
        }
        info!("Created {} requirement(s), skipped {} duplicate(s)", created_count, skipped);

        Ok(CreateRequirementsResponse {
            created_count,
            skipped_duplicates: skipped,
        })
    }

    pub fn update(&self, request: UpdateRequirementRequest) -> Result<()> {
        if request.req_qty <= 0.0 {
            bail!("Required quantity must be positive");
        }
        let changed = self.repository.update(&request.req_date, &request.masjid_code, request.req_qty)?;
        if !changed {
            bail!(
                "No requirement found for {} / {}",
                date_prefix(&request.req_date),
                request.masjid_code
            );
        }
        Ok(())
    }

    pub fn delete(&self, request: DeleteRequirementRequest) -> Result<()> {
        let removed = self.repository.delete(&request.req_date, &request.masjid_code)?;
        if !removed {
            bail!(
                "No requirement found for {} / {}",
                date_prefix(&request.req_date),
                request.masjid_code
            );
        }
        info!("Deleted requirement {} / {}", date_prefix(&request.req_date), request.masjid_code);
        Ok(())
    }
}
