//! Food allocation: splitting a day's cooked quantity across mosques.
//!
//! The dialog session is modeled as an explicit state machine so an
//! allocation can never be validated against a date that was never loaded,
//! and a submission can never start twice. The running balance is
//! recomputed on every row edit; a submission that would drive it negative
//! is rejected before anything is written.

use anyhow::{bail, Context, Result};
use log::info;
use std::sync::Arc;
use thiserror::Error;

use shared::{
    AllocationDateData, AllocationRecord, CreateAllocationsRequest, CreateAllocationsResponse,
    MasjidRequirement, SetAvailableQtyRequest,
};

use crate::domain::date_range::{date_prefix, parse_date};
use crate::storage::csv::{AllocationRepository, CsvConnection, ScheduleRepository, RequirementRepository};
use crate::storage::traits::AllocationStorage;

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("No allocation date selected")]
    NoDateSelected,
    #[error("Allocation is already being submitted")]
    AlreadySubmitting,
    #[error("\"{0}\" has no pending requirement for this date")]
    UnknownMosque(String),
    #[error("Allocated quantity exceeds available quantity by {0}")]
    OverAllocated(f64),
    #[error("No allocation quantities entered")]
    NothingToAllocate,
}

/// One row of the ledger: a mosque's requirement and the quantity entered
/// against it so far.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub masjid_name: String,
    pub req_qty: f64,
    pub alloc_qty: f64,
}

/// Dialog-session states. Transitions only move forward:
/// `NoDate → DateSelected → Submitting → Closed`.
#[derive(Debug, Clone, PartialEq)]
enum LedgerState {
    NoDate,
    DateSelected { available_qty: f64, rows: Vec<LedgerRow> },
    Submitting,
    Closed,
}

/// In-memory allocation ledger for one dialog session.
#[derive(Debug, Clone)]
pub struct AllocationLedger {
    state: LedgerState,
}

impl AllocationLedger {
    pub fn new() -> Self {
        Self { state: LedgerState::NoDate }
    }

    /// Load a date's balance and its pending mosque requirements.
    pub fn select_date(&mut self, available_qty: f64, requirements: &[MasjidRequirement]) {
        let rows = requirements
            .iter()
            .map(|r| LedgerRow {
                masjid_name: r.masjid_name.clone(),
                req_qty: r.req_qty,
                alloc_qty: 0.0,
            })
            .collect();
        self.state = LedgerState::DateSelected { available_qty, rows };
    }

    /// Enter or change one mosque's allocation; returns the new remaining
    /// balance. The balance may go negative here, the way the dialog shows
    /// a red remaining figure while typing; submission is where it blocks.
    pub fn set_allocation(&mut self, masjid_name: &str, alloc_qty: f64) -> Result<f64, LedgerError> {
        let LedgerState::DateSelected { available_qty, rows } = &mut self.state else {
            return Err(LedgerError::NoDateSelected);
        };

        let row = rows
            .iter_mut()
            .find(|r| r.masjid_name.eq_ignore_ascii_case(masjid_name.trim()))
            .ok_or_else(|| LedgerError::UnknownMosque(masjid_name.to_string()))?;
        row.alloc_qty = alloc_qty;

        let allocated: f64 = rows.iter().map(|r| r.alloc_qty).sum();
        Ok(*available_qty - allocated)
    }

    pub fn remaining(&self) -> Result<f64, LedgerError> {
        match &self.state {
            LedgerState::DateSelected { available_qty, rows } => {
                let allocated: f64 = rows.iter().map(|r| r.alloc_qty).sum();
                Ok(available_qty - allocated)
            }
            _ => Err(LedgerError::NoDateSelected),
        }
    }

    /// Validate the session and move to `Submitting`, handing back the
    /// rows that carry a positive allocation.
    pub fn begin_submit(&mut self) -> Result<Vec<LedgerRow>, LedgerError> {
        match &self.state {
            LedgerState::NoDate | LedgerState::Closed => Err(LedgerError::NoDateSelected),
            LedgerState::Submitting => Err(LedgerError::AlreadySubmitting),
            LedgerState::DateSelected { available_qty, rows } => {
                let allocated: f64 = rows.iter().map(|r| r.alloc_qty).sum();
                let remaining = available_qty - allocated;
                if remaining < 0.0 {
                    return Err(LedgerError::OverAllocated(-remaining));
                }

                let to_submit: Vec<LedgerRow> =
                    rows.iter().filter(|r| r.alloc_qty > 0.0).cloned().collect();
                if to_submit.is_empty() {
                    return Err(LedgerError::NothingToAllocate);
                }

                self.state = LedgerState::Submitting;
                Ok(to_submit)
            }
        }
    }

    pub fn close(&mut self) {
        self.state = LedgerState::Closed;
    }
}

impl Default for AllocationLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct AllocationService {
    storage: Arc<dyn AllocationStorage>,
    schedule_repository: ScheduleRepository,
    requirement_repository: RequirementRepository,
}

impl AllocationService {
    pub fn new(connection: CsvConnection) -> Self {
        Self::with_storage(Arc::new(AllocationRepository::new(connection.clone())), connection)
    }

    pub fn with_storage(storage: Arc<dyn AllocationStorage>, connection: CsvConnection) -> Self {
        Self {
            storage,
            schedule_repository: ScheduleRepository::new(connection.clone()),
            requirement_repository: RequirementRepository::new(connection),
        }
    }

    pub fn list(&self) -> Result<Vec<AllocationRecord>> {
        self.storage.list_allocations()
    }

    /// What the allocation dialog needs for a date: the scheduled recipes,
    /// the mosques that still have no allocation, and the day's balance.
    pub fn date_data(&self, date: &str) -> Result<AllocationDateData> {
        parse_date(date)?;

        let recipes: Vec<String> = self
            .schedule_repository
            .for_date(date)?
            .into_iter()
            .map(|s| s.recipe_type)
            .collect();

        let already_allocated: Vec<String> = self
            .storage
            .allocations_for_date(date)?
            .into_iter()
            .map(|a| a.masjid_name.to_lowercase())
            .collect();

        let requirements = self
            .requirement_repository
            .for_date(date)?
            .into_iter()
            .filter(|r| !already_allocated.contains(&r.masjid_name.to_lowercase()))
            .map(|r| MasjidRequirement {
                masjid_name: r.masjid_name,
                req_qty: r.req_qty,
            })
            .collect();

        let avbl_qty = self.storage.get_available_qty(date)?;

        Ok(AllocationDateData {
            recipes,
            requirements,
            avbl_qty,
        })
    }

    /// Record the quantity cooked and available for a date.
    pub fn set_available_qty(&self, request: SetAvailableQtyRequest) -> Result<()> {
        parse_date(&request.avail_date)?;
        if request.avbl_qty < 0.0 {
            bail!("Available quantity cannot be negative");
        }
        self.storage
            .set_available_qty(&request.avail_date, request.avbl_qty, &request.created_by)
    }

    /// Allocate a date's available quantity across mosques.
    ///
    /// Rows are written sequentially; each stored row snapshots the
    /// running balance after that row, and the date's available quantity
    /// is rewritten once at the end. Validation runs entirely before the
    /// first write.
    pub fn create_allocations(
        &self,
        request: CreateAllocationsRequest,
    ) -> Result<CreateAllocationsResponse> {
        let date_data = self.date_data(&request.alloc_date)?;
        if date_data.recipes.is_empty() {
            bail!("No schedule data found for the selected date");
        }

        let mut ledger = AllocationLedger::new();
        ledger.select_date(date_data.avbl_qty, &date_data.requirements);
        for entry in &request.entries {
            ledger
                .set_allocation(&entry.masjid_name, entry.alloc_qty)
                .context("Invalid allocation entry")?;
        }
        let rows = ledger.begin_submit().context("Allocation rejected")?;

        let recipe_type = date_data.recipes[0].clone();
        let recipe_code = self
            .schedule_repository
            .for_date(&request.alloc_date)?
            .first()
            .map(|s| s.recipe_code.clone())
            .unwrap_or_default();

        let mut running_balance = date_data.avbl_qty;
        let mut created_count = 0usize;
        for row in &rows {
            running_balance -= row.alloc_qty;
            self.storage.store_allocation(&AllocationRecord {
                alloc_date: date_prefix(&request.alloc_date).to_string(),
                masjid_name: row.masjid_name.clone(),
                recipe_type: recipe_type.clone(),
                recipe_code: recipe_code.clone(),
                req_qty: row.req_qty,
                avbl_qty: running_balance,
                alloc_qty: row.alloc_qty,
                created_by: request.created_by.clone(),
            })?;
            created_count += 1;
        }

        self.storage
            .set_available_qty(&request.alloc_date, running_balance, &request.created_by)?;
        ledger.close();

        info!(
            "Allocated {} row(s) on {}, {} remaining",
            created_count,
            date_prefix(&request.alloc_date),
            running_balance
        );

        Ok(CreateAllocationsResponse {
            created_count,
            remaining_qty: running_balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::AllocationEntry;
    use tempfile::{tempdir, TempDir};

    use crate::domain::master_service::MasterService;
    use crate::domain::requirement_service::RequirementService;
    use crate::domain::schedule_service::ScheduleService;
    use shared::{
        CreateLocationRequest, CreateRecipeTypeRequest, CreateRequirementsRequest,
        CreateSchedulesRequest, RequirementEntry,
    };

    fn requirement(masjid: &str, qty: f64) -> MasjidRequirement {
        MasjidRequirement {
            masjid_name: masjid.to_string(),
            req_qty: qty,
        }
    }

    #[test]
    fn test_ledger_requires_date_before_editing() {
        let mut ledger = AllocationLedger::new();
        assert_eq!(
            ledger.set_allocation("North Masjid", 10.0),
            Err(LedgerError::NoDateSelected)
        );
        assert_eq!(ledger.begin_submit().unwrap_err(), LedgerError::NoDateSelected);
    }

    #[test]
    fn test_ledger_recomputes_remaining_on_each_edit() {
        let mut ledger = AllocationLedger::new();
        ledger.select_date(50.0, &[requirement("A", 30.0), requirement("B", 40.0)]);

        assert_eq!(ledger.set_allocation("A", 20.0).unwrap(), 30.0);
        assert_eq!(ledger.set_allocation("B", 25.0).unwrap(), 5.0);
        // Re-editing replaces, not accumulates.
        assert_eq!(ledger.set_allocation("A", 30.0).unwrap(), -5.0);
    }

    #[test]
    fn test_ledger_rejects_over_allocation_at_submit() {
        let mut ledger = AllocationLedger::new();
        ledger.select_date(50.0, &[requirement("A", 40.0), requirement("B", 40.0)]);
        ledger.set_allocation("A", 35.0).unwrap();
        ledger.set_allocation("B", 25.0).unwrap();

        assert_eq!(ledger.remaining().unwrap(), -10.0);
        assert_eq!(ledger.begin_submit().unwrap_err(), LedgerError::OverAllocated(10.0));
    }

    #[test]
    fn test_ledger_rejects_empty_submission() {
        let mut ledger = AllocationLedger::new();
        ledger.select_date(50.0, &[requirement("A", 40.0)]);
        assert_eq!(ledger.begin_submit().unwrap_err(), LedgerError::NothingToAllocate);
    }

    #[test]
    fn test_ledger_submit_is_single_shot() {
        let mut ledger = AllocationLedger::new();
        ledger.select_date(50.0, &[requirement("A", 40.0)]);
        ledger.set_allocation("A", 30.0).unwrap();

        let rows = ledger.begin_submit().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(ledger.begin_submit().unwrap_err(), LedgerError::AlreadySubmitting);

        ledger.close();
        assert_eq!(ledger.begin_submit().unwrap_err(), LedgerError::NoDateSelected);
    }

    #[test]
    fn test_ledger_rejects_unknown_mosque() {
        let mut ledger = AllocationLedger::new();
        ledger.select_date(50.0, &[requirement("A", 40.0)]);
        assert_eq!(
            ledger.set_allocation("Ghost", 5.0),
            Err(LedgerError::UnknownMosque("Ghost".to_string()))
        );
    }

    // Service-level tests against real repositories.

    struct Fixture {
        _dir: TempDir,
        allocations: AllocationService,
    }

    fn setup_with_plan() -> Fixture {
        let dir = tempdir().unwrap();
        let conn = CsvConnection::new(dir.path().to_path_buf()).unwrap();
        let master = MasterService::new(conn.clone());
        let schedules = ScheduleService::new(conn.clone());
        let requirements = RequirementService::new(conn.clone());
        let allocations = AllocationService::new(conn);

        master
            .create_recipe_type(CreateRecipeTypeRequest {
                recipe_type: "Mutton Biriyani".to_string(),
                recipe_perkg: 1.0,
                recipe_totpkt: 40.0,
                created_by: "admin".to_string(),
            })
            .unwrap();
        for masjid in ["North Masjid", "South Masjid"] {
            master
                .create_location(CreateLocationRequest {
                    masjid_name: masjid.to_string(),
                    address: String::new(),
                    city: String::new(),
                    created_by: "admin".to_string(),
                })
                .unwrap();
        }
        schedules
            .create_many(CreateSchedulesRequest {
                schd_dates: vec!["2024-03-01".to_string()],
                recipe_type: "Mutton Biriyani".to_string(),
                created_by: "admin".to_string(),
            })
            .unwrap();
        requirements
            .create_bulk(CreateRequirementsRequest {
                req_date_from: "2024-03-01".to_string(),
                req_date_to: "2024-03-01".to_string(),
                entries: vec![
                    RequirementEntry { masjid_name: "North Masjid".to_string(), req_qty: 60.0 },
                    RequirementEntry { masjid_name: "South Masjid".to_string(), req_qty: 50.0 },
                ],
                created_by: "admin".to_string(),
            })
            .unwrap();
        allocations
            .set_available_qty(SetAvailableQtyRequest {
                avail_date: "2024-03-01".to_string(),
                avbl_qty: 100.0,
                created_by: "admin".to_string(),
            })
            .unwrap();

        Fixture { _dir: dir, allocations }
    }

    #[test]
    fn test_create_allocations_snapshots_running_balance() {
        let f = setup_with_plan();

        let response = f
            .allocations
            .create_allocations(CreateAllocationsRequest {
                alloc_date: "2024-03-01".to_string(),
                entries: vec![
                    AllocationEntry { masjid_name: "North Masjid".to_string(), alloc_qty: 60.0 },
                    AllocationEntry { masjid_name: "South Masjid".to_string(), alloc_qty: 30.0 },
                ],
                created_by: "admin".to_string(),
            })
            .unwrap();

        assert_eq!(response.created_count, 2);
        assert_eq!(response.remaining_qty, 10.0);

        let records = f.allocations.list().unwrap();
        assert_eq!(records.len(), 2);
        // Each stored row carries the balance after that row.
        assert_eq!(records[0].avbl_qty, 40.0);
        assert_eq!(records[1].avbl_qty, 10.0);
        assert_eq!(records[0].recipe_type, "Mutton Biriyani");

        // The date snapshot now reflects what is left.
        let data = f.allocations.date_data("2024-03-01").unwrap();
        assert_eq!(data.avbl_qty, 10.0);
    }

    #[test]
    fn test_over_allocation_is_rejected_before_any_write() {
        let f = setup_with_plan();

        let err = f
            .allocations
            .create_allocations(CreateAllocationsRequest {
                alloc_date: "2024-03-01".to_string(),
                entries: vec![
                    AllocationEntry { masjid_name: "North Masjid".to_string(), alloc_qty: 60.0 },
                    AllocationEntry { masjid_name: "South Masjid".to_string(), alloc_qty: 50.0 },
                ],
                created_by: "admin".to_string(),
            })
            .unwrap_err();

        assert!(format!("{:#}", err).contains("exceeds available quantity"));
        assert!(f.allocations.list().unwrap().is_empty());
        assert_eq!(f.allocations.date_data("2024-03-01").unwrap().avbl_qty, 100.0);
    }

    #[test]
    fn test_allocated_mosques_drop_out_of_date_data() {
        let f = setup_with_plan();

        f.allocations
            .create_allocations(CreateAllocationsRequest {
                alloc_date: "2024-03-01".to_string(),
                entries: vec![AllocationEntry {
                    masjid_name: "North Masjid".to_string(),
                    alloc_qty: 40.0,
                }],
                created_by: "admin".to_string(),
            })
            .unwrap();

        let data = f.allocations.date_data("2024-03-01").unwrap();
        assert_eq!(data.requirements.len(), 1);
        assert_eq!(data.requirements[0].masjid_name, "South Masjid");

        // Allocating to the already-served mosque again is rejected.
        let err = f
            .allocations
            .create_allocations(CreateAllocationsRequest {
                alloc_date: "2024-03-01".to_string(),
                entries: vec![AllocationEntry {
                    masjid_name: "North Masjid".to_string(),
                    alloc_qty: 5.0,
                }],
                created_by: "admin".to_string(),
            })
            .unwrap_err();
        assert!(format!("{:#}", err).contains("no pending requirement"));
    }

    #[test]
    fn test_allocation_requires_schedule() {
        let f = setup_with_plan();
        let err = f
            .allocations
            .create_allocations(CreateAllocationsRequest {
                alloc_date: "2024-03-02".to_string(),
                entries: vec![AllocationEntry {
                    masjid_name: "North Masjid".to_string(),
                    alloc_qty: 5.0,
                }],
                created_by: "admin".to_string(),
            })
            .unwrap_err();
        assert!(err.to_string().contains("No schedule data"));
    }
}
