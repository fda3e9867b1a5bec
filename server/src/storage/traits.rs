//! Storage ports.
//!
//! The purchase and allocation services take these as trait objects so the
//! running-balance and derivation logic can be exercised against test
//! doubles without touching the filesystem. All operations are synchronous;
//! the REST layer calls them from async handlers.

use anyhow::Result;
use shared::{AllocationRecord, DayRequirementHeader, DayRequirementLine};

/// Port for day-requirement headers and lines.
pub trait PurchaseStorage: Send + Sync {
    /// Store a header row. The caller has already assigned `purc_id`.
    fn store_header(&self, header: &DayRequirementHeader) -> Result<()>;

    /// Store a single line row referencing an existing header.
    fn store_line(&self, line: &DayRequirementLine) -> Result<()>;

    fn list_headers(&self) -> Result<Vec<DayRequirementHeader>>;

    fn list_lines(&self) -> Result<Vec<DayRequirementLine>>;

    /// True when any header exists whose date matches `date` (date-prefix
    /// compare, so `2024-01-05T00:00:00` matches `2024-01-05`).
    fn header_exists_for_date(&self, date: &str) -> Result<bool>;

    /// Lines belonging to one purchase header.
    fn lines_by_purchase(&self, purc_id: &str) -> Result<Vec<DayRequirementLine>>;
}

/// Port for allocation rows and the per-date available-quantity snapshot.
pub trait AllocationStorage: Send + Sync {
    fn store_allocation(&self, record: &AllocationRecord) -> Result<()>;

    fn list_allocations(&self) -> Result<Vec<AllocationRecord>>;

    /// Allocations whose date matches `date` (date-prefix compare).
    fn allocations_for_date(&self, date: &str) -> Result<Vec<AllocationRecord>>;

    /// The stored available quantity for a date; 0 when none recorded.
    fn get_available_qty(&self, date: &str) -> Result<f64>;

    /// Record the date's available-quantity snapshot, replacing any
    /// previous value for that date.
    fn set_available_qty(&self, date: &str, qty: f64, created_by: &str) -> Result<()>;
}
