//! CSV repositories for allocations, the per-date available-quantity
//! snapshots, and deliveries.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use shared::{AllocationRecord, DeliveryRecord};

use super::connection::CsvConnection;
use crate::domain::date_range::date_prefix;
use crate::storage::traits::AllocationStorage;

const ALLOCATIONS: &str = "allocations";
const AVAILABLE_QTY: &str = "available_qty";
const DELIVERIES: &str = "deliveries";

/// Stored snapshot of a date's distributable quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AvailableQtyRow {
    avail_date: String,
    avbl_qty: f64,
    created_by: String,
}

#[derive(Clone)]
pub struct AllocationRepository {
    connection: CsvConnection,
}

impl AllocationRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

impl AllocationStorage for AllocationRepository {
    fn store_allocation(&self, record: &AllocationRecord) -> Result<()> {
        self.connection.append_row(ALLOCATIONS, record.clone())
    }

    fn list_allocations(&self) -> Result<Vec<AllocationRecord>> {
        self.connection.read_table(ALLOCATIONS)
    }

    fn allocations_for_date(&self, date: &str) -> Result<Vec<AllocationRecord>> {
        let rows = self.list_allocations()?;
        Ok(rows
            .into_iter()
            .filter(|r| date_prefix(&r.alloc_date) == date_prefix(date))
            .collect())
    }

    fn get_available_qty(&self, date: &str) -> Result<f64> {
        let rows: Vec<AvailableQtyRow> = self.connection.read_table(AVAILABLE_QTY)?;
        Ok(rows
            .iter()
            .find(|r| date_prefix(&r.avail_date) == date_prefix(date))
            .map(|r| r.avbl_qty)
            .unwrap_or(0.0))
    }

    fn set_available_qty(&self, date: &str, qty: f64, created_by: &str) -> Result<()> {
        let mut rows: Vec<AvailableQtyRow> = self.connection.read_table(AVAILABLE_QTY)?;
        rows.retain(|r| date_prefix(&r.avail_date) != date_prefix(date));
        rows.push(AvailableQtyRow {
            avail_date: date_prefix(date).to_string(),
            avbl_qty: qty,
            created_by: created_by.to_string(),
        });
        self.connection.write_table(AVAILABLE_QTY, &rows)
    }
}

#[derive(Clone)]
pub struct DeliveryRepository {
    connection: CsvConnection,
}

impl DeliveryRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    pub fn list(&self) -> Result<Vec<DeliveryRecord>> {
        self.connection.read_table(DELIVERIES)
    }

    pub fn store(&self, record: DeliveryRecord) -> Result<()> {
        self.connection.append_row(DELIVERIES, record)
    }

    pub fn for_date(&self, date: &str) -> Result<Vec<DeliveryRecord>> {
        let rows = self.list()?;
        Ok(rows
            .into_iter()
            .filter(|r| date_prefix(&r.delivery_date) == date_prefix(date))
            .collect())
    }
}
