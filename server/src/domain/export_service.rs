//! Report export.
//!
//! The dashboard rendered these as client-side PDF downloads; here each
//! report is written as a CSV file under the data directory's `exports/`
//! folder and the path is handed back to the caller.

use anyhow::{bail, Context, Result};
use log::info;
use std::path::PathBuf;

use shared::{ExportReportResponse, RequisitionQuery};

use crate::domain::allocation_service::AllocationService;
use crate::domain::date_range::{date_prefix, parse_date};
use crate::domain::delivery_service::DeliveryService;
use crate::domain::purchase_service::PurchaseService;
use crate::storage::csv::CsvConnection;

#[derive(Clone)]
pub struct ExportService {
    connection: CsvConnection,
    purchase_service: PurchaseService,
    allocation_service: AllocationService,
    delivery_service: DeliveryService,
}

impl ExportService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            purchase_service: PurchaseService::new(connection.clone()),
            allocation_service: AllocationService::new(connection.clone()),
            delivery_service: DeliveryService::new(connection.clone()),
            connection,
        }
    }

    fn write_report(
        &self,
        file_name: &str,
        header: &[&str],
        rows: Vec<Vec<String>>,
    ) -> Result<ExportReportResponse> {
        if rows.is_empty() {
            bail!("No rows to export");
        }

        let path: PathBuf = self.connection.exports_directory()?.join(file_name);
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create report {}", path.display()))?;

        writer.write_record(header)?;
        let row_count = rows.len();
        for row in rows {
            writer.write_record(&row)?;
        }
        writer.flush()?;

        info!("Exported {} row(s) to {}", row_count, path.display());

        Ok(ExportReportResponse {
            file_path: path.display().to_string(),
            row_count,
        })
    }

    /// The allocation register for a date.
    pub fn export_allocation_register(&self, date: &str) -> Result<ExportReportResponse> {
        parse_date(date)?;
        let day = date_prefix(date).to_string();

        let rows: Vec<Vec<String>> = self
            .allocation_service
            .list()?
            .into_iter()
            .filter(|a| date_prefix(&a.alloc_date) == day)
            .map(|a| {
                vec![
                    a.alloc_date,
                    a.masjid_name,
                    a.recipe_type,
                    a.req_qty.to_string(),
                    a.alloc_qty.to_string(),
                    a.avbl_qty.to_string(),
                    a.created_by,
                ]
            })
            .collect();

        self.write_report(
            &format!("allocation_register_{}.csv", day),
            &["date", "location", "recipe", "required", "allocated", "balance_after", "created_by"],
            rows,
        )
    }

    /// The delivery register for a date.
    pub fn export_delivery_register(&self, date: &str) -> Result<ExportReportResponse> {
        parse_date(date)?;
        let day = date_prefix(date).to_string();

        let rows: Vec<Vec<String>> = self
            .delivery_service
            .list()?
            .into_iter()
            .filter(|d| date_prefix(&d.delivery_date) == day)
            .map(|d| {
                vec![
                    d.delivery_date,
                    d.location,
                    d.delivery_time,
                    d.delivery_qty.to_string(),
                    d.delivery_by,
                ]
            })
            .collect();

        self.write_report(
            &format!("delivery_register_{}.csv", day),
            &["date", "location", "time", "quantity", "delivered_by"],
            rows,
        )
    }

    /// The purchase sheet for a date: every line of every header.
    pub fn export_day_requirement_sheet(&self, date: &str) -> Result<ExportReportResponse> {
        parse_date(date)?;
        let day = date_prefix(date).to_string();

        let headers = self.purchase_service.list_headers()?;
        let mut rows = Vec::new();
        for header in headers.iter().filter(|h| date_prefix(&h.day_req_date) == day) {
            for line in self.purchase_service.lines_by_purchase(&header.purc_id)? {
                rows.push(vec![
                    header.day_req_date.clone(),
                    header.purc_type.clone(),
                    header.recipe_type.clone(),
                    line.item_name,
                    line.cat_name,
                    line.unit_short,
                    line.day_req_qty.to_string(),
                ]);
            }
        }

        self.write_report(
            &format!("day_requirements_{}.csv", day),
            &["date", "purchase_type", "recipe", "item", "category", "unit", "quantity"],
            rows,
        )
    }

    /// A supplier requisition: one category of one recipe's purchase on
    /// one date, addressed to the supplier.
    pub fn export_supplier_requisition(
        &self,
        query: RequisitionQuery,
        sup_name: &str,
    ) -> Result<ExportReportResponse> {
        let day = date_prefix(&query.day_req_date).to_string();
        let items = self.purchase_service.requisition_items(query)?;

        let rows: Vec<Vec<String>> = items
            .into_iter()
            .map(|item| {
                vec![
                    day.clone(),
                    sup_name.to_string(),
                    item.item_name,
                    item.unit_short,
                    item.day_req_qty.to_string(),
                ]
            })
            .collect();

        self.write_report(
            &format!("supplier_requisition_{}.csv", day),
            &["date", "supplier", "item", "unit", "quantity"],
            rows,
        )
    }
}
