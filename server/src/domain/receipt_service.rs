//! Material receipts: goods arriving against a day's purchase request.

use anyhow::{bail, Result};
use log::info;

use shared::{CreateReceiptsRequest, MaterialReceipt, ReceivableItem, Supplier};

use crate::domain::date_range::{date_prefix, parse_date};
use crate::domain::purchase_service::PurchaseService;
use crate::domain::text::standardize_unit;
use crate::storage::csv::{CsvConnection, MasterRepository, ReceiptRepository};

#[derive(Clone)]
pub struct ReceiptService {
    repository: ReceiptRepository,
    master_repository: MasterRepository,
    purchase_service: PurchaseService,
}

impl ReceiptService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            repository: ReceiptRepository::new(connection.clone()),
            master_repository: MasterRepository::new(connection.clone()),
            purchase_service: PurchaseService::new(connection),
        }
    }

    pub fn list(&self) -> Result<Vec<MaterialReceipt>> {
        self.repository.list()
    }

    /// The supplier registered for a category, looked up when the
    /// storekeeper picks a category in the receipt form.
    pub fn supplier_for_category(&self, cat_code: &str) -> Result<Option<Supplier>> {
        self.master_repository.supplier_for_category(cat_code)
    }

    /// Day-requirement lines receivable for a purchase date, purchase type
    /// and category.
    pub fn receivable_items(
        &self,
        day_req_date: &str,
        purc_type: &str,
        cat_name: &str,
    ) -> Result<Vec<ReceivableItem>> {
        parse_date(day_req_date)?;
        self.purchase_service
            .receivable_items(day_req_date, purc_type, cat_name)
    }

    /// Store one receipt row per submitted item. Only rows with a positive
    /// received quantity count; an all-empty submission is rejected before
    /// anything is written.
    pub fn create_receipts(&self, request: CreateReceiptsRequest) -> Result<usize> {
        parse_date(&request.mat_rec_date)?;
        parse_date(&request.day_req_date)?;
        if request.cat_name.trim().is_empty() {
            bail!("Category is required");
        }

        let valid_rows: Vec<_> = request
            .rows
            .into_iter()
            .filter(|r| r.mat_rec_qty > 0.0 && !r.item_name.trim().is_empty())
            .collect();
        if valid_rows.is_empty() {
            bail!("At least one item with a received quantity is required");
        }

        let receivable = self.purchase_service.receivable_items(
            &request.day_req_date,
            &request.purc_type,
            &request.cat_name,
        )?;
        for row in &valid_rows {
            if !receivable
                .iter()
                .any(|r| r.item_name.eq_ignore_ascii_case(row.item_name.trim()))
            {
                bail!(
                    "\"{}\" is not on the {} purchase request for {}",
                    row.item_name,
                    request.purc_type,
                    date_prefix(&request.day_req_date)
                );
            }
        }

        let receipts: Vec<MaterialReceipt> = valid_rows
            .into_iter()
            .map(|row| MaterialReceipt {
                mat_rec_date: date_prefix(&request.mat_rec_date).to_string(),
                day_req_date: date_prefix(&request.day_req_date).to_string(),
                sup_name: request.sup_name.clone(),
                cat_name: request.cat_name.clone(),
                item_name: row.item_name.trim().to_string(),
                unit_short: standardize_unit(&row.unit_short),
                mat_rec_qty: row.mat_rec_qty,
                created_by: request.created_by.clone(),
            })
            .collect();

        let count = receipts.len();
        self.repository.store_many(receipts)?;
        info!("Stored {} material receipt(s) for {}", count, date_prefix(&request.day_req_date));

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{
        CreateCategoryRequest, CreateItemsRequest, CreateLocationRequest,
        CreateRecipeItemRequest, CreateRecipeTypeRequest, CreateRequirementsRequest,
        CreateRetailRequirementRequest, CreateSchedulesRequest, CreateSupplierRequest,
        CreateUnitRequest, ItemEntry, ReceiptRow, RequirementEntry,
    };
    use tempfile::{tempdir, TempDir};

    use crate::domain::master_service::MasterService;
    use crate::domain::requirement_service::RequirementService;
    use crate::domain::schedule_service::ScheduleService;

    struct Fixture {
        _dir: TempDir,
        receipts: ReceiptService,
    }

    fn setup_with_purchase() -> Fixture {
        let dir = tempdir().unwrap();
        let conn = CsvConnection::new(dir.path().to_path_buf()).unwrap();
        let master = MasterService::new(conn.clone());
        let schedules = ScheduleService::new(conn.clone());
        let requirements = RequirementService::new(conn.clone());
        let purchases = PurchaseService::new(conn.clone());
        let receipts = ReceiptService::new(conn);

        master
            .create_category(CreateCategoryRequest {
                cat_name: "Grains".to_string(),
                created_by: "admin".to_string(),
            })
            .unwrap();
        master
            .create_unit(CreateUnitRequest {
                unit_name: "Kilogram".to_string(),
                unit_short: "kg".to_string(),
                created_by: "admin".to_string(),
            })
            .unwrap();
        master
            .create_items(CreateItemsRequest {
                items: vec![ItemEntry {
                    item_name: "Rice".to_string(),
                    cat_name: "Grains".to_string(),
                    unit_short: "kg".to_string(),
                }],
                created_by: "admin".to_string(),
            })
            .unwrap();
        master
            .create_supplier(CreateSupplierRequest {
                sup_name: "Fresh Farms".to_string(),
                sup_add: String::new(),
                sup_city: String::new(),
                sup_mobile: String::new(),
                cat_code: "C001".to_string(),
                created_by: "admin".to_string(),
            })
            .unwrap();
        master
            .create_recipe_type(CreateRecipeTypeRequest {
                recipe_type: "Pongal".to_string(),
                recipe_perkg: 1.0,
                recipe_totpkt: 50.0,
                created_by: "admin".to_string(),
            })
            .unwrap();
        master
            .create_recipe_item(CreateRecipeItemRequest {
                recipe_type: "Pongal".to_string(),
                item_name: "Rice".to_string(),
                req_qty: 2.0,
                created_by: "admin".to_string(),
            })
            .unwrap();
        master
            .create_location(CreateLocationRequest {
                masjid_name: "North Masjid".to_string(),
                address: String::new(),
                city: String::new(),
                created_by: "admin".to_string(),
            })
            .unwrap();
        schedules
            .create_many(CreateSchedulesRequest {
                schd_dates: vec!["2024-02-01".to_string()],
                recipe_type: "Pongal".to_string(),
                created_by: "admin".to_string(),
            })
            .unwrap();
        requirements
            .create_bulk(CreateRequirementsRequest {
                req_date_from: "2024-02-01".to_string(),
                req_date_to: "2024-02-01".to_string(),
                entries: vec![RequirementEntry {
                    masjid_name: "North Masjid".to_string(),
                    req_qty: 75.0,
                }],
                created_by: "admin".to_string(),
            })
            .unwrap();
        purchases
            .create_retail(CreateRetailRequirementRequest {
                day_req_date: "2024-02-01".to_string(),
                recipe_type: "Pongal".to_string(),
                item_names: vec!["Rice".to_string()],
                created_by: "admin".to_string(),
            })
            .unwrap();

        Fixture { _dir: dir, receipts }
    }

    #[test]
    fn test_supplier_lookup_and_receivable_items() {
        let f = setup_with_purchase();

        let supplier = f.receipts.supplier_for_category("C001").unwrap().unwrap();
        assert_eq!(supplier.sup_name, "Fresh Farms");

        let items = f.receipts.receivable_items("2024-02-01", "Retail", "Grains").unwrap();
        assert_eq!(items.len(), 1);
        // 75 packets at 50 per batch -> 2 batches of 2.0 kg rice.
        assert_eq!(items[0].day_req_qty, 4.0);
    }

    #[test]
    fn test_create_receipts_keeps_only_positive_rows() {
        let f = setup_with_purchase();

        let count = f
            .receipts
            .create_receipts(CreateReceiptsRequest {
                mat_rec_date: "2024-02-02".to_string(),
                day_req_date: "2024-02-01".to_string(),
                purc_type: "Retail".to_string(),
                cat_name: "Grains".to_string(),
                sup_name: "Fresh Farms".to_string(),
                rows: vec![
                    ReceiptRow {
                        item_name: "Rice".to_string(),
                        unit_short: "KG".to_string(),
                        mat_rec_qty: 4.0,
                    },
                    ReceiptRow {
                        item_name: "Rice".to_string(),
                        unit_short: "kg".to_string(),
                        mat_rec_qty: 0.0,
                    },
                ],
                created_by: "storekeeper".to_string(),
            })
            .unwrap();

        assert_eq!(count, 1);
        let stored = f.receipts.list().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].unit_short, "Kg");
    }

    #[test]
    fn test_create_receipts_rejects_unrequested_item() {
        let f = setup_with_purchase();

        let err = f
            .receipts
            .create_receipts(CreateReceiptsRequest {
                mat_rec_date: "2024-02-02".to_string(),
                day_req_date: "2024-02-01".to_string(),
                purc_type: "Retail".to_string(),
                cat_name: "Grains".to_string(),
                sup_name: "Fresh Farms".to_string(),
                rows: vec![ReceiptRow {
                    item_name: "Ghee".to_string(),
                    unit_short: "kg".to_string(),
                    mat_rec_qty: 2.0,
                }],
                created_by: "storekeeper".to_string(),
            })
            .unwrap_err();
        assert!(err.to_string().contains("not on the Retail purchase request"));
    }

    #[test]
    fn test_create_receipts_rejects_empty_submission() {
        let f = setup_with_purchase();

        let err = f
            .receipts
            .create_receipts(CreateReceiptsRequest {
                mat_rec_date: "2024-02-02".to_string(),
                day_req_date: "2024-02-01".to_string(),
                purc_type: "Retail".to_string(),
                cat_name: "Grains".to_string(),
                sup_name: "Fresh Farms".to_string(),
                rows: vec![],
                created_by: "storekeeper".to_string(),
            })
            .unwrap_err();
        assert!(err.to_string().contains("At least one item"));
    }
}
