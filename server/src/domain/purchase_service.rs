//! Day-requirement derivation and purchase planning.
//!
//! A day's ordered packet total is pulled from the delivery plan, converted
//! into whole cooking batches by the selected recipe's packets-per-batch
//! constant, and each ingredient ratio is scaled by that batch count into a
//! concrete purchase quantity. Retail purchases cover a single day and one
//! recipe; bulk purchases spread the staple list across a date range.

use anyhow::{bail, Result};
use log::{info, warn};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use shared::{
    CreateBulkRequirementRequest, CreateRequirementHeaderResponse, CreateRetailRequirementRequest,
    DateRequirementsResponse, DayRequirementHeader, DayRequirementLine, DerivedLine,
    ReceivableItem, RecipeDayQty, RecipeItem, RequisitionItem, RequisitionQuery,
    RetailDerivationResponse,
};

use crate::domain::date_range::{self, date_prefix, format_date, parse_date};
use crate::domain::multiplier::{derive_line_quantity, derive_multiplier};
use crate::storage::csv::{
    CsvConnection, MasterRepository, PurchaseRepository, RequirementRepository, ScheduleRepository,
};
use crate::storage::traits::PurchaseStorage;

pub const PURCHASE_TYPE_RETAIL: &str = "Retail";
pub const PURCHASE_TYPE_BULK: &str = "Bulk";

#[derive(Clone)]
pub struct PurchaseService {
    storage: Arc<dyn PurchaseStorage>,
    schedule_repository: ScheduleRepository,
    requirement_repository: RequirementRepository,
    master_repository: MasterRepository,
    /// Guards the bulk flow against double submission; the dashboard's
    /// double-click lock moved server-side.
    bulk_submit_lock: Arc<Mutex<()>>,
}

impl PurchaseService {
    pub fn new(connection: CsvConnection) -> Self {
        Self::with_storage(Arc::new(PurchaseRepository::new(connection.clone())), connection)
    }

    pub fn with_storage(storage: Arc<dyn PurchaseStorage>, connection: CsvConnection) -> Self {
        Self {
            storage,
            schedule_repository: ScheduleRepository::new(connection.clone()),
            requirement_repository: RequirementRepository::new(connection.clone()),
            master_repository: MasterRepository::new(connection),
            bulk_submit_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn list_headers(&self) -> Result<Vec<DayRequirementHeader>> {
        self.storage.list_headers()
    }

    pub fn lines_by_purchase(&self, purc_id: &str) -> Result<Vec<DayRequirementLine>> {
        self.storage.lines_by_purchase(purc_id)
    }

    /// The recipes scheduled for a date with the date's requirement total.
    ///
    /// The total is recipe-agnostic: it is the sum of every mosque's
    /// requirement for the date, and each scheduled recipe is paired with
    /// it. The multiplier is then computed per recipe against that one
    /// total, using the recipe's own conversion constant.
    pub fn requirements_by_date(&self, date: &str) -> Result<DateRequirementsResponse> {
        parse_date(date)?;

        let schedules = self.schedule_repository.for_date(date)?;
        let requirements = self.requirement_repository.for_date(date)?;
        let total_req: f64 = requirements.iter().map(|r| r.req_qty).sum();

        let recipes = schedules
            .into_iter()
            .map(|s| RecipeDayQty {
                recipe_type: s.recipe_type.trim().to_string(),
                recipe_code: s.recipe_code,
                req_qty: total_req,
            })
            .collect();

        Ok(DateRequirementsResponse { recipes, total_req })
    }

    /// The ingredient ratio table for a recipe type.
    pub fn recipe_items(&self, recipe_type: &str) -> Result<Vec<RecipeItem>> {
        self.master_repository.recipe_items_for_type(recipe_type)
    }

    /// The packets-per-batch conversion constant for a recipe type.
    pub fn recipe_totpkt(&self, recipe_type: &str) -> Result<f64> {
        let recipe = self
            .master_repository
            .get_recipe_type(recipe_type)?
            .ok_or_else(|| anyhow::anyhow!("Unknown recipe type \"{}\"", recipe_type))?;
        Ok(recipe.recipe_totpkt)
    }

    /// Derive the full purchase table for a date and recipe without
    /// writing anything; this backs the dialog preview.
    pub fn derive_retail(&self, date: &str, recipe_type: &str) -> Result<RetailDerivationResponse> {
        let date_data = self.requirements_by_date(date)?;
        let totpkt = self.recipe_totpkt(recipe_type)?;
        let multiplier = derive_multiplier(date_data.total_req, totpkt);

        let lines = self
            .recipe_items(recipe_type)?
            .into_iter()
            .map(|item| DerivedLine {
                derived_qty: derive_line_quantity(item.req_qty, multiplier),
                ratio_qty: item.req_qty,
                item_name: item.item_name,
                cat_name: item.cat_name,
                unit_short: item.unit_short,
            })
            .collect();

        Ok(RetailDerivationResponse {
            day_tot_req: date_data.total_req,
            recipe_totpkt: totpkt,
            multiplier,
            lines,
        })
    }

    /// Create a retail day-requirement: one header for the date, then one
    /// line per selected item, each threaded with the header's server-
    /// assigned purchase id.
    pub fn create_retail(
        &self,
        request: CreateRetailRequirementRequest,
    ) -> Result<CreateRequirementHeaderResponse> {
        parse_date(&request.day_req_date)?;

        if self.storage.header_exists_for_date(&request.day_req_date)? {
            bail!("Day requirements already exist for this date");
        }

        let date_data = self.requirements_by_date(&request.day_req_date)?;
        if date_data.recipes.is_empty() {
            bail!("No schedule data found for the selected date");
        }

        let recipe = date_data
            .recipes
            .iter()
            .find(|r| r.recipe_type.eq_ignore_ascii_case(request.recipe_type.trim()))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Recipe \"{}\" is not scheduled for {}",
                    request.recipe_type,
                    date_prefix(&request.day_req_date)
                )
            })?;

        if request.item_names.is_empty() {
            bail!("At least one item must be selected");
        }

        let ratio_rows = self.recipe_items(&recipe.recipe_type)?;
        let totpkt = self.recipe_totpkt(&recipe.recipe_type)?;
        let multiplier = derive_multiplier(date_data.total_req, totpkt);

        let mut lines = Vec::new();
        for item_name in &request.item_names {
            let ratio = ratio_rows
                .iter()
                .find(|r| r.item_name.eq_ignore_ascii_case(item_name.trim()))
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "\"{}\" is not part of recipe \"{}\"",
                        item_name,
                        recipe.recipe_type
                    )
                })?;
            lines.push((ratio.clone(), derive_line_quantity(ratio.req_qty, multiplier)));
        }

        let purc_id = Uuid::new_v4().to_string();
        let header = DayRequirementHeader {
            purc_id: purc_id.clone(),
            day_req_date: date_prefix(&request.day_req_date).to_string(),
            recipe_type: recipe.recipe_type.clone(),
            recipe_code: recipe.recipe_code.clone(),
            day_tot_req: date_data.total_req,
            purc_type: PURCHASE_TYPE_RETAIL.to_string(),
            created_by: request.created_by.clone(),
        };
        self.storage.store_header(&header)?;

        // Lines are written one by one after the header; a failure here
        // leaves the rows already stored in place, and the response never
        // reports success for a partial write.
        let mut line_count = 0usize;
        for (ratio, derived_qty) in lines {
            let line = DayRequirementLine {
                purc_id: purc_id.clone(),
                day_req_date: header.day_req_date.clone(),
                recipe_code: header.recipe_code.clone(),
                item_name: ratio.item_name,
                cat_name: ratio.cat_name,
                unit_short: ratio.unit_short,
                day_req_qty: derived_qty,
            };
            self.storage.store_line(&line)?;
            line_count += 1;
        }

        info!(
            "Created retail requirement {} for {} ({} line(s), multiplier {})",
            purc_id, header.day_req_date, line_count, multiplier
        );

        Ok(CreateRequirementHeaderResponse { purc_id, line_count })
    }

    /// Create bulk day-requirements: one header per day in the inclusive
    /// range, with one line per bulk staple at its base quantity. Days that
    /// already carry a bulk header are skipped and counted.
    pub fn create_bulk(
        &self,
        request: CreateBulkRequirementRequest,
    ) -> Result<CreateRequirementHeaderResponse> {
        let _guard = match self.bulk_submit_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => bail!("A bulk submission is already in progress"),
        };

        let from = parse_date(&request.from_date)?;
        let to = parse_date(&request.to_date)?;

        let bulk_items = self.master_repository.list_bulk_items()?;
        if bulk_items.is_empty() {
            bail!("No bulk items are configured");
        }

        let existing_headers = self.storage.list_headers()?;
        let mut skipped_days = 0usize;
        let mut line_count = 0usize;
        let mut last_purc_id = String::new();

        for day in date_range::days_in_range(from, to) {
            let day_str = format_date(day);
            let already_covered = existing_headers.iter().any(|h| {
                date_prefix(&h.day_req_date) == day_str && h.purc_type == PURCHASE_TYPE_BULK
            });
            if already_covered {
                skipped_days += 1;
                continue;
            }

            let purc_id = Uuid::new_v4().to_string();
            let day_total: f64 = bulk_items.iter().map(|b| b.req_qty).sum();
            self.storage.store_header(&DayRequirementHeader {
                purc_id: purc_id.clone(),
                day_req_date: day_str.clone(),
                recipe_type: PURCHASE_TYPE_BULK.to_string(),
                recipe_code: String::new(),
                day_tot_req: day_total,
                purc_type: PURCHASE_TYPE_BULK.to_string(),
                created_by: request.created_by.clone(),
            })?;

            for item in &bulk_items {
                self.storage.store_line(&DayRequirementLine {
                    purc_id: purc_id.clone(),
                    day_req_date: day_str.clone(),
                    recipe_code: item.item_code.clone(),
                    item_name: item.item_name.clone(),
                    cat_name: item.cat_name.clone(),
                    unit_short: item.unit_short.clone(),
                    day_req_qty: item.req_qty,
                })?;
                line_count += 1;
            }
            last_purc_id = purc_id;
        }

        if skipped_days > 0 {
            warn!("Skipped {} day(s) already covered by a bulk purchase", skipped_days);
        }
        info!("Created {} bulk line(s) for {} to {}", line_count, format_date(from), format_date(to));

        Ok(CreateRequirementHeaderResponse {
            purc_id: last_purc_id,
            line_count,
        })
    }

    /// Day-requirement lines awaiting receipt for a date, purchase type,
    /// and category.
    pub fn receivable_items(
        &self,
        day_req_date: &str,
        purc_type: &str,
        cat_name: &str,
    ) -> Result<Vec<ReceivableItem>> {
        let headers = self.storage.list_headers()?;
        let matching_ids: Vec<&str> = headers
            .iter()
            .filter(|h| {
                date_prefix(&h.day_req_date) == date_prefix(day_req_date)
                    && h.purc_type.eq_ignore_ascii_case(purc_type)
            })
            .map(|h| h.purc_id.as_str())
            .collect();

        let lines = self.storage.list_lines()?;
        Ok(lines
            .into_iter()
            .filter(|l| {
                matching_ids.contains(&l.purc_id.as_str())
                    && l.cat_name.eq_ignore_ascii_case(cat_name)
            })
            .map(|l| ReceivableItem {
                item_name: l.item_name,
                unit_short: l.unit_short,
                day_req_qty: l.day_req_qty,
            })
            .collect())
    }

    /// Lines for a supplier requisition: one category of one recipe's
    /// purchase on one date.
    pub fn requisition_items(&self, query: RequisitionQuery) -> Result<Vec<RequisitionItem>> {
        let categories = self.master_repository.list_categories()?;
        let category = categories
            .iter()
            .find(|c| c.cat_code == query.cat_code)
            .ok_or_else(|| anyhow::anyhow!("Unknown category code \"{}\"", query.cat_code))?;

        let lines = self.storage.list_lines()?;
        Ok(lines
            .into_iter()
            .filter(|l| {
                date_prefix(&l.day_req_date) == date_prefix(&query.day_req_date)
                    && l.recipe_code == query.recipe_code
                    && l.cat_name.eq_ignore_ascii_case(&category.cat_name)
            })
            .map(|l| RequisitionItem {
                item_name: l.item_name,
                unit_short: l.unit_short,
                day_req_qty: l.day_req_qty,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{
        CreateBulkItemRequest, CreateCategoryRequest, CreateItemsRequest, CreateLocationRequest,
        CreateRecipeItemRequest, CreateRecipeTypeRequest, CreateRequirementsRequest,
        CreateSchedulesRequest, CreateUnitRequest, ItemEntry, RequirementEntry,
    };
    use tempfile::{tempdir, TempDir};

    use crate::domain::master_service::MasterService;
    use crate::domain::requirement_service::RequirementService;
    use crate::domain::schedule_service::ScheduleService;

    struct Fixture {
        _dir: TempDir,
        purchases: PurchaseService,
        master: MasterService,
        schedules: ScheduleService,
        requirements: RequirementService,
    }

    fn setup() -> Fixture {
        let dir = tempdir().unwrap();
        let conn = CsvConnection::new(dir.path().to_path_buf()).unwrap();
        Fixture {
            purchases: PurchaseService::new(conn.clone()),
            master: MasterService::new(conn.clone()),
            schedules: ScheduleService::new(conn.clone()),
            requirements: RequirementService::new(conn),
            _dir: dir,
        }
    }

    /// Seed one recipe (40 packets per batch) with two ingredients, a
    /// mosque, a schedule and a 100-packet requirement on 2024-01-05.
    fn seed_plan(f: &Fixture) {
        f.master
            .create_category(CreateCategoryRequest {
                cat_name: "Grains".to_string(),
                created_by: "admin".to_string(),
            })
            .unwrap();
        f.master
            .create_unit(CreateUnitRequest {
                unit_name: "Kilogram".to_string(),
                unit_short: "kg".to_string(),
                created_by: "admin".to_string(),
            })
            .unwrap();
        f.master
            .create_items(CreateItemsRequest {
                items: vec![
                    ItemEntry {
                        item_name: "Rice".to_string(),
                        cat_name: "Grains".to_string(),
                        unit_short: "kg".to_string(),
                    },
                    ItemEntry {
                        item_name: "Salt".to_string(),
                        cat_name: "Grains".to_string(),
                        unit_short: "kg".to_string(),
                    },
                ],
                created_by: "admin".to_string(),
            })
            .unwrap();
        f.master
            .create_recipe_type(CreateRecipeTypeRequest {
                recipe_type: "Veg Biriyani".to_string(),
                recipe_perkg: 1.0,
                recipe_totpkt: 40.0,
                created_by: "admin".to_string(),
            })
            .unwrap();
        for (item, qty) in [("Rice", 2.5), ("Salt", 0.2)] {
            f.master
                .create_recipe_item(CreateRecipeItemRequest {
                    recipe_type: "Veg Biriyani".to_string(),
                    item_name: item.to_string(),
                    req_qty: qty,
                    created_by: "admin".to_string(),
                })
                .unwrap();
        }
        f.master
            .create_location(CreateLocationRequest {
                masjid_name: "North Masjid".to_string(),
                address: String::new(),
                city: String::new(),
                created_by: "admin".to_string(),
            })
            .unwrap();
        f.schedules
            .create_many(CreateSchedulesRequest {
                schd_dates: vec!["2024-01-05".to_string()],
                recipe_type: "Veg Biriyani".to_string(),
                created_by: "admin".to_string(),
            })
            .unwrap();
        f.requirements
            .create_bulk(CreateRequirementsRequest {
                req_date_from: "2024-01-05".to_string(),
                req_date_to: "2024-01-05".to_string(),
                entries: vec![RequirementEntry {
                    masjid_name: "North Masjid".to_string(),
                    req_qty: 100.0,
                }],
                created_by: "admin".to_string(),
            })
            .unwrap();
    }

    #[test]
    fn test_requirements_by_date_sums_mosque_rows() {
        let f = setup();
        seed_plan(&f);

        let data = f.purchases.requirements_by_date("2024-01-05").unwrap();
        assert_eq!(data.total_req, 100.0);
        assert_eq!(data.recipes.len(), 1);
        assert_eq!(data.recipes[0].recipe_type, "Veg Biriyani");

        let empty = f.purchases.requirements_by_date("2024-01-06").unwrap();
        assert!(empty.recipes.is_empty());
        assert_eq!(empty.total_req, 0.0);
    }

    #[test]
    fn test_derive_retail_scales_ratios_by_whole_batches() {
        let f = setup();
        seed_plan(&f);

        // 100 packets at 40 per batch -> 3 batches.
        let derivation = f.purchases.derive_retail("2024-01-05", "Veg Biriyani").unwrap();
        assert_eq!(derivation.multiplier, 3);
        assert_eq!(derivation.day_tot_req, 100.0);

        let rice = derivation.lines.iter().find(|l| l.item_name == "Rice").unwrap();
        assert_eq!(rice.derived_qty, 7.5);
        let salt = derivation.lines.iter().find(|l| l.item_name == "Salt").unwrap();
        assert!((salt.derived_qty - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_create_retail_threads_purc_id_into_lines() {
        let f = setup();
        seed_plan(&f);

        let response = f
            .purchases
            .create_retail(CreateRetailRequirementRequest {
                day_req_date: "2024-01-05".to_string(),
                recipe_type: "Veg Biriyani".to_string(),
                item_names: vec!["Rice".to_string(), "Salt".to_string()],
                created_by: "admin".to_string(),
            })
            .unwrap();

        assert_eq!(response.line_count, 2);
        let lines = f.purchases.lines_by_purchase(&response.purc_id).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.purc_id == response.purc_id));

        let headers = f.purchases.list_headers().unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].purc_type, "Retail");
        assert_eq!(headers[0].day_tot_req, 100.0);
    }

    #[test]
    fn test_create_retail_rejects_used_date() {
        let f = setup();
        seed_plan(&f);

        let request = CreateRetailRequirementRequest {
            day_req_date: "2024-01-05".to_string(),
            recipe_type: "Veg Biriyani".to_string(),
            item_names: vec!["Rice".to_string()],
            created_by: "admin".to_string(),
        };
        f.purchases.create_retail(request.clone()).unwrap();

        let err = f.purchases.create_retail(request).unwrap_err();
        assert!(err.to_string().contains("already exist"));
    }

    #[test]
    fn test_create_retail_requires_schedule_data() {
        let f = setup();
        seed_plan(&f);

        let err = f
            .purchases
            .create_retail(CreateRetailRequirementRequest {
                day_req_date: "2024-01-06".to_string(),
                recipe_type: "Veg Biriyani".to_string(),
                item_names: vec!["Rice".to_string()],
                created_by: "admin".to_string(),
            })
            .unwrap_err();
        assert!(err.to_string().contains("No schedule data"));
    }

    #[test]
    fn test_create_retail_only_writes_selected_items() {
        let f = setup();
        seed_plan(&f);

        let response = f
            .purchases
            .create_retail(CreateRetailRequirementRequest {
                day_req_date: "2024-01-05".to_string(),
                recipe_type: "Veg Biriyani".to_string(),
                item_names: vec!["Rice".to_string()],
                created_by: "admin".to_string(),
            })
            .unwrap();

        let lines = f.purchases.lines_by_purchase(&response.purc_id).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].item_name, "Rice");
    }

    #[test]
    fn test_create_bulk_expands_range_and_skips_covered_days() {
        let f = setup();
        seed_plan(&f);
        f.master
            .create_bulk_item(CreateBulkItemRequest {
                item_name: "Salt".to_string(),
                req_qty: 1.5,
                created_by: "admin".to_string(),
            })
            .unwrap();

        let response = f
            .purchases
            .create_bulk(CreateBulkRequirementRequest {
                from_date: "2024-02-01".to_string(),
                to_date: "2024-02-03".to_string(),
                created_by: "admin".to_string(),
            })
            .unwrap();
        assert_eq!(response.line_count, 3);

        // Overlapping resubmission only covers the new day.
        let response = f
            .purchases
            .create_bulk(CreateBulkRequirementRequest {
                from_date: "2024-02-03".to_string(),
                to_date: "2024-02-04".to_string(),
                created_by: "admin".to_string(),
            })
            .unwrap();
        assert_eq!(response.line_count, 1);

        let bulk_headers: Vec<_> = f
            .purchases
            .list_headers()
            .unwrap()
            .into_iter()
            .filter(|h| h.purc_type == "Bulk")
            .collect();
        assert_eq!(bulk_headers.len(), 4);
    }

    #[test]
    fn test_receivable_items_joins_lines_through_headers() {
        let f = setup();
        seed_plan(&f);
        f.purchases
            .create_retail(CreateRetailRequirementRequest {
                day_req_date: "2024-01-05".to_string(),
                recipe_type: "Veg Biriyani".to_string(),
                item_names: vec!["Rice".to_string(), "Salt".to_string()],
                created_by: "admin".to_string(),
            })
            .unwrap();

        let items = f.purchases.receivable_items("2024-01-05", "Retail", "Grains").unwrap();
        assert_eq!(items.len(), 2);
        assert!(f.purchases.receivable_items("2024-01-05", "Bulk", "Grains").unwrap().is_empty());
    }

    #[test]
    fn test_requisition_items_filters_by_category_and_recipe() {
        let f = setup();
        seed_plan(&f);
        f.purchases
            .create_retail(CreateRetailRequirementRequest {
                day_req_date: "2024-01-05".to_string(),
                recipe_type: "Veg Biriyani".to_string(),
                item_names: vec!["Rice".to_string()],
                created_by: "admin".to_string(),
            })
            .unwrap();

        let items = f
            .purchases
            .requisition_items(RequisitionQuery {
                cat_code: "C001".to_string(),
                day_req_date: "2024-01-05".to_string(),
                recipe_code: "R001".to_string(),
            })
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_name, "Rice");
        assert_eq!(items[0].day_req_qty, 7.5);

        assert!(f
            .purchases
            .requisition_items(RequisitionQuery {
                cat_code: "C999".to_string(),
                day_req_date: "2024-01-05".to_string(),
                recipe_code: "R001".to_string(),
            })
            .is_err());
    }
}
