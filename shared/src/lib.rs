use serde::{Deserialize, Serialize};

/// Response envelope returned by every API endpoint.
///
/// Clients treat `"success"` and `"ok"` as equivalent; the server always
/// emits `"success"` or `"error"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success" || self.status == "ok"
    }
}

// ===== Master data =====

/// A delivery location (mosque).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub masjid_code: String,
    pub masjid_name: String,
    pub address: String,
    pub city: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLocationRequest {
    pub masjid_name: String,
    pub address: String,
    pub city: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateLocationRequest {
    pub masjid_code: String,
    pub masjid_name: String,
    pub address: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCategory {
    pub cat_code: String,
    pub cat_name: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub cat_name: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    pub cat_code: String,
    pub cat_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub unit_name: String,
    pub unit_short: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUnitRequest {
    pub unit_name: String,
    pub unit_short: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateUnitRequest {
    pub unit_short: String,
    pub unit_name: String,
}

/// A purchasable ingredient item, tied to a category and a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_code: String,
    pub item_name: String,
    pub cat_name: String,
    pub unit_short: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub item_name: String,
    pub cat_name: String,
    pub unit_short: String,
}

/// Batch create: the item form submits several rows at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateItemsRequest {
    pub items: Vec<ItemEntry>,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    pub item_code: String,
    pub item_name: String,
    pub cat_name: String,
    pub unit_short: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub sup_code: String,
    pub sup_name: String,
    pub sup_add: String,
    pub sup_city: String,
    pub sup_mobile: String,
    pub cat_code: String,
    pub cat_name: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSupplierRequest {
    pub sup_name: String,
    pub sup_add: String,
    pub sup_city: String,
    pub sup_mobile: String,
    pub cat_code: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSupplierRequest {
    pub sup_code: String,
    pub sup_name: String,
    pub sup_add: String,
    pub sup_city: String,
    pub sup_mobile: String,
    pub cat_code: String,
}

/// A named dish with its conversion constants.
///
/// `recipe_totpkt` is the number of packets one kg-equivalent batch yields;
/// it converts a day's ordered packet total into whole batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeType {
    pub recipe_code: String,
    pub recipe_type: String,
    pub recipe_perkg: f64,
    pub recipe_totpkt: f64,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecipeTypeRequest {
    pub recipe_type: String,
    pub recipe_perkg: f64,
    pub recipe_totpkt: f64,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRecipeTypeRequest {
    pub recipe_code: String,
    pub recipe_type: String,
    pub recipe_perkg: f64,
    pub recipe_totpkt: f64,
}

/// One ingredient row of a recipe's ratio table: `req_qty` of the item per
/// one batch of the recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeItem {
    pub recipe_code: String,
    pub recipe_type: String,
    pub item_name: String,
    pub cat_name: String,
    pub unit_short: String,
    pub req_qty: f64,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecipeItemRequest {
    pub recipe_type: String,
    pub item_name: String,
    pub req_qty: f64,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRecipeItemRequest {
    pub recipe_code: String,
    pub item_name: String,
    pub req_qty: f64,
}

/// A staple bought for every day of a bulk purchase range, with its
/// per-day base quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkItem {
    pub item_code: String,
    pub item_name: String,
    pub cat_name: String,
    pub unit_short: String,
    pub req_qty: f64,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBulkItemRequest {
    pub item_name: String,
    pub req_qty: f64,
    pub created_by: String,
}

// ===== Delivery planning =====

/// One scheduled cooking day: a recipe type planned for a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Calendar date, `YYYY-MM-DD`
    pub schd_date: String,
    pub recipe_type: String,
    pub recipe_code: String,
    pub created_by: String,
}

/// Create schedules for one recipe type on several dates at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSchedulesRequest {
    pub schd_dates: Vec<String>,
    pub recipe_type: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSchedulesResponse {
    pub created_count: usize,
    pub skipped_duplicates: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateScheduleRequest {
    pub schd_date: String,
    pub recipe_type: String,
}

/// A mosque's required quantity for a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementRow {
    pub req_date: String,
    pub masjid_name: String,
    pub masjid_code: String,
    pub req_qty: f64,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementEntry {
    pub masjid_name: String,
    pub req_qty: f64,
}

/// Bulk create: every day in the inclusive from/to range crossed with every
/// mosque entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequirementsRequest {
    pub req_date_from: String,
    pub req_date_to: String,
    pub entries: Vec<RequirementEntry>,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequirementsResponse {
    pub created_count: usize,
    pub skipped_duplicates: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequirementRequest {
    pub req_date: String,
    pub masjid_code: String,
    pub req_qty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRequirementRequest {
    pub req_date: String,
    pub masjid_code: String,
}

// ===== Day requirements (purchase planning) =====

/// Header row grouping one day's derived purchase quantities.
///
/// `purc_id` is assigned by the server on creation and threaded into every
/// line row belonging to this header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRequirementHeader {
    pub purc_id: String,
    pub day_req_date: String,
    pub recipe_type: String,
    pub recipe_code: String,
    pub day_tot_req: f64,
    pub purc_type: String,
    pub created_by: String,
}

/// Derived purchase quantity for a single ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRequirementLine {
    pub purc_id: String,
    pub day_req_date: String,
    pub recipe_code: String,
    pub item_name: String,
    pub cat_name: String,
    pub unit_short: String,
    pub day_req_qty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRetailRequirementRequest {
    pub day_req_date: String,
    pub recipe_type: String,
    /// Items the user left checked in the derivation table.
    pub item_names: Vec<String>,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBulkRequirementRequest {
    pub from_date: String,
    pub to_date: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequirementHeaderResponse {
    pub purc_id: String,
    pub line_count: usize,
}

/// A recipe scheduled on a date with its summed requirement quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDayQty {
    pub recipe_type: String,
    pub recipe_code: String,
    pub req_qty: f64,
}

/// Everything the retail dialog needs for a selected date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRequirementsResponse {
    pub recipes: Vec<RecipeDayQty>,
    /// Sum of `req_qty` across all recipes for the date.
    pub total_req: f64,
}

/// Preview of a retail derivation before anything is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedLine {
    pub item_name: String,
    pub cat_name: String,
    pub unit_short: String,
    pub ratio_qty: f64,
    pub derived_qty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetailDerivationResponse {
    pub day_tot_req: f64,
    pub recipe_totpkt: f64,
    pub multiplier: i64,
    pub lines: Vec<DerivedLine>,
}

// ===== Allocation =====

/// One stored allocation. `avbl_qty` is the running balance *after* this
/// row was applied, not a live value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub alloc_date: String,
    pub masjid_name: String,
    pub recipe_type: String,
    pub recipe_code: String,
    pub req_qty: f64,
    pub avbl_qty: f64,
    pub alloc_qty: f64,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub masjid_name: String,
    pub alloc_qty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAllocationsRequest {
    pub alloc_date: String,
    pub entries: Vec<AllocationEntry>,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAllocationsResponse {
    pub created_count: usize,
    pub remaining_qty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasjidRequirement {
    pub masjid_name: String,
    pub req_qty: f64,
}

/// Data the allocation dialog loads when a date is picked: the scheduled
/// recipes, the mosques still awaiting allocation, and the day's balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationDateData {
    pub recipes: Vec<String>,
    pub requirements: Vec<MasjidRequirement>,
    pub avbl_qty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetAvailableQtyRequest {
    pub avail_date: String,
    pub avbl_qty: f64,
    pub created_by: String,
}

// ===== Delivery =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub location: String,
    pub delivery_date: String,
    pub delivery_time: String,
    pub delivery_qty: f64,
    pub delivery_by: String,
}

/// A mosque still awaiting delivery on a date, with its planned and
/// allocated quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryCandidate {
    pub masjid_name: String,
    pub req_qty: f64,
    pub alloc_qty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDeliveryRequest {
    pub location: String,
    pub delivery_date: String,
    pub delivery_time: String,
    pub delivery_qty: f64,
    pub delivery_by: String,
}

// ===== Material receipts =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialReceipt {
    pub mat_rec_date: String,
    pub day_req_date: String,
    pub sup_name: String,
    pub cat_name: String,
    pub item_name: String,
    pub unit_short: String,
    pub mat_rec_qty: f64,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRow {
    pub item_name: String,
    pub unit_short: String,
    pub mat_rec_qty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReceiptsRequest {
    pub mat_rec_date: String,
    pub day_req_date: String,
    pub purc_type: String,
    pub cat_name: String,
    pub sup_name: String,
    pub rows: Vec<ReceiptRow>,
    pub created_by: String,
}

/// A day-requirement line waiting to be received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivableItem {
    pub item_name: String,
    pub unit_short: String,
    pub day_req_qty: f64,
}

// ===== Supplier requisition =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequisitionQuery {
    pub cat_code: String,
    pub day_req_date: String,
    pub recipe_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequisitionItem {
    pub item_name: String,
    pub unit_short: String,
    pub day_req_qty: f64,
}

// ===== Cleaning logs and media =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningLog {
    pub log_date: String,
    /// One of: material, vessel, prep, packing, cooking
    pub area: String,
    pub photo_url: String,
    pub video_url: String,
    pub remarks: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCleaningLogRequest {
    pub log_date: String,
    pub area: String,
    pub photo_url: String,
    pub video_url: String,
    pub remarks: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaQueryResponse {
    pub items: Vec<CleaningLog>,
    pub photo_count: usize,
    pub video_count: usize,
}

// ===== Users, sessions, permissions =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub user_name: String,
    pub user_pwd: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub user_name: String,
    pub user_pwd: String,
}

/// Session returned on login; the token authenticates later calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub token: String,
    pub user_code: String,
    pub user_name: String,
    pub role: String,
    pub allowed_routes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub module_id: String,
    pub mod_name: String,
    pub sub_mod_name: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateModuleRequest {
    pub mod_name: String,
    pub sub_mod_name: String,
    pub created_by: String,
}

/// A single permission grant mapping a user to a module/sub-module pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionEntry {
    pub user_code: String,
    pub module_id: String,
    pub sub_mod_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantPermissionRequest {
    pub user_code: String,
    pub module_id: String,
    pub sub_mod_id: String,
    pub created_by: String,
}

// ===== Report export =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportReportResponse {
    pub file_path: String,
    pub row_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let resp = ApiResponse::success(42);
        assert_eq!(resp.status, "success");
        assert_eq!(resp.data, Some(42));
        assert!(resp.message.is_none());
        assert!(resp.is_success());
    }

    #[test]
    fn test_api_response_error() {
        let resp: ApiResponse<()> = ApiResponse::error("Unable to connect to server");
        assert_eq!(resp.status, "error");
        assert!(resp.data.is_none());
        assert_eq!(resp.message.as_deref(), Some("Unable to connect to server"));
        assert!(!resp.is_success());
    }

    #[test]
    fn test_api_response_ok_is_success() {
        // Some legacy endpoints answer "ok"; clients treat it as success.
        let resp: ApiResponse<()> = ApiResponse {
            status: "ok".to_string(),
            data: None,
            message: None,
        };
        assert!(resp.is_success());
    }

    #[test]
    fn test_envelope_serialization_skips_empty_fields() {
        let resp = ApiResponse::success(vec!["a".to_string()]);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("message"));

        let err: ApiResponse<()> = ApiResponse::error("bad");
        let json = serde_json::to_string(&err).unwrap();
        assert!(!json.contains("data"));
    }
}
