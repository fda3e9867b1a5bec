//! Master-data services: locations, item categories, units, items,
//! suppliers, recipe types, and recipe ingredient rows.
//!
//! The dashboard performed these checks client-side before posting; here
//! they are enforced at the service boundary: trimmed proper-cased names,
//! case-insensitive duplicate rejection, and referential checks against
//! the parent tables.

use anyhow::{bail, Result};
use log::info;

use shared::{
    BulkItem, CreateBulkItemRequest, CreateCategoryRequest, CreateItemsRequest,
    CreateLocationRequest, CreateRecipeItemRequest, CreateRecipeTypeRequest,
    CreateSupplierRequest, CreateUnitRequest, Item, ItemCategory, Location, RecipeItem,
    RecipeType, Supplier, Unit, UpdateCategoryRequest, UpdateItemRequest, UpdateLocationRequest,
    UpdateRecipeItemRequest, UpdateRecipeTypeRequest, UpdateSupplierRequest, UpdateUnitRequest,
};

use crate::domain::text::{proper_case, standardize_unit};
use crate::storage::csv::{CsvConnection, MasterRepository};

#[derive(Clone)]
pub struct MasterService {
    repository: MasterRepository,
}

impl MasterService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            repository: MasterRepository::new(connection),
        }
    }

    fn next_code(prefix: &str, count: usize) -> String {
        format!("{}{:03}", prefix, count + 1)
    }

    // ===== Locations =====

    pub fn list_locations(&self) -> Result<Vec<Location>> {
        self.repository.list_locations()
    }

    pub fn create_location(&self, request: CreateLocationRequest) -> Result<Location> {
        let name = proper_case(&request.masjid_name);
        if name.is_empty() {
            bail!("Location name is required");
        }

        let existing = self.repository.list_locations()?;
        if existing.iter().any(|l| l.masjid_name.eq_ignore_ascii_case(&name)) {
            bail!("Location \"{}\" already exists", name);
        }

        let location = Location {
            masjid_code: Self::next_code("L", existing.len()),
            masjid_name: name,
            address: request.address.trim().to_string(),
            city: proper_case(&request.city),
            created_by: request.created_by,
        };

        self.repository.store_location(location.clone())?;
        info!("Created location {} ({})", location.masjid_name, location.masjid_code);

        Ok(location)
    }

    pub fn update_location(&self, request: UpdateLocationRequest) -> Result<Location> {
        let name = proper_case(&request.masjid_name);
        if name.is_empty() {
            bail!("Location name is required");
        }

        let existing = self.repository.list_locations()?;
        let current = existing
            .iter()
            .find(|l| l.masjid_code == request.masjid_code)
            .ok_or_else(|| anyhow::anyhow!("Unknown location code \"{}\"", request.masjid_code))?;
        if existing.iter().any(|l| {
            l.masjid_code != request.masjid_code && l.masjid_name.eq_ignore_ascii_case(&name)
        }) {
            bail!("Location \"{}\" already exists", name);
        }

        let location = Location {
            masjid_code: request.masjid_code,
            masjid_name: name,
            address: request.address.trim().to_string(),
            city: proper_case(&request.city),
            created_by: current.created_by.clone(),
        };
        self.repository.update_location(&location)?;
        info!("Updated location {}", location.masjid_code);

        Ok(location)
    }

    // ===== Item categories =====

    pub fn list_categories(&self) -> Result<Vec<ItemCategory>> {
        self.repository.list_categories()
    }

    pub fn create_category(&self, request: CreateCategoryRequest) -> Result<ItemCategory> {
        let name = proper_case(&request.cat_name);
        if name.is_empty() {
            bail!("Category name is required");
        }

        let existing = self.repository.list_categories()?;
        if existing.iter().any(|c| c.cat_name.eq_ignore_ascii_case(&name)) {
            bail!("Category \"{}\" already exists", name);
        }

        let category = ItemCategory {
            cat_code: Self::next_code("C", existing.len()),
            cat_name: name,
            created_by: request.created_by,
        };

        self.repository.store_category(category.clone())?;
        info!("Created category {} ({})", category.cat_name, category.cat_code);

        Ok(category)
    }

    pub fn update_category(&self, request: UpdateCategoryRequest) -> Result<ItemCategory> {
        let name = proper_case(&request.cat_name);
        if name.is_empty() {
            bail!("Category name is required");
        }

        let existing = self.repository.list_categories()?;
        let current = existing
            .iter()
            .find(|c| c.cat_code == request.cat_code)
            .ok_or_else(|| anyhow::anyhow!("Unknown category code \"{}\"", request.cat_code))?;
        if existing
            .iter()
            .any(|c| c.cat_code != request.cat_code && c.cat_name.eq_ignore_ascii_case(&name))
        {
            bail!("Category \"{}\" already exists", name);
        }

        let category = ItemCategory {
            cat_code: request.cat_code,
            cat_name: name,
            created_by: current.created_by.clone(),
        };
        self.repository.update_category(&category)?;
        info!("Updated category {}", category.cat_code);

        Ok(category)
    }

    // ===== Units =====

    pub fn list_units(&self) -> Result<Vec<Unit>> {
        self.repository.list_units()
    }

    pub fn create_unit(&self, request: CreateUnitRequest) -> Result<Unit> {
        let short = standardize_unit(&request.unit_short);
        if short.is_empty() || request.unit_name.trim().is_empty() {
            bail!("Unit name and short code are required");
        }

        let existing = self.repository.list_units()?;
        if existing.iter().any(|u| u.unit_short.eq_ignore_ascii_case(&short)) {
            bail!("Unit \"{}\" already exists", short);
        }

        let unit = Unit {
            unit_name: proper_case(&request.unit_name),
            unit_short: short,
            created_by: request.created_by,
        };

        self.repository.store_unit(unit.clone())?;
        info!("Created unit {}", unit.unit_short);

        Ok(unit)
    }

    pub fn update_unit(&self, request: UpdateUnitRequest) -> Result<Unit> {
        let short = standardize_unit(&request.unit_short);
        if request.unit_name.trim().is_empty() {
            bail!("Unit name is required");
        }

        let existing = self.repository.list_units()?;
        let current = existing
            .iter()
            .find(|u| u.unit_short.eq_ignore_ascii_case(&short))
            .ok_or_else(|| anyhow::anyhow!("Unknown unit \"{}\"", request.unit_short))?;

        let unit = Unit {
            unit_name: proper_case(&request.unit_name),
            unit_short: current.unit_short.clone(),
            created_by: current.created_by.clone(),
        };
        self.repository.update_unit(&unit)?;
        info!("Updated unit {}", unit.unit_short);

        Ok(unit)
    }

    // ===== Items =====

    pub fn list_items(&self) -> Result<Vec<Item>> {
        self.repository.list_items()
    }

    /// Batch create. The whole batch is validated before any row is
    /// written: duplicates against stored items and within the batch are
    /// both rejected, and every referenced category and unit must exist.
    pub fn create_items(&self, request: CreateItemsRequest) -> Result<Vec<Item>> {
        let entries: Vec<_> = request
            .items
            .into_iter()
            .filter(|e| !e.item_name.trim().is_empty() && !e.cat_name.is_empty() && !e.unit_short.is_empty())
            .collect();
        if entries.is_empty() {
            bail!("At least one complete item row is required");
        }

        let existing = self.repository.list_items()?;
        let categories = self.repository.list_categories()?;
        let units = self.repository.list_units()?;

        let mut duplicates = Vec::new();
        let mut seen_in_batch: Vec<String> = Vec::new();
        for entry in &entries {
            let name = entry.item_name.trim().to_lowercase();
            if existing.iter().any(|i| i.item_name.to_lowercase() == name)
                || seen_in_batch.contains(&name)
            {
                duplicates.push(proper_case(&entry.item_name));
            }
            seen_in_batch.push(name);
        }
        if !duplicates.is_empty() {
            bail!("Item(s) already exist: {}", duplicates.join(", "));
        }

        for entry in &entries {
            if !categories.iter().any(|c| c.cat_name.eq_ignore_ascii_case(&entry.cat_name)) {
                bail!("Unknown category \"{}\"", entry.cat_name);
            }
            if !units.iter().any(|u| u.unit_short.eq_ignore_ascii_case(&entry.unit_short)) {
                bail!("Unknown unit \"{}\"", entry.unit_short);
            }
        }

        let mut created = Vec::new();
        for (offset, entry) in entries.into_iter().enumerate() {
            created.push(Item {
                item_code: Self::next_code("I", existing.len() + offset),
                item_name: proper_case(&entry.item_name),
                cat_name: entry.cat_name,
                unit_short: standardize_unit(&entry.unit_short),
                created_by: request.created_by.clone(),
            });
        }

        self.repository.store_items(created.clone())?;
        info!("Created {} item(s)", created.len());

        Ok(created)
    }

    pub fn update_item(&self, request: UpdateItemRequest) -> Result<Item> {
        let name = proper_case(&request.item_name);
        if name.is_empty() {
            bail!("Item name is required");
        }

        let existing = self.repository.list_items()?;
        let current = existing
            .iter()
            .find(|i| i.item_code == request.item_code)
            .ok_or_else(|| anyhow::anyhow!("Unknown item code \"{}\"", request.item_code))?;
        if existing
            .iter()
            .any(|i| i.item_code != request.item_code && i.item_name.eq_ignore_ascii_case(&name))
        {
            bail!("Item \"{}\" already exists", name);
        }

        let categories = self.repository.list_categories()?;
        if !categories.iter().any(|c| c.cat_name.eq_ignore_ascii_case(&request.cat_name)) {
            bail!("Unknown category \"{}\"", request.cat_name);
        }
        let units = self.repository.list_units()?;
        if !units.iter().any(|u| u.unit_short.eq_ignore_ascii_case(&request.unit_short)) {
            bail!("Unknown unit \"{}\"", request.unit_short);
        }

        let item = Item {
            item_code: request.item_code,
            item_name: name,
            cat_name: request.cat_name,
            unit_short: standardize_unit(&request.unit_short),
            created_by: current.created_by.clone(),
        };
        self.repository.update_item(&item)?;
        info!("Updated item {}", item.item_code);

        Ok(item)
    }

    // ===== Bulk items =====

    pub fn list_bulk_items(&self) -> Result<Vec<BulkItem>> {
        self.repository.list_bulk_items()
    }

    /// Flag an existing item as a bulk staple with a per-day base quantity.
    pub fn create_bulk_item(&self, request: CreateBulkItemRequest) -> Result<BulkItem> {
        if request.req_qty <= 0.0 {
            bail!("Base quantity must be positive");
        }

        let items = self.repository.list_items()?;
        let item = items
            .iter()
            .find(|i| i.item_name.eq_ignore_ascii_case(request.item_name.trim()))
            .ok_or_else(|| anyhow::anyhow!("Unknown item \"{}\"", request.item_name))?;

        let existing = self.repository.list_bulk_items()?;
        if existing.iter().any(|b| b.item_name.eq_ignore_ascii_case(&item.item_name)) {
            bail!("\"{}\" is already a bulk item", item.item_name);
        }

        let bulk_item = BulkItem {
            item_code: item.item_code.clone(),
            item_name: item.item_name.clone(),
            cat_name: item.cat_name.clone(),
            unit_short: item.unit_short.clone(),
            req_qty: request.req_qty,
            created_by: request.created_by,
        };

        self.repository.store_bulk_item(bulk_item.clone())?;
        info!("Flagged {} as bulk item x{}", bulk_item.item_name, bulk_item.req_qty);

        Ok(bulk_item)
    }

    // ===== Suppliers =====

    pub fn list_suppliers(&self) -> Result<Vec<Supplier>> {
        self.repository.list_suppliers()
    }

    pub fn create_supplier(&self, request: CreateSupplierRequest) -> Result<Supplier> {
        let name = proper_case(&request.sup_name);
        if name.is_empty() {
            bail!("Supplier name is required");
        }

        let existing = self.repository.list_suppliers()?;
        if existing.iter().any(|s| s.sup_name.eq_ignore_ascii_case(&name)) {
            bail!("Supplier \"{}\" already exists", name);
        }

        let categories = self.repository.list_categories()?;
        let category = categories
            .iter()
            .find(|c| c.cat_code == request.cat_code)
            .ok_or_else(|| anyhow::anyhow!("Unknown category code \"{}\"", request.cat_code))?;

        let supplier = Supplier {
            sup_code: Self::next_code("S", existing.len()),
            sup_name: name,
            sup_add: request.sup_add.trim().to_string(),
            sup_city: proper_case(&request.sup_city),
            sup_mobile: request.sup_mobile.trim().to_string(),
            cat_code: category.cat_code.clone(),
            cat_name: category.cat_name.clone(),
            created_by: request.created_by,
        };

        self.repository.store_supplier(supplier.clone())?;
        info!("Created supplier {} ({})", supplier.sup_name, supplier.sup_code);

        Ok(supplier)
    }

    pub fn update_supplier(&self, request: UpdateSupplierRequest) -> Result<Supplier> {
        let name = proper_case(&request.sup_name);
        if name.is_empty() {
            bail!("Supplier name is required");
        }

        let existing = self.repository.list_suppliers()?;
        let current = existing
            .iter()
            .find(|s| s.sup_code == request.sup_code)
            .ok_or_else(|| anyhow::anyhow!("Unknown supplier code \"{}\"", request.sup_code))?;
        if existing
            .iter()
            .any(|s| s.sup_code != request.sup_code && s.sup_name.eq_ignore_ascii_case(&name))
        {
            bail!("Supplier \"{}\" already exists", name);
        }

        let categories = self.repository.list_categories()?;
        let category = categories
            .iter()
            .find(|c| c.cat_code == request.cat_code)
            .ok_or_else(|| anyhow::anyhow!("Unknown category code \"{}\"", request.cat_code))?;

        let supplier = Supplier {
            sup_code: request.sup_code,
            sup_name: name,
            sup_add: request.sup_add.trim().to_string(),
            sup_city: proper_case(&request.sup_city),
            sup_mobile: request.sup_mobile.trim().to_string(),
            cat_code: category.cat_code.clone(),
            cat_name: category.cat_name.clone(),
            created_by: current.created_by.clone(),
        };
        self.repository.update_supplier(&supplier)?;
        info!("Updated supplier {}", supplier.sup_code);

        Ok(supplier)
    }

    // ===== Recipe types =====

    pub fn list_recipe_types(&self) -> Result<Vec<RecipeType>> {
        self.repository.list_recipe_types()
    }

    pub fn create_recipe_type(&self, request: CreateRecipeTypeRequest) -> Result<RecipeType> {
        let name = proper_case(&request.recipe_type);
        if name.is_empty() {
            bail!("Recipe type is required");
        }
        if request.recipe_perkg < 0.0 || request.recipe_totpkt < 0.0 {
            bail!("Conversion constants cannot be negative");
        }

        let existing = self.repository.list_recipe_types()?;
        if existing.iter().any(|r| r.recipe_type.eq_ignore_ascii_case(&name)) {
            bail!("Recipe type \"{}\" already exists", name);
        }

        let recipe_type = RecipeType {
            recipe_code: Self::next_code("R", existing.len()),
            recipe_type: name,
            recipe_perkg: request.recipe_perkg,
            recipe_totpkt: request.recipe_totpkt,
            created_by: request.created_by,
        };

        self.repository.store_recipe_type(recipe_type.clone())?;
        info!("Created recipe type {} ({})", recipe_type.recipe_type, recipe_type.recipe_code);

        Ok(recipe_type)
    }

    pub fn update_recipe_type(&self, request: UpdateRecipeTypeRequest) -> Result<RecipeType> {
        let name = proper_case(&request.recipe_type);
        if name.is_empty() {
            bail!("Recipe type is required");
        }
        if request.recipe_perkg < 0.0 || request.recipe_totpkt < 0.0 {
            bail!("Conversion constants cannot be negative");
        }

        let existing = self.repository.list_recipe_types()?;
        let current = existing
            .iter()
            .find(|r| r.recipe_code == request.recipe_code)
            .ok_or_else(|| anyhow::anyhow!("Unknown recipe code \"{}\"", request.recipe_code))?;
        if existing.iter().any(|r| {
            r.recipe_code != request.recipe_code && r.recipe_type.eq_ignore_ascii_case(&name)
        }) {
            bail!("Recipe type \"{}\" already exists", name);
        }

        let recipe_type = RecipeType {
            recipe_code: request.recipe_code,
            recipe_type: name,
            recipe_perkg: request.recipe_perkg,
            recipe_totpkt: request.recipe_totpkt,
            created_by: current.created_by.clone(),
        };
        self.repository.update_recipe_type(&recipe_type)?;
        info!("Updated recipe type {}", recipe_type.recipe_code);

        Ok(recipe_type)
    }

    // ===== Recipe ingredient rows =====

    pub fn list_recipe_items(&self) -> Result<Vec<RecipeItem>> {
        self.repository.list_recipe_items()
    }

    pub fn create_recipe_item(&self, request: CreateRecipeItemRequest) -> Result<RecipeItem> {
        if request.req_qty <= 0.0 {
            bail!("Required quantity must be positive");
        }

        let recipe_type = self
            .repository
            .get_recipe_type(&request.recipe_type)?
            .ok_or_else(|| anyhow::anyhow!("Unknown recipe type \"{}\"", request.recipe_type))?;

        let items = self.repository.list_items()?;
        let item = items
            .iter()
            .find(|i| i.item_name.eq_ignore_ascii_case(request.item_name.trim()))
            .ok_or_else(|| anyhow::anyhow!("Unknown item \"{}\"", request.item_name))?;

        let existing = self.repository.recipe_items_for_type(&recipe_type.recipe_type)?;
        if existing.iter().any(|r| r.item_name.eq_ignore_ascii_case(&item.item_name)) {
            bail!(
                "\"{}\" is already part of recipe \"{}\"",
                item.item_name,
                recipe_type.recipe_type
            );
        }

        let recipe_item = RecipeItem {
            recipe_code: recipe_type.recipe_code.clone(),
            recipe_type: recipe_type.recipe_type.clone(),
            item_name: item.item_name.clone(),
            cat_name: item.cat_name.clone(),
            unit_short: item.unit_short.clone(),
            req_qty: request.req_qty,
            created_by: request.created_by,
        };

        self.repository.store_recipe_item(recipe_item.clone())?;
        info!(
            "Added {} x{} to recipe {}",
            recipe_item.item_name, recipe_item.req_qty, recipe_item.recipe_type
        );

        Ok(recipe_item)
    }

    /// Change the ratio of one ingredient row.
    pub fn update_recipe_item(&self, request: UpdateRecipeItemRequest) -> Result<()> {
        if request.req_qty <= 0.0 {
            bail!("Required quantity must be positive");
        }

        let changed = self.repository.update_recipe_item_qty(
            &request.recipe_code,
            &request.item_name,
            request.req_qty,
        )?;
        if !changed {
            bail!(
                "No recipe row found for {} / {}",
                request.recipe_code,
                request.item_name
            );
        }

        info!("Updated recipe row {} / {}", request.recipe_code, request.item_name);
        Ok(())
    }
}
