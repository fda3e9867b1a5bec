//! CSV-backed repository for the master-data tables.
//!
//! One CSV file per table under the data directory: `locations.csv`,
//! `categories.csv`, `units.csv`, `items.csv`, `suppliers.csv`,
//! `recipe_types.csv`, `recipes.csv`.

use anyhow::Result;
use shared::{BulkItem, Item, ItemCategory, Location, RecipeItem, RecipeType, Supplier, Unit};

use super::connection::CsvConnection;

const LOCATIONS: &str = "locations";
const CATEGORIES: &str = "categories";
const UNITS: &str = "units";
const ITEMS: &str = "items";
const BULK_ITEMS: &str = "bulk_items";
const SUPPLIERS: &str = "suppliers";
const RECIPE_TYPES: &str = "recipe_types";
const RECIPES: &str = "recipes";

#[derive(Clone)]
pub struct MasterRepository {
    connection: CsvConnection,
}

impl MasterRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    // Locations

    pub fn list_locations(&self) -> Result<Vec<Location>> {
        self.connection.read_table(LOCATIONS)
    }

    pub fn store_location(&self, location: Location) -> Result<()> {
        self.connection.append_row(LOCATIONS, location)
    }

    /// Rewrite the location row matching `masjid_code`.
    pub fn update_location(&self, updated: &Location) -> Result<bool> {
        let mut rows = self.list_locations()?;
        let mut changed = false;
        for row in rows.iter_mut() {
            if row.masjid_code == updated.masjid_code {
                *row = updated.clone();
                changed = true;
            }
        }
        if changed {
            self.connection.write_table(LOCATIONS, &rows)?;
        }
        Ok(changed)
    }

    // Item categories

    pub fn list_categories(&self) -> Result<Vec<ItemCategory>> {
        self.connection.read_table(CATEGORIES)
    }

    pub fn store_category(&self, category: ItemCategory) -> Result<()> {
        self.connection.append_row(CATEGORIES, category)
    }

    pub fn update_category(&self, updated: &ItemCategory) -> Result<bool> {
        let mut rows = self.list_categories()?;
        let mut changed = false;
        for row in rows.iter_mut() {
            if row.cat_code == updated.cat_code {
                *row = updated.clone();
                changed = true;
            }
        }
        if changed {
            self.connection.write_table(CATEGORIES, &rows)?;
        }
        Ok(changed)
    }

    // Units

    pub fn list_units(&self) -> Result<Vec<Unit>> {
        self.connection.read_table(UNITS)
    }

    pub fn store_unit(&self, unit: Unit) -> Result<()> {
        self.connection.append_row(UNITS, unit)
    }

    /// Rewrite the unit row matching the short code.
    pub fn update_unit(&self, updated: &Unit) -> Result<bool> {
        let mut rows = self.list_units()?;
        let mut changed = false;
        for row in rows.iter_mut() {
            if row.unit_short.eq_ignore_ascii_case(&updated.unit_short) {
                *row = updated.clone();
                changed = true;
            }
        }
        if changed {
            self.connection.write_table(UNITS, &rows)?;
        }
        Ok(changed)
    }

    // Items

    pub fn list_items(&self) -> Result<Vec<Item>> {
        self.connection.read_table(ITEMS)
    }

    pub fn store_items(&self, new_items: Vec<Item>) -> Result<()> {
        let mut items: Vec<Item> = self.connection.read_table(ITEMS)?;
        items.extend(new_items);
        self.connection.write_table(ITEMS, &items)
    }

    pub fn update_item(&self, updated: &Item) -> Result<bool> {
        let mut rows = self.list_items()?;
        let mut changed = false;
        for row in rows.iter_mut() {
            if row.item_code == updated.item_code {
                *row = updated.clone();
                changed = true;
            }
        }
        if changed {
            self.connection.write_table(ITEMS, &rows)?;
        }
        Ok(changed)
    }

    // Bulk items

    pub fn list_bulk_items(&self) -> Result<Vec<BulkItem>> {
        self.connection.read_table(BULK_ITEMS)
    }

    pub fn store_bulk_item(&self, bulk_item: BulkItem) -> Result<()> {
        self.connection.append_row(BULK_ITEMS, bulk_item)
    }

    // Suppliers

    pub fn list_suppliers(&self) -> Result<Vec<Supplier>> {
        self.connection.read_table(SUPPLIERS)
    }

    pub fn store_supplier(&self, supplier: Supplier) -> Result<()> {
        self.connection.append_row(SUPPLIERS, supplier)
    }

    pub fn update_supplier(&self, updated: &Supplier) -> Result<bool> {
        let mut rows = self.list_suppliers()?;
        let mut changed = false;
        for row in rows.iter_mut() {
            if row.sup_code == updated.sup_code {
                *row = updated.clone();
                changed = true;
            }
        }
        if changed {
            self.connection.write_table(SUPPLIERS, &rows)?;
        }
        Ok(changed)
    }

    /// The supplier registered against a category, if any.
    pub fn supplier_for_category(&self, cat_code: &str) -> Result<Option<Supplier>> {
        let suppliers = self.list_suppliers()?;
        Ok(suppliers.into_iter().find(|s| s.cat_code == cat_code))
    }

    // Recipe types

    pub fn list_recipe_types(&self) -> Result<Vec<RecipeType>> {
        self.connection.read_table(RECIPE_TYPES)
    }

    pub fn store_recipe_type(&self, recipe_type: RecipeType) -> Result<()> {
        self.connection.append_row(RECIPE_TYPES, recipe_type)
    }

    pub fn get_recipe_type(&self, recipe_type: &str) -> Result<Option<RecipeType>> {
        let types = self.list_recipe_types()?;
        Ok(types
            .into_iter()
            .find(|r| r.recipe_type.trim().eq_ignore_ascii_case(recipe_type.trim())))
    }

    pub fn update_recipe_type(&self, updated: &RecipeType) -> Result<bool> {
        let mut rows = self.list_recipe_types()?;
        let mut changed = false;
        for row in rows.iter_mut() {
            if row.recipe_code == updated.recipe_code {
                *row = updated.clone();
                changed = true;
            }
        }
        if changed {
            self.connection.write_table(RECIPE_TYPES, &rows)?;
        }
        Ok(changed)
    }

    // Recipe ingredient rows

    pub fn list_recipe_items(&self) -> Result<Vec<RecipeItem>> {
        self.connection.read_table(RECIPES)
    }

    pub fn store_recipe_item(&self, recipe_item: RecipeItem) -> Result<()> {
        self.connection.append_row(RECIPES, recipe_item)
    }

    /// Rewrite the ratio of one (recipe_code, item_name) row.
    pub fn update_recipe_item_qty(
        &self,
        recipe_code: &str,
        item_name: &str,
        req_qty: f64,
    ) -> Result<bool> {
        let mut rows = self.list_recipe_items()?;
        let mut changed = false;
        for row in rows.iter_mut() {
            if row.recipe_code == recipe_code && row.item_name.eq_ignore_ascii_case(item_name) {
                row.req_qty = req_qty;
                changed = true;
            }
        }
        if changed {
            self.connection.write_table(RECIPES, &rows)?;
        }
        Ok(changed)
    }

    /// The ingredient ratio table for one recipe type.
    pub fn recipe_items_for_type(&self, recipe_type: &str) -> Result<Vec<RecipeItem>> {
        let rows = self.list_recipe_items()?;
        Ok(rows
            .into_iter()
            .filter(|r| r.recipe_type.trim().eq_ignore_ascii_case(recipe_type.trim()))
            .collect())
    }
}
