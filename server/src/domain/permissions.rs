//! Route-level permission mapping.
//!
//! Permission grants arrive as `(module_id, sub_mod_id)` pairs; a static
//! table maps each pair to the dashboard route it unlocks. The dashboard
//! home is always allowed.

use once_cell::sync::Lazy;
use shared::PermissionEntry;
use std::collections::{HashMap, HashSet};

pub const DASHBOARD_HOME: &str = "/dashboard";

static PERMISSION_ROUTE_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Master
        ("master:location", "/dashboard/location"),
        ("master:item_category", "/dashboard/item-category"),
        ("master:unit", "/dashboard/unit"),
        ("master:item", "/dashboard/item"),
        ("master:supplier", "/dashboard/supplier"),
        ("master:recipe_type", "/dashboard/recipe-type"),
        ("master:recipe_for_a_kg", "/dashboard/recipe"),
        // Delivery plan
        ("delivery_plan:schedule", "/dashboard/schedule"),
        ("delivery_plan:requirement", "/dashboard/requirement"),
        // Preparation
        ("preparation:day_requirements", "/dashboard/day-requirements"),
        ("preparation:material_receipt", "/dashboard/material-receipt"),
        ("preparation:request_for_supplier", "/dashboard/request-supplier"),
        // Packing and cooking are standalone modules without sub-modules
        ("packing:", "/dashboard/packing"),
        ("packing:packing", "/dashboard/packing"),
        ("cooking:", "/dashboard/cooking"),
        ("cooking:cooking", "/dashboard/cooking"),
        // Cleaning
        ("cleaning:material", "/dashboard/cleaning/material"),
        ("cleaning:vessel", "/dashboard/cleaning/vessel"),
        ("cleaning:preparation_area", "/dashboard/cleaning/prep"),
        ("cleaning:packing_area", "/dashboard/cleaning/pack"),
        // Distribution
        ("distribution:food_allocation", "/dashboard/food-allocation"),
        ("distribution:delivery", "/dashboard/delivery"),
        // View media
        ("view_media:", "/dashboard/view-media"),
        ("view_media:view_media", "/dashboard/view-media"),
        // Settings
        ("settings:module_master", "/dashboard/settings/module-master"),
        ("settings:user_rights", "/dashboard/settings/user-rights"),
    ])
});

/// Build the set of allowed routes from a user's permission grants.
/// Always includes the dashboard home.
pub fn allowed_routes(permissions: &[PermissionEntry]) -> HashSet<String> {
    let mut routes = HashSet::new();
    routes.insert(DASHBOARD_HOME.to_string());

    for permission in permissions {
        let key = format!(
            "{}:{}",
            permission.module_id.trim().to_lowercase(),
            permission.sub_mod_id.trim().to_lowercase()
        );
        if let Some(route) = PERMISSION_ROUTE_MAP.get(key.as_str()) {
            routes.insert((*route).to_string());
        }
    }

    routes
}

pub fn is_route_allowed(path: &str, routes: &HashSet<String>) -> bool {
    path == DASHBOARD_HOME || routes.contains(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(module: &str, sub: &str) -> PermissionEntry {
        PermissionEntry {
            user_code: "U001".to_string(),
            module_id: module.to_string(),
            sub_mod_id: sub.to_string(),
        }
    }

    #[test]
    fn test_home_is_always_allowed() {
        let routes = allowed_routes(&[]);
        assert!(is_route_allowed("/dashboard", &routes));
        assert!(!is_route_allowed("/dashboard/item", &routes));
    }

    #[test]
    fn test_grants_map_to_routes() {
        let routes = allowed_routes(&[grant("master", "item"), grant("distribution", "delivery")]);
        assert!(is_route_allowed("/dashboard/item", &routes));
        assert!(is_route_allowed("/dashboard/delivery", &routes));
        assert!(!is_route_allowed("/dashboard/supplier", &routes));
    }

    #[test]
    fn test_grant_matching_ignores_case_and_whitespace() {
        let routes = allowed_routes(&[grant(" Master ", " ITEM ")]);
        assert!(is_route_allowed("/dashboard/item", &routes));
    }

    #[test]
    fn test_unknown_grants_are_ignored() {
        let routes = allowed_routes(&[grant("master", "no_such_page")]);
        assert_eq!(routes.len(), 1);
    }

    #[test]
    fn test_standalone_module_with_empty_sub_module() {
        let routes = allowed_routes(&[grant("packing", "")]);
        assert!(is_route_allowed("/dashboard/packing", &routes));
    }
}
