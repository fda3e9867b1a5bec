use std::net::SocketAddr;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

use fooddist_server::io::rest::{
    cleaning_apis, distribution_apis, export_apis, master_apis, planning_apis, purchase_apis,
    receipt_apis, user_apis,
};
use fooddist_server::storage::CsvConnection;
use fooddist_server::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Setting up storage");
    let connection = CsvConnection::new_default()?;
    let state = AppState::new(connection);

    // CORS setup to allow the dashboard frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        // Master data
        .route(
            "/locations",
            get(master_apis::list_locations)
                .post(master_apis::create_location)
                .put(master_apis::update_location),
        )
        .route(
            "/categories",
            get(master_apis::list_categories)
                .post(master_apis::create_category)
                .put(master_apis::update_category),
        )
        .route(
            "/units",
            get(master_apis::list_units)
                .post(master_apis::create_unit)
                .put(master_apis::update_unit),
        )
        .route(
            "/items",
            get(master_apis::list_items)
                .post(master_apis::create_items)
                .put(master_apis::update_item),
        )
        .route("/bulk-items", get(master_apis::list_bulk_items).post(master_apis::create_bulk_item))
        .route(
            "/suppliers",
            get(master_apis::list_suppliers)
                .post(master_apis::create_supplier)
                .put(master_apis::update_supplier),
        )
        .route("/suppliers/by-category/:cat_code", get(receipt_apis::get_supplier_by_category))
        .route(
            "/recipe-types",
            get(master_apis::list_recipe_types)
                .post(master_apis::create_recipe_type)
                .put(master_apis::update_recipe_type),
        )
        .route(
            "/recipes",
            get(master_apis::list_recipe_items)
                .post(master_apis::create_recipe_item)
                .put(master_apis::update_recipe_item),
        )
        // Delivery planning
        .route(
            "/schedules",
            get(planning_apis::list_schedules)
                .post(planning_apis::create_schedules)
                .put(planning_apis::update_schedule),
        )
        .route(
            "/requirements",
            get(planning_apis::list_requirements)
                .post(planning_apis::create_requirements)
                .put(planning_apis::update_requirement)
                .delete(planning_apis::delete_requirement),
        )
        // Day requirements
        .route("/day-requirements", get(purchase_apis::list_headers))
        .route("/day-requirements/by-date/:date", get(purchase_apis::get_by_date))
        .route("/day-requirements/recipe-items/:recipe_type", get(purchase_apis::get_recipe_items))
        .route(
            "/day-requirements/recipe-totpkt/:recipe_type",
            get(purchase_apis::get_recipe_totpkt),
        )
        .route("/day-requirements/derive", get(purchase_apis::derive_retail))
        .route("/day-requirements/retail", post(purchase_apis::create_retail))
        .route("/day-requirements/bulk", post(purchase_apis::create_bulk))
        // Distribution
        .route(
            "/allocations",
            get(distribution_apis::list_allocations).post(distribution_apis::create_allocations),
        )
        .route("/allocations/date-data/:date", get(distribution_apis::get_allocation_date_data))
        .route("/available-qty", post(distribution_apis::set_available_qty))
        .route(
            "/deliveries",
            get(distribution_apis::list_deliveries).post(distribution_apis::create_delivery),
        )
        .route("/deliveries/candidates/:date", get(distribution_apis::get_delivery_candidates))
        // Material receipts and requisitions
        .route(
            "/material-receipts",
            get(receipt_apis::list_receipts).post(receipt_apis::create_receipts),
        )
        .route("/material-receipts/receivable", get(receipt_apis::get_receivable_items))
        .route("/requisition-items", get(receipt_apis::get_requisition_items))
        // Report exports
        .route("/exports/allocation/:date", post(export_apis::export_allocation_register))
        .route("/exports/delivery/:date", post(export_apis::export_delivery_register))
        .route(
            "/exports/day-requirements/:date",
            post(export_apis::export_day_requirement_sheet),
        )
        .route("/exports/supplier-requisition", post(export_apis::export_supplier_requisition))
        // Cleaning and media
        .route(
            "/cleaning-logs",
            get(cleaning_apis::list_cleaning_logs).post(cleaning_apis::create_cleaning_log),
        )
        .route("/media", get(cleaning_apis::get_media))
        // Users and permissions
        .route("/users/register", post(user_apis::register_user))
        .route("/users/login", post(user_apis::login))
        .route("/users/logout", post(user_apis::logout))
        .route("/modules", get(user_apis::list_modules).post(user_apis::create_module))
        .route("/permissions", post(user_apis::grant_permission))
        .route("/permissions/:user_code", get(user_apis::get_user_permissions));

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state);

    let port = std::env::var("FOODDIST_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
