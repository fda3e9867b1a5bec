//! Food Distribution Tracker backend.
//!
//! Domain services over CSV file storage, exposed through an axum REST
//! API. See `domain` for the business rules, `storage` for persistence,
//! and `io::rest` for the HTTP surface.

pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use domain::{
    AllocationService, CleaningService, DeliveryService, ExportService, InMemorySessionStore,
    MasterService, PurchaseService, ReceiptService, RequirementService, ScheduleService,
    SessionService, UserService,
};
use storage::CsvConnection;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub master_service: MasterService,
    pub schedule_service: ScheduleService,
    pub requirement_service: RequirementService,
    pub purchase_service: PurchaseService,
    pub allocation_service: AllocationService,
    pub delivery_service: DeliveryService,
    pub receipt_service: ReceiptService,
    pub export_service: ExportService,
    pub cleaning_service: CleaningService,
    pub user_service: UserService,
}

impl AppState {
    /// Wire every service onto one data directory. The session store is
    /// constructed here, once, and injected into the user service.
    pub fn new(connection: CsvConnection) -> Self {
        let session_service = SessionService::new(Arc::new(InMemorySessionStore::new()));

        Self {
            master_service: MasterService::new(connection.clone()),
            schedule_service: ScheduleService::new(connection.clone()),
            requirement_service: RequirementService::new(connection.clone()),
            purchase_service: PurchaseService::new(connection.clone()),
            allocation_service: AllocationService::new(connection.clone()),
            delivery_service: DeliveryService::new(connection.clone()),
            receipt_service: ReceiptService::new(connection.clone()),
            export_service: ExportService::new(connection.clone()),
            cleaning_service: CleaningService::new(connection.clone()),
            user_service: UserService::new(connection, session_service),
        }
    }
}
