//! Domain layer: every business rule lives here, storage-agnostic and
//! exercised directly by the unit tests. The REST layer is a translation
//! shell over these services.

pub mod allocation_service;
pub mod cleaning_service;
pub mod date_range;
pub mod delivery_service;
pub mod export_service;
pub mod master_service;
pub mod multiplier;
pub mod permissions;
pub mod purchase_service;
pub mod receipt_service;
pub mod requirement_service;
pub mod schedule_service;
pub mod session;
pub mod text;
pub mod user_service;

pub use allocation_service::{AllocationLedger, AllocationService, LedgerError};
pub use cleaning_service::CleaningService;
pub use delivery_service::DeliveryService;
pub use export_service::ExportService;
pub use master_service::MasterService;
pub use purchase_service::PurchaseService;
pub use receipt_service::ReceiptService;
pub use requirement_service::RequirementService;
pub use schedule_service::ScheduleService;
pub use session::{InMemorySessionStore, SessionService, SessionStore};
pub use user_service::UserService;
