//! CSV-based storage.
//!
//! One CSV file per table under the data directory, written atomically.
//! Repositories stay storage-only; every rule about what may be written
//! lives in the domain services.

pub mod connection;
pub mod master_repository;
pub mod planning_repository;
pub mod purchase_repository;
pub mod distribution_repository;
pub mod receipt_repository;
pub mod cleaning_repository;
pub mod user_repository;

pub use connection::CsvConnection;
pub use master_repository::MasterRepository;
pub use planning_repository::{RequirementRepository, ScheduleRepository};
pub use purchase_repository::PurchaseRepository;
pub use distribution_repository::{AllocationRepository, DeliveryRepository};
pub use receipt_repository::ReceiptRepository;
pub use cleaning_repository::CleaningRepository;
pub use user_repository::{UserRepository, UserRow};
