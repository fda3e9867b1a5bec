//! Delivery recording: which mosque received how much, and when.

use anyhow::{bail, Result};
use log::info;
use std::sync::Arc;

use shared::{CreateDeliveryRequest, DeliveryCandidate, DeliveryRecord};

use crate::domain::date_range::{date_prefix, parse_date};
use crate::storage::csv::{
    AllocationRepository, CsvConnection, DeliveryRepository, RequirementRepository,
};
use crate::storage::traits::AllocationStorage;

#[derive(Clone)]
pub struct DeliveryService {
    repository: DeliveryRepository,
    requirement_repository: RequirementRepository,
    allocation_storage: Arc<dyn AllocationStorage>,
}

impl DeliveryService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            repository: DeliveryRepository::new(connection.clone()),
            requirement_repository: RequirementRepository::new(connection.clone()),
            allocation_storage: Arc::new(AllocationRepository::new(connection)),
        }
    }

    pub fn list(&self) -> Result<Vec<DeliveryRecord>> {
        self.repository.list()
    }

    /// Mosques still awaiting delivery on a date, joined with their
    /// planned and allocated quantities. A mosque that already has a
    /// delivery recorded for the date drops out of the list.
    pub fn candidates(&self, date: &str) -> Result<Vec<DeliveryCandidate>> {
        parse_date(date)?;

        let delivered: Vec<String> = self
            .repository
            .for_date(date)?
            .into_iter()
            .map(|d| d.location.to_lowercase())
            .collect();

        let allocations = self.allocation_storage.allocations_for_date(date)?;

        Ok(self
            .requirement_repository
            .for_date(date)?
            .into_iter()
            .filter(|r| !delivered.contains(&r.masjid_name.to_lowercase()))
            .map(|r| {
                let alloc_qty = allocations
                    .iter()
                    .find(|a| a.masjid_name.eq_ignore_ascii_case(&r.masjid_name))
                    .map(|a| a.alloc_qty)
                    .unwrap_or(0.0);
                DeliveryCandidate {
                    masjid_name: r.masjid_name,
                    req_qty: r.req_qty,
                    alloc_qty,
                }
            })
            .collect())
    }

    pub fn record(&self, request: CreateDeliveryRequest) -> Result<DeliveryRecord> {
        parse_date(&request.delivery_date)?;
        if request.location.trim().is_empty() || request.delivery_by.trim().is_empty() {
            bail!("Location and delivered-by are required");
        }
        if request.delivery_qty <= 0.0 {
            bail!("Delivery quantity must be positive");
        }

        let candidates = self.candidates(&request.delivery_date)?;
        if !candidates
            .iter()
            .any(|c| c.masjid_name.eq_ignore_ascii_case(request.location.trim()))
        {
            bail!(
                "\"{}\" has no pending delivery for {}",
                request.location,
                date_prefix(&request.delivery_date)
            );
        }

        let record = DeliveryRecord {
            location: request.location.trim().to_string(),
            delivery_date: date_prefix(&request.delivery_date).to_string(),
            delivery_time: request.delivery_time,
            delivery_qty: request.delivery_qty,
            delivery_by: request.delivery_by.trim().to_string(),
        };

        self.repository.store(record.clone())?;
        info!("Recorded delivery to {} on {}", record.location, record.delivery_date);

        Ok(record)
    }
}
