//! Fixed departure table for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, TripId};
use crate::ports::DepartureSchedule;

/// `DepartureSchedule` backed by a map filled in by the caller.
#[derive(Default)]
pub struct FixedDepartureSchedule {
    departures: RwLock<HashMap<TripId, Timestamp>>,
    failing: AtomicBool,
}

impl FixedDepartureSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, trip_id: TripId, departs_at: Timestamp) {
        self.departures
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(trip_id, departs_at);
    }

    /// Builder form of [`set`](Self::set).
    pub fn with_departure(self, trip_id: TripId, departs_at: Timestamp) -> Self {
        self.set(trip_id, departs_at);
        self
    }

    /// Makes every lookup fail, as if the schedule database were down.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl DepartureSchedule for FixedDepartureSchedule {
    async fn departure_time(&self, trip_id: &TripId) -> Result<Option<Timestamp>, DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "departure schedule unavailable",
            ));
        }
        Ok(self
            .departures
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(trip_id)
            .copied())
    }
}
