use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::{Appointment, AppointmentStatus, Specialty};

use crate::models::{AppointmentError, Eligibility, EligibilityOutcome, EligibilityRequest};
use crate::services::eligibility::EligibilityEngine;

// ==============================================================================
// HISTORY WINDOW
// ==============================================================================

/// The slice of a patient's past visits the rules look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub patient_id: Uuid,
    pub months: u32,
    /// Earliest date included.
    pub since: NaiveDate,
    pub statuses: [AppointmentStatus; 2],
}

impl HistoryQuery {
    pub fn new(patient_id: Uuid, months: u32, today: NaiveDate) -> Self {
        Self {
            patient_id,
            months,
            since: EligibilityEngine::validity_boundary(months, today),
            statuses: [AppointmentStatus::Attended, AppointmentStatus::NoShow],
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        appointment.patient_id == Some(self.patient_id)
            && self.statuses.contains(&appointment.status)
            && appointment.date >= self.since
    }

    /// Filters to the window and orders newest first.
    pub fn apply(&self, appointments: impl IntoIterator<Item = Appointment>) -> Vec<Appointment> {
        let mut window: Vec<Appointment> = appointments.into_iter().filter(|a| self.matches(a)).collect();
        window.sort_by_key(|a| Reverse((a.date, a.start_time)));
        window
    }
}

// ==============================================================================
// QUERY PORTS
// ==============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryPort: Send + Sync {
    /// Attended and no-show visits of `patient_id` in the trailing `months`.
    async fn load_history(&self, patient_id: Uuid, months: u32) -> Result<Vec<Appointment>, AppointmentError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpecialtyCatalog: Send + Sync {
    async fn find_specialty(&self, specialty_id: Uuid) -> Result<Option<Specialty>, AppointmentError>;
}

// ==============================================================================
// SERVICE
// ==============================================================================

/// Resolves the specialty, loads the history window and runs the engine.
pub struct EligibilityService {
    history: Arc<dyn HistoryPort>,
    catalog: Arc<dyn SpecialtyCatalog>,
    engine: EligibilityEngine,
}

impl EligibilityService {
    pub fn new(
        history: Arc<dyn HistoryPort>,
        catalog: Arc<dyn SpecialtyCatalog>,
        engine: EligibilityEngine,
    ) -> Self {
        Self {
            history,
            catalog,
            engine,
        }
    }

    pub async fn check(&self, request: &EligibilityRequest) -> Result<EligibilityOutcome, AppointmentError> {
        self.check_on(request, Local::now().date_naive()).await
    }

    /// Same as [`check`](Self::check) with an explicit reference date.
    ///
    /// Data-layer failures are returned as errors, never folded into a
    /// decision.
    pub async fn check_on(
        &self,
        request: &EligibilityRequest,
        today: NaiveDate,
    ) -> Result<EligibilityOutcome, AppointmentError> {
        let (patient_id, specialty_id) = match (request.patient_id, request.specialty_id) {
            (Some(patient_id), Some(specialty_id)) => (patient_id, specialty_id),
            _ => return Ok(self.engine.evaluate(request, None, None, today)),
        };

        let specialty = match self.catalog.find_specialty(specialty_id).await? {
            Some(specialty) => specialty,
            None => {
                warn!("Specialty {} not found in catalogue", specialty_id);
                return Ok(self.engine.evaluate(request, None, None, today));
            }
        };

        let months = self.engine.window_months(&specialty);
        debug!("Loading {} months of history for patient {}", months, patient_id);

        let loaded = self.history.load_history(patient_id, months).await?;
        let window = HistoryQuery::new(patient_id, months, today).apply(loaded);

        let outcome = self.engine.evaluate(request, Some(&specialty), Some(&window), today);
        if let Eligibility::Blocked { reason, .. } = &outcome.eligibility {
            debug!("Booking for patient {} is blocked ({})", patient_id, reason);
        }
        Ok(outcome)
    }
}
