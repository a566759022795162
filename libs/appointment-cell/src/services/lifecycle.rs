// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, info, warn};

use shared_models::{Appointment, AppointmentStatus};

use crate::models::AppointmentError;

pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition from {} to {}", current_status, new_status);

        if !self.get_valid_transitions(current_status).contains(&new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition {
                from: current_status,
                to: new_status,
            });
        }

        Ok(())
    }

    /// Get all valid next statuses for a given current status
    pub fn get_valid_transitions(&self, current_status: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Scheduled => vec![
                AppointmentStatus::Attended,
                AppointmentStatus::NoShow,
                AppointmentStatus::Cancelled,
                AppointmentStatus::Rescheduled,
            ],
            AppointmentStatus::Rescheduled => vec![
                AppointmentStatus::Scheduled,
                AppointmentStatus::Attended,
                AppointmentStatus::NoShow,
                AppointmentStatus::Cancelled,
            ],
            // Attendance can be corrected after the fact
            AppointmentStatus::Attended => vec![AppointmentStatus::NoShow],
            AppointmentStatus::NoShow => vec![AppointmentStatus::Attended],
            AppointmentStatus::Cancelled => vec![],
        }
    }

    /// Returns the appointment with its new status.
    pub fn transition(
        &self,
        appointment: &Appointment,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        self.validate_status_transition(appointment.status, new_status)?;

        let mut updated = appointment.clone();
        updated.status = new_status;
        info!("Appointment {} moved {} -> {}", appointment.id, appointment.status, new_status);
        Ok(updated)
    }

    pub fn mark_attended(&self, appointment: &Appointment) -> Result<Appointment, AppointmentError> {
        self.transition(appointment, AppointmentStatus::Attended)
    }

    pub fn mark_no_show(&self, appointment: &Appointment) -> Result<Appointment, AppointmentError> {
        self.transition(appointment, AppointmentStatus::NoShow)
    }

    pub fn cancel(&self, appointment: &Appointment) -> Result<Appointment, AppointmentError> {
        self.transition(appointment, AppointmentStatus::Cancelled)
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
