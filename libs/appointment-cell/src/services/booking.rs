use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::{AppointmentStatus, Patient, SchedulingMode, Specialty};
use shared_utils::{default_duration, default_end_time, fits_in_day, minutes_of_day};

use crate::models::{AppointmentError, Eligibility, EligibilityRequest, NewAppointment};

/// Form state of a new or edited appointment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingDraft {
    /// Set when editing an existing appointment.
    pub appointment_id: Option<Uuid>,
    pub patient: Option<Patient>,
    pub clinic_id: Option<Uuid>,
    pub specialty: Option<Specialty>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub professional: Option<String>,
    pub notes: Option<String>,
    pub is_online: bool,
    pub scheduling_mode: SchedulingMode,
    pub override_justification: Option<String>,
}

impl BookingDraft {
    /// The eligibility question this draft asks.
    pub fn eligibility_request(&self) -> EligibilityRequest {
        EligibilityRequest {
            patient_id: self.patient.as_ref().map(|p| p.id),
            specialty_id: self.specialty.as_ref().map(|s| s.id),
            exclude_appointment_id: self.appointment_id,
        }
    }

    /// End time the form pre-fills once start and specialty are known.
    pub fn suggested_end_time(&self) -> Option<NaiveTime> {
        self.start_time
            .map(|start| default_end_time(start, default_duration(self.specialty.as_ref())))
    }
}

pub struct BookingService;

impl BookingService {
    pub fn new() -> Self {
        Self
    }

    /// Validates a draft against its eligibility and produces the row to
    /// persist. Nothing reaches storage unless this returns `Ok`.
    pub fn prepare(
        &self,
        draft: &BookingDraft,
        eligibility: &Eligibility,
    ) -> Result<NewAppointment, AppointmentError> {
        let patient = draft.patient.as_ref().ok_or(AppointmentError::MissingField("patient"))?;
        let clinic_id = draft.clinic_id.ok_or(AppointmentError::MissingField("clinic"))?;
        let specialty = draft.specialty.as_ref().ok_or(AppointmentError::MissingField("specialty"))?;
        let date = draft.date.ok_or(AppointmentError::MissingField("date"))?;
        let start_time = draft.start_time.ok_or(AppointmentError::MissingField("start_time"))?;
        let professional = draft
            .professional
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(AppointmentError::MissingField("professional"))?;

        if let Some(specialty_clinic) = specialty.clinic_id {
            if specialty_clinic != clinic_id {
                return Err(AppointmentError::SpecialtyClinicMismatch {
                    specialty_id: specialty.id,
                    clinic_id,
                });
            }
        }

        let end_time = match draft.end_time {
            Some(end_time) => end_time,
            None => {
                let duration = default_duration(Some(specialty));
                if !fits_in_day(start_time, duration) {
                    return Err(AppointmentError::InvalidTime(format!(
                        "a {} minute visit starting at {} would run past midnight",
                        duration,
                        start_time.format("%H:%M")
                    )));
                }
                default_end_time(start_time, duration)
            }
        };
        if minutes_of_day(end_time) <= minutes_of_day(start_time) {
            return Err(AppointmentError::InvalidTime(format!(
                "end {} must be after start {}",
                end_time.format("%H:%M"),
                start_time.format("%H:%M")
            )));
        }

        let eligibility = self.apply_override(eligibility, draft.override_justification.as_deref())?;
        let justification = eligibility.ensure_submittable()?.map(str::to_string);

        if let Some(reason) = eligibility.block_reason() {
            info!(
                "Override accepted for patient {} ({}): {}",
                patient.id,
                reason,
                justification.as_deref().unwrap_or_default()
            );
        }

        let notes = draft
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(NewAppointment {
            appointment_id: draft.appointment_id,
            patient_id: patient.id,
            clinic_id,
            specialty_id: specialty.id,
            company_id: patient.company_id,
            date,
            start_time,
            end_time,
            status: AppointmentStatus::Scheduled,
            professional: professional.to_string(),
            is_online: draft.is_online,
            scheduling_mode: draft.scheduling_mode,
            override_justification: justification,
            notes,
        })
    }

    fn apply_override(
        &self,
        eligibility: &Eligibility,
        justification: Option<&str>,
    ) -> Result<Eligibility, AppointmentError> {
        match justification {
            Some(text) if eligibility.is_blocked() => eligibility.clone().release(text),
            Some(_) => {
                debug!("Ignoring override justification on a booking that is not blocked");
                Ok(eligibility.clone())
            }
            None => Ok(eligibility.clone()),
        }
    }
}

impl Default for BookingService {
    fn default() -> Self {
        Self::new()
    }
}
