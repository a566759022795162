// libs/appointment-cell/src/models.rs
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::notes::{normalize_justification, NotesFields};
use shared_models::{AppointmentStatus, SchedulingMode};

// ==============================================================================
// ELIGIBILITY MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// Recent no-show inside the lockout.
    Penalty,
    /// Same procedure already used inside its non-repeat window.
    Validity,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::Penalty => write!(f, "penalty"),
            BlockReason::Validity => write!(f, "validity"),
        }
    }
}

/// Booking decision for one (patient, specialty) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Eligibility {
    /// Patient or specialty not chosen yet; nothing was checked.
    NotApplicable,
    /// Specialty unresolved or history not loaded yet.
    Pending,
    Allowed,
    Blocked {
        reason: BlockReason,
        justification: Option<String>,
    },
}

impl Eligibility {
    pub fn blocked(reason: BlockReason) -> Self {
        Eligibility::Blocked {
            reason,
            justification: None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Eligibility::Blocked { .. })
    }

    pub fn block_reason(&self) -> Option<BlockReason> {
        match self {
            Eligibility::Blocked { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Attaches an override justification to a block. Blank lines inside
    /// the text are dropped so the stored notes parse back unchanged.
    pub fn release(self, justification: &str) -> Result<Self, AppointmentError> {
        let justification = normalize_justification(justification);
        match self {
            Eligibility::Blocked { reason, .. } => {
                if justification.is_empty() {
                    return Err(AppointmentError::EmptyJustification);
                }
                Ok(Eligibility::Blocked {
                    reason,
                    justification: Some(justification),
                })
            }
            _ => Err(AppointmentError::NotBlocked),
        }
    }

    /// Gate before persistence. Returns the override text when the booking
    /// goes through on a released block.
    pub fn ensure_submittable(&self) -> Result<Option<&str>, AppointmentError> {
        match self {
            Eligibility::Allowed => Ok(None),
            Eligibility::NotApplicable => Err(AppointmentError::NotApplicable),
            Eligibility::Pending => Err(AppointmentError::EligibilityPending),
            Eligibility::Blocked { reason, justification } => match justification.as_deref() {
                None => Err(AppointmentError::BlockedWithoutOverride(*reason)),
                Some(text) if text.trim().is_empty() => Err(AppointmentError::EmptyJustification),
                Some(text) => Ok(Some(text)),
            },
        }
    }

    /// Wire label: `allowed`, `blocked-penalty`, `blocked-validity`,
    /// `pending` or `not-applicable`.
    pub fn label(&self) -> &'static str {
        match self {
            Eligibility::NotApplicable => "not-applicable",
            Eligibility::Pending => "pending",
            Eligibility::Allowed => "allowed",
            Eligibility::Blocked { reason: BlockReason::Penalty, .. } => "blocked-penalty",
            Eligibility::Blocked { reason: BlockReason::Validity, .. } => "blocked-validity",
        }
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityRequest {
    pub patient_id: Option<Uuid>,
    pub specialty_id: Option<Uuid>,
    /// The appointment being edited, if any; never blocks itself.
    pub exclude_appointment_id: Option<Uuid>,
}

impl EligibilityRequest {
    pub fn new(patient_id: Uuid, specialty_id: Uuid) -> Self {
        Self {
            patient_id: Some(patient_id),
            specialty_id: Some(specialty_id),
            exclude_appointment_id: None,
        }
    }

    pub fn editing(mut self, appointment_id: Uuid) -> Self {
        self.exclude_appointment_id = Some(appointment_id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityOutcome {
    pub eligibility: Eligibility,
    /// History window in months (6, or 12 for ophthalmology consultations).
    pub months_window: u32,
    /// History entry that caused the block.
    pub blocked_by: Option<Uuid>,
}

// ==============================================================================
// BOOKING MODELS
// ==============================================================================

/// Appointment validated for insertion (or update when editing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub appointment_id: Option<Uuid>,
    pub patient_id: Uuid,
    pub clinic_id: Uuid,
    pub specialty_id: Uuid,
    pub company_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: AppointmentStatus,
    pub professional: String,
    pub is_online: bool,
    pub scheduling_mode: SchedulingMode,
    pub override_justification: Option<String>,
    pub notes: Option<String>,
}

impl NewAppointment {
    /// Notes column in the storage micro-format.
    pub fn stored_notes(&self) -> Option<String> {
        let rendered = NotesFields {
            justification: self.override_justification.clone(),
            is_online: self.is_online,
            arrival_order: self.scheduling_mode == SchedulingMode::ArrivalOrder,
            text: self.notes.clone().unwrap_or_default(),
        }
        .render();

        if rendered.is_empty() {
            None
        } else {
            Some(rendered)
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid appointment time: {0}")]
    InvalidTime(String),

    #[error("Specialty {specialty_id} is not offered by clinic {clinic_id}")]
    SpecialtyClinicMismatch { specialty_id: Uuid, clinic_id: Uuid },

    #[error("Booking is blocked for {0} and was not overridden")]
    BlockedWithoutOverride(BlockReason),

    #[error("An override requires a non-empty justification")]
    EmptyJustification,

    #[error("Nothing to override: booking is not blocked")]
    NotBlocked,

    #[error("Eligibility is still being determined")]
    EligibilityPending,

    #[error("Eligibility does not apply until patient and specialty are chosen")]
    NotApplicable,

    #[error("Appointment cannot move from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Data access error: {0}")]
    DataAccess(String),
}
