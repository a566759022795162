use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ModelError;

// ==============================================================================
// APPOINTMENT
// ==============================================================================

/// Immutable snapshot of one booked visit.
///
/// Times are local wall-clock at minute precision. `end_time` may be absent,
/// in which case consumers derive it from the specialty's default duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Option<Uuid>,
    pub clinic_id: Option<Uuid>,
    pub specialty_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub status: AppointmentStatus,
    pub professional: Option<String>,
    pub is_online: bool,
    pub scheduling_mode: SchedulingMode,
    pub override_justification: Option<String>,
    pub notes: Option<String>,
    pub guide_generated: bool,
}

impl Appointment {
    pub fn new(id: Uuid, date: NaiveDate, status: AppointmentStatus) -> Self {
        Self {
            id,
            patient_id: None,
            clinic_id: None,
            specialty_id: None,
            company_id: None,
            date,
            start_time: None,
            end_time: None,
            status,
            professional: None,
            is_online: false,
            scheduling_mode: SchedulingMode::FixedTime,
            override_justification: None,
            notes: None,
            guide_generated: false,
        }
    }

    /// True for the statuses that feed the eligibility history.
    pub fn counts_for_history(&self) -> bool {
        matches!(self.status, AppointmentStatus::Attended | AppointmentStatus::NoShow)
    }

    pub fn is_arrival_order(&self) -> bool {
        self.scheduling_mode == SchedulingMode::ArrivalOrder
    }
}

// ==============================================================================
// STATUS
// ==============================================================================

/// Persisted labels are the Portuguese ones used by the storage schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[serde(rename = "agendado", alias = "scheduled")]
    Scheduled,
    #[serde(rename = "compareceu", alias = "attended")]
    Attended,
    #[serde(rename = "faltou", alias = "no-show", alias = "no_show")]
    NoShow,
    #[serde(rename = "cancelado", alias = "cancelled")]
    Cancelled,
    #[serde(rename = "reagendado", alias = "rescheduled")]
    Rescheduled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Attended,
        AppointmentStatus::NoShow,
        AppointmentStatus::Cancelled,
        AppointmentStatus::Rescheduled,
    ];

    /// Storage label.
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "agendado",
            AppointmentStatus::Attended => "compareceu",
            AppointmentStatus::NoShow => "faltou",
            AppointmentStatus::Cancelled => "cancelado",
            AppointmentStatus::Rescheduled => "reagendado",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Attended => write!(f, "attended"),
            AppointmentStatus::NoShow => write!(f, "no-show"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Rescheduled => write!(f, "rescheduled"),
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "agendado" | "scheduled" => Ok(AppointmentStatus::Scheduled),
            "compareceu" | "attended" => Ok(AppointmentStatus::Attended),
            "faltou" | "no-show" | "no_show" => Ok(AppointmentStatus::NoShow),
            "cancelado" | "cancelled" => Ok(AppointmentStatus::Cancelled),
            "reagendado" | "rescheduled" => Ok(AppointmentStatus::Rescheduled),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

// ==============================================================================
// SCHEDULING MODE
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingMode {
    #[default]
    FixedTime,
    /// No fixed start; patients are seen in arrival sequence.
    ArrivalOrder,
}

// ==============================================================================
// WALL-CLOCK PARSING
// ==============================================================================

/// Parses `HH:MM` or `HH:MM:SS`, truncating to minute precision.
pub fn parse_wall_clock(raw: &str) -> Result<NaiveTime, ModelError> {
    let trimmed = raw.trim();
    let parsed = NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| ModelError::InvalidTime(trimmed.to_string()))?;

    NaiveTime::from_hms_opt(parsed.hour(), parsed.minute(), 0)
        .ok_or_else(|| ModelError::InvalidTime(trimmed.to_string()))
}
