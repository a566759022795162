use chrono::{Days, Months, NaiveDate};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::SchedulingConfig;
use shared_models::{Appointment, AppointmentStatus, Specialty, SpecialtyType};

use crate::models::{BlockReason, Eligibility, EligibilityOutcome, EligibilityRequest};

const OPHTHALMOLOGY_MARKERS: [&str; 2] = ["oftalmo", "ophthalmo"];
const EXAM_MARKER: &str = "exam";

// ==============================================================================
// SPECIALTY CLASSIFICATION
// ==============================================================================

/// Which rule variants a specialty falls under.
///
/// The type column is not reliably filled in, so name substrings are
/// consulted as well.
pub struct SpecialtyRules;

impl SpecialtyRules {
    pub fn is_ophthalmology(specialty: &Specialty) -> bool {
        OPHTHALMOLOGY_MARKERS.iter().any(|m| specialty.name_contains(m))
    }

    pub fn is_ophthalmology_consultation(specialty: &Specialty) -> bool {
        Self::is_ophthalmology(specialty)
            && matches!(specialty.kind, None | Some(SpecialtyType::Consultation))
    }

    /// Admission, termination and psych tests skip the no-show lockout.
    pub fn is_penalty_exempt(specialty: &Specialty) -> bool {
        matches!(
            specialty.kind,
            Some(SpecialtyType::AdmissionExam | SpecialtyType::TerminationExam | SpecialtyType::PsychTest)
        )
    }

    /// `EXAM` type, or an exam-like name on an unset or consultation type.
    pub fn is_exam(specialty: &Specialty) -> bool {
        match specialty.kind {
            Some(SpecialtyType::Exam) => true,
            None | Some(SpecialtyType::Consultation) => specialty.name_contains(EXAM_MARKER),
            Some(_) => false,
        }
    }

    pub fn has_validity_window(specialty: &Specialty) -> bool {
        Self::is_exam(specialty) || Self::is_ophthalmology_consultation(specialty)
    }
}

// ==============================================================================
// ENGINE
// ==============================================================================

/// Pure booking-eligibility rules. Holds configuration only.
#[derive(Debug, Clone)]
pub struct EligibilityEngine {
    penalty_days: u32,
    validity_months: u32,
    ophthalmology_validity_months: u32,
}

impl Default for EligibilityEngine {
    fn default() -> Self {
        Self::new(&SchedulingConfig::default())
    }
}

impl EligibilityEngine {
    pub fn new(config: &SchedulingConfig) -> Self {
        Self {
            penalty_days: config.penalty_days,
            validity_months: config.validity_months,
            ophthalmology_validity_months: config.ophthalmology_validity_months,
        }
    }

    /// History window to load for a specialty.
    pub fn window_months(&self, specialty: &Specialty) -> u32 {
        if SpecialtyRules::is_ophthalmology_consultation(specialty) {
            self.ophthalmology_validity_months
        } else {
            self.validity_months
        }
    }

    /// Decides whether the booking may proceed.
    ///
    /// `specialty` must be the catalogue entry for `request.specialty_id`;
    /// `history` is `None` while it is still loading. Rules run in order and
    /// the first that fires wins, so a penalty always shadows validity.
    pub fn evaluate(
        &self,
        request: &EligibilityRequest,
        specialty: Option<&Specialty>,
        history: Option<&[Appointment]>,
        today: NaiveDate,
    ) -> EligibilityOutcome {
        let (patient_id, specialty_id) = match (request.patient_id, request.specialty_id) {
            (Some(patient_id), Some(specialty_id)) => (patient_id, specialty_id),
            _ => return self.outcome(Eligibility::NotApplicable, self.validity_months, None),
        };

        let specialty = match specialty.filter(|s| s.id == specialty_id) {
            Some(specialty) => specialty,
            None => {
                debug!("Specialty {} not resolved yet, eligibility pending", specialty_id);
                return self.outcome(Eligibility::Pending, self.validity_months, None);
            }
        };

        let months = self.window_months(specialty);
        let history = match history {
            Some(history) => history,
            None => return self.outcome(Eligibility::Pending, months, None),
        };

        debug!(
            "Evaluating eligibility for patient {} / specialty {} over {} history entries",
            patient_id,
            specialty.name,
            history.len()
        );

        let candidates: Vec<&Appointment> = history
            .iter()
            .filter(|a| Some(a.id) != request.exclude_appointment_id)
            .filter(|a| a.patient_id.map_or(true, |p| p == patient_id))
            .collect();

        if !SpecialtyRules::is_penalty_exempt(specialty) {
            if let Some(hit) = self.find_recent_no_show(&candidates, today) {
                warn!(
                    "Patient {} blocked by penalty: no-show {} on {}",
                    patient_id, hit.id, hit.date
                );
                return self.outcome(Eligibility::blocked(BlockReason::Penalty), months, Some(hit.id));
            }
        }

        if SpecialtyRules::has_validity_window(specialty) {
            if let Some(hit) = self.find_unexpired_use(&candidates, specialty_id, months, today) {
                warn!(
                    "Patient {} blocked by validity: {} attended on {} within {} months",
                    patient_id, specialty.name, hit.date, months
                );
                return self.outcome(Eligibility::blocked(BlockReason::Validity), months, Some(hit.id));
            }
        }

        self.outcome(Eligibility::Allowed, months, None)
    }

    /// First day still inside the lockout (inclusive).
    pub fn penalty_boundary(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.penalty_days)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// First day still inside a validity window of `months`.
    pub fn validity_boundary(months: u32, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN)
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    fn find_recent_no_show<'a>(&self, history: &[&'a Appointment], today: NaiveDate) -> Option<&'a Appointment> {
        let boundary = self.penalty_boundary(today);
        history
            .iter()
            .copied()
            .find(|a| a.status == AppointmentStatus::NoShow && a.date >= boundary)
    }

    fn find_unexpired_use<'a>(
        &self,
        history: &[&'a Appointment],
        specialty_id: Uuid,
        months: u32,
        today: NaiveDate,
    ) -> Option<&'a Appointment> {
        let boundary = Self::validity_boundary(months, today);
        history.iter().copied().find(|a| {
            a.status == AppointmentStatus::Attended
                && a.specialty_id == Some(specialty_id)
                && a.date >= boundary
        })
    }

    fn outcome(&self, eligibility: Eligibility, months_window: u32, blocked_by: Option<Uuid>) -> EligibilityOutcome {
        EligibilityOutcome {
            eligibility,
            months_window,
            blocked_by,
        }
    }
}
