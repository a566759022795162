// libs/calendar-cell/src/services/agenda.rs
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

use chrono::{Days, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use shared_models::{Appointment, AppointmentStatus, Specialty};

pub const WEEK_LENGTH_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgendaView {
    Day,
    #[default]
    Week,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationDirection {
    Previous,
    Next,
}

impl AgendaView {
    /// Dates shown for a view anchored at `anchor`. The week is rolling:
    /// it starts on the anchor itself, not on a fixed weekday.
    pub fn visible_days(&self, anchor: NaiveDate) -> Vec<NaiveDate> {
        match self {
            AgendaView::Day => vec![anchor],
            AgendaView::Week => anchor.iter_days().take(WEEK_LENGTH_DAYS as usize).collect(),
        }
    }

    /// Moves the anchor by one day or one week.
    pub fn step(&self, anchor: NaiveDate, direction: NavigationDirection) -> NaiveDate {
        let days = Days::new(match self {
            AgendaView::Day => 1,
            AgendaView::Week => WEEK_LENGTH_DAYS,
        });
        let moved = match direction {
            NavigationDirection::Previous => anchor.checked_sub_days(days),
            NavigationDirection::Next => anchor.checked_add_days(days),
        };
        moved.unwrap_or(anchor)
    }
}

// ==============================================================================
// FILTERS
// ==============================================================================

/// Clinic and specialty-name narrowing of the calendar. `None` means all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaFilter {
    pub clinic_id: Option<Uuid>,
    pub specialty_name: Option<String>,
}

impl AgendaFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clinic(mut self, clinic_id: Uuid) -> Self {
        self.clinic_id = Some(clinic_id);
        self
    }

    pub fn specialty_name(mut self, name: impl Into<String>) -> Self {
        self.specialty_name = Some(name.into());
        self
    }

    /// Appointments passing both filters. The name filter is an exact match
    /// and covers every specialty sharing that name across clinics.
    pub fn apply<'a>(&self, appointments: &'a [Appointment], specialties: &[Specialty]) -> Vec<&'a Appointment> {
        let named: Option<HashSet<Uuid>> = self.specialty_name.as_deref().map(|name| {
            specialties
                .iter()
                .filter(|s| s.name == name)
                .map(|s| s.id)
                .collect()
        });

        appointments
            .iter()
            .filter(|a| self.clinic_id.map_or(true, |clinic| a.clinic_id == Some(clinic)))
            .filter(|a| match &named {
                Some(ids) => a.specialty_id.is_some_and(|id| ids.contains(&id)),
                None => true,
            })
            .collect()
    }

    /// Specialties offered in the filter picker: those of the selected
    /// clinic, or one entry per distinct name when no clinic is selected.
    pub fn specialty_options<'a>(&self, specialties: &'a [Specialty]) -> Vec<&'a Specialty> {
        match self.clinic_id {
            Some(clinic) => specialties.iter().filter(|s| s.clinic_id == Some(clinic)).collect(),
            None => {
                let mut seen = HashSet::new();
                specialties.iter().filter(|s| seen.insert(s.name.as_str())).collect()
            }
        }
    }
}

// ==============================================================================
// SELECTIONS
// ==============================================================================

/// Appointments on `date`, earliest start first; untimed ones last.
pub fn appointments_on(appointments: &[Appointment], date: NaiveDate) -> Vec<&Appointment> {
    let mut day: Vec<&Appointment> = appointments.iter().filter(|a| a.date == date).collect();
    day.sort_by_key(|a| (a.start_time.is_none(), a.start_time));
    day
}

/// Appointments of each day in the rolling week starting at `from`.
pub fn appointments_by_day(appointments: &[Appointment], from: NaiveDate) -> BTreeMap<NaiveDate, Vec<&Appointment>> {
    AgendaView::Week
        .visible_days(from)
        .into_iter()
        .map(|day| (day, appointments_on(appointments, day)))
        .collect()
}

/// Appointments on `date` whose start falls inside the hour row `hour`.
pub fn appointments_in_hour(appointments: &[Appointment], date: NaiveDate, hour: u32) -> Vec<&Appointment> {
    appointments_on(appointments, date)
        .into_iter()
        .filter(|a| a.start_time.is_some_and(|start| start.hour() == hour))
        .collect()
}

/// A patient's upcoming `scheduled` appointments, soonest first.
pub fn pending_for_patient(appointments: &[Appointment], patient_id: Uuid) -> Vec<&Appointment> {
    let mut pending: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.patient_id == Some(patient_id) && a.status == AppointmentStatus::Scheduled)
        .collect();
    pending.sort_by_key(|a| (a.date, a.start_time.is_none(), a.start_time));
    debug!("Patient {} has {} pending appointment(s)", patient_id, pending.len());
    pending
}

/// Every appointment of a patient, most recent first.
pub fn patient_timeline(appointments: &[Appointment], patient_id: Uuid) -> Vec<&Appointment> {
    let mut timeline: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.patient_id == Some(patient_id))
        .collect();
    timeline.sort_by_key(|a| Reverse((a.date, a.start_time)));
    timeline
}
