use std::sync::Once;

use chrono::{Days, Months, NaiveDate, NaiveTime};
use uuid::Uuid;

use shared_config::SchedulingConfig;
use shared_models::{Appointment, AppointmentStatus, Patient, SchedulingMode, Specialty, SpecialtyType};

static TRACING: Once = Once::new();

/// Installs an env-filtered fmt subscriber once per test binary.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
            ))
            .with_test_writer()
            .try_init();
    });
}

pub struct TestConfig;

impl TestConfig {
    pub fn scheduling() -> SchedulingConfig {
        SchedulingConfig::default()
    }
}

pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).unwrap_or(NaiveDate::MIN)
}

pub fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

pub fn months_before(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(NaiveDate::MIN)
}

pub fn clock(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

pub struct TestSpecialty;

impl TestSpecialty {
    pub fn new(name: &str, kind: Option<SpecialtyType>) -> Specialty {
        Specialty::new(Uuid::new_v4(), name, kind)
    }

    pub fn consultation(name: &str) -> Specialty {
        Self::new(name, Some(SpecialtyType::Consultation))
    }

    pub fn ophthalmology() -> Specialty {
        Self::consultation("Consulta Oftalmologia")
    }

    pub fn exam(name: &str) -> Specialty {
        Self::new(name, Some(SpecialtyType::Exam))
    }

    pub fn psych_test() -> Specialty {
        Self::new("Teste Psicológico", Some(SpecialtyType::PsychTest))
    }
}

pub struct TestPatient;

impl TestPatient {
    pub fn new(name: &str) -> Patient {
        Patient::new(Uuid::new_v4(), name)
    }
}

/// Fluent builder over [`Appointment`].
#[derive(Debug, Clone)]
pub struct TestAppointment {
    inner: Appointment,
}

impl TestAppointment {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            inner: Appointment::new(Uuid::new_v4(), date, AppointmentStatus::Scheduled),
        }
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.inner.id = id;
        self
    }

    pub fn patient(mut self, patient_id: Uuid) -> Self {
        self.inner.patient_id = Some(patient_id);
        self
    }

    pub fn specialty(mut self, specialty_id: Uuid) -> Self {
        self.inner.specialty_id = Some(specialty_id);
        self
    }

    pub fn clinic(mut self, clinic_id: Uuid) -> Self {
        self.inner.clinic_id = Some(clinic_id);
        self
    }

    pub fn status(mut self, status: AppointmentStatus) -> Self {
        self.inner.status = status;
        self
    }

    pub fn attended(self) -> Self {
        self.status(AppointmentStatus::Attended)
    }

    pub fn no_show(self) -> Self {
        self.status(AppointmentStatus::NoShow)
    }

    pub fn at(mut self, hour: u32, minute: u32) -> Self {
        self.inner.start_time = Some(clock(hour, minute));
        self
    }

    pub fn until(mut self, hour: u32, minute: u32) -> Self {
        self.inner.end_time = Some(clock(hour, minute));
        self
    }

    pub fn arrival_order(mut self) -> Self {
        self.inner.scheduling_mode = SchedulingMode::ArrivalOrder;
        self
    }

    pub fn build(self) -> Appointment {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_requested_fields() {
        let patient = Uuid::new_v4();
        let appointment = TestAppointment::on(fixed_today())
            .patient(patient)
            .no_show()
            .at(9, 0)
            .until(9, 30)
            .build();

        assert_eq!(appointment.patient_id, Some(patient));
        assert_eq!(appointment.status, AppointmentStatus::NoShow);
        assert_eq!(appointment.start_time, Some(clock(9, 0)));
        assert_eq!(appointment.end_time, Some(clock(9, 30)));
    }

    #[test]
    fn date_helpers_step_back() {
        let today = fixed_today();
        assert_eq!(days_before(today, 15), NaiveDate::from_ymd_opt(2026, 5, 31).unwrap());
        assert_eq!(months_before(today, 12), NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
    }
}
