// libs/calendar-cell/tests/agenda_test.rs
use chrono::Days;
use uuid::Uuid;

use calendar_cell::services::{
    appointments_by_day, appointments_in_hour, appointments_on, patient_timeline, pending_for_patient,
    AgendaFilter, AgendaView, NavigationDirection,
};
use shared_models::{Appointment, AppointmentStatus};
use shared_utils::test_utils::{fixed_today, TestAppointment, TestSpecialty};

fn ids(appointments: &[&Appointment]) -> Vec<Uuid> {
    appointments.iter().map(|a| a.id).collect()
}

// ==============================================================================
// DAYS AND NAVIGATION
// ==============================================================================

#[test]
fn test_week_is_rolling_from_the_anchor() {
    let anchor = fixed_today();
    let days = AgendaView::Week.visible_days(anchor);

    assert_eq!(days.len(), 7);
    assert_eq!(days[0], anchor);
    assert_eq!(days[6], anchor + Days::new(6));
    assert_eq!(AgendaView::Day.visible_days(anchor), vec![anchor]);
}

#[test]
fn test_navigation_steps_by_view() {
    let anchor = fixed_today();

    assert_eq!(AgendaView::Week.step(anchor, NavigationDirection::Next), anchor + Days::new(7));
    assert_eq!(AgendaView::Week.step(anchor, NavigationDirection::Previous), anchor - Days::new(7));
    assert_eq!(AgendaView::Day.step(anchor, NavigationDirection::Previous), anchor - Days::new(1));
}

#[test]
fn test_day_selection_orders_by_start_with_untimed_last() {
    let today = fixed_today();
    let late = TestAppointment::on(today).at(15, 0).build();
    let untimed = TestAppointment::on(today).arrival_order().build();
    let early = TestAppointment::on(today).at(7, 30).build();
    let tomorrow = TestAppointment::on(today + Days::new(1)).at(7, 0).build();
    let all = vec![late.clone(), untimed.clone(), early.clone(), tomorrow.clone()];

    assert_eq!(ids(&appointments_on(&all, today)), vec![early.id, late.id, untimed.id]);

    let week = appointments_by_day(&all, today);
    assert_eq!(week.len(), 7);
    assert_eq!(ids(&week[&(today + Days::new(1))]), vec![tomorrow.id]);
    assert!(week[&(today + Days::new(2))].is_empty());
}

#[test]
fn test_hour_row_holds_appointments_starting_in_that_hour() {
    let today = fixed_today();
    let nine = TestAppointment::on(today).at(9, 0).build();
    let nine_thirty = TestAppointment::on(today).at(9, 30).build();
    let ten = TestAppointment::on(today).at(10, 0).build();
    let all = vec![ten, nine_thirty.clone(), nine.clone()];

    assert_eq!(ids(&appointments_in_hour(&all, today, 9)), vec![nine.id, nine_thirty.id]);
}

// ==============================================================================
// FILTERS
// ==============================================================================

#[test]
fn test_clinic_and_specialty_name_filters_combine() {
    let today = fixed_today();
    let north = Uuid::new_v4();
    let south = Uuid::new_v4();

    let mut cardio_north = TestSpecialty::consultation("Cardiologia");
    cardio_north.clinic_id = Some(north);
    let mut cardio_south = TestSpecialty::consultation("Cardiologia");
    cardio_south.clinic_id = Some(south);
    let mut derma_north = TestSpecialty::consultation("Dermatologia");
    derma_north.clinic_id = Some(north);
    let specialties = vec![cardio_north.clone(), cardio_south.clone(), derma_north.clone()];

    let a = TestAppointment::on(today).clinic(north).specialty(cardio_north.id).build();
    let b = TestAppointment::on(today).clinic(south).specialty(cardio_south.id).build();
    let c = TestAppointment::on(today).clinic(north).specialty(derma_north.id).build();
    let all = vec![a.clone(), b.clone(), c.clone()];

    let by_name = AgendaFilter::new().specialty_name("Cardiologia");
    assert_eq!(ids(&by_name.apply(&all, &specialties)), vec![a.id, b.id]);

    let by_clinic = AgendaFilter::new().clinic(north);
    assert_eq!(ids(&by_clinic.apply(&all, &specialties)), vec![a.id, c.id]);

    let both = AgendaFilter::new().clinic(south).specialty_name("Cardiologia");
    assert_eq!(ids(&both.apply(&all, &specialties)), vec![b.id]);

    assert_eq!(AgendaFilter::new().apply(&all, &specialties).len(), 3);
}

#[test]
fn test_specialty_options_dedupe_names_across_clinics() {
    let north = Uuid::new_v4();
    let mut first = TestSpecialty::exam("Audiometria");
    first.clinic_id = Some(north);
    let mut second = TestSpecialty::exam("Audiometria");
    second.clinic_id = Some(Uuid::new_v4());
    let specialties = vec![first.clone(), second];

    let all_clinics = AgendaFilter::new().specialty_options(&specialties);
    assert_eq!(all_clinics.len(), 1);
    assert_eq!(all_clinics[0].id, first.id);

    let one_clinic = AgendaFilter::new().clinic(north).specialty_options(&specialties);
    assert_eq!(one_clinic.len(), 1);
}

// ==============================================================================
// PATIENT LISTS
// ==============================================================================

#[test]
fn test_pending_list_is_scheduled_only_and_soonest_first() {
    let today = fixed_today();
    let patient = Uuid::new_v4();
    let later = TestAppointment::on(today + Days::new(3)).patient(patient).at(8, 0).build();
    let sooner_afternoon = TestAppointment::on(today).patient(patient).at(14, 0).build();
    let sooner_morning = TestAppointment::on(today).patient(patient).at(9, 0).build();
    let attended = TestAppointment::on(today).patient(patient).attended().build();
    let cancelled = TestAppointment::on(today)
        .patient(patient)
        .status(AppointmentStatus::Cancelled)
        .build();
    let someone_else = TestAppointment::on(today).patient(Uuid::new_v4()).build();
    let all = vec![later.clone(), attended, sooner_afternoon.clone(), cancelled, someone_else, sooner_morning.clone()];

    assert_eq!(
        ids(&pending_for_patient(&all, patient)),
        vec![sooner_morning.id, sooner_afternoon.id, later.id]
    );
}

#[test]
fn test_timeline_is_newest_first() {
    let today = fixed_today();
    let patient = Uuid::new_v4();
    let old = TestAppointment::on(today - Days::new(30)).patient(patient).attended().build();
    let recent = TestAppointment::on(today).patient(patient).at(8, 0).build();

    let all = vec![old.clone(), recent.clone()];
    assert_eq!(ids(&patient_timeline(&all, patient)), vec![recent.id, old.id]);
}
