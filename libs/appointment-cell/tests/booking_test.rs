// libs/appointment-cell/tests/booking_test.rs
use assert_matches::assert_matches;
use uuid::Uuid;

use appointment_cell::models::{AppointmentError, BlockReason, Eligibility};
use appointment_cell::services::{BookingDraft, BookingService};
use shared_models::{AppointmentStatus, NotesFields, SchedulingMode};
use shared_utils::test_utils::{clock, fixed_today, init_test_tracing, TestPatient, TestSpecialty};

// ==============================================================================
// TEST FIXTURES AND UTILITIES
// ==============================================================================

fn complete_draft() -> BookingDraft {
    init_test_tracing();
    let clinic_id = Uuid::new_v4();
    let mut patient = TestPatient::new("Maria Souza");
    patient.company_id = Some(Uuid::new_v4());
    let mut specialty = TestSpecialty::exam("Audiometria");
    specialty.clinic_id = Some(clinic_id);
    specialty.default_duration_minutes = Some(20);

    BookingDraft {
        patient: Some(patient),
        clinic_id: Some(clinic_id),
        specialty: Some(specialty),
        date: Some(fixed_today()),
        start_time: Some(clock(9, 0)),
        end_time: Some(clock(9, 30)),
        professional: Some("Dr. Paulo".to_string()),
        notes: Some("Y".to_string()),
        ..BookingDraft::default()
    }
}

// ==============================================================================
// REQUIRED FIELDS AND TIMES
// ==============================================================================

#[test]
fn test_allowed_booking_is_prepared() {
    let draft = complete_draft();
    let booking = BookingService::new().prepare(&draft, &Eligibility::Allowed).unwrap();

    assert_eq!(booking.status, AppointmentStatus::Scheduled);
    assert_eq!(booking.company_id, draft.patient.as_ref().unwrap().company_id);
    assert_eq!(booking.override_justification, None);
    assert_eq!(booking.stored_notes().as_deref(), Some("Y"));
}

#[test]
fn test_missing_fields_are_reported() {
    let service = BookingService::new();

    let mut draft = complete_draft();
    draft.patient = None;
    assert_matches!(
        service.prepare(&draft, &Eligibility::Allowed),
        Err(AppointmentError::MissingField("patient"))
    );

    let mut draft = complete_draft();
    draft.professional = Some("   ".to_string());
    assert_matches!(
        service.prepare(&draft, &Eligibility::Allowed),
        Err(AppointmentError::MissingField("professional"))
    );
}

#[test]
fn test_end_time_defaults_from_specialty_duration() {
    let mut draft = complete_draft();
    draft.end_time = None;
    assert_eq!(draft.suggested_end_time(), Some(clock(9, 20)));

    let booking = BookingService::new().prepare(&draft, &Eligibility::Allowed).unwrap();
    assert_eq!(booking.end_time, clock(9, 20));
}

#[test]
fn test_end_before_start_is_rejected() {
    let mut draft = complete_draft();
    draft.end_time = Some(clock(8, 30));

    assert_matches!(
        BookingService::new().prepare(&draft, &Eligibility::Allowed),
        Err(AppointmentError::InvalidTime(_))
    );
}

#[test]
fn test_late_start_without_end_is_rejected_as_past_midnight() {
    let mut draft = complete_draft();
    draft.start_time = Some(clock(23, 59));
    draft.end_time = None;

    let result = BookingService::new().prepare(&draft, &Eligibility::Allowed);

    assert_matches!(result, Err(AppointmentError::InvalidTime(message)) if message.contains("past midnight"));
}

#[test]
fn test_specialty_from_another_clinic_is_rejected() {
    let mut draft = complete_draft();
    draft.clinic_id = Some(Uuid::new_v4());

    assert_matches!(
        BookingService::new().prepare(&draft, &Eligibility::Allowed),
        Err(AppointmentError::SpecialtyClinicMismatch { .. })
    );
}

// ==============================================================================
// ELIGIBILITY GATE AND OVERRIDE
// ==============================================================================

#[test]
fn test_blocked_without_override_is_rejected() {
    let draft = complete_draft();

    assert_matches!(
        BookingService::new().prepare(&draft, &Eligibility::blocked(BlockReason::Penalty)),
        Err(AppointmentError::BlockedWithoutOverride(BlockReason::Penalty))
    );
}

#[test]
fn test_override_with_blank_justification_is_rejected() {
    let mut draft = complete_draft();
    draft.override_justification = Some("  ".to_string());

    assert_matches!(
        BookingService::new().prepare(&draft, &Eligibility::blocked(BlockReason::Validity)),
        Err(AppointmentError::EmptyJustification)
    );
}

#[test]
fn test_pending_and_not_applicable_cannot_be_submitted() {
    let draft = complete_draft();
    let service = BookingService::new();

    assert_matches!(
        service.prepare(&draft, &Eligibility::Pending),
        Err(AppointmentError::EligibilityPending)
    );
    assert_matches!(
        service.prepare(&draft, &Eligibility::NotApplicable),
        Err(AppointmentError::NotApplicable)
    );
}

#[test]
fn test_override_stamps_notes_with_justification() {
    let mut draft = complete_draft();
    draft.override_justification = Some("X".to_string());

    let booking = BookingService::new()
        .prepare(&draft, &Eligibility::blocked(BlockReason::Validity))
        .unwrap();

    assert_eq!(booking.override_justification.as_deref(), Some("X"));
    assert_eq!(
        booking.stored_notes().as_deref(),
        Some("LIBERADO COM JUSTIFICATIVA: X\n\nY")
    );
}

#[test]
fn test_override_keeps_online_and_arrival_markers_after_the_block() {
    let mut draft = complete_draft();
    draft.override_justification = Some("autorizado pela coordenação".to_string());
    draft.is_online = true;
    draft.scheduling_mode = SchedulingMode::ArrivalOrder;
    draft.notes = None;

    let booking = BookingService::new()
        .prepare(&draft, &Eligibility::blocked(BlockReason::Penalty))
        .unwrap();

    assert_eq!(
        booking.stored_notes().as_deref(),
        Some("LIBERADO COM JUSTIFICATIVA: autorizado pela coordenação\n\n[ONLINE] [CHEGADA]")
    );
}

#[test]
fn test_multi_paragraph_justification_reads_back_intact() {
    let mut draft = complete_draft();
    draft.override_justification = Some("pedido da empresa\n\nautorizado pela coordenação".to_string());

    let booking = BookingService::new()
        .prepare(&draft, &Eligibility::blocked(BlockReason::Penalty))
        .unwrap();
    let stored = NotesFields::parse(&booking.stored_notes().unwrap());

    assert_eq!(
        stored.justification.as_deref(),
        Some("pedido da empresa\nautorizado pela coordenação")
    );
    assert_eq!(stored.justification, booking.override_justification);
    assert_eq!(stored.text, "Y");
}

#[test]
fn test_justification_on_allowed_booking_is_not_stored() {
    let mut draft = complete_draft();
    draft.override_justification = Some("desnecessário".to_string());

    let booking = BookingService::new().prepare(&draft, &Eligibility::Allowed).unwrap();

    assert_eq!(booking.override_justification, None);
    assert_eq!(booking.stored_notes().as_deref(), Some("Y"));
}

#[test]
fn test_edit_draft_excludes_itself_from_eligibility() {
    let mut draft = complete_draft();
    let own_id = Uuid::new_v4();
    draft.appointment_id = Some(own_id);

    let request = draft.eligibility_request();
    assert_eq!(request.exclude_appointment_id, Some(own_id));
    assert_eq!(request.patient_id, draft.patient.as_ref().map(|p| p.id));
}
