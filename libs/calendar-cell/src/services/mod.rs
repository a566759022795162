pub mod agenda;
pub mod layout;
pub mod packing;

pub use agenda::{
    appointments_by_day, appointments_in_hour, appointments_on, patient_timeline, pending_for_patient,
    AgendaFilter, AgendaView, NavigationDirection,
};
pub use layout::SlotLayoutEngine;
pub use packing::{pack_intervals, PackedInterval};
