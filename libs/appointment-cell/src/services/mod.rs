pub mod booking;
pub mod eligibility;
pub mod history;
pub mod lifecycle;

pub use booking::{BookingDraft, BookingService};
pub use eligibility::{EligibilityEngine, SpecialtyRules};
pub use history::{EligibilityService, HistoryPort, HistoryQuery, SpecialtyCatalog};
pub use lifecycle::AppointmentLifecycleService;
