pub mod appointment;
pub mod directory;
pub mod error;
pub mod notes;
pub mod record;

pub use appointment::*;
pub use directory::*;
pub use error::ModelError;
pub use notes::{normalize_justification, NotesFields};
pub use record::{AppointmentRecord, SpecialtyRecord};
