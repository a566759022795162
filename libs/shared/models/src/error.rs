use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown appointment status: {0}")]
    UnknownStatus(String),

    #[error("Unknown specialty type: {0}")]
    UnknownSpecialtyType(String),

    #[error("Invalid wall-clock time: {0}")]
    InvalidTime(String),
}
