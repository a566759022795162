use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ModelError;

// ==============================================================================
// SPECIALTY
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specialty {
    pub id: Uuid,
    pub name: String,
    pub clinic_id: Option<Uuid>,
    /// Some catalogue rows never had their type filled in.
    pub kind: Option<SpecialtyType>,
    pub default_duration_minutes: Option<u32>,
}

impl Specialty {
    pub fn new(id: Uuid, name: impl Into<String>, kind: Option<SpecialtyType>) -> Self {
        Self {
            id,
            name: name.into(),
            clinic_id: None,
            kind,
            default_duration_minutes: None,
        }
    }

    /// Configured visit length, or `fallback` when unset or zero.
    pub fn duration_or(&self, fallback: u32) -> u32 {
        match self.default_duration_minutes {
            Some(minutes) if minutes > 0 => minutes,
            _ => fallback,
        }
    }

    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecialtyType {
    #[serde(alias = "CONSULTA")]
    Consultation,
    #[serde(alias = "EXAME")]
    Exam,
    #[serde(alias = "EXAME_ADMISSIONAL")]
    AdmissionExam,
    #[serde(alias = "EXAME_DEMISSIONAL")]
    TerminationExam,
    #[serde(alias = "TESTE_PSICOLOGICO")]
    PsychTest,
}

impl fmt::Display for SpecialtyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecialtyType::Consultation => write!(f, "CONSULTATION"),
            SpecialtyType::Exam => write!(f, "EXAM"),
            SpecialtyType::AdmissionExam => write!(f, "ADMISSION_EXAM"),
            SpecialtyType::TerminationExam => write!(f, "TERMINATION_EXAM"),
            SpecialtyType::PsychTest => write!(f, "PSYCH_TEST"),
        }
    }
}

impl FromStr for SpecialtyType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CONSULTATION" | "CONSULTA" => Ok(SpecialtyType::Consultation),
            "EXAM" | "EXAME" => Ok(SpecialtyType::Exam),
            "ADMISSION_EXAM" | "EXAME_ADMISSIONAL" => Ok(SpecialtyType::AdmissionExam),
            "TERMINATION_EXAM" | "EXAME_DEMISSIONAL" => Ok(SpecialtyType::TerminationExam),
            "PSYCH_TEST" | "TESTE_PSICOLOGICO" => Ok(SpecialtyType::PsychTest),
            other => Err(ModelError::UnknownSpecialtyType(other.to_string())),
        }
    }
}

// ==============================================================================
// PATIENT, CLINIC, COMPANY
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub company_id: Option<Uuid>,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub registration: Option<String>,
}

impl Patient {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            company_id: None,
            cpf: None,
            phone: None,
            email: None,
            registration: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinic {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}
