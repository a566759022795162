//! Row shapes of the hosted storage schema and their mapping to the typed
//! entities. Column names are the schema's, not ours.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::appointment::{parse_wall_clock, Appointment, AppointmentStatus, SchedulingMode};
use crate::directory::{Specialty, SpecialtyType};
use crate::notes::NotesFields;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: Uuid,
    pub data: NaiveDate,
    pub hora_inicio: Option<String>,
    pub hora_fim: Option<String>,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub guia_gerada: Option<bool>,
    #[serde(default)]
    pub paciente_id: Option<Uuid>,
    #[serde(default)]
    pub clinica_id: Option<Uuid>,
    #[serde(default)]
    pub especialidade_id: Option<Uuid>,
    #[serde(default)]
    pub empresa_id: Option<Uuid>,
    #[serde(default)]
    pub profissional: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
}

impl From<AppointmentRecord> for Appointment {
    fn from(record: AppointmentRecord) -> Self {
        let notes = NotesFields::parse(record.observacoes.as_deref().unwrap_or(""));

        Appointment {
            id: record.id,
            patient_id: record.paciente_id,
            clinic_id: record.clinica_id,
            specialty_id: record.especialidade_id,
            company_id: record.empresa_id,
            date: record.data,
            start_time: lenient_time(record.id, record.hora_inicio.as_deref()),
            end_time: lenient_time(record.id, record.hora_fim.as_deref()),
            status: record.status,
            professional: record.profissional,
            is_online: notes.is_online,
            scheduling_mode: if notes.arrival_order {
                SchedulingMode::ArrivalOrder
            } else {
                SchedulingMode::FixedTime
            },
            override_justification: notes.justification,
            notes: if notes.text.is_empty() { None } else { Some(notes.text) },
            guide_generated: record.guia_gerada.unwrap_or(false),
        }
    }
}

impl From<&Appointment> for AppointmentRecord {
    fn from(appointment: &Appointment) -> Self {
        let observacoes = NotesFields::from_appointment(appointment).render();

        AppointmentRecord {
            id: appointment.id,
            data: appointment.date,
            hora_inicio: appointment.start_time.map(format_wall_clock),
            hora_fim: appointment.end_time.map(format_wall_clock),
            status: appointment.status,
            guia_gerada: Some(appointment.guide_generated),
            paciente_id: appointment.patient_id,
            clinica_id: appointment.clinic_id,
            especialidade_id: appointment.specialty_id,
            empresa_id: appointment.company_id,
            profissional: appointment.professional.clone(),
            observacoes: if observacoes.is_empty() { None } else { Some(observacoes) },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialtyRecord {
    pub id: Uuid,
    pub nome: String,
    #[serde(default)]
    pub clinica_id: Option<Uuid>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub duracao_minutos: Option<i32>,
}

impl From<SpecialtyRecord> for Specialty {
    fn from(record: SpecialtyRecord) -> Self {
        let kind = record.tipo.as_deref().filter(|t| !t.trim().is_empty()).and_then(|t| {
            t.parse::<SpecialtyType>()
                .map_err(|e| warn!("Specialty {} has {}; treating type as unset", record.id, e))
                .ok()
        });

        Specialty {
            id: record.id,
            name: record.nome,
            clinic_id: record.clinica_id,
            kind,
            default_duration_minutes: record
                .duracao_minutos
                .and_then(|m| u32::try_from(m).ok())
                .filter(|m| *m > 0),
        }
    }
}

pub fn format_wall_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

fn lenient_time(id: Uuid, raw: Option<&str>) -> Option<NaiveTime> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    match parse_wall_clock(raw) {
        Ok(time) => Some(time),
        Err(e) => {
            warn!("Appointment {} has {}; leaving time unset", id, e);
            None
        }
    }
}
