use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_config::SchedulingConfig;
use shared_models::Specialty;

// ==============================================================================
// LAYOUT SETTINGS
// ==============================================================================

/// Geometry of the day column, in minutes and pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub day_start_minutes: u32,
    pub pixels_per_minute: f64,
    pub min_block_height: f64,
    /// Share of a divided slot that is drawn; the rest is the gap.
    pub column_width_ratio: f64,
    pub default_duration_minutes: u32,
    pub fallback_start_minutes: u32,
}

impl LayoutConfig {
    pub fn from_config(config: &SchedulingConfig) -> Self {
        Self {
            day_start_minutes: config.day_start_minutes(),
            pixels_per_minute: config.pixels_per_minute,
            min_block_height: config.min_block_height,
            column_width_ratio: config.column_width_ratio,
            default_duration_minutes: config.default_duration_minutes,
            fallback_start_minutes: config.fallback_start_minutes(),
        }
    }

    pub fn with_scale(mut self, day_start_minutes: u32, pixels_per_minute: f64) -> Self {
        self.day_start_minutes = day_start_minutes;
        self.pixels_per_minute = pixels_per_minute;
        self
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::from_config(&SchedulingConfig::default())
    }
}

// ==============================================================================
// SPECIALTY DURATIONS
// ==============================================================================

/// Configured visit length per specialty id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialtyDurations(HashMap<Uuid, u32>);

impl SpecialtyDurations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specialties<'a>(specialties: impl IntoIterator<Item = &'a Specialty>) -> Self {
        Self(
            specialties
                .into_iter()
                .filter_map(|s| s.default_duration_minutes.map(|minutes| (s.id, minutes)))
                .filter(|(_, minutes)| *minutes > 0)
                .collect(),
        )
    }

    pub fn insert(&mut self, specialty_id: Uuid, minutes: u32) {
        if minutes > 0 {
            self.0.insert(specialty_id, minutes);
        }
    }

    pub fn duration_or(&self, specialty_id: Option<Uuid>, fallback: u32) -> u32 {
        specialty_id
            .and_then(|id| self.0.get(&id).copied())
            .unwrap_or(fallback)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ==============================================================================
// PLACEMENT
// ==============================================================================

/// One renderable block of the day column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotPlacement {
    pub appointment_id: Uuid,
    pub start_minutes: u32,
    pub end_minutes: u32,
    pub top: f64,
    pub height: f64,
    pub column_index: usize,
    pub columns_in_cluster: usize,
    pub left_fraction: f64,
    pub width_fraction: f64,
    /// Start time was missing and the fallback was drawn instead.
    pub estimated_start: bool,
}

impl SlotPlacement {
    pub fn overlaps(&self, other: &SlotPlacement) -> bool {
        self.start_minutes < other.end_minutes && other.start_minutes < self.end_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_models::SpecialtyType;

    #[test]
    fn durations_skip_unset_and_zero_minutes() {
        let mut audiometry = Specialty::new(Uuid::new_v4(), "Audiometria", Some(SpecialtyType::Exam));
        audiometry.default_duration_minutes = Some(20);
        let mut broken = Specialty::new(Uuid::new_v4(), "Raio-X", Some(SpecialtyType::Exam));
        broken.default_duration_minutes = Some(0);
        let plain = Specialty::new(Uuid::new_v4(), "Clínico Geral", None);

        let durations = SpecialtyDurations::from_specialties([&audiometry, &broken, &plain]);

        assert_eq!(durations.len(), 1);
        assert_eq!(durations.duration_or(Some(audiometry.id), 30), 20);
        assert_eq!(durations.duration_or(Some(broken.id), 30), 30);
        assert_eq!(durations.duration_or(None, 45), 45);
    }

    #[test]
    fn default_layout_follows_scheduling_defaults() {
        let config = LayoutConfig::default();
        assert_eq!(config.day_start_minutes, 360);
        assert_eq!(config.fallback_start_minutes, 480);
        assert_eq!(config.default_duration_minutes, 30);
    }

    #[test]
    fn placement_serializes_with_snake_case_fields() {
        let placement = SlotPlacement {
            appointment_id: Uuid::nil(),
            start_minutes: 480,
            end_minutes: 510,
            top: 120.0,
            height: 30.0,
            column_index: 0,
            columns_in_cluster: 1,
            left_fraction: 0.0,
            width_fraction: 0.9,
            estimated_start: false,
        };
        let json = serde_json::to_value(&placement).unwrap();
        assert_eq!(json["columns_in_cluster"], 1);
        assert_eq!(json["top"], 120.0);
    }
}
