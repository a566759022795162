use std::collections::HashSet;

use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::SchedulingConfig;
use shared_models::Appointment;
use shared_utils::{minutes_of_day, resolve_span, MinuteSpan};

use crate::models::{LayoutConfig, SlotPlacement, SpecialtyDurations};
use crate::services::packing::pack_intervals;

/// Turns one day's appointments into side-by-side blocks.
#[derive(Debug, Clone, Default)]
pub struct SlotLayoutEngine {
    config: LayoutConfig,
}

impl SlotLayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &SchedulingConfig) -> Self {
        Self::new(LayoutConfig::from_config(config))
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out `appointments` and returns placements in drawing order.
    ///
    /// Never fails: a missing start is drawn at the fallback start, and an
    /// end that is missing or not after the start is replaced by the
    /// specialty duration.
    pub fn layout_day(&self, appointments: &[Appointment], durations: &SpecialtyDurations) -> Vec<SlotPlacement> {
        let mut estimated: HashSet<Uuid> = HashSet::new();
        let intervals: Vec<(Uuid, MinuteSpan)> = appointments
            .iter()
            .map(|appointment| {
                let span = self.resolve(appointment, durations);
                if appointment.start_time.is_none() {
                    estimated.insert(appointment.id);
                }
                (appointment.id, span)
            })
            .collect();

        if !estimated.is_empty() {
            warn!(
                "{} appointment(s) without a start time drawn at the fallback start",
                estimated.len()
            );
        }

        let placements: Vec<SlotPlacement> = pack_intervals(intervals)
            .into_iter()
            .map(|packed| {
                let columns = packed.tracks_in_cluster;
                SlotPlacement {
                    appointment_id: packed.key,
                    start_minutes: packed.span.start,
                    end_minutes: packed.span.end,
                    top: self.top(packed.span.start),
                    height: self.height(packed.span.duration()),
                    column_index: packed.track,
                    columns_in_cluster: columns,
                    left_fraction: packed.track as f64 / columns as f64,
                    width_fraction: self.config.column_width_ratio / columns as f64,
                    estimated_start: estimated.contains(&packed.key),
                }
            })
            .collect();

        debug!("Laid out {} appointment(s)", placements.len());
        placements
    }

    fn resolve(&self, appointment: &Appointment, durations: &SpecialtyDurations) -> MinuteSpan {
        let duration = durations.duration_or(appointment.specialty_id, self.config.default_duration_minutes);
        match appointment.start_time {
            Some(start) => resolve_span(start, appointment.end_time, duration),
            None => {
                let start = self.config.fallback_start_minutes;
                let end = appointment
                    .end_time
                    .map(minutes_of_day)
                    .filter(|end| *end > start)
                    .unwrap_or(start + duration);
                MinuteSpan { start, end }
            }
        }
    }

    fn top(&self, start_minutes: u32) -> f64 {
        (start_minutes as f64 - self.config.day_start_minutes as f64) * self.config.pixels_per_minute
    }

    fn height(&self, duration_minutes: u32) -> f64 {
        (duration_minutes as f64 * self.config.pixels_per_minute).max(self.config.min_block_height)
    }
}
