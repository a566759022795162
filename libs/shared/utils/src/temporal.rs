//! Duration and time-of-day helpers shared by eligibility, layout and the
//! booking form.

use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use shared_config::DEFAULT_DURATION_MINUTES;
use shared_models::Specialty;

pub const MINUTES_PER_DAY: u32 = 24 * 60;
pub const BOOKING_SLOT_MINUTES: u32 = 30;
pub const FIRST_BOOKING_HOUR: u32 = 7;
pub const LAST_BOOKING_HOUR: u32 = 18;
pub const CALENDAR_ROWS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinuteSpan {
    pub start: u32,
    pub end: u32,
}

impl MinuteSpan {
    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn overlaps(&self, other: &MinuteSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

pub fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Visit length for a specialty, falling back to 30 minutes.
pub fn default_duration(specialty: Option<&Specialty>) -> u32 {
    specialty
        .map(|s| s.duration_or(DEFAULT_DURATION_MINUTES))
        .unwrap_or(DEFAULT_DURATION_MINUTES)
}

/// `start + duration`, clamped to the last minute of the day. Check
/// [`fits_in_day`] first when the clamp must not shorten the visit.
pub fn default_end_time(start: NaiveTime, duration_minutes: u32) -> NaiveTime {
    let end_minutes = (minutes_of_day(start) + duration_minutes).min(MINUTES_PER_DAY - 1);
    NaiveTime::from_hms_opt(end_minutes / 60, end_minutes % 60, 0).unwrap_or(start)
}

/// Whether a visit of `duration_minutes` starting at `start` ends before
/// midnight.
pub fn fits_in_day(start: NaiveTime, duration_minutes: u32) -> bool {
    minutes_of_day(start) + duration_minutes < MINUTES_PER_DAY
}

/// Explicit end when it is after `start`, otherwise `start + duration`.
pub fn resolve_span(start: NaiveTime, end: Option<NaiveTime>, duration_minutes: u32) -> MinuteSpan {
    let start_minutes = minutes_of_day(start);
    let end_minutes = match end.map(minutes_of_day) {
        Some(end_minutes) if end_minutes > start_minutes => end_minutes,
        _ => start_minutes + duration_minutes,
    };
    MinuteSpan {
        start: start_minutes,
        end: end_minutes,
    }
}

/// Half-hour start times offered by the booking form, 07:00 to 18:30.
pub fn booking_slots() -> Vec<NaiveTime> {
    let first = FIRST_BOOKING_HOUR * 60;
    let last = LAST_BOOKING_HOUR * 60 + BOOKING_SLOT_MINUTES;
    (first..=last)
        .step_by(BOOKING_SLOT_MINUTES as usize)
        .filter_map(|m| NaiveTime::from_hms_opt(m / 60, m % 60, 0))
        .collect()
}

/// End pre-filled when a slot is picked on the grid.
pub fn slot_default_end(start: NaiveTime) -> NaiveTime {
    let (end, _) = start.overflowing_add_signed(Duration::minutes(BOOKING_SLOT_MINUTES as i64));
    end
}

/// Hour rows drawn by the calendar, starting at `day_start`.
pub fn calendar_hours(day_start: NaiveTime) -> Vec<NaiveTime> {
    (0..CALENDAR_ROWS)
        .map(|i| day_start.hour() + i)
        .filter_map(|h| NaiveTime::from_hms_opt(h, 0, 0))
        .collect()
}
