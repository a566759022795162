use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_DURATION_MINUTES: u32 = 30;
pub const DEFAULT_PENALTY_DAYS: u32 = 15;
pub const DEFAULT_VALIDITY_MONTHS: u32 = 6;
pub const DEFAULT_OPHTHALMOLOGY_VALIDITY_MONTHS: u32 = 12;

/// Tunables shared by the eligibility and calendar cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingConfig {
    pub day_start: NaiveTime,
    pub pixels_per_minute: f64,
    pub min_block_height: f64,
    pub column_width_ratio: f64,
    pub default_duration_minutes: u32,
    pub fallback_start: NaiveTime,
    pub penalty_days: u32,
    pub validity_months: u32,
    pub ophthalmology_validity_months: u32,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            day_start: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN),
            pixels_per_minute: 1.0,
            min_block_height: 20.0,
            column_width_ratio: 0.9,
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
            fallback_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            penalty_days: DEFAULT_PENALTY_DAYS,
            validity_months: DEFAULT_VALIDITY_MONTHS,
            ophthalmology_validity_months: DEFAULT_OPHTHALMOLOGY_VALIDITY_MONTHS,
        }
    }
}

impl SchedulingConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            day_start: env_or("AGENDA_DAY_START", defaults.day_start, parse_clock),
            pixels_per_minute: env_or("AGENDA_PIXELS_PER_MINUTE", defaults.pixels_per_minute, parse_number),
            min_block_height: env_or("AGENDA_MIN_BLOCK_HEIGHT", defaults.min_block_height, parse_number),
            column_width_ratio: env_or("AGENDA_COLUMN_WIDTH_RATIO", defaults.column_width_ratio, parse_number),
            default_duration_minutes: env_or(
                "AGENDA_DEFAULT_DURATION_MINUTES",
                defaults.default_duration_minutes,
                parse_number,
            ),
            fallback_start: env_or("AGENDA_FALLBACK_START", defaults.fallback_start, parse_clock),
            penalty_days: env_or("AGENDA_PENALTY_DAYS", defaults.penalty_days, parse_number),
            validity_months: env_or("AGENDA_VALIDITY_MONTHS", defaults.validity_months, parse_number),
            ophthalmology_validity_months: env_or(
                "AGENDA_OPHTHALMOLOGY_VALIDITY_MONTHS",
                defaults.ophthalmology_validity_months,
                parse_number,
            ),
        };

        if !config.is_consistent() {
            warn!("Scheduling configuration is inconsistent, falling back to defaults");
            return defaults;
        }

        config
    }

    /// False when a value would make layout or eligibility meaningless.
    pub fn is_consistent(&self) -> bool {
        self.pixels_per_minute > 0.0
            && self.min_block_height >= 0.0
            && self.column_width_ratio > 0.0
            && self.column_width_ratio <= 1.0
            && self.default_duration_minutes > 0
            && self.validity_months > 0
            && self.ophthalmology_validity_months > 0
    }

    pub fn day_start_minutes(&self) -> u32 {
        self.day_start.hour() * 60 + self.day_start.minute()
    }

    pub fn fallback_start_minutes(&self) -> u32 {
        self.fallback_start.hour() * 60 + self.fallback_start.minute()
    }
}

fn env_or<T, F>(key: &str, default: T, parse: F) -> T
where
    T: std::fmt::Debug,
    F: Fn(&str) -> Result<T>,
{
    match env::var(key) {
        Ok(raw) => parse(&raw).unwrap_or_else(|e| {
            warn!("{} has an invalid value ({}), using default {:?}", key, e, default);
            default
        }),
        Err(_) => default,
    }
}

fn parse_clock(raw: &str) -> Result<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .with_context(|| format!("expected HH:MM, got '{}'", trimmed))
}

fn parse_number<T: FromStr>(raw: &str) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| anyhow!("'{}' is not a number", raw.trim()))
}
