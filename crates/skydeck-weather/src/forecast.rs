//! Daily forecast aggregation.
//!
//! The provider returns 3-hourly samples; the dashboard shows one entry per
//! calendar day. The first sample at or after local noon represents its day.
//! A day with no sample at or after noon is skipped, not backfilled.

use std::collections::HashSet;

use chrono::{NaiveDate, TimeZone, Timelike};

use crate::types::{ForecastDay, ForecastSample};

/// Maximum number of days returned by [`daily_forecast`].
pub const MAX_FORECAST_DAYS: usize = 5;

/// First local hour eligible to represent a day.
const MIDDAY_HOUR: u32 = 12;

/// Collapse a chronological sample list into at most [`MAX_FORECAST_DAYS`] days.
///
/// Days appear in the order first encountered. Once a day has an entry, later
/// samples for it are ignored even if they sit closer to noon.
pub fn daily_forecast<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<ForecastDay> {
    let mut days = Vec::with_capacity(MAX_FORECAST_DAYS);
    let mut seen: HashSet<NaiveDate> = HashSet::new();

    for sample in samples {
        if days.len() == MAX_FORECAST_DAYS {
            break;
        }

        let Some(local) = tz.timestamp_opt(sample.dt, 0).single() else {
            tracing::debug!(dt = sample.dt, "Skipping forecast sample with invalid timestamp");
            continue;
        };

        let date = local.date_naive();
        if local.hour() < MIDDAY_HOUR || seen.contains(&date) {
            continue;
        }

        let Some(conditions) = sample.weather.first() else {
            tracing::debug!(dt = sample.dt, "Skipping forecast sample without conditions");
            continue;
        };

        seen.insert(date);
        days.push(ForecastDay {
            date,
            temp: round_temp(sample.main.temp),
            condition: conditions.main.clone(),
            description: conditions.description.clone(),
            icon: conditions.icon.clone(),
        });
    }

    days
}

/// Round to the nearest whole degree, halves toward +∞ (-2.5 → -2, 2.5 → 3).
pub(crate) fn round_temp(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
