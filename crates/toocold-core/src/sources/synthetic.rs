//! Synthetic indoor series used in demo mode and as the indoor fallback.

use time::{Duration, OffsetDateTime};

use toocold_types::Reading;

/// Number of synthetic points.
pub const SYNTHETIC_POINTS: usize = 48;
/// Spacing between synthetic points.
pub const SYNTHETIC_SPACING: Duration = Duration::minutes(30);

/// Generate 48 readings, 30 minutes apart, the last one at `now`.
///
/// `temp = 22 + 3 sin(i/8)` and `hum = 55 + 10 cos(i/8)`. No battery level.
pub fn synthetic_series(now: OffsetDateTime) -> Vec<Reading> {
    (0..SYNTHETIC_POINTS)
        .map(|i| {
            let steps_back = (SYNTHETIC_POINTS - 1 - i) as i32;
            let x = i as f64 / 8.0;
            Reading::new(
                now - SYNTHETIC_SPACING * steps_back,
                22.0 + x.sin() * 3.0,
                55.0 + x.cos() * 10.0,
            )
        })
        .collect()
}
