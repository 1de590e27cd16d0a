//! Derived environmental indices.
//!
//! Everything in this module is a pure function of the latest indoor reading
//! and, for the comfort score, the current air-quality index.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Comfort band for a [`ComfortScore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComfortLabel {
    /// Score 70 and above.
    Excellent,
    /// Score 50 to 69.
    Good,
    /// Score 30 to 49.
    Moderate,
    /// Score below 30.
    Poor,
}

impl ComfortLabel {
    /// Band for an overall score.
    pub fn from_score(score: u8) -> Self {
        match score {
            70.. => ComfortLabel::Excellent,
            50..=69 => ComfortLabel::Good,
            30..=49 => ComfortLabel::Moderate,
            _ => ComfortLabel::Poor,
        }
    }
}

impl fmt::Display for ComfortLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComfortLabel::Excellent => write!(f, "EXCELLENT"),
            ComfortLabel::Good => write!(f, "GOOD"),
            ComfortLabel::Moderate => write!(f, "MODERATE"),
            ComfortLabel::Poor => write!(f, "POOR"),
        }
    }
}

/// Comfort score with its weighted breakdown.
///
/// ```
/// use toocold_core::{ComfortLabel, ComfortScore};
///
/// let ideal = ComfortScore::compute(22.0, 50.0, None);
/// assert_eq!(ideal.score, 100);
///
/// let muggy = ComfortScore::compute(32.0, 80.0, Some(200));
/// assert_eq!(muggy.score, 12);
/// assert_eq!(muggy.label, ComfortLabel::Poor);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComfortScore {
    /// Overall score, 0 to 100.
    pub score: u8,
    /// Band for the overall score.
    pub label: ComfortLabel,
    /// Temperature component, 0 to 100 (weight 0.4).
    pub temp_score: f64,
    /// Humidity component, 0 to 100 (weight 0.3).
    pub hum_score: f64,
    /// Air-quality component, 0 to 100 (weight 0.3). 100 when AQI is unknown.
    pub aqi_score: f64,
}

/// Ideal indoor temperature in °C.
pub const IDEAL_TEMP: f64 = 22.0;
/// Ideal relative humidity in %.
pub const IDEAL_HUMIDITY: f64 = 50.0;

impl ComfortScore {
    /// Score a temperature (°C), humidity (%RH) and optional US AQI.
    pub fn compute(temp: f64, hum: f64, aqi: Option<u32>) -> Self {
        let temp_score = (100.0 - (temp - IDEAL_TEMP).abs() * 10.0).max(0.0);
        let hum_score = (100.0 - (hum - IDEAL_HUMIDITY).abs() * 2.0).max(0.0);
        let aqi_score = match aqi {
            Some(aqi) => (100.0 - f64::from(aqi) * 0.5).max(0.0),
            None => 100.0,
        };

        let weighted = temp_score * 0.4 + hum_score * 0.3 + aqi_score * 0.3;
        let score = weighted.round().clamp(0.0, 100.0) as u8;

        Self {
            score,
            label: ComfortLabel::from_score(score),
            temp_score,
            hum_score,
            aqi_score,
        }
    }
}

/// Dew point in °C (Magnus formula).
///
/// Returns `None` when humidity is not positive or the result is not finite.
pub fn dew_point(temp: f64, hum: f64) -> Option<f64> {
    const A: f64 = 17.27;
    const B: f64 = 237.7;

    if hum.is_nan() || hum <= 0.0 {
        return None;
    }
    let alpha = (A * temp) / (B + temp) + (hum / 100.0).ln();
    let dp = (B * alpha) / (A - alpha);
    dp.is_finite().then_some(dp)
}

/// Apparent ("feels like") temperature in °C.
///
/// Uses the simple heat-index average below 80 °F and the Rothfusz regression
/// at or above it. The two formulas do not meet at 80 °F, so the result jumps
/// there.
pub fn feels_like(temp: f64, hum: f64) -> f64 {
    let tf = temp * 9.0 / 5.0 + 32.0;
    let h = hum;

    let hi = if tf >= 80.0 {
        -42.379 + 2.04901523 * tf + 10.14333127 * h
            - 0.22475541 * tf * h
            - 0.00683783 * tf * tf
            - 0.05481717 * h * h
            + 0.00122874 * tf * tf * h
            + 0.00085282 * tf * h * h
            - 0.00000199 * tf * tf * h * h
    } else {
        0.5 * (tf + 61.0 + (tf - 68.0) * 1.2 + h * 0.094)
    };

    (hi - 32.0) * 5.0 / 9.0
}

/// Dew point and apparent temperature for one reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Dew point in °C, absent when it cannot be computed.
    pub dew_point: Option<f64>,
    /// Apparent temperature in °C.
    pub feels_like: f64,
}

impl DerivedMetrics {
    /// Compute both metrics.
    pub fn compute(temp: f64, hum: f64) -> Self {
        Self {
            dew_point: dew_point(temp, hum),
            feels_like: feels_like(temp, hum),
        }
    }
}
