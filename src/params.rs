//! User-facing detector parameters.
//!
//! Callers hand the engine a JSON object keyed by the names returned from
//! [`parameter_names`]; all four keys are mandatory. The struct form is
//! also plain serde data for embedding in larger configs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

pub const SENSITIVITY: &str = "sensitivity";
pub const MAX_GAP: &str = "maxGap";
pub const MIN_SEGMENT_LENGTH: &str = "minSegmentLength";
pub const CHANNEL_WIDTH: &str = "channelWidth";

/// Ordered list of the recognized parameter keys.
pub fn parameter_names() -> [&'static str; 4] {
    [SENSITIVITY, MAX_GAP, MIN_SEGMENT_LENGTH, CHANNEL_WIDTH]
}

/// Knobs controlling segment discovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserParameters {
    /// Rejection threshold exponent: a Hough peak is accepted only when its
    /// log-probability under the noise model falls below `-sensitivity*ln 10`.
    pub sensitivity: i32,
    /// Empty positions tolerated while walking a channel before the current
    /// run is closed.
    pub max_gap: i32,
    /// Minimum accepted segment length in pixels (compared squared).
    pub min_segment_length: i32,
    /// Width of the scan channel in pixels; odd, at least 3.
    pub channel_width: i16,
}

impl UserParameters {
    /// Parse from a JSON object, reporting which key is missing or mistyped.
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        Ok(Self {
            sensitivity: get_int(value, SENSITIVITY)?,
            max_gap: get_int(value, MAX_GAP)?,
            min_segment_length: get_int(value, MIN_SEGMENT_LENGTH)?,
            channel_width: get_int(value, CHANNEL_WIDTH)?,
        })
    }

    /// Log-probability threshold applied to the Poisson peak test.
    pub(crate) fn threshold_lnp(&self) -> f64 {
        f64::from(self.sensitivity) * -std::f64::consts::LN_10
    }

    /// Squared minimum segment length.
    pub(crate) fn min_length_squared(&self) -> f64 {
        let l = f64::from(self.min_segment_length);
        l * l
    }

    /// Half-width of the scan channel; the width is clamped to at least 3.
    pub(crate) fn channel_radius(&self) -> i64 {
        i64::from(self.channel_width.max(3) - 1) / 2
    }

    /// Gap tolerance clamped to non-negative.
    pub(crate) fn max_gap(&self) -> i64 {
        i64::from(self.max_gap.max(0))
    }
}

fn get_int<T>(value: &Value, name: &'static str) -> Result<T, Error>
where
    T: TryFrom<i64>,
{
    let raw = value.get(name).ok_or(Error::MissingParameter(name))?;
    raw.as_i64()
        .and_then(|n| T::try_from(n).ok())
        .ok_or(Error::ParameterTypeMismatch(name))
}
