// src/config/range.rs

//! `"(start, stop, step)"` range strings used in `random` and `combination`
//! parameters.
//!
//! Labels are optional (`"(start=1, stop=10, step=2)"`), `step` defaults to 1
//! and `stop` is included whenever it is reachable from `start`.

use regex::Regex;

use crate::errors::{GenError, Result};

const RANGE_PATTERN: &str = r"^\s*\(\s*(?:start\s*=\s*)?(?P<start>[-+]?\d*\.?\d+)\s*,\s*(?:stop\s*=\s*)?(?P<stop>[-+]?\d*\.?\d+)\s*(?:,\s*(?:step\s*=\s*)?(?P<step>[-+]?\d*\.?\d+)\s*)?\)\s*$";

/// A parsed range string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSpec {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
    /// Largest number of decimal places among the three bounds.
    pub decimals: u32,
}

impl RangeSpec {
    /// Whether all three bounds were written without a fractional part.
    pub fn is_integral(&self) -> bool {
        self.decimals == 0
    }

    /// Expand into the listed values, rounded to `decimals` places.
    pub fn values(&self) -> Vec<f64> {
        // Tolerance so that e.g. (0.1, 0.3, 0.1) still reaches 0.3.
        let steps = ((self.stop - self.start) / self.step + 1e-9).floor() as usize;
        let scale = 10f64.powi(self.decimals as i32);
        (0..=steps)
            .map(|i| ((self.start + i as f64 * self.step) * scale).round() / scale)
            .collect()
    }
}

/// Parse a range string such as `"(1, 10, 1)"` or `"(start=0.1, stop=0.5, step=0.1)"`.
pub fn parse_range(input: &str) -> Result<RangeSpec> {
    let re = Regex::new(RANGE_PATTERN).map_err(anyhow::Error::from)?;
    let caps = re.captures(input).ok_or_else(|| {
        GenError::ConfigError(format!(
            "invalid range '{input}' (expected \"(start, stop[, step])\")"
        ))
    })?;

    let field = |name: &str| caps.name(name).map(|m| m.as_str());
    let start_str = field("start").unwrap_or("0");
    let stop_str = field("stop").unwrap_or("0");
    let step_str = field("step").unwrap_or("1");

    let decimals = [start_str, stop_str, step_str]
        .iter()
        .map(|s| decimal_places(s))
        .max()
        .unwrap_or(0);

    let spec = RangeSpec {
        start: parse_f64(start_str, input)?,
        stop: parse_f64(stop_str, input)?,
        step: parse_f64(step_str, input)?,
        decimals,
    };

    if spec.step <= 0.0 {
        return Err(GenError::ConfigError(format!(
            "invalid range '{input}': step must be > 0"
        )));
    }
    if spec.stop < spec.start {
        return Err(GenError::ConfigError(format!(
            "invalid range '{input}': stop must be >= start"
        )));
    }

    Ok(spec)
}

fn parse_f64(s: &str, input: &str) -> Result<f64> {
    s.parse::<f64>()
        .map_err(|e| GenError::ConfigError(format!("invalid number '{s}' in range '{input}': {e}")))
}

fn decimal_places(s: &str) -> u32 {
    s.split_once('.').map_or(0, |(_, frac)| frac.len() as u32)
}
