//! Parameter metadata for matching policies
//!
//! This module describes the tunable parameters of each matcher, enabling:
//! - Parameter sweeps over window size, extremum order and tolerance
//! - Parameter documentation
//! - Building a matcher from a loosely-typed parameter map
//!
//! # Example
//!
//! ```rust
//! use uscan::params::{ParamMeta, ParamType, ParameterizedMatcher};
//! use uscan::prelude::*;
//!
//! let params = TwoTroughMatcher::param_meta();
//! for param in params {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//! ```

use std::collections::HashMap;

use crate::{PatternError, Period, Ratio, Result};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Real-valued parameter (tolerances, range multiples)
  Ratio,
  /// Bar count (positive integer)
  Period,
}

/// Metadata for a single matcher parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "tolerance")
  pub name: &'static str,
  pub param_type: ParamType,
  pub default: f64,
  /// Sweep range: (min, max, step)
  pub range: (f64, f64, f64),
  pub description: &'static str,
}

impl ParamMeta {
  pub const fn ratio(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Ratio, default, range, description }
  }

  pub const fn period(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description }
  }

  /// All values of the sweep range, inclusive of both ends
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    if step <= 0.0 {
      return vec![min];
    }
    let mut values = Vec::new();
    let mut k = 0u32;
    loop {
      let v = min + step * f64::from(k);
      if v > max + step * 1e-9 {
        break;
      }
      values.push(v);
      k += 1;
    }
    values
  }

  /// Validate a value against the sweep range and the parameter type
  pub fn validate(&self, value: f64) -> Result<()> {
    let (min, max, _) = self.range;
    if value.is_nan() || value < min || value > max {
      return Err(PatternError::OutOfRange { field: self.name, value, min, max });
    }
    match self.param_type {
      ParamType::Ratio => Ok(()),
      ParamType::Period => {
        if value < 1.0 || value.fract() != 0.0 {
          return Err(PatternError::InvalidValue("Period must be a positive integer"));
        }
        Ok(())
      },
    }
  }
}

// ============================================================
// PARAMETERIZED MATCHER TRAIT
// ============================================================

/// Matchers that can be described and built from a parameter map
pub trait ParameterizedMatcher: Sized {
  /// Returns metadata for all configurable parameters
  fn param_meta() -> &'static [ParamMeta];

  /// Creates a matcher from a parameter map. Missing parameters use their defaults.
  fn with_params(params: &HashMap<&str, f64>) -> Result<Self>;
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Ratio from params with default fallback
pub fn get_ratio(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Ratio> {
  let value = params.get(key).copied().unwrap_or(default);
  Ratio::new(value)
}

/// Period from params with default fallback
pub fn get_period(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<Period> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  if value.fract() != 0.0 || value < 0.0 {
    return Err(PatternError::InvalidValue("Period must be a positive integer"));
  }
  Period::new(value as usize)
}

// ============================================================
// TESTS
// ============================================================
