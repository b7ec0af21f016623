//! Shared level and ratio arithmetic for the matching policies.

use crate::{PatternError, Result};

/// Minimum bars the two-trough tail (second peak onward) must exceed
pub const MIN_TAIL_BARS: usize = 3;

/// Ratio+proximity look-ahead spans
pub const FIRST_TROUGH_SPAN: usize = 15;
pub const PEAK_SPAN: usize = 15;
pub const RETEST_SPAN: usize = 40;

/// Retracement must exceed the initial rally by this multiple
pub const RANGE_MULTIPLE: f64 = 1.5;

/// Midpoint between a trough and the peak that follows it.
#[inline]
pub fn halfway_level(trough: f64, peak: f64) -> f64 {
    (trough + peak) / 2.0
}

/// `|value - target| / target`, or `DegenerateRatio` when `target` is zero
/// or the ratio is not finite. `index` is the series position being tested.
#[inline]
pub fn relative_deviation(value: f64, target: f64, index: usize) -> Result<f64> {
    if target == 0.0 {
        return Err(PatternError::DegenerateRatio { index });
    }
    let ratio = ((value - target) / target).abs();
    if !ratio.is_finite() {
        return Err(PatternError::DegenerateRatio { index });
    }
    Ok(ratio)
}

/// Earliest index in ascending `sorted` that falls inside `from..to`.
#[inline]
pub fn earliest_in(sorted: &[usize], from: usize, to: usize) -> Option<usize> {
    let pos = sorted.partition_point(|&i| i < from);
    sorted.get(pos).copied().filter(|&i| i < to)
}
