//! Ratio + proximity matcher
//!
//! Searches each segment with bounded look-ahead spans: the first trough
//! within the opening span, the first peak within the span after it and
//! the first retest trough within the span after the peak. The retest must
//! give back more than [`RANGE_MULTIPLE`] times the initial rally and land
//! near the halfway level. Scanning stops at the first matching segment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::helpers::{
    earliest_in, halfway_level, relative_deviation, FIRST_TROUGH_SPAN, PEAK_SPAN, RANGE_MULTIPLE,
    RETEST_SPAN,
};
use crate::{
    extrema::find_local_extrema,
    params::{get_period, get_ratio, ParamMeta, ParamType, ParameterizedMatcher},
    PatternError, PatternMatch, PatternMatcher, Period, PolicyId, Ratio, Result,
};

impl_with_defaults!(RatioProximityMatcher);

/// RATIO_PROXIMITY
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RatioProximityMatcher {
    pub window_size: Period,
    pub order: Period,
    pub tolerance: Ratio,
    pub trough_span: Period,
    pub peak_span: Period,
    pub retest_span: Period,
    pub range_multiple: f64,
}

impl Default for RatioProximityMatcher {
    fn default() -> Self {
        Self {
            window_size: Period::new_const(70),
            order: Period::new_const(2),
            tolerance: Ratio::new_const(0.10),
            trough_span: Period::new_const(FIRST_TROUGH_SPAN),
            peak_span: Period::new_const(PEAK_SPAN),
            retest_span: Period::new_const(RETEST_SPAN),
            range_multiple: RANGE_MULTIPLE,
        }
    }
}

impl RatioProximityMatcher {
    /// Total look-ahead across the three spans
    #[inline]
    pub fn look_ahead(&self) -> usize {
        self.trough_span
            .get()
            .saturating_add(self.peak_span.get())
            .saturating_add(self.retest_span.get())
    }
}

impl PatternMatcher for RatioProximityMatcher {
    fn id(&self) -> PolicyId {
        PolicyId("RATIO_PROXIMITY")
    }

    fn window_size(&self) -> usize {
        self.window_size.get()
    }

    fn min_bars(&self) -> usize {
        self.window_size.get().max(self.look_ahead())
    }

    fn first_match_only(&self) -> bool {
        true
    }

    fn match_window(&self, values: &[f64], start: usize) -> Result<Option<PatternMatch>> {
        let Some(segment) = start
            .checked_add(self.window_size.get())
            .and_then(|end| values.get(start..end))
        else {
            return Ok(None);
        };

        let ext = find_local_extrema(segment, self.order.get());

        let Some(trough) = earliest_in(&ext.minima, 0, self.trough_span.get()) else {
            return Ok(None);
        };
        let peak_from = trough + 1;
        let Some(peak) = earliest_in(
            &ext.maxima,
            peak_from,
            peak_from.saturating_add(self.peak_span.get()),
        ) else {
            return Ok(None);
        };
        let retest_from = peak + 1;
        let Some(retest) = earliest_in(
            &ext.minima,
            retest_from,
            retest_from.saturating_add(self.retest_span.get()),
        ) else {
            return Ok(None);
        };

        if !(trough < peak && peak < retest) {
            return Ok(None);
        }

        let (low, high, retest_value) = (segment[trough], segment[peak], segment[retest]);
        let small_range = high - low;
        let big_range = high - retest_value;
        if small_range == 0.0 {
            return Err(PatternError::DegenerateRatio {
                index: start + peak,
            });
        }

        let halfway = halfway_level(low, high);
        let deviation = relative_deviation(retest_value, halfway, start + retest)?;

        if big_range > small_range * self.range_multiple && deviation < self.tolerance.get() {
            Ok(Some(PatternMatch {
                policy: PatternMatcher::id(self),
                window_start: start,
                window_end: start + segment.len(),
                trough_index: start + trough,
                peak_index: start + peak,
                retest_index: start + retest,
                observed_index: start + retest,
                halfway,
                observed_value: retest_value,
                deviation,
            }))
        } else {
            Ok(None)
        }
    }

    fn validate_config(&self) -> Result<()> {
        if !self.range_multiple.is_finite() || self.range_multiple <= 0.0 {
            return Err(PatternError::OutOfRange {
                field: "range_multiple",
                value: self.range_multiple,
                min: f64::MIN_POSITIVE,
                max: f64::MAX,
            });
        }
        if self.tolerance.get() <= 0.0 {
            return Err(PatternError::InvalidValue("tolerance must be > 0"));
        }
        let order = self.order.get();
        let need = order
            .checked_mul(2)
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| PatternError::InvalidConfig(format!("order {order} is too large")))?;
        if self.window_size.get() < need {
            return Err(PatternError::InvalidConfig(format!(
                "window_size {} too short for order {order}",
                self.window_size.get(),
            )));
        }
        Ok(())
    }
}

const RANGE_MULTIPLE_PARAM: ParamMeta = ParamMeta::ratio(
    "range_multiple",
    RANGE_MULTIPLE,
    (1.0, 3.0, 0.25),
    "Retracement over rally multiple",
);

static RATIO_PROXIMITY_PARAMS: &[ParamMeta] = &[
    ParamMeta {
        name: "window_size",
        param_type: ParamType::Period,
        default: 70.0,
        range: (50.0, 120.0, 10.0),
        description: "Bars per segment",
    },
    ParamMeta {
        name: "order",
        param_type: ParamType::Period,
        default: 2.0,
        range: (1.0, 5.0, 1.0),
        description: "Neighbours each side an extremum must strictly beat",
    },
    ParamMeta {
        name: "tolerance",
        param_type: ParamType::Ratio,
        default: 0.10,
        range: (0.02, 0.2, 0.02),
        description: "Max relative distance of the retest from the halfway level",
    },
    ParamMeta {
        name: "trough_span",
        param_type: ParamType::Period,
        default: 15.0,
        range: (5.0, 30.0, 5.0),
        description: "Opening bars searched for the first trough",
    },
    ParamMeta {
        name: "peak_span",
        param_type: ParamType::Period,
        default: 15.0,
        range: (5.0, 30.0, 5.0),
        description: "Bars after the trough searched for the peak",
    },
    ParamMeta {
        name: "retest_span",
        param_type: ParamType::Period,
        default: 40.0,
        range: (20.0, 60.0, 10.0),
        description: "Bars after the peak searched for the retest",
    },
    RANGE_MULTIPLE_PARAM,
];

impl ParameterizedMatcher for RatioProximityMatcher {
    fn param_meta() -> &'static [ParamMeta] {
        RATIO_PROXIMITY_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        let range_multiple = params
            .get("range_multiple")
            .copied()
            .unwrap_or(RANGE_MULTIPLE);
        RANGE_MULTIPLE_PARAM.validate(range_multiple)?;

        Ok(Self {
            window_size: get_period(params, "window_size", 70)?,
            order: get_period(params, "order", 2)?,
            tolerance: get_ratio(params, "tolerance", 0.10)?,
            trough_span: get_period(params, "trough_span", FIRST_TROUGH_SPAN)?,
            peak_span: get_period(params, "peak_span", PEAK_SPAN)?,
            retest_span: get_period(params, "retest_span", RETEST_SPAN)?,
            range_multiple,
        })
    }
}
