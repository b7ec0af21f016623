//! Two-trough matcher
//!
//! Slides a fixed window one bar at a time. Inside each window the first
//! local minimum is the small-u trough, the first local maximum the big-U
//! top, and the second minimum the retest. After the retest a second peak
//! must form, followed by a tail of more than [`MIN_TAIL_BARS`] bars whose
//! last value is compared against the halfway level.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::helpers::{halfway_level, relative_deviation, MIN_TAIL_BARS};
use crate::{
    extrema::{find_local_extrema, first_after},
    params::{get_period, get_ratio, ParamMeta, ParamType, ParameterizedMatcher},
    PatternError, PatternMatch, PatternMatcher, Period, PolicyId, Ratio, Result,
};

impl_with_defaults!(TwoTroughMatcher);

/// How the last price of the window is compared to the halfway level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HalfwayRule {
    /// `|last - halfway| / halfway < tolerance`
    #[default]
    WithinTolerance,
    /// `last <= halfway`
    AtOrBelow,
}

/// TWO_TROUGH / TWO_TROUGH_AT_OR_BELOW
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TwoTroughMatcher {
    pub window_size: Period,
    pub order: Period,
    pub tolerance: Ratio,
    pub min_tail: usize,
    pub halfway_rule: HalfwayRule,
}

impl Default for TwoTroughMatcher {
    fn default() -> Self {
        Self {
            window_size: Period::new_const(50),
            order: Period::new_const(2),
            tolerance: Ratio::new_const(0.05),
            min_tail: MIN_TAIL_BARS,
            halfway_rule: HalfwayRule::WithinTolerance,
        }
    }
}

impl TwoTroughMatcher {
    /// Variant that accepts any last price at or below the halfway level
    pub fn at_or_below() -> Self {
        Self {
            halfway_rule: HalfwayRule::AtOrBelow,
            ..Self::default()
        }
    }
}

impl PatternMatcher for TwoTroughMatcher {
    fn id(&self) -> PolicyId {
        match self.halfway_rule {
            HalfwayRule::WithinTolerance => PolicyId("TWO_TROUGH"),
            HalfwayRule::AtOrBelow => PolicyId("TWO_TROUGH_AT_OR_BELOW"),
        }
    }

    fn window_size(&self) -> usize {
        self.window_size.get()
    }

    fn match_window(&self, values: &[f64], start: usize) -> Result<Option<PatternMatch>> {
        let Some(window) = start
            .checked_add(self.window_size.get())
            .and_then(|end| values.get(start..end))
        else {
            return Ok(None);
        };

        let ext = find_local_extrema(window, self.order.get());
        if ext.minima.len() < 2 || ext.maxima.len() < 2 {
            return Ok(None);
        }

        let trough = ext.minima[0];
        let peak = ext.maxima[0];
        if trough >= peak {
            return Ok(None);
        }

        let retest = ext.minima[1];
        if retest <= peak {
            return Ok(None);
        }

        let Some(second_peak) = first_after(&ext.maxima, retest) else {
            return Ok(None);
        };

        // Tail runs from the second peak to the window end, inclusive
        if window.len() - second_peak <= self.min_tail {
            return Ok(None);
        }

        let observed = window.len() - 1;
        let last = window[observed];
        let halfway = halfway_level(window[trough], window[peak]);
        let deviation = relative_deviation(last, halfway, start + observed)?;

        let hit = match self.halfway_rule {
            HalfwayRule::WithinTolerance => deviation < self.tolerance.get(),
            HalfwayRule::AtOrBelow => last <= halfway,
        };
        if !hit {
            return Ok(None);
        }

        Ok(Some(PatternMatch {
            policy: PatternMatcher::id(self),
            window_start: start,
            window_end: start + window.len(),
            trough_index: start + trough,
            peak_index: start + peak,
            retest_index: start + retest,
            observed_index: start + observed,
            halfway,
            observed_value: last,
            deviation,
        }))
    }

    fn validate_config(&self) -> Result<()> {
        let order = self.order.get();
        let need = order
            .checked_mul(4)
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| PatternError::InvalidConfig(format!("order {order} is too large")))?;
        if self.window_size.get() < need {
            return Err(PatternError::InvalidConfig(format!(
                "window_size {} cannot hold two troughs at order {} (need >= {need})",
                self.window_size.get(),
                self.order.get(),
            )));
        }
        if self.tolerance.get() <= 0.0 {
            return Err(PatternError::InvalidValue("tolerance must be > 0"));
        }
        Ok(())
    }
}

static TWO_TROUGH_PARAMS: &[ParamMeta] = &[
    ParamMeta {
        name: "window_size",
        param_type: ParamType::Period,
        default: 50.0,
        range: (30.0, 90.0, 10.0),
        description: "Bars per scan window",
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
        default: 0.05,
        range: (0.01, 0.1, 0.01),
        description: "Max relative distance of the last price from the halfway level",
    },
];

impl ParameterizedMatcher for TwoTroughMatcher {
    fn param_meta() -> &'static [ParamMeta] {
        TWO_TROUGH_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            window_size: get_period(params, "window_size", 50)?,
            order: get_period(params, "order", 2)?,
            tolerance: get_ratio(params, "tolerance", 0.05)?,
            ..Self::default()
        })
    }
}
