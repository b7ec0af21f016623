//! # USCAN - U-shaped reversal scanner
//!
//! Detects the "small u, big U, halfway retest" formation in price series:
//! price falls to a trough, rallies to a peak, then retraces and stalls near
//! the midpoint between the two.
//!
//! ## Quick Start
//!
//! ```rust
//! use uscan::prelude::*;
//!
//! let mut closes = vec![
//!     100.0, 95.0, 90.0, 95.0, 100.0, 105.0, 110.0, 105.0, 100.0, 95.0, 92.0, 95.0, 98.0,
//!     101.0, 103.0, 101.0,
//! ];
//! closes.resize(50, 100.0);
//!
//! let bars: Vec<Bar> = closes
//!     .iter()
//!     .enumerate()
//!     .map(|(i, c)| Bar::flat(i as i64 * 86_400, *c))
//!     .collect();
//! let series = Series::new(bars).unwrap();
//!
//! // Two-trough policy: 3-bar smoothing, 50-bar window, order 2, 5% tolerance
//! let scanner = ScannerBuilder::new()
//!     .with_two_trough_defaults()
//!     .build()
//!     .unwrap();
//!
//! let result = scanner.scan(&series).unwrap();
//! let m = result.matches()[0];
//! assert_eq!((m.trough_index, m.peak_index), (2, 6));
//! ```

pub mod extrema;
pub mod matchers;
pub mod notify;
pub mod params;
pub mod series;
pub mod sizing;
pub mod smoother;

pub use series::{Bar, MatchTimestamps, PartialBar, Series};
pub use smoother::{smooth, SmoothedSeries};

pub mod prelude {
    pub use crate::{
        // Stages
        extrema::{find_local_extrema, Extrema},
        // Matchers
        matchers::*,
        // Notification boundary
        notify::{AlertLedger, MatchEvent},
        // Parameters
        params::{get_period, get_ratio, ParamMeta, ParamType, ParameterizedMatcher},
        // Parallel
        scan,
        scan_all,
        scan_parallel,
        series::{Bar, MatchTimestamps, PartialBar, Series},
        sizing::PositionLimits,
        smoother::{smooth, SmoothedSeries},
        // Engine
        BuiltinMatcher,
        InstrumentError,
        InstrumentScan,
        // Types
        OHLCVExt,
        // Errors
        PatternError,
        PatternMatch,
        // Core traits
        PatternMatcher,
        PatternScanner,
        Period,
        Policy,
        PolicyId,
        Ratio,
        Result,
        ScanParams,
        ScanResult,
        ScannerBuilder,
        WindowIterator,
        WindowScan,
        WindowOutcome,
        OHLCV,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, PatternError>;

/// Errors that can occur while building series or scanning them
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatternError {
    #[error("Empty input: series has no bars")]
    EmptyInput,

    #[error("Insufficient data: need {need} bars, got {got}")]
    InsufficientData { need: usize, got: usize },

    #[error("Degenerate ratio at index {index}: reference level is zero")]
    DegenerateRatio { index: usize },

    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: &'static str },

    #[error("Timestamps not strictly increasing at index {index}")]
    UnsortedTimestamps { index: usize },
}

impl PatternError {
    /// Errors a multi-instrument scan should skip past rather than abort on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PatternError::EmptyInput
                | PatternError::InsufficientData { .. }
                | PatternError::DegenerateRatio { .. }
        )
    }
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Normalized value in range 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ratio(f64);

impl Ratio {
    /// Create a new Ratio, validating the value is in [0.0, 1.0]
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(PatternError::InvalidValue(
                "Ratio cannot be NaN or infinite",
            ));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(PatternError::OutOfRange {
                field: "Ratio",
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self(value))
    }

    /// Create a Ratio from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Ratio {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Ratio {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Ratio::new(value).map_err(serde::de::Error::custom)
    }
}

/// Bar count (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(PatternError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLCV TRAITS
// ============================================================

/// Core bar data trait. Implement it to build a [`Series`] from your own bar type.
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    /// Unix seconds
    fn timestamp(&self) -> i64;
}

/// Extension trait with computed properties for OHLCV data
pub trait OHLCVExt: OHLCV {
    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    /// Validate bar consistency: finite, non-negative prices and high >= low
    fn validate(&self) -> Result<()> {
        let prices = [self.open(), self.high(), self.low(), self.close()];
        if prices.iter().any(|p| p.is_nan()) {
            return Err(PatternError::InvalidBar {
                index: 0,
                reason: "NaN in OHLC",
            });
        }
        if prices.iter().any(|p| p.is_infinite()) {
            return Err(PatternError::InvalidBar {
                index: 0,
                reason: "Infinite value in OHLC",
            });
        }
        if prices.iter().any(|p| *p < 0.0) {
            return Err(PatternError::InvalidBar {
                index: 0,
                reason: "negative price",
            });
        }
        if self.range() < 0.0 {
            return Err(PatternError::InvalidBar {
                index: 0,
                reason: "high < low",
            });
        }
        Ok(())
    }
}

impl<T: OHLCV> OHLCVExt for T {}

// ============================================================
// PATTERN MATCH - result of matching (Copy, no allocations)
// ============================================================

/// Identifier of a matching policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct PolicyId(pub &'static str);

impl PolicyId {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for PolicyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// One detected formation. All indices are positions in the scanned series.
///
/// `trough_index < peak_index < retest_index <= observed_index` always holds.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PatternMatch {
    pub policy: PolicyId,
    /// First bar of the window that produced the match
    pub window_start: usize,
    /// One past the last bar of that window
    pub window_end: usize,
    /// Small-u trough
    pub trough_index: usize,
    /// Big-U top
    pub peak_index: usize,
    /// Retracement trough
    pub retest_index: usize,
    /// Bar whose smoothed value was compared with the halfway level
    pub observed_index: usize,
    pub halfway: f64,
    pub observed_value: f64,
    /// `|observed_value - halfway| / halfway`
    pub deviation: f64,
}

impl PatternMatch {
    #[inline]
    pub fn indices(&self) -> (usize, usize, usize, usize) {
        (
            self.trough_index,
            self.peak_index,
            self.retest_index,
            self.observed_index,
        )
    }

    /// True when the trough/peak/retest/observed ordering holds
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.trough_index < self.peak_index
            && self.peak_index < self.retest_index
            && self.retest_index <= self.observed_index
    }

    /// Bars of the window that produced the match, for highlighting.
    #[inline]
    pub fn window_span(&self) -> std::ops::Range<usize> {
        self.window_start..self.window_end
    }
}

// ============================================================
// MATCHER TRAIT
// ============================================================

/// A named matching policy evaluated one window at a time.
pub trait PatternMatcher: Send + Sync {
    fn id(&self) -> PolicyId;

    /// Bars per window
    fn window_size(&self) -> usize;

    /// Shortest series the policy accepts
    fn min_bars(&self) -> usize {
        self.window_size()
    }

    /// Stop at the first matching window instead of reporting all of them
    fn first_match_only(&self) -> bool {
        false
    }

    /// Test the window `values[start..start + window_size()]`.
    ///
    /// Returns `Ok(None)` when the window does not fit or does not match,
    /// and `DegenerateRatio` when the halfway level is zero.
    fn match_window(&self, values: &[f64], start: usize) -> Result<Option<PatternMatch>>;

    fn validate_config(&self) -> Result<()> {
        Ok(())
    }
}

// ============================================================
// BUILTIN MATCHERS - generated via macro
// ============================================================

use matchers::*;

/// Macro to generate BuiltinMatcher enum without boilerplate
macro_rules! define_builtin_matchers {
    (
        $(
            $variant:ident($matcher:ty)
        ),* $(,)?
    ) => {
        /// All builtin matchers - enum dispatch
        #[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
        #[serde(tag = "policy", rename_all = "snake_case")]
        pub enum BuiltinMatcher {
            $($variant($matcher)),*
        }

        impl BuiltinMatcher {
            #[inline]
            pub fn id(&self) -> PolicyId {
                match self {
                    $(Self::$variant(m) => PatternMatcher::id(m)),*
                }
            }

            #[inline]
            pub fn window_size(&self) -> usize {
                match self {
                    $(Self::$variant(m) => PatternMatcher::window_size(m)),*
                }
            }

            #[inline]
            pub fn min_bars(&self) -> usize {
                match self {
                    $(Self::$variant(m) => PatternMatcher::min_bars(m)),*
                }
            }

            #[inline]
            pub fn first_match_only(&self) -> bool {
                match self {
                    $(Self::$variant(m) => PatternMatcher::first_match_only(m)),*
                }
            }

            #[inline]
            pub fn match_window(&self, values: &[f64], start: usize) -> Result<Option<PatternMatch>> {
                match self {
                    $(Self::$variant(m) => PatternMatcher::match_window(m, values, start)),*
                }
            }

            pub fn validate_config(&self) -> Result<()> {
                match self {
                    $(Self::$variant(m) => PatternMatcher::validate_config(m)),*
                }
            }
        }
    };
}

define_builtin_matchers! {
    TwoTrough(TwoTroughMatcher),
    RatioProximity(RatioProximityMatcher),
}

// ============================================================
// SCAN PARAMETERS
// ============================================================

/// Named matching policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Exhaustive windows, last price within tolerance of halfway
    #[default]
    TwoTrough,
    /// Exhaustive windows, last price at or below halfway
    TwoTroughAtOrBelow,
    /// Bounded look-ahead, first match only
    RatioProximity,
}

/// Flat scan configuration: one entry point for every policy.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScanParams {
    pub policy: Policy,
    pub smoothing_window: usize,
    pub window_size: usize,
    pub order: usize,
    pub tolerance: f64,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            policy: Policy::TwoTrough,
            smoothing_window: 3,
            window_size: 50,
            order: 2,
            tolerance: 0.05,
        }
    }
}

impl ScanParams {
    pub fn two_trough() -> Self {
        Self::default()
    }

    pub fn ratio_proximity() -> Self {
        Self {
            policy: Policy::RatioProximity,
            window_size: 70,
            tolerance: 0.10,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        Period::new(self.smoothing_window)?;
        self.matcher()?.validate_config()
    }

    /// The matcher these parameters describe
    pub fn matcher(&self) -> Result<BuiltinMatcher> {
        let window_size = Period::new(self.window_size)?;
        let order = Period::new(self.order)?;
        let tolerance = Ratio::new(self.tolerance)?;

        Ok(match self.policy {
            Policy::TwoTrough | Policy::TwoTroughAtOrBelow => {
                let halfway_rule = if self.policy == Policy::TwoTrough {
                    HalfwayRule::WithinTolerance
                } else {
                    HalfwayRule::AtOrBelow
                };
                BuiltinMatcher::TwoTrough(TwoTroughMatcher {
                    window_size,
                    order,
                    tolerance,
                    halfway_rule,
                    ..TwoTroughMatcher::default()
                })
            }
            Policy::RatioProximity => BuiltinMatcher::RatioProximity(RatioProximityMatcher {
                window_size,
                order,
                tolerance,
                ..RatioProximityMatcher::default()
            }),
        })
    }
}

// ============================================================
// SCAN RESULT
// ============================================================

/// Read-only snapshot of one scan
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScanResult<'a> {
    policy: PolicyId,
    series: &'a Series,
    smoothed: SmoothedSeries,
    matches: Vec<PatternMatch>,
    windows_scanned: usize,
    degenerate_windows: usize,
}

impl<'a> ScanResult<'a> {
    #[inline]
    pub fn policy(&self) -> PolicyId {
        self.policy
    }

    #[inline]
    pub fn series(&self) -> &'a Series {
        self.series
    }

    #[inline]
    pub fn smoothed(&self) -> &SmoothedSeries {
        &self.smoothed
    }

    /// Matches in window order
    #[inline]
    pub fn matches(&self) -> &[PatternMatch] {
        &self.matches
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Match from the latest window, if any
    pub fn latest(&self) -> Option<&PatternMatch> {
        self.matches.last()
    }

    pub fn windows_scanned(&self) -> usize {
        self.windows_scanned
    }

    /// Windows skipped because their halfway level was zero
    pub fn degenerate_windows(&self) -> usize {
        self.degenerate_windows
    }

    pub fn into_matches(self) -> Vec<PatternMatch> {
        self.matches
    }
}

// ============================================================
// PATTERN SCANNER
// ============================================================

/// Matches found over a smoothed value sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowScan {
    pub matches: Vec<PatternMatch>,
    pub windows_scanned: usize,
    pub degenerate_windows: usize,
}

/// Smoother + matcher pair. Stateless between calls; share freely across threads.
#[derive(Debug, Clone)]
pub struct PatternScanner {
    matcher: BuiltinMatcher,
    smoothing_window: Period,
}

impl PatternScanner {
    #[inline]
    pub fn matcher(&self) -> &BuiltinMatcher {
        &self.matcher
    }

    #[inline]
    pub fn policy(&self) -> PolicyId {
        self.matcher.id()
    }

    #[inline]
    pub fn smoothing_window(&self) -> usize {
        self.smoothing_window.get()
    }

    /// Shortest series this scanner accepts
    pub fn min_bars(&self) -> usize {
        self.matcher.min_bars().max(self.smoothing_window.get())
    }

    // ===========================================
    // LOW-LEVEL: Primitives
    // ===========================================

    /// Iterate over every window of an already-smoothed sequence.
    pub fn windows<'a>(&'a self, values: &'a [f64]) -> WindowIterator<'a> {
        WindowIterator::new(&self.matcher, values)
    }

    // ===========================================
    // MID-LEVEL: Smoothed values
    // ===========================================

    /// Run the matcher over an already-smoothed sequence.
    pub fn match_smoothed(&self, values: &[f64]) -> Result<WindowScan> {
        if values.is_empty() {
            return Err(PatternError::EmptyInput);
        }
        let need = self.matcher.min_bars();
        if values.len() < need {
            return Err(PatternError::InsufficientData {
                need,
                got: values.len(),
            });
        }

        let mut scan = WindowScan::default();
        for window in self.windows(values) {
            scan.windows_scanned += 1;
            match window.outcome {
                Ok(Some(m)) => {
                    debug_assert!(m.is_ordered());
                    scan.matches.push(m);
                    if self.matcher.first_match_only() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e @ PatternError::DegenerateRatio { .. }) => {
                    scan.degenerate_windows += 1;
                    tracing::trace!(start = window.start, error = %e, "skipping window");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(scan)
    }

    // ===========================================
    // HIGH-LEVEL: Series
    // ===========================================

    /// Smooth the series closes and scan them.
    pub fn scan<'a>(&self, series: &'a Series) -> Result<ScanResult<'a>> {
        if series.is_empty() {
            return Err(PatternError::EmptyInput);
        }
        let need = self.min_bars();
        if series.len() < need {
            return Err(PatternError::InsufficientData {
                need,
                got: series.len(),
            });
        }

        let smoothed = smooth(series, self.smoothing_window)?;
        let scan = self.match_smoothed(smoothed.values())?;

        tracing::debug!(
            policy = %self.policy(),
            bars = series.len(),
            windows = scan.windows_scanned,
            matches = scan.matches.len(),
            degenerate = scan.degenerate_windows,
            "scan complete"
        );

        Ok(ScanResult {
            policy: self.policy(),
            series,
            smoothed,
            matches: scan.matches,
            windows_scanned: scan.windows_scanned,
            degenerate_windows: scan.degenerate_windows,
        })
    }
}

// ============================================================
// WINDOW ITERATOR
// ============================================================

/// Outcome of matching one window
#[derive(Debug, Clone)]
pub struct WindowOutcome {
    pub start: usize,
    pub outcome: Result<Option<PatternMatch>>,
}

/// Iterator over window start positions, step one bar
pub struct WindowIterator<'a> {
    matcher: &'a BuiltinMatcher,
    values: &'a [f64],
    current: usize,
    end: usize,
}

impl<'a> WindowIterator<'a> {
    fn new(matcher: &'a BuiltinMatcher, values: &'a [f64]) -> Self {
        let end = (values.len() + 1).saturating_sub(matcher.window_size());
        Self {
            matcher,
            values,
            current: 0,
            end,
        }
    }
}

impl<'a> Iterator for WindowIterator<'a> {
    type Item = WindowOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.end {
            return None;
        }

        let start = self.current;
        self.current += 1;

        Some(WindowOutcome {
            start,
            outcome: self.matcher.match_window(self.values, start),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.current);
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for WindowIterator<'a> {}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating PatternScanner instances
pub struct ScannerBuilder {
    matcher: Option<BuiltinMatcher>,
    smoothing_window: usize,
}

impl Default for ScannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScannerBuilder {
    pub fn new() -> Self {
        Self {
            matcher: None,
            smoothing_window: 3,
        }
    }

    /// Start from a flat parameter set
    pub fn from_params(params: &ScanParams) -> Result<Self> {
        Ok(Self {
            matcher: Some(params.matcher()?),
            smoothing_window: params.smoothing_window,
        })
    }

    /// Use the two-trough policy with default configuration
    pub fn with_two_trough_defaults(self) -> Self {
        self.matcher(BuiltinMatcher::TwoTrough(TwoTroughMatcher::with_defaults()))
    }

    /// Use the ratio+proximity policy with default configuration
    pub fn with_ratio_proximity_defaults(self) -> Self {
        self.matcher(BuiltinMatcher::RatioProximity(
            RatioProximityMatcher::with_defaults(),
        ))
    }

    /// Set the matching policy
    pub fn matcher(mut self, matcher: BuiltinMatcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// Set the smoothing window in bars
    pub fn smoothing_window(mut self, bars: usize) -> Self {
        self.smoothing_window = bars;
        self
    }

    /// Build the scanner
    pub fn build(self) -> Result<PatternScanner> {
        let matcher = self
            .matcher
            .ok_or_else(|| PatternError::InvalidConfig("no matcher configured".to_string()))?;
        matcher.validate_config()?;

        Ok(PatternScanner {
            matcher,
            smoothing_window: Period::new(self.smoothing_window)?,
        })
    }
}

/// Scan one series with a flat parameter set.
pub fn scan<'a>(series: &'a Series, params: &ScanParams) -> Result<ScanResult<'a>> {
    ScannerBuilder::from_params(params)?.build()?.scan(series)
}

// ============================================================
// MULTI-INSTRUMENT SCANNING
// ============================================================

use rayon::prelude::*;

/// Result of scanning a single instrument
#[derive(Debug)]
pub struct InstrumentScan<'a> {
    pub symbol: String,
    pub result: ScanResult<'a>,
}

/// Error from scanning a single instrument
#[derive(Debug)]
pub struct InstrumentError {
    pub symbol: String,
    pub error: PatternError,
}

fn scan_instrument<'a>(
    scanner: &PatternScanner,
    symbol: &str,
    series: &'a Series,
) -> std::result::Result<InstrumentScan<'a>, InstrumentError> {
    match scanner.scan(series) {
        Ok(result) => Ok(InstrumentScan {
            symbol: symbol.to_string(),
            result,
        }),
        Err(error) => {
            if error.is_recoverable() {
                tracing::debug!(symbol, %error, "instrument skipped");
            } else {
                tracing::warn!(symbol, %error, "instrument failed");
            }
            Err(InstrumentError {
                symbol: symbol.to_string(),
                error,
            })
        }
    }
}

fn partition<'a>(
    results: Vec<std::result::Result<InstrumentScan<'a>, InstrumentError>>,
) -> (Vec<InstrumentScan<'a>>, Vec<InstrumentError>) {
    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

/// Parallel scanning of multiple instruments. Output keeps input order.
pub fn scan_parallel<'a, I>(
    scanner: &PatternScanner,
    instruments: I,
) -> (Vec<InstrumentScan<'a>>, Vec<InstrumentError>)
where
    I: IntoParallelIterator<Item = (&'a str, &'a Series)>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, series)| scan_instrument(scanner, symbol, series))
        .collect();

    partition(results)
}

/// Sequential counterpart of [`scan_parallel`]
pub fn scan_all<'a, I>(
    scanner: &PatternScanner,
    instruments: I,
) -> (Vec<InstrumentScan<'a>>, Vec<InstrumentError>)
where
    I: IntoIterator<Item = (&'a str, &'a Series)>,
{
    let results: Vec<_> = instruments
        .into_iter()
        .map(|(symbol, series)| scan_instrument(scanner, symbol, series))
        .collect();

    partition(results)
}

// ============================================================
// TESTS
// ============================================================
