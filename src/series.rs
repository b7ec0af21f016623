//! Price bars and validated bar series.
//!
//! A [`Series`] is the only input the scanner accepts. Building one checks
//! that timestamps strictly increase and that every price is finite and
//! non-negative, so the smoothing and matching stages never see malformed
//! data. Bars with a missing field are dropped up front via
//! [`Series::from_partial`]; nothing is interpolated.

use serde::{Deserialize, Serialize};

use crate::{OHLCVExt, PatternError, PatternMatch, Result, OHLCV};

// ============================================================
// BAR
// ============================================================

/// One sampled interval of market data. `timestamp` is unix seconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }

    /// Bar with every price equal to `close`
    pub fn flat(timestamp: i64, close: f64) -> Self {
        Self::new(timestamp, close, close, close, close)
    }
}

impl OHLCV for Bar {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// Bar as delivered by a data provider, where any price may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialBar {
    pub timestamp: i64,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
}

impl PartialBar {
    /// Returns the complete bar, or `None` if any price is missing.
    pub fn complete(&self) -> Option<Bar> {
        Some(Bar::new(
            self.timestamp,
            self.open?,
            self.high?,
            self.low?,
            self.close?,
        ))
    }
}

impl From<Bar> for PartialBar {
    fn from(bar: Bar) -> Self {
        Self {
            timestamp: bar.timestamp,
            open: Some(bar.open),
            high: Some(bar.high),
            low: Some(bar.low),
            close: Some(bar.close),
        }
    }
}

// ============================================================
// SERIES
// ============================================================

/// Timestamps of the four indices of a [`PatternMatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchTimestamps {
    pub trough: i64,
    pub peak: i64,
    pub retest: i64,
    pub observed: i64,
}

/// Ordered, gap-free bars for one instrument, ascending by timestamp.
///
/// Immutable once built. Positions `0..len()` are what every matcher
/// reports; use [`Series::timestamp_at`] or [`Series::locate`] to map
/// them back to time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    /// Build a series, validating every bar and timestamp ordering.
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        for (i, bar) in bars.iter().enumerate() {
            bar.validate().map_err(|e| match e {
                PatternError::InvalidBar { reason, .. } => {
                    PatternError::InvalidBar { index: i, reason }
                }
                other => other,
            })?;
            if i > 0 && bars[i - 1].timestamp >= bar.timestamp {
                return Err(PatternError::UnsortedTimestamps { index: i });
            }
        }
        Ok(Self { bars })
    }

    /// Build a series from any bar type implementing [`OHLCV`].
    pub fn from_ohlcv<T: OHLCV>(bars: &[T]) -> Result<Self> {
        Self::new(
            bars.iter()
                .map(|b| Bar::new(b.timestamp(), b.open(), b.high(), b.low(), b.close()))
                .collect(),
        )
    }

    /// Build a series from provider bars, dropping any bar with a missing price.
    pub fn from_partial<I>(bars: I) -> Result<Self>
    where
        I: IntoIterator<Item = PartialBar>,
    {
        let mut dropped = 0usize;
        let complete: Vec<Bar> = bars
            .into_iter()
            .filter_map(|b| {
                let bar = b.complete();
                if bar.is_none() {
                    dropped += 1;
                }
                bar
            })
            .collect();

        if dropped > 0 {
            tracing::debug!(dropped, kept = complete.len(), "dropped incomplete bars");
        }

        Self::new(complete)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    #[inline]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    #[inline]
    pub fn timestamp_at(&self, index: usize) -> Option<i64> {
        self.bars.get(index).map(|b| b.timestamp)
    }

    /// Map the indices of a match back to bar timestamps.
    ///
    /// Returns `None` when the match was produced from a different (longer) series.
    pub fn locate(&self, m: &PatternMatch) -> Option<MatchTimestamps> {
        Some(MatchTimestamps {
            trough: self.timestamp_at(m.trough_index)?,
            peak: self.timestamp_at(m.peak_index)?,
            retest: self.timestamp_at(m.retest_index)?,
            observed: self.timestamp_at(m.observed_index)?,
        })
    }
}
