//! Match events for the notification layer and the caller-held alert ledger.
//!
//! The scanner itself keeps no state between calls. Deduplicating alerts
//! ("already told the user about this instrument today") belongs to the
//! caller, which owns an [`AlertLedger`] and passes events through it.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{PatternError, PatternMatch, Result, Series};

/// Flat record handed to a notifier when a match is found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub ticker: String,
    /// Close of the observed bar
    pub observed_price: f64,
    /// Percent change of the observed close against the preceding close
    pub percent_change: f64,
    /// Timestamp of the observed bar (unix seconds)
    pub timestamp: i64,
}

impl MatchEvent {
    /// Build the event for `m`. Returns `None` if `m` does not index into `series`.
    pub fn from_match(ticker: impl Into<String>, series: &Series, m: &PatternMatch) -> Option<Self> {
        let bar = series.get(m.observed_index)?;
        let previous = m
            .observed_index
            .checked_sub(1)
            .and_then(|i| series.get(i));

        let percent_change = match previous {
            Some(prev) if prev.close > 0.0 => (bar.close - prev.close) / prev.close * 100.0,
            _ => 0.0,
        };

        Some(Self {
            ticker: ticker.into(),
            observed_price: bar.close,
            percent_change,
            timestamp: bar.timestamp,
        })
    }

    /// UTC calendar day of the observed bar
    pub fn day(&self) -> Result<NaiveDate> {
        DateTime::<Utc>::from_timestamp(self.timestamp, 0)
            .map(|dt| dt.date_naive())
            .ok_or(PatternError::InvalidValue("timestamp out of range"))
    }
}

/// Instruments already alerted, keyed by (ticker, UTC calendar day).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertLedger {
    sent: HashSet<(String, NaiveDate)>,
}

impl AlertLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `event`. Returns `true` the first time its ticker is seen on its day.
    pub fn record(&mut self, event: &MatchEvent) -> Result<bool> {
        let day = event.day()?;
        Ok(self.sent.insert((event.ticker.clone(), day)))
    }

    pub fn contains(&self, ticker: &str, day: NaiveDate) -> bool {
        self.sent.contains(&(ticker.to_owned(), day))
    }

    /// Keep only the events not yet alerted, recording them as sent.
    pub fn filter_fresh<I>(&mut self, events: I) -> Result<Vec<MatchEvent>>
    where
        I: IntoIterator<Item = MatchEvent>,
    {
        let mut fresh = Vec::new();
        for event in events {
            if self.record(&event)? {
                fresh.push(event);
            }
        }
        Ok(fresh)
    }

    /// Forget every entry older than `day`.
    pub fn prune_before(&mut self, day: NaiveDate) {
        self.sent.retain(|(_, d)| *d >= day);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }
}
