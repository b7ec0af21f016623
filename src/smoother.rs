//! Moving-average smoothing of close prices.
//!
//! Odd windows are centered (`window / 2` bars on each side), even windows
//! are trailing. Positions without a full window take the nearest defined
//! average: leading gaps are back-filled, trailing gaps forward-filled.

use serde::Serialize;

use crate::{PatternError, Period, Result, Series};

/// Denoised close prices, parallel to the [`Series`] they came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmoothedSeries {
    window: usize,
    values: Vec<f64>,
}

impl SmoothedSeries {
    #[inline]
    pub fn window(&self) -> usize {
        self.window
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Smooth the close prices of `series` over `window` bars.
pub fn smooth(series: &Series, window: Period) -> Result<SmoothedSeries> {
    let values = smooth_values(&series.closes(), window.get())?;
    Ok(SmoothedSeries {
        window: window.get(),
        values,
    })
}

/// Smooth a raw value sequence. Output has exactly `values.len()` entries.
pub fn smooth_values(values: &[f64], window: usize) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(PatternError::InvalidValue("Smoothing window must be > 0"));
    }
    if values.len() < window {
        return Err(PatternError::InsufficientData {
            need: window,
            got: values.len(),
        });
    }

    let averages: Vec<f64> = values
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect();

    // Position of averages[0] in the output
    let offset = if window % 2 == 1 { window / 2 } else { window - 1 };

    let first = averages[0];
    let last = averages[averages.len() - 1];

    let mut out = Vec::with_capacity(values.len());
    out.extend(std::iter::repeat(first).take(offset));
    out.extend_from_slice(&averages);
    out.resize(values.len(), last);

    Ok(out)
}
