//! Local extrema detection over a value slice.

use serde::Serialize;

/// Indices of strict local minima and maxima, both ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extrema {
    pub minima: Vec<usize>,
    pub maxima: Vec<usize>,
}

impl Extrema {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.minima.is_empty() && self.maxima.is_empty()
    }
}

/// Find strict local extrema.
///
/// Position `i` is a minimum when `values[i]` is strictly less than every
/// value within `order` positions on both sides (strictly greater for a
/// maximum). Positions with fewer than `order` neighbours on either side
/// are never reported, and neither are plateaus. An `order` of zero
/// yields no extrema, as does an `order` too wide for any position to
/// have a full neighbourhood.
pub fn find_local_extrema(values: &[f64], order: usize) -> Extrema {
    let mut extrema = Extrema::default();
    // Equivalent to `len < 2 * order + 1` without the overflow
    if order == 0 || values.len().saturating_sub(1) / 2 < order {
        return extrema;
    }

    for i in order..values.len() - order {
        let v = values[i];
        let neighbours = values[i - order..i]
            .iter()
            .chain(&values[i + 1..=i + order]);

        let (mut is_min, mut is_max) = (true, true);
        for &n in neighbours {
            is_min &= v < n;
            is_max &= v > n;
            if !is_min && !is_max {
                break;
            }
        }

        if is_min {
            extrema.minima.push(i);
        } else if is_max {
            extrema.maxima.push(i);
        }
    }

    extrema
}

/// First index in an ascending index list strictly greater than `after`.
#[inline]
pub fn first_after(indices: &[usize], after: usize) -> Option<usize> {
    let pos = indices.partition_point(|&i| i <= after);
    indices.get(pos).copied()
}
