//! U-shaped reversal matching policies
//!
//! Every policy is the same trough / peak / retest search parametrized
//! differently; each file here holds one named policy.
//!
//! # Policies
//!
//! - **Two-trough** (`TWO_TROUGH`, `TWO_TROUGH_AT_OR_BELOW`): exhaustive
//!   sliding-window scan, every matching window is reported.
//! - **Ratio + proximity** (`RATIO_PROXIMITY`): bounded look-ahead spans,
//!   stops at the first matching segment.

pub mod helpers;

/// Generate `with_defaults()` -> `Self::default()` for multiple matcher types.
macro_rules! impl_with_defaults {
    ($($matcher:ty),* $(,)?) => {
        $(impl $matcher {
            pub fn with_defaults() -> Self { Self::default() }
        })*
    };
}

pub mod ratio_proximity;
pub mod two_trough;

pub use helpers::*;
pub use ratio_proximity::*;
pub use two_trough::*;
