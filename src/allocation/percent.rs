use serde::{Deserialize, Serialize};
use std::fmt;

/// A ratio as stored by the allocation-configuration service: 0 to 100.
///
/// Internally every ratio is a fraction between 0 and 1. Conversion happens only
/// through this type, at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Percent(pub f64);

impl Percent {
    pub fn from_fraction(fraction: f64) -> Self {
        Percent(fraction * 100.0)
    }

    pub fn to_fraction(self) -> f64 {
        self.0 / 100.0
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

/// Rounds a monetary amount to cents. Only for display and submission.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
