use serde::{Deserialize, Serialize};
use tracing::debug;

/// A mileage bracket: `min_value <= mileage < max_value` earns `rate` per unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTier {
    pub min_value: f64,
    pub max_value: f64,
    pub rate: f64,
}

impl RateTier {
    pub fn new(min_value: f64, max_value: f64, rate: f64) -> Self {
        Self {
            min_value,
            max_value,
            rate,
        }
    }

    pub fn matches(&self, mileage: f64) -> bool {
        self.min_value <= mileage && mileage < self.max_value
    }
}

/// Mileage performance configuration: ordered tiers plus an activation flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MileageRateConfig {
    pub tiers: Vec<RateTier>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl MileageRateConfig {
    pub fn new(tiers: Vec<RateTier>) -> Self {
        Self {
            tiers,
            is_active: true,
        }
    }

    /// The tier whose rate applies to `mileage`.
    ///
    /// The first matching tier wins. Mileage beyond every tier's maximum falls
    /// back to the last tier.
    pub fn tier_for(&self, mileage: f64) -> Option<&RateTier> {
        if let Some(tier) = self.tiers.iter().find(|tier| tier.matches(mileage)) {
            return Some(tier);
        }
        let above_all = self.tiers.iter().all(|tier| mileage >= tier.max_value);
        if above_all { self.tiers.last() } else { None }
    }
}

/// Flat-rate-by-bracket performance: the chosen tier's rate times the full mileage.
///
/// No active configuration, no tiers, or mileage outside every bracket without
/// exceeding them all yields 0.
pub fn performance(config: Option<&MileageRateConfig>, mileage: f64) -> f64 {
    let Some(config) = config.filter(|c| c.is_active) else {
        return 0.0;
    };
    match config.tier_for(mileage) {
        Some(tier) => {
            debug!(mileage, rate = tier.rate, "selected mileage tier");
            mileage * tier.rate
        }
        None => 0.0,
    }
}
