use super::{Percent, round_cents};
use crate::error::AllocationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Allowed deviation of the selected ratio sum from 1.
pub const RATIO_TOLERANCE: f64 = 1e-4;

/// A team allocation setting as listed by the configuration service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAllocationConfig {
    pub team_id: String,
    pub team_name: String,
    /// Stored as a percentage.
    pub ratio: Percent,
    pub is_enabled: bool,
}

/// One team's share of an amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationShare {
    pub team_id: String,
    pub team_name: String,
    /// The configured default, as a fraction.
    pub original_ratio: f64,
    pub is_selected: bool,
    /// Renormalised among the selected shares, as a fraction.
    pub allocation_ratio: f64,
    /// `base_amount * allocation_ratio`, unrounded.
    pub allocated_amount: f64,
}

impl AllocationShare {
    pub fn new(team_id: impl Into<String>, team_name: impl Into<String>, ratio: f64) -> Self {
        Self {
            team_id: team_id.into(),
            team_name: team_name.into(),
            original_ratio: ratio,
            is_selected: true,
            allocation_ratio: 0.0,
            allocated_amount: 0.0,
        }
    }

    pub fn selected(mut self, is_selected: bool) -> Self {
        self.is_selected = is_selected;
        self
    }

    /// Builds a selected share from a service config, converting the percentage.
    pub fn from_config(config: &TeamAllocationConfig) -> Self {
        Self::new(
            config.team_id.clone(),
            config.team_name.clone(),
            config.ratio.to_fraction(),
        )
    }

    pub fn display_amount(&self) -> f64 {
        round_cents(self.allocated_amount)
    }
}

/// Shares for every enabled config, all initially selected.
pub fn shares_from_configs(configs: &[TeamAllocationConfig]) -> Vec<AllocationShare> {
    configs
        .iter()
        .filter(|config| config.is_enabled)
        .map(AllocationShare::from_config)
        .collect()
}

/// Renormalises the selected shares so their ratios sum to 1 and derives amounts.
///
/// Unselected shares get ratio and amount 0. When nothing is selected, or the
/// selected original ratios sum to 0, every share ends up at 0.
pub fn recompute(shares: &[AllocationShare], base_amount: f64) -> Vec<AllocationShare> {
    let total_selected: f64 = shares
        .iter()
        .filter(|share| share.is_selected)
        .map(|share| share.original_ratio)
        .sum();

    let degenerate = total_selected <= 0.0 || !total_selected.is_finite();
    if degenerate {
        debug!(shares = shares.len(), "no selected allocation weight, zeroing all shares");
    }

    shares
        .iter()
        .map(|share| {
            let allocation_ratio = if share.is_selected && !degenerate {
                share.original_ratio / total_selected
            } else {
                0.0
            };
            AllocationShare {
                allocation_ratio,
                allocated_amount: base_amount * allocation_ratio,
                ..share.clone()
            }
        })
        .collect()
}

/// Checks ratios are usable and that the selected shares sum to 1.
pub fn validate_balance(shares: &[AllocationShare]) -> Result<(), AllocationError> {
    if let Some(bad) = shares
        .iter()
        .find(|share| !share.original_ratio.is_finite() || share.original_ratio < 0.0)
    {
        return Err(AllocationError::InvalidRatio {
            team_id: bad.team_id.clone(),
            ratio: bad.original_ratio,
        });
    }

    let total: f64 = shares
        .iter()
        .filter(|share| share.is_selected)
        .map(|share| share.allocation_ratio)
        .sum();
    if (total - 1.0).abs() > RATIO_TOLERANCE {
        return Err(AllocationError::Imbalance {
            total,
            tolerance: RATIO_TOLERANCE,
        });
    }
    Ok(())
}

/// An allocation line as submitted to the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationLine {
    pub team_id: String,
    pub team_name: String,
    pub ratio: Percent,
    pub amount: f64,
}

/// Validates the shares and converts the selected ones into submission lines.
pub fn into_submission(shares: &[AllocationShare]) -> Result<Vec<AllocationLine>, AllocationError> {
    validate_balance(shares)?;
    Ok(shares
        .iter()
        .filter(|share| share.is_selected)
        .map(|share| AllocationLine {
            team_id: share.team_id.clone(),
            team_name: share.team_name.clone(),
            ratio: Percent::from_fraction(share.allocation_ratio),
            amount: share.display_amount(),
        })
        .collect())
}
