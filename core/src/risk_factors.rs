//! The four risk-factor dimensions and dominant-factor selection.

use serde::{Deserialize, Serialize};

/// Risk-factor dimensions in tie-break priority order: on an exact tie
/// the earlier dimension wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskDimension {
    Economic,
    Health,
    Psychological,
    Social,
}

impl RiskDimension {
    pub const PRIORITY: [RiskDimension; 4] =
        [Self::Economic, Self::Health, Self::Psychological, Self::Social];
}

/// Independent magnitudes in [0, 1]. Not required to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub economic: f64,
    pub health: f64,
    pub psychological: f64,
    pub social: f64,
}

impl RiskFactors {
    pub fn get(&self, dimension: RiskDimension) -> f64 {
        match dimension {
            RiskDimension::Economic      => self.economic,
            RiskDimension::Health        => self.health,
            RiskDimension::Psychological => self.psychological,
            RiskDimension::Social        => self.social,
        }
    }

    /// Dimension with the largest magnitude, first in priority order on ties.
    pub fn dominant(&self) -> RiskDimension {
        let mut best = RiskDimension::Economic;
        for dim in RiskDimension::PRIORITY {
            if self.get(dim) > self.get(best) {
                best = dim;
            }
        }
        best
    }

    /// All dimensions, largest first. Ties keep priority order.
    pub fn ranked(&self) -> Vec<(RiskDimension, f64)> {
        let mut ranked: Vec<_> = RiskDimension::PRIORITY
            .iter()
            .map(|d| (*d, self.get(*d)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}
