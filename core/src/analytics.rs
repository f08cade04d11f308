//! Read-side views over a generated collection: level distribution,
//! short-term trend, and the filtered/sorted household listing.

use crate::{household::Household, thresholds::RiskLevel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskDistribution {
    pub total:    usize,
    /// RED
    pub critical: usize,
    /// ORANGE
    pub high:     usize,
    /// YELLOW
    pub medium:   usize,
    /// GREEN
    pub low:      usize,
}

impl RiskDistribution {
    pub fn from_households<'a>(households: impl IntoIterator<Item = &'a Household>) -> Self {
        let mut dist = Self::default();
        for h in households {
            dist.record(h.risk_level);
        }
        dist
    }

    pub fn record(&mut self, level: RiskLevel) {
        self.add(level, 1);
    }

    /// Count `n` households at `level` at once.
    pub fn add(&mut self, level: RiskLevel, n: usize) {
        self.total += n;
        match level {
            RiskLevel::Red    => self.critical += n,
            RiskLevel::Orange => self.high += n,
            RiskLevel::Yellow => self.medium += n,
            RiskLevel::Green  => self.low += n,
        }
    }

    pub fn count(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Red    => self.critical,
            RiskLevel::Orange => self.high,
            RiskLevel::Yellow => self.medium,
            RiskLevel::Green  => self.low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTrend {
    Increasing,
    Decreasing,
    Stable,
}

/// Overdue electricity bills in the last three periods:
/// two or more → Increasing, none → Stable, one → Decreasing.
pub fn risk_trend(household: &Household) -> RiskTrend {
    let series = &household.electricity_usage;
    let recent = &series[series.len().saturating_sub(3)..];
    match recent.iter().filter(|p| p.overdue).count() {
        0 => RiskTrend::Stable,
        1 => RiskTrend::Decreasing,
        _ => RiskTrend::Increasing,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    RiskScore,
    LastContact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Household listing query. Defaults to every household, highest score first.
#[derive(Debug, Clone, Default)]
pub struct HouseholdQuery {
    pub search:  Option<String>,
    pub level:   Option<RiskLevel>,
    pub sort_by: SortKey,
    pub order:   SortOrder,
}

impl HouseholdQuery {
    /// Search matches the household identifier case-insensitively, or the
    /// region / dong by substring.
    pub fn matches(&self, h: &Household) -> bool {
        if let Some(level) = self.level {
            if h.risk_level != level {
                return false;
            }
        }
        match self.search.as_deref().filter(|s| !s.is_empty()) {
            None => true,
            Some(term) => {
                h.household_id.to_lowercase().contains(&term.to_lowercase())
                    || h.region.contains(term)
                    || h.dong.contains(term)
            }
        }
    }

    pub fn apply<'a>(&self, households: &'a [Household]) -> Vec<&'a Household> {
        let mut result: Vec<_> = households.iter().filter(|h| self.matches(h)).collect();
        result.sort_by(|a, b| {
            let ord = match self.sort_by {
                SortKey::RiskScore   => a.risk_score.cmp(&b.risk_score),
                SortKey::LastContact => a.last_contact.cmp(&b.last_contact),
            };
            match self.order {
                SortOrder::Asc  => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        result
    }
}
