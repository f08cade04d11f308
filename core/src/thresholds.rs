//! Risk score, the shared severity ladder, and the score gates that
//! condition every generated signal.
//!
//! RULE: RiskLevel and Urgency are both projections of one SeverityTier.
//! Neither has its own cutoffs, so the two can never disagree.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite household severity in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RiskScore(u8);

impl RiskScore {
    pub const MAX: u8 = 100;

    /// Out-of-range scores are rejected, never clamped.
    pub fn new(score: i64) -> CoreResult<Self> {
        if (0..=Self::MAX as i64).contains(&score) {
            Ok(Self(score as u8))
        } else {
            Err(CoreError::ClassificationDomain { score })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// True when the score sits at or above `gate`.
    pub fn at_least(self, gate: u8) -> bool {
        self.0 >= gate
    }
}

impl TryFrom<i64> for RiskScore {
    type Error = CoreError;

    fn try_from(score: i64) -> CoreResult<Self> {
        Self::new(score)
    }
}

impl From<RiskScore> for u8 {
    fn from(score: RiskScore) -> u8 {
        score.0
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Four-step severity shared by RiskLevel and Urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeverityTier {
    Low,
    Medium,
    High,
    Critical,
}

/// Lower bounds of the three upper tiers. Boundary scores belong to the
/// higher tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdLadder {
    pub critical: u8,
    pub high: u8,
    pub medium: u8,
}

impl Default for ThresholdLadder {
    fn default() -> Self {
        Self { critical: 80, high: 60, medium: 30 }
    }
}

impl ThresholdLadder {
    /// Evaluated highest-first.
    pub fn tier(&self, score: RiskScore) -> SeverityTier {
        let s = score.value();
        if s >= self.critical {
            SeverityTier::Critical
        } else if s >= self.high {
            SeverityTier::High
        } else if s >= self.medium {
            SeverityTier::Medium
        } else {
            SeverityTier::Low
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.critical > RiskScore::MAX {
            return Err(CoreError::config(format!(
                "critical threshold {} exceeds {}",
                self.critical,
                RiskScore::MAX
            )));
        }
        if !(self.critical > self.high && self.high > self.medium && self.medium > 0) {
            return Err(CoreError::config(format!(
                "threshold ladder must be strictly descending and positive, got {}/{}/{}",
                self.critical, self.high, self.medium
            )));
        }
        Ok(())
    }
}

/// Categorical severity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Green,
    Yellow,
    Orange,
    Red,
}

impl From<SeverityTier> for RiskLevel {
    fn from(tier: SeverityTier) -> Self {
        match tier {
            SeverityTier::Low      => Self::Green,
            SeverityTier::Medium   => Self::Yellow,
            SeverityTier::High     => Self::Orange,
            SeverityTier::Critical => Self::Red,
        }
    }
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [Self::Green, Self::Yellow, Self::Orange, Self::Red];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green  => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Orange => "ORANGE",
            Self::Red    => "RED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == s)
    }
}

/// Response-priority label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl From<SeverityTier> for Urgency {
    fn from(tier: SeverityTier) -> Self {
        match tier {
            SeverityTier::Low      => Self::Low,
            SeverityTier::Medium   => Self::Medium,
            SeverityTier::High     => Self::High,
            SeverityTier::Critical => Self::Critical,
        }
    }
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low      => "LOW",
            Self::Medium   => "MEDIUM",
            Self::High     => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// Score gates that switch generated signals into their high-risk shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalGates {
    /// Economic, health and psychological factors are redrawn high.
    pub factor_bias: u8,
    pub steep_decline: u8,
    pub moderate_decline: u8,
    /// Utility overdue flags, insurance arrears.
    pub arrears: u8,
    pub medical_visit: u8,
    pub counseling_heavy: u8,
    pub counseling_light: u8,
    /// Declining call frequency and a low social-call ratio.
    pub isolation: u8,
    pub emergency_calls: u8,
    pub urgent_summary: u8,
}

impl Default for SignalGates {
    fn default() -> Self {
        Self {
            factor_bias: 70,
            steep_decline: 70,
            moderate_decline: 50,
            arrears: 60,
            medical_visit: 60,
            counseling_heavy: 70,
            counseling_light: 50,
            isolation: 60,
            emergency_calls: 70,
            urgent_summary: 70,
        }
    }
}
