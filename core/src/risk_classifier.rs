//! Risk classifier: pure derivation of categorical and narrative-free
//! fields from a risk score and its factor breakdown.
//!
//! No state and no side effects. The only randomised sub-choice is the
//! offset inside the predicted crisis window, and that draw comes from
//! the caller's stream so identical inputs give identical outputs.

use crate::{
    config::{AnalysisConfig, DatasetConfig, DimensionProfile, IntBand},
    error::{CoreError, CoreResult},
    household::AiAnalysis,
    risk_factors::{RiskDimension, RiskFactors},
    rng::StreamRng,
    thresholds::{RiskLevel, RiskScore, SeverityTier, ThresholdLadder, Urgency},
};
use chrono::{DateTime, Duration, NaiveDate, Utc};

#[derive(Debug, Clone)]
pub struct RiskClassifier {
    ladder:      ThresholdLadder,
    urgent_gate: u8,
    analysis:    AnalysisConfig,
    fallback:    DimensionProfile,
}

impl RiskClassifier {
    pub fn new(config: &DatasetConfig) -> CoreResult<Self> {
        config.ladder.validate()?;
        let analysis = config.analysis.clone();
        let fallback = analysis
            .profiles
            .iter()
            .find(|p| p.dimension == analysis.fallback)
            .cloned()
            .ok_or_else(|| {
                CoreError::config(format!("no analysis profile for fallback {:?}", analysis.fallback))
            })?;
        Ok(Self {
            ladder: config.ladder,
            urgent_gate: config.gates.urgent_summary,
            analysis,
            fallback,
        })
    }

    pub fn classify_risk_level(&self, score: RiskScore) -> RiskLevel {
        self.ladder.tier(score).into()
    }

    pub fn classify_urgency(&self, score: RiskScore) -> Urgency {
        self.ladder.tier(score).into()
    }

    pub fn dominant_factor(&self, factors: &RiskFactors) -> RiskDimension {
        factors.dominant()
    }

    /// Canned actions for a dimension; dimensions without a profile get
    /// the fallback profile's list.
    pub fn recommend_actions(&self, dimension: RiskDimension) -> &[String] {
        &self.profile(dimension).actions
    }

    /// Days-ahead band for the crisis forecast, or None below the High tier.
    pub fn crisis_window(&self, score: RiskScore) -> Option<IntBand> {
        match self.ladder.tier(score) {
            SeverityTier::Critical => Some(self.analysis.crisis_critical),
            SeverityTier::High => Some(self.analysis.crisis_high),
            SeverityTier::Medium | SeverityTier::Low => None,
        }
    }

    pub fn predict_crisis_date(
        &self,
        score: RiskScore,
        now: DateTime<Utc>,
        rng: &mut StreamRng,
    ) -> Option<NaiveDate> {
        let window = self.crisis_window(score)?;
        let days_ahead = window.sample(rng);
        Some((now + Duration::days(days_ahead)).date_naive())
    }

    pub fn summarize(&self, dimension: RiskDimension, score: RiskScore) -> String {
        let suffix = if score.at_least(self.urgent_gate) {
            &self.analysis.urgent_suffix
        } else {
            &self.analysis.routine_suffix
        };
        format!("{}. {}", self.profile(dimension).summary, suffix)
    }

    /// Full derivation pass for one household.
    pub fn analyze(
        &self,
        score: RiskScore,
        factors: &RiskFactors,
        now: DateTime<Utc>,
        rng: &mut StreamRng,
    ) -> AiAnalysis {
        let dominant = self.dominant_factor(factors);
        AiAnalysis {
            summary: self.summarize(dominant, score),
            urgency: self.classify_urgency(score),
            recommended_actions: self.recommend_actions(dominant).to_vec(),
            predicted_crisis_date: self.predict_crisis_date(score, now, rng),
        }
    }

    fn profile(&self, dimension: RiskDimension) -> &DimensionProfile {
        self.analysis
            .profiles
            .iter()
            .find(|p| p.dimension == dimension)
            .unwrap_or(&self.fallback)
    }
}
