//! Signal generator: one complete, internally consistent household per
//! index.
//!
//! GENERATION ORDER (per household):
//!   1. Profile:    region, score, age, factors, demographics
//!   2. Utilities:  electricity then water series
//!   3. Insurance
//!   4. Medical
//!   5. Counseling
//!   6. Calls
//!   7. Timeline:   registration, last contact
//!   8. Forecast:   classifier pass (level, urgency, analysis)
//!
//! Every step draws from its own signal slot, so the order above is
//! documentation, not a determinism constraint.

use crate::{
    call_signal::call_pattern,
    config::DatasetConfig,
    counseling_signal::counseling_records,
    error::CoreResult,
    health_signal::{health_insurance, medical_history},
    household::Household,
    risk_classifier::RiskClassifier,
    risk_factors::RiskFactors,
    rng::{RngBank, SignalSlot, StreamRng},
    thresholds::RiskScore,
    types::HouseholdIndex,
    usage_signal::utility_series,
};
use chrono::{DateTime, Utc};

pub struct HouseholdGenerator {
    config:     DatasetConfig,
    classifier: RiskClassifier,
}

impl HouseholdGenerator {
    pub fn new(config: DatasetConfig) -> CoreResult<Self> {
        config.validate()?;
        let classifier = RiskClassifier::new(&config)?;
        Ok(Self { config, classifier })
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Materialize household `index` from the bank's streams.
    /// `now` anchors counseling dates and the crisis forecast.
    pub fn generate(
        &self,
        index: HouseholdIndex,
        bank: &RngBank,
        now: DateTime<Utc>,
    ) -> CoreResult<Household> {
        let cfg = &self.config;
        let gates = &cfg.gates;
        let demo = &cfg.demographics;

        let mut profile = bank.for_signal(index, SignalSlot::Profile);
        let region = profile.pick(&demo.regions);
        let score = RiskScore::new(cfg.score.sample(&mut profile))?;
        let age = demo.age.sample(&mut profile) as u8;
        let risk_factors = self.risk_factors(score, &mut profile);
        let dong = profile.pick(&region.dongs).clone();
        let household_type = if age > demo.elderly_age {
            profile.pick(&demo.elderly_household_types).clone()
        } else {
            profile.pick(&demo.household_types).clone()
        };
        let gender = profile.pick(&demo.genders).clone();

        let mut utilities = bank.for_signal(index, SignalSlot::Utilities);
        let electricity_usage =
            utility_series(&cfg.utilities, &cfg.utilities.electricity, gates, score, &mut utilities);
        let water_usage =
            utility_series(&cfg.utilities, &cfg.utilities.water, gates, score, &mut utilities);

        let health_insurance = health_insurance(
            &cfg.insurance,
            gates,
            score,
            &mut bank.for_signal(index, SignalSlot::Insurance),
        );
        let medical_history = medical_history(
            &cfg.medical,
            gates,
            score,
            &mut bank.for_signal(index, SignalSlot::Medical),
        );
        let counseling_records = counseling_records(
            &cfg.counseling,
            gates,
            score,
            now,
            &mut bank.for_signal(index, SignalSlot::Counseling),
        );
        let call_pattern = call_pattern(
            &cfg.calls,
            gates,
            score,
            &mut bank.for_signal(index, SignalSlot::Calls),
        );

        // Windows are disjoint and ordered (checked by validate()), so
        // last contact always lands after registration.
        let mut timeline = bank.for_signal(index, SignalSlot::Timeline);
        let registered_at = cfg.timeline.registration.sample(&mut timeline);
        let last_contact = cfg.timeline.last_contact.sample(&mut timeline);

        let mut forecast = bank.for_signal(index, SignalSlot::Forecast);
        let ai_analysis = self.classifier.analyze(score, &risk_factors, now, &mut forecast);

        let (id, household_id) = self.identifiers(index);
        log::debug!(
            "household {household_id}: score={score} level={} dominant={:?}",
            self.classifier.classify_risk_level(score).as_str(),
            risk_factors.dominant()
        );

        Ok(Household {
            id,
            household_id,
            region: region.region.clone(),
            dong,
            household_type,
            age,
            gender,
            registered_at,
            risk_score: score,
            risk_level: self.classifier.classify_risk_level(score),
            risk_factors,
            electricity_usage,
            water_usage,
            health_insurance,
            medical_history,
            counseling_records,
            call_pattern,
            intervention: None,
            last_contact,
            ai_analysis,
        })
    }

    /// Independent draws, then economic / health / psychological are
    /// redrawn from the biased bands once the score crosses the gate.
    /// Social is never biased.
    fn risk_factors(&self, score: RiskScore, rng: &mut StreamRng) -> RiskFactors {
        let f = &self.config.factors;
        let mut factors = RiskFactors {
            economic: f.baseline.sample(rng),
            health: f.baseline.sample(rng),
            psychological: f.baseline.sample(rng),
            social: f.baseline.sample(rng),
        };
        if score.at_least(self.config.gates.factor_bias) {
            factors.economic = f.biased_economic.sample(rng);
            factors.health = f.biased_other.sample(rng);
            factors.psychological = f.biased_other.sample(rng);
        }
        factors
    }

    /// (`hh_001`, `2024-SJ-0001`) for index 0.
    pub fn identifiers(&self, index: HouseholdIndex) -> (String, String) {
        let id = &self.config.identity;
        let sequence = index + 1;
        (
            format!("{}_{:0width$}", id.internal_prefix, sequence, width = id.internal_width),
            format!(
                "{}-{}-{:0width$}",
                id.cohort_year,
                id.region_code,
                sequence,
                width = id.sequence_width
            ),
        )
    }
}
