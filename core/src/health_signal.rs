//! Health insurance standing and recent medical visits.
//!
//! Both are quiet below the arrears / medical gates: no arrears, no
//! overdue months, no visits.

use crate::{
    config::{InsuranceConfig, MedicalConfig},
    household::{HealthInsurance, MedicalRecord},
    rng::StreamRng,
    thresholds::{RiskScore, SignalGates},
};

pub fn health_insurance(
    config: &InsuranceConfig,
    gates: &SignalGates,
    score: RiskScore,
    rng: &mut StreamRng,
) -> HealthInsurance {
    let premium = config.premium.sample(rng);
    if !score.at_least(gates.arrears) {
        return HealthInsurance {
            premium,
            overdue: false,
            arrears: 0,
            months_overdue: 0,
        };
    }

    HealthInsurance {
        premium,
        overdue: rng.chance(config.overdue_probability),
        arrears: config.arrears.sample(rng),
        months_overdue: config.months_overdue.sample(rng) as u32,
    }
}

/// At most one visit, inside the configured window.
pub fn medical_history(
    config: &MedicalConfig,
    gates: &SignalGates,
    score: RiskScore,
    rng: &mut StreamRng,
) -> Vec<MedicalRecord> {
    if !score.at_least(gates.medical_visit) {
        return Vec::new();
    }
    vec![MedicalRecord {
        date: config.window.sample(rng).date_naive(),
        kind: rng.pick(&config.kinds).clone(),
        reason: rng.pick(&config.reasons).clone(),
    }]
}
