//! Aggregate call-pattern counters.

use crate::{
    config::CallConfig,
    household::{CallPattern, EmergencyCalls},
    rng::StreamRng,
    thresholds::{RiskScore, SignalGates},
};

pub fn call_pattern(
    config: &CallConfig,
    gates: &SignalGates,
    score: RiskScore,
    rng: &mut StreamRng,
) -> CallPattern {
    let isolated = score.at_least(gates.isolation);

    let total_calls = config.total_calls.sample(rng) as u32;
    let frequency_change = if isolated {
        -config.isolated_decline.sample(rng)
    } else {
        config.normal_change.sample(rng)
    };
    // Only the fire/rescue line is modelled; police calls stay at zero.
    let fire_rescue = if score.at_least(gates.emergency_calls) {
        config.emergency_calls.sample(rng) as u32
    } else {
        0
    };
    let social_calls_ratio = if isolated {
        config.isolated_social_ratio.sample(rng)
    } else {
        config.normal_social_ratio.sample(rng)
    };

    CallPattern {
        total_calls,
        frequency_change,
        emergency_calls: EmergencyCalls { fire_rescue, police: 0 },
        social_calls_ratio,
    }
}
