//! Six-month utility series (electricity, water).
//!
//! Usage starts from one base level per series and declines along a
//! score-conditioned trajectory. The decline can push usage below zero
//! on paper, so every point is clamped to the series floor afterwards.

use crate::{
    config::{UnitRate, UsageSeriesConfig, UtilitiesConfig},
    household::UsagePoint,
    rng::StreamRng,
    thresholds::{RiskScore, SignalGates},
};

/// Shape of the per-period usage decline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineTier {
    /// Large regression that compounds with the period index.
    Steep,
    Moderate,
    /// Noise-level fluctuation around the base.
    Flat,
}

impl DeclineTier {
    pub fn for_score(score: RiskScore, gates: &SignalGates) -> Self {
        if score.at_least(gates.steep_decline) {
            Self::Steep
        } else if score.at_least(gates.moderate_decline) {
            Self::Moderate
        } else {
            Self::Flat
        }
    }
}

pub fn utility_series(
    utilities: &UtilitiesConfig,
    series: &UsageSeriesConfig,
    gates: &SignalGates,
    score: RiskScore,
    rng: &mut StreamRng,
) -> Vec<UsagePoint> {
    let draw = |band: crate::config::FloatBand, rng: &mut StreamRng| {
        if series.whole_units {
            band.sample_whole(rng)
        } else {
            band.sample(rng)
        }
    };

    let base = draw(series.base, rng);
    let tier = DeclineTier::for_score(score, gates);
    let overdue_eligible = score.at_least(gates.arrears);

    utilities
        .months
        .iter()
        .enumerate()
        .map(|(index, month)| {
            let step = index as f64;
            let decline = match tier {
                DeclineTier::Steep    => step * draw(series.steep_step, rng),
                DeclineTier::Moderate => step * draw(series.moderate_step, rng),
                DeclineTier::Flat     => draw(series.noise, rng),
            };
            let usage = (base - decline).max(series.floor);

            let rate = match series.rate {
                UnitRate::Jittered { min, max } => rng.range_i64(min, max) as f64,
                UnitRate::Fixed { rate } => rate,
            };
            let bill = (usage * rate).round() as i64;

            let overdue = overdue_eligible
                && index >= utilities.overdue.from_period
                && rng.chance(utilities.overdue.probability);

            UsagePoint {
                month: month.clone(),
                usage: round_to(usage, series.decimals).max(series.floor),
                bill,
                overdue,
            }
        })
        .collect()
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
