//! Counseling records: count and topic mix scale with the risk score.
//!
//! RULE: every record carries at least one category, and the returned
//! collection is ordered most recent first.

use crate::{
    config::{CategoryConfig, CounselingConfig, IntBand},
    household::CounselingRecord,
    rng::StreamRng,
    thresholds::{RiskScore, SignalGates},
};
use chrono::{DateTime, Duration, Utc};

pub fn counseling_records(
    config: &CounselingConfig,
    gates: &SignalGates,
    score: RiskScore,
    now: DateTime<Utc>,
    rng: &mut StreamRng,
) -> Vec<CounselingRecord> {
    let count = record_count_band(config, gates, score).sample(rng).max(0) as usize;

    let mut records: Vec<_> = (0..count)
        .map(|_| counseling_record(config, score, now, rng))
        .collect();
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records
}

fn record_count_band(config: &CounselingConfig, gates: &SignalGates, score: RiskScore) -> IntBand {
    if score.at_least(gates.counseling_heavy) {
        config.heavy_count
    } else if score.at_least(gates.counseling_light) {
        config.light_count
    } else {
        config.baseline_count
    }
}

fn counseling_record(
    config: &CounselingConfig,
    score: RiskScore,
    now: DateTime<Utc>,
    rng: &mut StreamRng,
) -> CounselingRecord {
    let date = now - Duration::days(config.days_ago.sample(rng));

    let mut categories = Vec::new();
    let mut keywords = Vec::new();
    for cat in &config.categories {
        if score.at_least(cat.min_score) && rng.chance(cat.probability) {
            categories.push(cat.label.clone());
            let take = cat.keyword_count.sample(rng) as usize;
            keywords.extend(cat.keywords.iter().take(take).cloned());
        }
    }

    if categories.is_empty() {
        let forced: &CategoryConfig = rng.pick(&config.categories);
        categories.push(forced.label.clone());
        let pool: Vec<&String> = config.categories.iter().flat_map(|c| &c.keywords).collect();
        keywords.push((*rng.pick(&pool)).clone());
    }

    let kind = rng.pick(&config.kinds).clone();
    let summary = config
        .summary_template
        .replace("{categories}", &categories.join(", "))
        .replace("{keywords}", &keywords.join(", "));

    CounselingRecord {
        date,
        kind,
        category: categories,
        summary,
        keywords,
        sentiment: -config.sentiment.sample(rng),
    }
}
