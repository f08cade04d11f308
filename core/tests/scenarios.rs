//! End-to-end generation scenarios at pinned scores.

use carewatch_core::{
    clock::FixedClock,
    config::{DatasetConfig, IntBand},
    engine::DatasetEngine,
    error::CoreError,
    risk_classifier::RiskClassifier,
    risk_factors::{RiskDimension, RiskFactors},
    rng::StreamRng,
    thresholds::{RiskLevel, RiskScore, Urgency},
};
use chrono::{DateTime, TimeZone, Utc};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap()
}

/// Engine whose every household draws the same score.
fn pinned_engine(score: i64, seed: u64) -> DatasetEngine {
    let mut config = DatasetConfig::builtin();
    config.score = IntBand::new(score, score);
    DatasetEngine::new(format!("pinned-{score}"), seed, config, &FixedClock::new(now()))
        .expect("engine")
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn critical_economic_household_gets_urgent_economic_plan() {
    let classifier = RiskClassifier::new(&DatasetConfig::builtin()).unwrap();
    let factors = RiskFactors { economic: 0.9, health: 0.5, psychological: 0.4, social: 0.3 };
    let score = RiskScore::new(85).unwrap();
    let analysis = classifier.analyze(score, &factors, now(), &mut StreamRng::from_seed(3));

    assert_eq!(classifier.classify_risk_level(score), RiskLevel::Red);
    assert_eq!(analysis.urgency, Urgency::Critical);
    assert_eq!(analysis.summary, "경제적 어려움으로 인한 위기 징후. 긴급 개입 필요");
    assert_eq!(
        analysis.recommended_actions,
        vec!["긴급 생계비 지원", "취업 지원 프로그램 연계", "자활 지원 센터 연결"]
    );
    let days = (analysis.predicted_crisis_date.unwrap() - now().date_naive()).num_days();
    assert!((10..=30).contains(&days), "critical forecast {days} days out");
}

#[test]
fn medium_household_has_no_forecast_and_clean_insurance() {
    let households = pinned_engine(45, 11).generate(40).unwrap();
    for h in &households {
        assert_eq!(h.risk_level, RiskLevel::Yellow);
        assert_eq!(h.ai_analysis.urgency, Urgency::Medium);
        assert_eq!(h.ai_analysis.predicted_crisis_date, None);
        assert!(!h.health_insurance.overdue);
        assert!(h.ai_analysis.summary.ends_with("정기적 모니터링 권장"));
        assert!(h.counseling_records.len() <= 1);
        assert!(h.electricity_usage.iter().all(|p| !p.overdue));
    }
}

#[test]
fn critical_households_show_decline_and_heavy_counseling() {
    let households = pinned_engine(90, 12).generate(40).unwrap();
    for h in &households {
        assert_eq!(h.risk_level, RiskLevel::Red);
        assert!((2..=4).contains(&h.counseling_records.len()), "{}", h.household_id);
        let first = h.electricity_usage.first().unwrap().usage;
        let last = h.electricity_usage.last().unwrap().usage;
        assert!(last < first, "{}: electricity did not decline", h.household_id);
        let days = (h.ai_analysis.predicted_crisis_date.unwrap() - now().date_naive()).num_days();
        assert!((10..=30).contains(&days));
    }
    assert!(
        households.iter().any(|h| h.health_insurance.overdue),
        "no overdue insurance among 40 critical households"
    );
}

#[test]
fn social_dominance_uses_economic_profile() {
    let classifier = RiskClassifier::new(&DatasetConfig::builtin()).unwrap();
    let factors = RiskFactors { economic: 0.3, health: 0.3, psychological: 0.3, social: 0.9 };
    assert_eq!(classifier.dominant_factor(&factors), RiskDimension::Social);
    let analysis = classifier.analyze(
        RiskScore::new(50).unwrap(),
        &factors,
        now(),
        &mut StreamRng::from_seed(0),
    );
    assert_eq!(analysis.recommended_actions, classifier.recommend_actions(RiskDimension::Economic));
}

#[test]
fn standard_batch_distribution_covers_every_household() {
    let clock = FixedClock::new(now());
    let engine = DatasetEngine::build("batch".into(), 42, &clock).unwrap();
    let households = engine.generate(120).unwrap();
    let dist = carewatch_core::analytics::RiskDistribution::from_households(&households);

    assert_eq!(households.len(), 120);
    assert_eq!(dist.total, 120);
    assert_eq!(dist.critical + dist.high + dist.medium + dist.low, 120);
    assert!(dist.critical > 0 && dist.low > 0, "distribution too narrow: {dist:?}");
}

#[test]
fn batch_size_preconditions_are_enforced() {
    let clock = FixedClock::new(now());
    let engine = DatasetEngine::build("bounds".into(), 1, &clock).unwrap();

    assert!(matches!(
        engine.generate(0),
        Err(CoreError::GenerationPrecondition { .. })
    ));
    assert!(matches!(
        engine.generate(10_000),
        Err(CoreError::GenerationPrecondition { .. })
    ));
    assert_eq!(engine.generate(1).unwrap().len(), 1);
}

#[test]
fn invalid_config_is_rejected_before_generation() {
    let mut config = DatasetConfig::builtin();
    config.score = IntBand::new(50, 120);
    let result = DatasetEngine::new("bad".into(), 1, config, &FixedClock::new(now()));
    assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
}

#[test]
fn out_of_horizon_day_bands_fail_before_generation() {
    let mut config = DatasetConfig::builtin();
    config.counseling.days_ago = IntBand::new(1, 200_000_000);
    let result = DatasetEngine::new("far-past".into(), 1, config, &FixedClock::new(now()));
    assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));

    let mut config = DatasetConfig::builtin();
    config.analysis.crisis_critical = IntBand::new(10, 500_000_000);
    let result = DatasetEngine::new("far-future".into(), 1, config, &FixedClock::new(now()));
    assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
}

#[test]
fn widest_allowed_day_bands_generate_without_overflow() {
    let mut config = DatasetConfig::builtin();
    config.counseling.days_ago = IntBand::new(0, carewatch_core::config::MAX_DAY_OFFSET);
    config.analysis.crisis_high = IntBand::new(0, carewatch_core::config::MAX_DAY_OFFSET);
    config.analysis.crisis_critical = IntBand::new(0, carewatch_core::config::MAX_DAY_OFFSET);
    let engine = DatasetEngine::new("wide".into(), 4, config, &FixedClock::new(now())).unwrap();
    assert_eq!(engine.generate(50).unwrap().len(), 50);
}
