//! Dataset configuration: every table and band the generator and the
//! classifier read. Nothing downstream holds its own constants.
//!
//! `DatasetConfig::builtin()` is the Sejong-city reference dataset.
//! `DatasetConfig::load(path)` reads a JSON document of the same shape.

use crate::{
    error::{CoreError, CoreResult},
    risk_factors::RiskDimension,
    rng::StreamRng,
    thresholds::{RiskScore, SignalGates, ThresholdLadder},
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ── Primitive bands ────────────────────────────────────────────────

/// Widest day offset (about a century) a band may push a date from "now".
pub const MAX_DAY_OFFSET: i64 = 36_500;

/// Inclusive integer band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntBand {
    pub min: i64,
    pub max: i64,
}

impl IntBand {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut StreamRng) -> i64 {
        rng.range_i64(self.min, self.max)
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn check(&self, what: &str) -> CoreResult<()> {
        if self.min > self.max {
            return Err(CoreError::config(format!(
                "{what}: min {} > max {}",
                self.min, self.max
            )));
        }
        if self.max.checked_sub(self.min).is_none() {
            return Err(CoreError::config(format!(
                "{what}: band [{}, {}] is too wide",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Day offsets from "now": non-negative and within `MAX_DAY_OFFSET`.
    fn check_days(&self, what: &str) -> CoreResult<()> {
        self.check(what)?;
        if self.min < 0 || self.max > MAX_DAY_OFFSET {
            return Err(CoreError::config(format!(
                "{what}: day offsets must lie within [0, {MAX_DAY_OFFSET}]"
            )));
        }
        Ok(())
    }

    /// Counts stored as u32.
    fn check_count(&self, what: &str) -> CoreResult<()> {
        self.check(what)?;
        if self.min < 0 || self.max > u32::MAX as i64 {
            return Err(CoreError::config(format!(
                "{what}: counts must lie within [0, {}]",
                u32::MAX
            )));
        }
        Ok(())
    }
}

/// Half-open float band [min, max).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatBand {
    pub min: f64,
    pub max: f64,
}

impl FloatBand {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut StreamRng) -> f64 {
        rng.range_f64(self.min, self.max)
    }

    /// Whole-unit draw over the rounded bounds, both ends inclusive.
    pub fn sample_whole(&self, rng: &mut StreamRng) -> f64 {
        rng.range_i64(self.min.round() as i64, self.max.round() as i64) as f64
    }

    fn check(&self, what: &str) -> CoreResult<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min > self.max {
            return Err(CoreError::config(format!(
                "{what}: invalid band [{}, {})",
                self.min, self.max
            )));
        }
        Ok(())
    }

    fn check_unit(&self, what: &str) -> CoreResult<()> {
        self.check(what)?;
        if self.min < 0.0 || self.max > 1.0 {
            return Err(CoreError::config(format!("{what}: band must lie within [0, 1]")));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end:   DateTime<Utc>,
}

impl DateWindow {
    pub fn sample(&self, rng: &mut StreamRng) -> DateTime<Utc> {
        let span_ms = (self.end - self.start).num_milliseconds();
        let offset = (rng.next_f64() * span_ms as f64) as i64;
        self.start + Duration::milliseconds(offset)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    fn check(&self, what: &str) -> CoreResult<()> {
        if self.start > self.end {
            return Err(CoreError::config(format!("{what}: window starts after it ends")));
        }
        Ok(())
    }
}

// ── Sections ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Internal id prefix, e.g. `hh` → `hh_001`.
    pub internal_prefix: String,
    pub internal_width:  usize,
    pub cohort_year:     u16,
    pub region_code:     String,
    pub sequence_width:  usize,
    /// Largest batch a single run may produce.
    pub max_sequence:    usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub region: String,
    pub dongs:  Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicsConfig {
    pub regions:                 Vec<RegionConfig>,
    pub household_types:         Vec<String>,
    /// Drawn from instead of `household_types` when age > `elderly_age`.
    pub elderly_household_types: Vec<String>,
    pub elderly_age:             u8,
    pub genders:                 Vec<String>,
    pub age:                     IntBand,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorConfig {
    pub baseline:        FloatBand,
    pub biased_economic: FloatBand,
    /// Health and psychological, once the factor-bias gate is crossed.
    pub biased_other:    FloatBand,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnitRate {
    /// Whole-number rate redrawn for every period.
    Jittered { min: i64, max: i64 },
    Fixed { rate: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageSeriesConfig {
    pub base:          FloatBand,
    /// Draw base and decline steps as whole units.
    pub whole_units:   bool,
    /// Per-step decline above the steep gate, multiplied by period index.
    pub steep_step:    FloatBand,
    pub moderate_step: FloatBand,
    /// Flat, two-sided fluctuation for low-risk households.
    pub noise:         FloatBand,
    pub floor:         f64,
    pub rate:          UnitRate,
    /// Decimal places kept on the reported usage.
    pub decimals:      u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverdueConfig {
    /// First period index eligible for an overdue flag.
    pub from_period: usize,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilitiesConfig {
    pub months:      Vec<String>,
    pub electricity: UsageSeriesConfig,
    pub water:       UsageSeriesConfig,
    pub overdue:     OverdueConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsuranceConfig {
    pub premium:             IntBand,
    pub overdue_probability: f64,
    pub arrears:             IntBand,
    pub months_overdue:      IntBand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalConfig {
    pub window:  DateWindow,
    pub kinds:   Vec<String>,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub label:         String,
    pub min_score:     u8,
    pub probability:   f64,
    /// How many leading keywords are attached when the category fires.
    pub keyword_count: IntBand,
    pub keywords:      Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounselingConfig {
    pub heavy_count:    IntBand,
    pub light_count:    IntBand,
    pub baseline_count: IntBand,
    pub days_ago:       IntBand,
    pub kinds:          Vec<String>,
    pub categories:     Vec<CategoryConfig>,
    /// Magnitude band; stored sentiment is the negation.
    pub sentiment:      FloatBand,
    /// `{categories}` and `{keywords}` are replaced with comma-joined lists.
    pub summary_template: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CallConfig {
    pub total_calls:           IntBand,
    pub isolated_decline:      FloatBand,
    pub normal_change:         FloatBand,
    pub emergency_calls:       IntBand,
    pub isolated_social_ratio: FloatBand,
    pub normal_social_ratio:   FloatBand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineConfig {
    pub registration: DateWindow,
    pub last_contact: DateWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionProfile {
    pub dimension: RiskDimension,
    pub summary:   String,
    pub actions:   Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub profiles:        Vec<DimensionProfile>,
    /// Used when the dominant dimension has no profile.
    pub fallback:        RiskDimension,
    pub urgent_suffix:   String,
    pub routine_suffix:  String,
    /// Days ahead of "now" for the High tier.
    pub crisis_high:     IntBand,
    pub crisis_critical: IntBand,
}

// ── Root ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub identity:     IdentityConfig,
    pub demographics: DemographicsConfig,
    pub score:        IntBand,
    pub factors:      FactorConfig,
    pub ladder:       ThresholdLadder,
    pub gates:        SignalGates,
    pub utilities:    UtilitiesConfig,
    pub insurance:    InsuranceConfig,
    pub medical:      MedicalConfig,
    pub counseling:   CounselingConfig,
    pub calls:        CallConfig,
    pub timeline:     TimelineConfig,
    pub analysis:     AnalysisConfig,
}

impl DatasetConfig {
    /// Load and validate a JSON config document.
    /// In tests, use DatasetConfig::builtin().
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: DatasetConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CoreResult<()> {
        let id = &self.identity;
        if id.max_sequence == 0 {
            return Err(CoreError::config("identity.max_sequence must be positive"));
        }

        let demo = &self.demographics;
        if demo.regions.is_empty() {
            return Err(CoreError::config("region list is empty"));
        }
        if let Some(r) = demo.regions.iter().find(|r| r.dongs.is_empty()) {
            return Err(CoreError::config(format!("region '{}' has no dongs", r.region)));
        }
        non_empty(&demo.household_types, "household_types")?;
        non_empty(&demo.elderly_household_types, "elderly_household_types")?;
        non_empty(&demo.genders, "genders")?;
        demo.age.check("age")?;
        if demo.age.min < 0 || demo.age.max > u8::MAX as i64 {
            return Err(CoreError::config("age band must fit in 0..=255"));
        }

        self.score.check("score")?;
        if self.score.min < 0 || self.score.max > RiskScore::MAX as i64 {
            return Err(CoreError::config("score band must lie within [0, 100]"));
        }
        self.factors.baseline.check_unit("factors.baseline")?;
        self.factors.biased_economic.check_unit("factors.biased_economic")?;
        self.factors.biased_other.check_unit("factors.biased_other")?;
        self.ladder.validate()?;

        let util = &self.utilities;
        non_empty(&util.months, "utilities.months")?;
        check_series(&util.electricity, "electricity")?;
        check_series(&util.water, "water")?;
        probability(util.overdue.probability, "utilities.overdue.probability")?;

        let ins = &self.insurance;
        ins.premium.check("insurance.premium")?;
        ins.arrears.check("insurance.arrears")?;
        ins.months_overdue.check_count("insurance.months_overdue")?;
        probability(ins.overdue_probability, "insurance.overdue_probability")?;

        self.medical.window.check("medical.window")?;
        non_empty(&self.medical.kinds, "medical.kinds")?;
        non_empty(&self.medical.reasons, "medical.reasons")?;

        let c = &self.counseling;
        c.heavy_count.check_count("counseling.heavy_count")?;
        c.light_count.check_count("counseling.light_count")?;
        c.baseline_count.check_count("counseling.baseline_count")?;
        c.days_ago.check_days("counseling.days_ago")?;
        non_empty(&c.kinds, "counseling.kinds")?;
        non_empty(&c.categories, "counseling.categories")?;
        c.sentiment.check_unit("counseling.sentiment")?;
        for cat in &c.categories {
            probability(cat.probability, &cat.label)?;
            cat.keyword_count.check(&cat.label)?;
            if cat.keyword_count.min < 1 || cat.keyword_count.max as usize > cat.keywords.len() {
                return Err(CoreError::config(format!(
                    "category '{}': keyword_count must lie within [1, {}]",
                    cat.label,
                    cat.keywords.len()
                )));
            }
        }

        let calls = &self.calls;
        calls.total_calls.check_count("calls.total_calls")?;
        calls.emergency_calls.check_count("calls.emergency_calls")?;
        calls.isolated_decline.check_unit("calls.isolated_decline")?;
        calls.normal_change.check("calls.normal_change")?;
        calls.isolated_social_ratio.check_unit("calls.isolated_social_ratio")?;
        calls.normal_social_ratio.check_unit("calls.normal_social_ratio")?;

        let tl = &self.timeline;
        tl.registration.check("timeline.registration")?;
        tl.last_contact.check("timeline.last_contact")?;
        if tl.registration.end >= tl.last_contact.start {
            return Err(CoreError::config(
                "registration window must end before the last-contact window starts",
            ));
        }

        let an = &self.analysis;
        let profile = an.profiles.iter().find(|p| p.dimension == an.fallback);
        match profile {
            Some(p) if !p.actions.is_empty() => {}
            _ => {
                return Err(CoreError::config(
                    "analysis.fallback must name a profile with at least one action",
                ))
            }
        }
        an.crisis_high.check_days("analysis.crisis_high")?;
        an.crisis_critical.check_days("analysis.crisis_critical")?;
        Ok(())
    }

    /// Sejong-city reference tables.
    pub fn builtin() -> Self {
        let regions = [
            ("조치원읍", &["신흥리", "봉산리", "서창리", "월산리"][..]),
            ("한솔동", &["한솔동"][..]),
            ("나성동", &["나성동"][..]),
            ("아름동", &["아름동"][..]),
            ("도담동", &["도담동"][..]),
            ("어진동", &["어진동"][..]),
            ("종촌동", &["종촌동"][..]),
            ("고운동", &["고운동"][..]),
            ("보람동", &["보람동"][..]),
            ("대평동", &["대평동"][..]),
        ]
        .into_iter()
        .map(|(region, dongs)| RegionConfig {
            region: region.into(),
            dongs: strings(dongs),
        })
        .collect();

        let demographics = DemographicsConfig {
            regions,
            household_types: strings(&["1인 가구", "2인 가구", "3인 가구", "4인 이상"]),
            elderly_household_types: strings(&["1인 가구", "2인 가구"]),
            elderly_age: 60,
            genders: strings(&["남성", "여성"]),
            age: IntBand::new(25, 85),
        };

        let utilities = UtilitiesConfig {
            months: strings(&["2024-05", "2024-06", "2024-07", "2024-08", "2024-09", "2024-10"]),
            electricity: UsageSeriesConfig {
                base: FloatBand::new(80.0, 250.0),
                whole_units: true,
                steep_step: FloatBand::new(10.0, 25.0),
                moderate_step: FloatBand::new(3.0, 10.0),
                noise: FloatBand::new(-5.0, 5.0),
                floor: 10.0,
                rate: UnitRate::Jittered { min: 120, max: 150 },
                decimals: 0,
            },
            water: UsageSeriesConfig {
                base: FloatBand::new(3.0, 12.0),
                whole_units: false,
                steep_step: FloatBand::new(0.5, 1.5),
                moderate_step: FloatBand::new(0.2, 0.8),
                noise: FloatBand::new(-0.3, 0.3),
                floor: 1.0,
                rate: UnitRate::Fixed { rate: 1700.0 },
                decimals: 1,
            },
            overdue: OverdueConfig { from_period: 3, probability: 0.7 },
        };

        let counseling = CounselingConfig {
            heavy_count: IntBand::new(2, 4),
            light_count: IntBand::new(1, 2),
            baseline_count: IntBand::new(0, 1),
            days_ago: IntBand::new(1, 90),
            kinds: strings(&["복지상담", "심리상담"]),
            categories: vec![
                CategoryConfig {
                    label: "경제".into(),
                    min_score: 60,
                    probability: 0.6,
                    keyword_count: IntBand::new(1, 3),
                    keywords: strings(&["실직", "생계곤란", "체납", "빚", "소득감소"]),
                },
                CategoryConfig {
                    label: "건강".into(),
                    min_score: 50,
                    probability: 0.5,
                    keyword_count: IntBand::new(1, 2),
                    keywords: strings(&["통증", "낙상", "응급실", "만성질환", "약값"]),
                },
                CategoryConfig {
                    label: "심리".into(),
                    min_score: 40,
                    probability: 0.7,
                    keyword_count: IntBand::new(1, 3),
                    keywords: strings(&["우울", "고립", "외로움", "불안", "스트레스", "무기력"]),
                },
            ],
            sentiment: FloatBand::new(0.3, 0.9),
            summary_template: "{categories} 관련 상담. {keywords} 호소".into(),
        };

        let analysis = AnalysisConfig {
            profiles: vec![
                DimensionProfile {
                    dimension: RiskDimension::Economic,
                    summary: "경제적 어려움으로 인한 위기 징후".into(),
                    actions: strings(&["긴급 생계비 지원", "취업 지원 프로그램 연계", "자활 지원 센터 연결"]),
                },
                DimensionProfile {
                    dimension: RiskDimension::Health,
                    summary: "건강 악화 및 의료 이용 증가".into(),
                    actions: strings(&["긴급돌봄서비스 투입", "정기 건강검진 지원", "주간보호센터 연계"]),
                },
                DimensionProfile {
                    dimension: RiskDimension::Psychological,
                    summary: "심리적 스트레스 및 사회적 고립".into(),
                    actions: strings(&[
                        "1인 가구 심리상담 우선 연계",
                        "소셜 다이닝 참여 유도",
                        "취미 활동 동아리 연계",
                    ]),
                },
            ],
            fallback: RiskDimension::Economic,
            urgent_suffix: "긴급 개입 필요".into(),
            routine_suffix: "정기적 모니터링 권장".into(),
            crisis_high: IntBand::new(30, 90),
            crisis_critical: IntBand::new(10, 30),
        };

        Self {
            identity: IdentityConfig {
                internal_prefix: "hh".into(),
                internal_width: 3,
                cohort_year: 2024,
                region_code: "SJ".into(),
                sequence_width: 4,
                max_sequence: 9999,
            },
            demographics,
            score: IntBand::new(15, 95),
            factors: FactorConfig {
                baseline: FloatBand::new(0.2, 0.95),
                biased_economic: FloatBand::new(0.6, 0.95),
                biased_other: FloatBand::new(0.5, 0.95),
            },
            ladder: ThresholdLadder::default(),
            gates: SignalGates::default(),
            utilities,
            insurance: InsuranceConfig {
                premium: IntBand::new(30_000, 150_000),
                overdue_probability: 0.7,
                arrears: IntBand::new(50_000, 500_000),
                months_overdue: IntBand::new(1, 6),
            },
            medical: MedicalConfig {
                window: DateWindow {
                    start: utc_midnight(2024, 8, 1),
                    end: utc_midnight(2024, 10, 31),
                },
                kinds: strings(&["응급실", "외래"]),
                reasons: strings(&["낙상", "고혈압", "당뇨", "호흡곤란", "어지럼증"]),
            },
            counseling,
            calls: CallConfig {
                total_calls: IntBand::new(5, 50),
                isolated_decline: FloatBand::new(0.3, 0.7),
                normal_change: FloatBand::new(-0.2, 0.2),
                emergency_calls: IntBand::new(0, 3),
                isolated_social_ratio: FloatBand::new(0.1, 0.3),
                normal_social_ratio: FloatBand::new(0.3, 0.6),
            },
            timeline: TimelineConfig {
                registration: DateWindow {
                    start: utc_midnight(2024, 1, 1),
                    end: utc_midnight(2024, 3, 31),
                },
                last_contact: DateWindow {
                    start: utc_midnight(2024, 9, 1),
                    end: utc_midnight(2024, 10, 31),
                },
            },
            analysis,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn utc_midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    let date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
}

fn non_empty<T>(items: &[T], what: &str) -> CoreResult<()> {
    if items.is_empty() {
        return Err(CoreError::config(format!("{what} is empty")));
    }
    Ok(())
}

fn probability(p: f64, what: &str) -> CoreResult<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(CoreError::config(format!("{what}: probability {p} outside [0, 1]")));
    }
    Ok(())
}

fn check_series(series: &UsageSeriesConfig, what: &str) -> CoreResult<()> {
    series.base.check(what)?;
    series.steep_step.check(what)?;
    series.moderate_step.check(what)?;
    series.noise.check(what)?;
    if series.floor.is_nan() || series.floor <= 0.0 {
        return Err(CoreError::config(format!("{what}: usage floor must be positive")));
    }
    if let UnitRate::Jittered { min, max } = series.rate {
        IntBand::new(min, max).check(what)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_is_valid() {
        DatasetConfig::builtin().validate().unwrap();
    }

    #[test]
    fn overlapping_timeline_is_rejected() {
        let mut config = DatasetConfig::builtin();
        config.timeline.last_contact.start = config.timeline.registration.end;
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn empty_regions_are_rejected() {
        let mut config = DatasetConfig::builtin();
        config.demographics.regions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_fallback_profile_is_rejected() {
        let mut config = DatasetConfig::builtin();
        config.analysis.fallback = RiskDimension::Social;
        assert!(config.validate().is_err());
    }

    #[test]
    fn keyword_count_beyond_list_is_rejected() {
        let mut config = DatasetConfig::builtin();
        config.counseling.categories[1].keyword_count = IntBand::new(1, 9);
        assert!(config.validate().is_err());
    }

    #[test]
    fn far_counseling_dates_are_rejected() {
        let mut config = DatasetConfig::builtin();
        config.counseling.days_ago = IntBand::new(1, 200_000_000);
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig { .. })));

        config.counseling.days_ago = IntBand::new(-5, 10);
        assert!(config.validate().is_err(), "negative offsets would date records in the future");

        config.counseling.days_ago = IntBand::new(0, MAX_DAY_OFFSET);
        config.validate().unwrap();
    }

    #[test]
    fn far_crisis_windows_are_rejected() {
        let mut config = DatasetConfig::builtin();
        config.analysis.crisis_high = IntBand::new(30, MAX_DAY_OFFSET + 1);
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig { .. })));

        let mut config = DatasetConfig::builtin();
        config.analysis.crisis_critical = IntBand::new(10, i64::MAX);
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn overflowing_band_width_is_rejected() {
        let mut config = DatasetConfig::builtin();
        config.insurance.premium = IntBand::new(i64::MIN, i64::MAX);
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig { .. })));

        let mut config = DatasetConfig::builtin();
        config.utilities.electricity.rate = UnitRate::Jittered { min: -10, max: i64::MAX };
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn counts_beyond_u32_are_rejected() {
        let mut config = DatasetConfig::builtin();
        config.calls.total_calls = IntBand::new(5, u32::MAX as i64 + 1);
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig { .. })));

        let mut config = DatasetConfig::builtin();
        config.insurance.months_overdue = IntBand::new(-1, 6);
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_json_document() {
        let config = DatasetConfig::builtin();
        let path = std::env::temp_dir().join(format!("carewatch-config-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        let loaded = DatasetConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.demographics.regions.len(), 10);
        assert_eq!(loaded.ladder, ThresholdLadder::default());
        assert_eq!(loaded.counseling.categories[0].label, "경제");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = DatasetConfig::load("/nonexistent/carewatch.json").unwrap_err();
        assert!(err.to_string().contains("Cannot read"));
    }
}
