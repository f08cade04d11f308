//! The household record, exactly as consumed by the dashboard.
//!
//! Key names are part of the external contract (camelCase, see the
//! dataset consumers). Do not rename fields without a serde rename.

use crate::{
    risk_factors::RiskFactors,
    thresholds::{RiskLevel, RiskScore, Urgency},
    types::EntityId,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    pub id:                 EntityId,
    pub household_id:       String,
    pub region:             String,
    pub dong:               String,
    pub household_type:     String,
    pub age:                u8,
    pub gender:             String,
    pub registered_at:      DateTime<Utc>,
    pub risk_score:         RiskScore,
    pub risk_level:         RiskLevel,
    pub risk_factors:       RiskFactors,
    pub electricity_usage:  Vec<UsagePoint>,
    pub water_usage:        Vec<UsagePoint>,
    pub health_insurance:   HealthInsurance,
    pub medical_history:    Vec<MedicalRecord>,
    pub counseling_records: Vec<CounselingRecord>,
    pub call_pattern:       CallPattern,
    pub intervention:       Option<Intervention>,
    pub last_contact:       DateTime<Utc>,
    pub ai_analysis:        AiAnalysis,
}

/// One month of a utility series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsagePoint {
    pub month:   String,
    pub usage:   f64,
    pub bill:    i64,
    pub overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthInsurance {
    pub premium:        i64,
    pub overdue:        bool,
    pub arrears:        i64,
    pub months_overdue: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub date:   NaiveDate,
    #[serde(rename = "type")]
    pub kind:   String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounselingRecord {
    pub date:      DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind:      String,
    pub category:  Vec<String>,
    pub summary:   String,
    pub keywords:  Vec<String>,
    /// In [-1, 0].
    pub sentiment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallPattern {
    pub total_calls:        u32,
    /// Signed ratio; negative means calling less than before.
    pub frequency_change:   f64,
    pub emergency_calls:    EmergencyCalls,
    pub social_calls_ratio: f64,
}

/// Emergency calls by service line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmergencyCalls {
    #[serde(rename = "119")]
    pub fire_rescue: u32,
    #[serde(rename = "112")]
    pub police:      u32,
}

/// Rule-derived analysis attached at generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    pub summary:               String,
    pub urgency:               Urgency,
    pub recommended_actions:   Vec<String>,
    pub predicted_crisis_date: Option<NaiveDate>,
}

/// Case-work record owned by the intervention workflow. Generation always
/// leaves it empty; the type exists so populated records round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intervention {
    pub id:             EntityId,
    pub household_id:   String,
    #[serde(rename = "type")]
    pub kind:           String,
    pub assigned_to:    String,
    pub status:         InterventionStatus,
    pub contact_method: String,
    pub contacted_at:   DateTime<Utc>,
    pub service_linked: Vec<String>,
    pub notes:          String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome:        Option<String>,
    pub created_at:     DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at:   Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterventionStatus {
    Pending,
    InProgress,
    Completed,
}
