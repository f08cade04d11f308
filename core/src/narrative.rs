//! Boundary to the external text-completion service.
//!
//! The service turns a structured prompt about one household into a
//! free-text analysis. Everything here is operational: failures are
//! expected, are logged, and come back as `NarrativeOutcome::Unavailable`.
//! The household record is never touched.

use crate::{clock::Clock, household::Household};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
const API_VERSION: &str = "2023-06-01";

#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("Cannot reach narrative service at {0}")]
    Connection(String),

    #[error("Narrative request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Narrative service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Unexpected narrative response: {0}")]
    ResponseShape(String),

    #[error("ANTHROPIC_API_KEY is not set")]
    MissingApiKey,
}

/// Prompt in, prose out.
pub trait NarrativeClient: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, NarrativeError>;
}

// ── HTTP client ────────────────────────────────────────────────────

pub struct AnthropicClient {
    base_url:     String,
    api_key:      String,
    model:        String,
    max_tokens:   u32,
    timeout_secs: u64,
    client:       reqwest::blocking::Client,
}

impl AnthropicClient {
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, NarrativeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| NarrativeError::Http(e.to_string()))?;
        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs,
            client,
        })
    }

    /// Key from `ANTHROPIC_API_KEY`, 2-minute timeout. `ANTHROPIC_BASE_URL`
    /// and `CAREWATCH_MODEL` override the endpoint and model when set.
    pub fn from_env() -> Result<Self, NarrativeError> {
        let key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(NarrativeError::MissingApiKey)?;
        let mut client = Self::new(&key, 120)?;
        if let Ok(url) = std::env::var("ANTHROPIC_BASE_URL") {
            client = client.with_base_url(&url);
        }
        if let Ok(model) = std::env::var("CAREWATCH_MODEL") {
            client = client.with_model(&model);
        }
        Ok(client)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model:      &'a str,
    max_tokens: u32,
    messages:   [UserMessage<'a>; 1],
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role:    &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl NarrativeClient for AnthropicClient {
    fn complete(&self, prompt: &str) -> Result<String, NarrativeError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [UserMessage { role: "user", content: prompt }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    NarrativeError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    NarrativeError::Timeout(self.timeout_secs)
                } else {
                    NarrativeError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(NarrativeError::Service { status: status.as_u16(), body });
        }

        let parsed: MessagesResponse = response
            .json()
            .map_err(|e| NarrativeError::ResponseShape(e.to_string()))?;
        first_text_block(parsed)
    }
}

fn first_text_block(response: MessagesResponse) -> Result<String, NarrativeError> {
    response
        .content
        .into_iter()
        .find(|b| b.kind == "text")
        .and_then(|b| b.text)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| NarrativeError::ResponseShape("no text block in response".into()))
}

/// Test double: a fixed response or a fixed failure.
pub struct MockNarrativeClient {
    response: Result<String, String>,
}

impl MockNarrativeClient {
    pub fn new(response: &str) -> Self {
        Self { response: Ok(response.to_string()) }
    }

    /// Every call fails with `NarrativeError::Connection`.
    pub fn unreachable(base_url: &str) -> Self {
        Self { response: Err(base_url.to_string()) }
    }
}

impl NarrativeClient for MockNarrativeClient {
    fn complete(&self, _prompt: &str) -> Result<String, NarrativeError> {
        self.response
            .clone()
            .map_err(NarrativeError::Connection)
    }
}

// ── Service ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeReport {
    pub analysis:     String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NarrativeOutcome {
    Available(NarrativeReport),
    Unavailable { household_id: String, reason: String },
}

impl NarrativeOutcome {
    pub fn report(&self) -> Option<&NarrativeReport> {
        match self {
            Self::Available(r) => Some(r),
            Self::Unavailable { .. } => None,
        }
    }
}

pub struct NarrativeService {
    client: Box<dyn NarrativeClient>,
    clock:  Box<dyn Clock>,
}

impl NarrativeService {
    pub fn new(client: Box<dyn NarrativeClient>, clock: Box<dyn Clock>) -> Self {
        Self { client, clock }
    }

    /// One request, no retries.
    pub fn analyze(&self, household: &Household) -> NarrativeOutcome {
        let prompt = build_prompt(household);
        match self.client.complete(&prompt) {
            Ok(analysis) => NarrativeOutcome::Available(NarrativeReport {
                analysis,
                generated_at: self.clock.now(),
            }),
            Err(e) => {
                log::warn!("narrative unavailable for {}: {e}", household.household_id);
                NarrativeOutcome::Unavailable {
                    household_id: household.household_id.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

// ── Prompt ─────────────────────────────────────────────────────────

pub fn build_prompt(h: &Household) -> String {
    let f = &h.risk_factors;
    let ins = &h.health_insurance;
    let calls = &h.call_pattern;

    let mut lines = vec![
        "당신은 세종시 사회복지 AI 분석가입니다. 다음 가구의 데이터를 분석하여 위기 가능성을 평가하고 구체적인 개입 방안을 제시해주세요.".to_string(),
        String::new(),
        "<가구 정보>".to_string(),
        format!("- ID: {}", h.household_id),
        format!("- 지역: {} {}", h.region, h.dong),
        format!("- 가구 형태: {}", h.household_type),
        format!("- 나이/성별: {}세 {}", h.age, h.gender),
        format!("- 위험도 점수: {}점", h.risk_score),
        String::new(),
        "<위험 요인>".to_string(),
        format!("- 경제적 위험: {}%", percent(f.economic)),
        format!("- 건강 위험: {}%", percent(f.health)),
        format!("- 심리적 위험: {}%", percent(f.psychological)),
        format!("- 사회적 위험: {}%", percent(f.social)),
        String::new(),
        "<전력/수도 사용 추이>".to_string(),
        "최근 6개월 전력 사용량:".to_string(),
    ];
    lines.extend(h.electricity_usage.iter().map(|e| {
        let status = if e.overdue { "체납" } else { "정상" };
        format!("- {}: {}kWh ({status})", e.month, e.usage)
    }));
    lines.extend([
        String::new(),
        "<건강보험>".to_string(),
        format!("- 월 보험료: {}원", group_thousands(ins.premium)),
        format!("- 체납 여부: {}", if ins.overdue { "예" } else { "아니오" }),
        format!("- 체납액: {}원", group_thousands(ins.arrears)),
        String::new(),
        "<상담 기록>".to_string(),
    ]);
    lines.extend(h.counseling_records.iter().map(|c| {
        format!(
            "- {}: {} ({})\n  {}\n  키워드: {}",
            c.date.to_rfc3339_opts(SecondsFormat::Millis, true),
            c.kind,
            c.category.join(", "),
            c.summary,
            c.keywords.join(", ")
        )
    }));
    lines.extend([
        String::new(),
        "<통화 패턴>".to_string(),
        format!("- 총 통화 수: {}회", calls.total_calls),
        format!("- 빈도 변화: {}%", percent(calls.frequency_change)),
        format!("- 응급 통화: 119 {}회", calls.emergency_calls.fire_rescue),
        format!("- 사회적 통화 비율: {}%", percent(calls.social_calls_ratio)),
        String::new(),
        "위 데이터를 종합 분석하여 다음 형식으로 답변해주세요:".to_string(),
        String::new(),
        "1. **종합 평가** (2-3문장으로 현재 상황 요약)".to_string(),
        "2. **주요 위험 징후** (구체적인 3-5가지 항목)".to_string(),
        "3. **권장 개입 방안** (우선순위별로 3-5가지)".to_string(),
        "4. **예상 시나리오** (개입 시 vs 미개입 시)".to_string(),
        "5. **긴급도 평가** (CRITICAL/HIGH/MEDIUM/LOW 중 하나와 그 이유)".to_string(),
        String::new(),
        "전문적이면서도 따뜻한 톤으로 작성해주세요.".to_string(),
    ]);
    lines.join("\n")
}

fn percent(ratio: f64) -> i64 {
    (ratio * 100.0).round() as i64
}

/// 1234567 → "1,234,567".
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
