//! Narrative analysis through the client seam; failures degrade, never abort.

use carewatch_core::{
    clock::FixedClock,
    engine::DatasetEngine,
    household::Household,
    narrative::{
        build_prompt, AnthropicClient, MockNarrativeClient, NarrativeClient, NarrativeError,
        NarrativeOutcome, NarrativeService,
    },
};
use chrono::{TimeZone, Utc};
use std::{
    io::{Read, Write},
    net::{TcpListener, TcpStream},
    thread::{self, JoinHandle},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2024, 11, 1, 12, 0, 0).unwrap())
}

fn sample_household() -> Household {
    let engine = DatasetEngine::build("narrative".into(), 21, &clock()).unwrap();
    engine.generate(1).unwrap().remove(0)
}

/// One-shot HTTP server: answers the first request with `status` and
/// `body`, and hands back the raw request it received.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub");
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let request = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write response");
        request
    });
    (url, handle)
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).expect("read request");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn stub_client(url: &str) -> AnthropicClient {
    // Keep loopback traffic off any proxy configured in the environment.
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    std::env::set_var("no_proxy", "127.0.0.1,localhost");
    AnthropicClient::new("test-key", 5)
        .unwrap()
        .with_base_url(&format!("{url}/"))
        .with_model("stub-model")
        .with_max_tokens(64)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn successful_completion_is_stamped_with_clock_time() {
    let _ = env_logger::builder().is_test(true).try_init();
    let service = NarrativeService::new(
        Box::new(MockNarrativeClient::new("1. **종합 평가** 위기 징후 관찰")),
        Box::new(clock()),
    );
    let outcome = service.analyze(&sample_household());
    let report = outcome.report().expect("report available");

    assert_eq!(report.analysis, "1. **종합 평가** 위기 징후 관찰");
    assert_eq!(report.generated_at, Utc.with_ymd_and_hms(2024, 11, 1, 12, 0, 0).unwrap());
}

#[test]
fn unreachable_service_degrades_to_unavailable() {
    let _ = env_logger::builder().is_test(true).try_init();
    let household = sample_household();
    let before = household.clone();
    let service = NarrativeService::new(
        Box::new(MockNarrativeClient::unreachable("http://localhost:1")),
        Box::new(clock()),
    );

    match service.analyze(&household) {
        NarrativeOutcome::Unavailable { household_id, reason } => {
            assert_eq!(household_id, household.household_id);
            assert!(reason.contains("localhost:1"), "reason: {reason}");
        }
        other => panic!("expected Unavailable, got {other:?}"),
    }
    assert_eq!(household, before, "rule-based record must be untouched");
}

#[test]
fn prompt_carries_household_signals() {
    let h = sample_household();
    let prompt = build_prompt(&h);

    assert!(prompt.contains(&format!("- ID: {}", h.household_id)));
    assert!(prompt.contains(&format!("- 지역: {} {}", h.region, h.dong)));
    assert!(prompt.contains(&format!("- 위험도 점수: {}점", h.risk_score)));
    assert!(prompt.contains("<위험 요인>"));
    assert!(prompt.contains("최근 6개월 전력 사용량:"));
    for point in &h.electricity_usage {
        assert!(prompt.contains(&point.month), "missing month {}", point.month);
    }
    assert!(prompt.contains("CRITICAL/HIGH/MEDIUM/LOW"));
    assert!(prompt.ends_with("전문적이면서도 따뜻한 톤으로 작성해주세요."));
}

#[test]
fn client_posts_messages_request_and_reads_text_block() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"content":[{"type":"text","text":"종합 평가: 긴급 개입 필요"}]}"#,
    );
    let text = stub_client(&url).complete("가구 분석").unwrap();
    let request = server.join().unwrap();

    assert_eq!(text, "종합 평가: 긴급 개입 필요");
    assert!(request.starts_with("POST /v1/messages "), "request line: {request}");
    let lower = request.to_lowercase();
    assert!(lower.contains("x-api-key: test-key"));
    assert!(lower.contains("anthropic-version: 2023-06-01"));
    assert!(request.contains(r#""model":"stub-model""#));
    assert!(request.contains(r#""max_tokens":64"#));
    assert!(request.contains("가구 분석"));
}

#[test]
fn client_maps_error_status_to_service_error() {
    let (url, server) = serve_once("500 Internal Server Error", "boom");
    let err = stub_client(&url).complete("prompt").unwrap_err();
    server.join().unwrap();

    match err {
        NarrativeError::Service { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Service error, got {other:?}"),
    }
}

#[test]
fn client_maps_missing_text_to_shape_error() {
    let (url, server) = serve_once("200 OK", r#"{"content":[]}"#);
    let err = stub_client(&url).complete("prompt").unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, NarrativeError::ResponseShape(_)), "{err:?}");

    let (url, server) = serve_once("200 OK", "not json");
    let err = stub_client(&url).complete("prompt").unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, NarrativeError::ResponseShape(_)), "{err:?}");
}

#[test]
fn client_maps_refused_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = stub_client(&url).complete("prompt").unwrap_err();
    match err {
        NarrativeError::Connection(base) => assert_eq!(base, url),
        other => panic!("expected Connection error, got {other:?}"),
    }
}

#[test]
fn prompt_sections_are_separated_by_blank_lines() {
    let h = sample_household();
    let prompt = build_prompt(&h);

    let sections = ["<가구 정보>", "<위험 요인>", "<전력/수도 사용 추이>", "<건강보험>", "<상담 기록>", "<통화 패턴>"];
    let mut last = 0;
    for section in sections {
        let at = prompt.find(&format!("\n\n{section}\n")).unwrap_or_else(|| panic!("{section} missing"));
        assert!(at > last, "{section} out of order");
        last = at;
    }
    assert_eq!(
        prompt.lines().filter(|l| l.starts_with("- 20")).count(),
        h.electricity_usage.len() + h.counseling_records.len(),
        "one line per usage point and per counseling record"
    );
    assert!(!prompt.ends_with('\n'));
}
