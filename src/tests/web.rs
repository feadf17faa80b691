// Router tests driven through tower's oneshot.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for .oneshot()

use crate::app_state::AppState;
use crate::config_loader::ZenConfig;
use crate::demo_seed;
use crate::web::build_router;

fn seeded_app() -> Router {
    let state = Arc::new(AppState::new(ZenConfig::default()));
    demo_seed::seed_all(&state).expect("seeding should succeed");
    build_router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoints_return_ok() {
    let app = seeded_app();

    let response = app.clone().oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["service"], "ZenThera AI Compliance Suite");
}

#[tokio::test]
async fn compliance_dashboard_reflects_seeded_scores() {
    let app = seeded_app();

    let response = app
        .oneshot(get("/api/compliance/dashboard?org_id=org_demo"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["data"]["current_score"].is_object());
    assert_eq!(body["data"]["trend_data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_score_returns_201_and_generates_alerts() {
    let app = seeded_app();

    let payload = json!({
        "organization_id": "org_test",
        "system_name": "risky-model",
        "bias_score": 25.0,
        "transparency_score": 45.0,
        "logs_score": 90.0,
        "energy_score": 70.0
    });
    let response = app
        .clone()
        .oneshot(post_json("/api/compliance/score", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["alerts_generated"], 3);

    let response = app
        .oneshot(get(
            "/api/compliance/alerts?org_id=org_test&status=active&limit=10",
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], 3);
}

#[tokio::test]
async fn create_score_rejects_missing_required_field() {
    let app = seeded_app();

    let response = app
        .oneshot(post_json(
            "/api/compliance/score",
            json!({"organization_id": "org_test"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("system_name"));
}

#[tokio::test]
async fn unknown_compliance_score_is_404() {
    let app = seeded_app();

    let response = app
        .oneshot(get("/api/compliance/score/org_without_scores"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn interaction_analysis_flags_pii_and_toxicity() {
    let app = seeded_app();

    let payload = json!({
        "organization_id": "org_demo",
        "model_name": "gpt-4",
        "prompt": "What's my balance?",
        "response": "You idiot, your SSN is 123-45-6789."
    });
    let response = app
        .oneshot(post_json("/api/observability/interactions", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;

    let risks = body["data"]["risks_detected"].as_array().unwrap();
    let types: Vec<&str> = risks
        .iter()
        .map(|r| r["risk_type"].as_str().unwrap())
        .collect();
    assert!(types.contains(&"privacy_leak"));
    assert!(types.contains(&"toxicity"));
    assert_eq!(body["data"]["analysis_summary"]["requires_review"], true);
}

#[tokio::test]
async fn benign_interaction_detects_no_risks() {
    let app = seeded_app();

    let payload = json!({
        "organization_id": "org_demo",
        "model_name": "gpt-4",
        "prompt": "What is the capital of France?",
        "response": "The capital of France is Paris."
    });
    let response = app
        .oneshot(post_json("/api/observability/interactions", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["analysis_summary"]["total_risks"], 0);
}

#[tokio::test]
async fn ethical_alignment_scores_privacy_violation_low() {
    let app = seeded_app();

    let payload = json!({
        "organization_id": "org_demo",
        "target_entity_id": "interaction_004",
        "target_entity_type": "interaction",
        "target_entity_data": {
            "prompt": "What's my account balance?",
            "response": "Your SSN is 123-45-6789.",
            "model_name": "gpt-4",
            "detected_risks": [
                {"risk_type": "privacy_leak", "risk_score": 0.95},
                {"risk_type": "toxicity", "risk_score": 0.4}
            ]
        }
    });
    let response = app
        .oneshot(post_json("/api/narrative/ethical-alignment", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;

    let overall = body["data"]["alignment"]["overall_alignment_score"]
        .as_f64()
        .unwrap();
    assert!(overall < 0.8);
    let privacy = body["data"]["alignment"]["category_scores"]["privacy"]
        .as_f64()
        .unwrap();
    assert!(privacy < 0.3);
}

#[tokio::test]
async fn failure_alert_lifecycle_enforces_states() {
    let app = seeded_app();

    // alert_003 is seeded open
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/failure/alerts/alert_003/acknowledge",
            json!({"acknowledged_by": "user_009"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["alert"]["status"], "acknowledged");

    // a second acknowledge is rejected
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/failure/alerts/alert_003/acknowledge",
            json!({"acknowledged_by": "user_009"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // resolution still works from acknowledged
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/failure/alerts/alert_003/resolve",
            json!({"resolved_by": "user_009", "resolution_notes": "fixed"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // resolving twice is rejected
    let response = app
        .oneshot(post_json(
            "/api/failure/alerts/alert_003/resolve",
            json!({"resolved_by": "user_009"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn simulate_failure_creates_failure_and_alert() {
    let app = seeded_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/failure/simulate-failure",
            json!({"simulation_type": "latency_spike"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["failure"]["failure_type"], "latency_spike");
    assert!(body["data"]["alert"]["id"].is_string());

    let response = app
        .oneshot(post_json(
            "/api/failure/simulate-failure",
            json!({"simulation_type": "divide_by_zero"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn replay_events_are_ordered_with_timing() {
    let app = seeded_app();

    let response = app
        .clone()
        .oneshot(get("/api/narrative/replays/replay_001/events"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let events = body["data"]["events"].as_array().unwrap();
    assert_eq!(events.len(), 5);
    assert_eq!(events[0]["sequence_number"], 1);
    assert_eq!(events[0]["time_since_previous"], 0.0);
    assert_eq!(events[1]["time_since_previous"], 300.0);

    let response = app
        .oneshot(get("/api/narrative/replays/no_such_replay/events"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_and_connect_llm_unlock_features() {
    let app = seeded_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/upload",
            json!({"files": ["model_card.pdf", "dpia.docx"]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total_files"], 2);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/connect-llm",
            json!({
                "provider": "openai",
                "api_key": "sk-demo",
                "model": "gpt-4",
                "method": "api"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(get("/api/dashboard-data")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["active_features"], 7);
    assert_eq!(body["data"]["llm_connected"], true);
}

#[tokio::test]
async fn upload_with_no_files_is_rejected() {
    let app = seeded_app();

    let response = app
        .oneshot(post_json("/api/upload", json!({"files": []})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_page_renders_html() {
    let app = seeded_app();

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("AI Compliance Dashboard"));
    assert!(html.contains("Features Active"));
}
