// End-to-end flows over the full router: seed, analyze, explain, audit.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use zenthera::app_state::AppState;
use zenthera::config_loader::ZenConfig;
use zenthera::demo_seed;
use zenthera::web::build_router;

fn seeded_app() -> Router {
    let state = Arc::new(AppState::new(ZenConfig::default()));
    demo_seed::seed_all(&state).expect("seeding should succeed");
    build_router(state)
}

async fn send(app: &Router, method: &str, uri: &str, payload: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let request = match payload {
        Some(payload) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn privacy_incident_walkthrough() {
    let app = seeded_app();

    // 1. a new interaction leaks PII and gets flagged
    let (status, body) = send(
        &app,
        "POST",
        "/api/observability/interactions",
        Some(json!({
            "organization_id": "org_demo",
            "model_name": "gpt-4",
            "prompt": "What's my account balance?",
            "response": "Your balance is $12. Your SSN is 987-65-4321 and your card is 4532 0000 1111 2222.",
            "latency_ms": 900.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let interaction_id = body["data"]["interaction"]["id"].as_str().unwrap().to_string();
    let risks = body["data"]["risks_detected"].as_array().unwrap();
    assert!(risks
        .iter()
        .any(|r| r["risk_type"] == "privacy_leak" && r["severity"] == "critical"));

    // 2. the risk shows up in the filtered risk listing
    let (status, body) = send(
        &app,
        "GET",
        "/api/observability/risks?organization_id=org_demo&risk_type=privacy_leak",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["summary"]["total_risks"].as_u64().unwrap() >= 2);

    // 3. an ethical assessment of the interaction comes back poor
    let (status, body) = send(
        &app,
        "POST",
        "/api/narrative/ethical-alignment",
        Some(json!({
            "organization_id": "org_demo",
            "target_entity_id": interaction_id,
            "target_entity_type": "interaction",
            "target_entity_data": {
                "prompt": "What's my account balance?",
                "response": "Your SSN is 987-65-4321.",
                "model_name": "gpt-4",
                "detected_risks": [{"risk_type": "privacy_leak", "risk_score": 1.0}]
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["data"]["assessment_summary"]["lowest_category"],
        "privacy"
    );

    // 4. a risk explanation is generated for the incident
    let (status, body) = send(
        &app,
        "POST",
        "/api/narrative/explanations",
        Some(json!({
            "organization_id": "org_demo",
            "explanation_type": "risk_explanation",
            "narrative_style": "executive",
            "target_entity_id": interaction_id,
            "target_entity_type": "interaction",
            "target_entity_data": {
                "risk_type": "privacy_leak",
                "risk_score": 0.95,
                "confidence": 0.98,
                "evidence": {"ssn_found": 1}
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["explanation"]["detailed_explanation"]
        .as_str()
        .unwrap()
        .contains("Privacy Leak"));

    // 5. an audit trail records the incident
    let (status, _) = send(
        &app,
        "POST",
        "/api/narrative/audit-trails",
        Some(json!({
            "organization_id": "org_demo",
            "audit_type": "privacy_incident",
            "target_entity_id": interaction_id,
            "target_entity_type": "interaction",
            "auditor_id": "auditor_002",
            "audit_scope": ["privacy_compliance"],
            "findings": [{"category": "privacy_violation", "severity": "critical"}],
            "compliance_status": "non_compliant",
            "risk_level": "critical"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // 6. the narrative dashboard reflects the new records
    let (status, body) = send(&app, "GET", "/api/narrative/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body["data"]["overview"]["total_audit_trails"]
            .as_u64()
            .unwrap()
            >= 2
    );
}

#[tokio::test]
async fn regulation_sync_and_alert_lifecycle() {
    let app = seeded_app();

    // simulated sync drops a sample amendment alert
    let (status, body) = send(&app, "POST", "/api/regulation/sync/eur-lex", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["documents_checked"], 15);
    let alert_id = body["data"]["sample_alert"]["id"].as_str().unwrap().to_string();

    // acknowledge, then resolve
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/regulation/alerts/{alert_id}/acknowledge"),
        Some(json!({"user_id": "compliance_officer", "notes": "reviewing"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["alert"]["status"], "acknowledged");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/regulation/alerts/{alert_id}/resolve"),
        Some(json!({"user_id": "compliance_officer", "notes": "systems updated"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["alert"]["status"], "resolved");
    assert_eq!(body["data"]["alert"]["action_required"], false);

    // template validation rejects incomplete content
    let (_, body) = send(&app, "GET", "/api/regulation/templates", None).await;
    let template_id = body["data"]["templates"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/regulation/templates/{template_id}/validate"),
        Some(json!({"content": {"system_name": "fraud-scorer"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_valid"], false);
}

#[tokio::test]
async fn model_comparison_picks_consistent_winner() {
    let app = seeded_app();

    // record interactions for a second model so the comparison has data
    for i in 0..3 {
        let (status, _) = send(
            &app,
            "POST",
            "/api/observability/interactions",
            Some(json!({
                "organization_id": "org_demo",
                "model_name": "claude-3",
                "prompt": format!("question {i}"),
                "response": "A short factual answer.",
                "latency_ms": 400.0,
                "cost": 0.01
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        "POST",
        "/api/observability/models/compare",
        Some(json!({
            "organization_id": "org_demo",
            "models": ["gpt-4", "claude-3"],
            "criteria": ["latency", "cost"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    // claude-3 wins on both latency and cost with the numbers above
    assert_eq!(body["data"]["summary"]["overall_winner"], "claude-3");
    assert_eq!(body["data"]["summary"]["models_analyzed"], 2);
}

#[tokio::test]
async fn performance_metrics_cover_seeded_window() {
    let app = seeded_app();

    let (status, body) = send(
        &app,
        "GET",
        "/api/observability/performance?organization_id=org_demo&time_range=24h",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let overall = &body["data"]["overall_metrics"];
    assert_eq!(overall["total_interactions"], 4);
    assert!(overall["average_latency"].as_f64().unwrap() > 1000.0);
    assert!(body["data"]["model_metrics"]["gpt-4"].is_object());
}

#[tokio::test]
async fn session_details_aggregate_seeded_data() {
    let app = seeded_app();

    let (status, body) = send(
        &app,
        "GET",
        "/api/observability/sessions/session_001",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let stats = &body["data"]["statistics"];
    assert_eq!(stats["total_interactions"], 4);
    assert_eq!(stats["risk_count"], 3);
    assert_eq!(stats["high_risk_count"], 3);

    let (status, _) = send(&app, "GET", "/api/observability/sessions/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn failure_report_auto_creates_alert_above_threshold() {
    let app = seeded_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/failure/failures",
        Some(json!({
            "organization_id": "org_demo",
            "failure_type": "safety_violation",
            "affected_component": "model",
            "component_id": "moderation_model",
            "severity_score": 0.9,
            "failure_description": "Unsafe completion served to a user"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["alert_created"]["severity"], "critical");

    // low severity: recorded, but no alert
    let (status, body) = send(
        &app,
        "POST",
        "/api/failure/failures",
        Some(json!({
            "organization_id": "org_demo",
            "failure_type": "performance_anomaly",
            "affected_component": "api",
            "component_id": "api_001",
            "severity_score": 0.2,
            "failure_description": "Minor blip"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["alert_created"].is_null());
}

#[tokio::test]
async fn system_health_reports_labels() {
    let app = seeded_app();

    let (status, body) = send(&app, "GET", "/api/failure/system-health", None).await;
    assert_eq!(status, StatusCode::OK);
    let label = body["data"]["health_status"]["overall"].as_str().unwrap();
    assert!(["healthy", "degraded", "unhealthy"].contains(&label));
    assert!(body["data"]["system_health"]["component_health"]["models"].is_number());
}

#[tokio::test]
async fn replay_export_includes_metadata_and_events() {
    let app = seeded_app();

    let (status, body) = send(
        &app,
        "GET",
        "/api/narrative/replay/replay_001/export",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["export_format"], "zenthera_replay_v1.0");
    assert_eq!(body["data"]["events"].as_array().unwrap().len(), 5);
    assert_eq!(
        body["data"]["replay_metadata"]["replay_name"],
        "Customer Support Session - Privacy Concern"
    );
}
