//! LLM observability endpoints: dashboard, interactions (with inline risk
//! and quality analysis), risks, performance, model comparison, alerts,
//! quality assessments, and session detail.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{self, created, ok, pagination, required, window_start};
use crate::api_errors::ApiError;
use crate::app_state::AppState;
use crate::errors::{SafeRead, SafeWrite};
use crate::observability::{
    percentile, simulated_quality_score, LlmAlert, LlmInteraction, ModelComparison,
    QualityAssessment, QualityMetric, RiskDetection, RiskType,
};
use crate::quality_engine;
use crate::risk_engine::{self, RiskSignal};
use crate::severity::Severity;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/interactions", get(list_interactions).post(create_interaction))
        .route("/risks", get(list_risks))
        .route("/performance", get(performance))
        .route("/models/compare", post(compare_models))
        .route("/alerts", get(list_alerts))
        .route("/quality/assess", post(assess_quality))
        .route("/sessions/{session_id}", get(session_details))
}

#[derive(Deserialize)]
struct DashboardQuery {
    organization_id: Option<String>,
    #[serde(default = "default_time_range")]
    time_range: String,
}

fn default_time_range() -> String {
    "24h".to_string()
}

async fn dashboard(
    State(st): State<Arc<AppState>>,
    Query(q): Query<DashboardQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());
    let start = window_start(&q.time_range);

    let sessions = st.observability.sessions.safe_read()?;
    let interactions = st.observability.interactions.safe_read()?;
    let risks = st.observability.risks.safe_read()?;
    let alerts = st.observability.alerts.safe_read()?;

    let org_sessions = sessions
        .values()
        .filter(|s| s.organization_id == org_id)
        .count();
    let org_interactions: Vec<&LlmInteraction> = interactions
        .values()
        .filter(|i| i.organization_id == org_id && i.timestamp >= start)
        .collect();
    let org_risks: Vec<&RiskDetection> = risks
        .values()
        .filter(|r| r.organization_id == org_id && r.detected_at >= start)
        .collect();
    let mut org_alerts: Vec<&LlmAlert> = alerts
        .values()
        .filter(|a| a.organization_id == org_id && a.triggered_at >= start)
        .collect();
    org_alerts.sort_by(|a, b| b.triggered_at.cmp(&a.triggered_at));

    let total_interactions = org_interactions.len();
    let total_tokens: u64 = org_interactions
        .iter()
        .map(|i| i.tokens_input + i.tokens_output)
        .sum();
    let total_cost: f64 = org_interactions.iter().map(|i| i.cost).sum();
    let avg_latency = if total_interactions > 0 {
        org_interactions.iter().map(|i| i.latency_ms).sum::<f64>() / total_interactions as f64
    } else {
        0.0
    };

    let high_risk_count = org_risks
        .iter()
        .filter(|r| r.severity >= Severity::High)
        .count();
    let risk_rate = if total_interactions > 0 {
        org_risks.len() as f64 / total_interactions as f64 * 100.0
    } else {
        0.0
    };

    let mut model_usage: HashMap<&str, u64> = HashMap::new();
    for interaction in &org_interactions {
        *model_usage.entry(interaction.model_name.as_str()).or_default() += 1;
    }

    let mut risk_distribution: HashMap<&str, u64> = HashMap::new();
    for risk in &org_risks {
        *risk_distribution.entry(risk.risk_type.as_str()).or_default() += 1;
    }

    Ok(ok(json!({
        "overview": {
            "total_interactions": total_interactions,
            "total_sessions": org_sessions,
            "total_tokens_processed": total_tokens,
            "total_cost": (total_cost * 100.0).round() / 100.0,
            "average_latency_ms": (avg_latency * 100.0).round() / 100.0,
            "high_risk_interactions": high_risk_count,
            "risk_detection_rate": (risk_rate * 100.0).round() / 100.0,
            "average_quality_score": 0.78,
            "active_alerts": org_alerts.iter().filter(|a| a.resolved_at.is_none()).count(),
        },
        "model_usage": model_usage,
        "risk_distribution": risk_distribution,
        "recent_alerts": org_alerts.iter().take(5).collect::<Vec<_>>(),
        "time_range": q.time_range,
        "last_updated": Utc::now(),
    })))
}

#[derive(Deserialize)]
struct InteractionFilter {
    organization_id: Option<String>,
    session_id: Option<String>,
    model_name: Option<String>,
    risk_level: Option<String>,
    #[serde(default = "api::default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
}

async fn list_interactions(
    State(st): State<Arc<AppState>>,
    Query(q): Query<InteractionFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());

    let interactions = st.observability.interactions.safe_read()?;
    let risks = st.observability.risks.safe_read()?;

    let risks_for = |interaction_id: &str| -> Vec<&RiskDetection> {
        risks
            .values()
            .filter(|r| r.interaction_id == interaction_id)
            .collect()
    };

    let mut filtered: Vec<&LlmInteraction> = interactions
        .values()
        .filter(|i| {
            if i.organization_id != org_id {
                return false;
            }
            if q.session_id.as_deref().is_some_and(|s| i.session_id != s) {
                return false;
            }
            if q.model_name.as_deref().is_some_and(|m| i.model_name != m) {
                return false;
            }
            if let Some(level) = q.risk_level.as_deref() {
                let attached = risks_for(&i.id);
                match level {
                    "low" => {
                        if attached.iter().any(|r| r.severity >= Severity::High) {
                            return false;
                        }
                    }
                    other => {
                        if !attached.iter().any(|r| r.severity.as_str() == other) {
                            return false;
                        }
                    }
                }
            }
            true
        })
        .collect();
    filtered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let total = filtered.len();
    let page: Vec<&LlmInteraction> = filtered
        .into_iter()
        .skip(q.offset)
        .take(q.limit)
        .collect();

    let enriched: Vec<serde_json::Value> = page
        .iter()
        .map(|interaction| {
            let attached = risks_for(&interaction.id);
            let max_risk = attached
                .iter()
                .map(|r| r.risk_score)
                .fold(0.0f64, f64::max);
            let mut value = serde_json::to_value(interaction).unwrap_or_default();
            value["risks"] = json!(attached);
            value["risk_count"] = json!(attached.len());
            value["max_risk_score"] = json!(max_risk);
            value["quality_score"] = json!(simulated_quality_score(&interaction.id));
            value
        })
        .collect();

    Ok(ok(json!({
        "interactions": enriched,
        "pagination": pagination(total, q.limit, q.offset),
    })))
}

#[derive(Deserialize)]
struct CreateInteractionRequest {
    organization_id: Option<String>,
    model_name: Option<String>,
    prompt: Option<String>,
    response: Option<String>,
    session_id: Option<String>,
    #[serde(default)]
    latency_ms: f64,
    tokens_input: Option<u64>,
    tokens_output: Option<u64>,
    cost: Option<f64>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    user_id: Option<String>,
}

/// Record an interaction and run the full risk/quality analysis over it.
async fn create_interaction(
    State(st): State<Arc<AppState>>,
    Json(req): Json<CreateInteractionRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let organization_id = required(req.organization_id, "organization_id")?;
    let model_name = required(req.model_name, "model_name")?;
    let prompt = required(req.prompt, "prompt")?;
    let response = required(req.response, "response")?;

    let estimate_tokens = |text: &str| (text.split_whitespace().count() as f64 * 1.3) as u64;

    let interaction = LlmInteraction {
        id: Uuid::new_v4().to_string(),
        session_id: req
            .session_id
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        organization_id: organization_id.clone(),
        model_name,
        timestamp: Utc::now(),
        latency_ms: req.latency_ms,
        tokens_input: req.tokens_input.unwrap_or_else(|| estimate_tokens(&prompt)),
        tokens_output: req
            .tokens_output
            .unwrap_or_else(|| estimate_tokens(&response)),
        cost: req.cost.unwrap_or(0.03),
        temperature: req.temperature.unwrap_or(0.7),
        max_tokens: req.max_tokens.unwrap_or(150),
        user_id: req.user_id,
        interaction_metadata: serde_json::Value::Null,
        prompt,
        response,
    };

    // (detector, risk type, store threshold, critical/high escalation point)
    let detections: [(RiskSignal, RiskType, f64, f64, &str); 4] = [
        (
            risk_engine::detect_hallucination(&interaction.prompt, &interaction.response),
            RiskType::Hallucination,
            0.3,
            0.7,
            "Potential hallucination detected",
        ),
        (
            risk_engine::detect_bias(&interaction.prompt, &interaction.response),
            RiskType::Bias,
            0.3,
            0.7,
            "Potential bias detected",
        ),
        (
            risk_engine::detect_toxicity(&interaction.prompt, &interaction.response),
            RiskType::Toxicity,
            0.2,
            0.8,
            "Toxic content detected",
        ),
        (
            risk_engine::detect_privacy_leak(&interaction.prompt, &interaction.response),
            RiskType::PrivacyLeak,
            0.1,
            0.6,
            "Privacy leak detected",
        ),
    ];

    let mut risks_detected = Vec::new();
    {
        let mut risk_store = st.observability.risks.safe_write()?;
        for (signal, risk_type, threshold, escalation, description) in detections {
            if signal.risk_score <= threshold {
                continue;
            }
            let severity = match risk_type {
                RiskType::Toxicity | RiskType::PrivacyLeak => {
                    if signal.risk_score > escalation {
                        Severity::Critical
                    } else {
                        Severity::High
                    }
                }
                _ => {
                    if signal.risk_score > escalation {
                        Severity::High
                    } else {
                        Severity::Medium
                    }
                }
            };
            let detection = RiskDetection {
                id: Uuid::new_v4().to_string(),
                interaction_id: interaction.id.clone(),
                session_id: interaction.session_id.clone(),
                organization_id: organization_id.clone(),
                risk_type,
                risk_score: signal.risk_score,
                confidence: signal.confidence,
                description: description.to_string(),
                evidence: signal.evidence,
                detected_at: Utc::now(),
                severity,
                is_false_positive: false,
                reviewed_by: None,
                reviewed_at: None,
                mitigation_applied: false,
                mitigation_details: None,
            };
            risks_detected.push(serde_json::to_value(&detection).unwrap_or_default());
            risk_store.insert(detection.id.clone(), detection);
        }
    }

    let mut metric_scores = HashMap::new();
    metric_scores.insert(
        QualityMetric::Relevance,
        quality_engine::assess_relevance(&interaction.prompt, &interaction.response),
    );
    metric_scores.insert(
        QualityMetric::Coherence,
        quality_engine::assess_coherence(&interaction.response),
    );
    metric_scores.insert(
        QualityMetric::Completeness,
        quality_engine::assess_completeness(&interaction.prompt, &interaction.response),
    );
    metric_scores.insert(
        QualityMetric::Clarity,
        quality_engine::assess_clarity(&interaction.response),
    );
    // no heuristic for these two; fixed placeholders
    metric_scores.insert(QualityMetric::Factuality, 0.8);
    metric_scores.insert(QualityMetric::Creativity, 0.7);

    let overall_quality =
        metric_scores.values().sum::<f64>() / metric_scores.len() as f64;

    let assessment = QualityAssessment {
        id: Uuid::new_v4().to_string(),
        interaction_id: interaction.id.clone(),
        session_id: interaction.session_id.clone(),
        organization_id: organization_id.clone(),
        overall_score: overall_quality,
        metric_scores,
        assessment_method: "automated".to_string(),
        assessor_id: Some("system".to_string()),
        assessment_timestamp: Utc::now(),
        feedback_provided: false,
        improvement_suggestions: Vec::new(),
    };

    st.observability
        .assessments
        .safe_write()?
        .insert(assessment.id.clone(), assessment.clone());
    st.observability
        .interactions
        .safe_write()?
        .insert(interaction.id.clone(), interaction.clone());

    let max_risk_score = risks_detected
        .iter()
        .filter_map(|r| r["risk_score"].as_f64())
        .fold(0.0f64, f64::max);

    tracing::info!(
        "Interaction analyzed: org={}, risks={}, quality={:.3}",
        organization_id,
        risks_detected.len(),
        overall_quality
    );

    Ok(created(json!({
        "interaction": interaction,
        "risks_detected": risks_detected,
        "quality_assessment": assessment,
        "analysis_summary": {
            "total_risks": risks_detected.len(),
            "max_risk_score": max_risk_score,
            "overall_quality": (overall_quality * 1000.0).round() / 1000.0,
            "requires_review": !risks_detected.is_empty() || overall_quality < 0.6,
        },
    })))
}

#[derive(Deserialize)]
struct RiskFilter {
    organization_id: Option<String>,
    risk_type: Option<RiskType>,
    severity: Option<Severity>,
    session_id: Option<String>,
    #[serde(default = "api::default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
}

async fn list_risks(
    State(st): State<Arc<AppState>>,
    Query(q): Query<RiskFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());

    let risks = st.observability.risks.safe_read()?;
    let mut filtered: Vec<&RiskDetection> = risks
        .values()
        .filter(|r| {
            r.organization_id == org_id
                && q.risk_type.map(|t| r.risk_type == t).unwrap_or(true)
                && q.severity.map(|s| r.severity == s).unwrap_or(true)
                && q.session_id
                    .as_deref()
                    .map(|s| r.session_id == s)
                    .unwrap_or(true)
        })
        .collect();
    filtered.sort_by(|a, b| b.detected_at.cmp(&a.detected_at));

    let total = filtered.len();
    let severity_count =
        |sev: Severity| filtered.iter().filter(|r| r.severity == sev).count();
    let by_type: serde_json::Map<String, serde_json::Value> = RiskType::ALL
        .iter()
        .map(|t| {
            (
                t.as_str().to_string(),
                json!(filtered.iter().filter(|r| r.risk_type == *t).count()),
            )
        })
        .collect();

    let page: Vec<&RiskDetection> = filtered
        .iter()
        .skip(q.offset)
        .take(q.limit)
        .copied()
        .collect();

    Ok(ok(json!({
        "risks": page,
        "pagination": pagination(total, q.limit, q.offset),
        "summary": {
            "total_risks": total,
            "by_severity": {
                "critical": severity_count(Severity::Critical),
                "high": severity_count(Severity::High),
                "medium": severity_count(Severity::Medium),
                "low": severity_count(Severity::Low),
            },
            "by_type": by_type,
        },
    })))
}

#[derive(Deserialize)]
struct PerformanceQuery {
    organization_id: Option<String>,
    model_name: Option<String>,
    #[serde(default = "default_time_range")]
    time_range: String,
}

async fn performance(
    State(st): State<Arc<AppState>>,
    Query(q): Query<PerformanceQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());
    let start = window_start(&q.time_range);
    let now = Utc::now();

    let interactions = st.observability.interactions.safe_read()?;
    let filtered: Vec<&LlmInteraction> = interactions
        .values()
        .filter(|i| {
            i.organization_id == org_id
                && i.timestamp >= start
                && q.model_name.as_deref().map(|m| i.model_name == m).unwrap_or(true)
        })
        .collect();

    if filtered.is_empty() {
        return Ok(ok(json!({
            "message": "No data available for the specified criteria",
        })));
    }

    let latencies: Vec<f64> = filtered.iter().map(|i| i.latency_ms).collect();
    let total_cost: f64 = filtered.iter().map(|i| i.cost).sum();
    let total_tokens: u64 = filtered
        .iter()
        .map(|i| i.tokens_input + i.tokens_output)
        .sum();

    let mut by_model: HashMap<&str, Vec<&LlmInteraction>> = HashMap::new();
    for interaction in &filtered {
        by_model
            .entry(interaction.model_name.as_str())
            .or_default()
            .push(interaction);
    }

    let window_seconds = (now - start).num_seconds().max(1) as f64;
    let mut model_metrics = serde_json::Map::new();
    for (model, group) in &by_model {
        let model_latencies: Vec<f64> = group.iter().map(|i| i.latency_ms).collect();
        let model_cost: f64 = group.iter().map(|i| i.cost).sum();
        let model_tokens: u64 = group
            .iter()
            .map(|i| i.tokens_input + i.tokens_output)
            .sum();
        let avg = model_latencies.iter().sum::<f64>() / model_latencies.len() as f64;

        model_metrics.insert(
            model.to_string(),
            json!({
                "total_interactions": group.len(),
                "total_cost": model_cost,
                "total_tokens": model_tokens,
                "average_latency": avg,
                "p95_latency": percentile(&model_latencies, 95.0),
                "p99_latency": percentile(&model_latencies, 99.0),
                "cost_per_token": if model_tokens > 0 { model_cost / model_tokens as f64 } else { 0.0 },
                "cost_per_interaction": model_cost / group.len() as f64,
                "throughput_per_second": group.len() as f64 / window_seconds,
            }),
        );
    }

    Ok(ok(json!({
        "time_range": q.time_range,
        "period_start": start,
        "period_end": now,
        "overall_metrics": {
            "total_interactions": filtered.len(),
            "total_cost": total_cost,
            "total_tokens": total_tokens,
            "average_latency": latencies.iter().sum::<f64>() / latencies.len() as f64,
            "p95_latency": percentile(&latencies, 95.0),
            "p99_latency": percentile(&latencies, 99.0),
        },
        "model_metrics": model_metrics,
    })))
}

#[derive(Deserialize)]
struct CompareRequest {
    organization_id: Option<String>,
    models: Option<Vec<String>>,
    #[serde(default = "default_criteria")]
    criteria: Vec<String>,
    #[serde(default = "default_compare_range")]
    time_range: String,
}

fn default_criteria() -> Vec<String> {
    vec![
        "latency".to_string(),
        "cost".to_string(),
        "quality".to_string(),
    ]
}

fn default_compare_range() -> String {
    "7d".to_string()
}

async fn compare_models(
    State(st): State<Arc<AppState>>,
    Json(req): Json<CompareRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let organization_id = required(req.organization_id, "organization_id")?;
    let models = required(req.models, "models")?;
    if models.is_empty() {
        return Err(ApiError::bad_request("models must not be empty"));
    }
    let start = window_start(&req.time_range);
    let now = Utc::now();

    let interactions = st.observability.interactions.safe_read()?;
    let risks = st.observability.risks.safe_read()?;

    struct ModelStats {
        avg_latency: f64,
        avg_cost: f64,
        avg_quality: f64,
    }

    let mut results = serde_json::Map::new();
    let mut stats: HashMap<String, ModelStats> = HashMap::new();

    for model in &models {
        let group: Vec<&LlmInteraction> = interactions
            .values()
            .filter(|i| {
                i.organization_id == organization_id
                    && i.model_name == *model
                    && i.timestamp >= start
            })
            .collect();

        if group.is_empty() {
            results.insert(model.clone(), json!({ "error": "No data available" }));
            continue;
        }

        let latencies: Vec<f64> = group.iter().map(|i| i.latency_ms).collect();
        let costs: Vec<f64> = group.iter().map(|i| i.cost).collect();
        let qualities: Vec<f64> = group
            .iter()
            .map(|i| simulated_quality_score(&i.id))
            .collect();
        let risk_count = risks
            .values()
            .filter(|r| group.iter().any(|i| i.id == r.interaction_id))
            .count();

        let avg_latency = latencies.iter().sum::<f64>() / latencies.len() as f64;
        let avg_cost = costs.iter().sum::<f64>() / costs.len() as f64;
        let avg_quality = qualities.iter().sum::<f64>() / qualities.len() as f64;

        results.insert(
            model.clone(),
            json!({
                "interactions_count": group.len(),
                "average_latency": avg_latency,
                "average_cost": avg_cost,
                "average_quality": avg_quality,
                "risk_rate": risk_count as f64 / group.len() as f64 * 100.0,
                "total_cost": costs.iter().sum::<f64>(),
                "p95_latency": percentile(&latencies, 95.0),
            }),
        );
        stats.insert(
            model.clone(),
            ModelStats {
                avg_latency,
                avg_cost,
                avg_quality,
            },
        );
    }

    let mut winners = serde_json::Map::new();
    let pick = |f: fn(&ModelStats) -> f64, lowest: bool, stats: &HashMap<String, ModelStats>| {
        let mut entries: Vec<(&String, f64)> = stats.iter().map(|(m, s)| (m, f(s))).collect();
        entries.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        if lowest {
            entries.first().map(|(m, _)| (*m).clone())
        } else {
            entries.last().map(|(m, _)| (*m).clone())
        }
    };

    if req.criteria.iter().any(|c| c == "latency") {
        if let Some(winner) = pick(|s| s.avg_latency, true, &stats) {
            winners.insert("latency".to_string(), json!(winner));
        }
    }
    if req.criteria.iter().any(|c| c == "cost") {
        if let Some(winner) = pick(|s| s.avg_cost, true, &stats) {
            winners.insert("cost".to_string(), json!(winner));
        }
    }
    if req.criteria.iter().any(|c| c == "quality") {
        if let Some(winner) = pick(|s| s.avg_quality, false, &stats) {
            winners.insert("quality".to_string(), json!(winner));
        }
    }

    let mut model_scores: HashMap<String, u32> = HashMap::new();
    for model in stats.keys() {
        let score = winners
            .values()
            .filter(|w| w.as_str() == Some(model.as_str()))
            .count() as u32;
        model_scores.insert(model.clone(), score);
    }
    let overall_winner = model_scores
        .iter()
        .max_by_key(|(model, score)| (**score, std::cmp::Reverse(model.as_str())))
        .map(|(model, _)| model.clone());

    let comparison = ModelComparison {
        id: Uuid::new_v4().to_string(),
        organization_id,
        comparison_name: format!("Model Comparison {}", now.format("%Y-%m-%d %H:%M")),
        models_compared: models.clone(),
        comparison_period_start: start,
        comparison_period_end: now,
        comparison_metrics: serde_json::Value::Object(results),
        winner_model: overall_winner
            .clone()
            .unwrap_or_else(|| "No clear winner".to_string()),
        winner_criteria: winners
            .values()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        detailed_analysis: json!({
            "criteria_winners": winners,
            "model_scores": model_scores,
            "comparison_criteria": req.criteria,
        }),
        created_by: "system".to_string(),
        created_at: now,
    };

    st.observability
        .comparisons
        .safe_write()?
        .insert(comparison.id.clone(), comparison.clone());

    let analyzed = stats.len();
    Ok(created(json!({
        "comparison": comparison,
        "summary": {
            "overall_winner": overall_winner,
            "models_analyzed": analyzed,
        },
    })))
}

#[derive(Deserialize)]
struct LlmAlertFilter {
    organization_id: Option<String>,
    severity: Option<Severity>,
    #[serde(default = "default_alert_status")]
    status: String,
    #[serde(default = "api::default_limit")]
    limit: usize,
}

fn default_alert_status() -> String {
    "active".to_string()
}

async fn list_alerts(
    State(st): State<Arc<AppState>>,
    Query(q): Query<LlmAlertFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());

    let alerts = st.observability.alerts.safe_read()?;
    let mut filtered: Vec<&LlmAlert> = alerts
        .values()
        .filter(|a| {
            if a.organization_id != org_id {
                return false;
            }
            if q.severity.is_some_and(|sev| a.severity != sev) {
                return false;
            }
            match q.status.as_str() {
                "active" => a.acknowledged_at.is_none(),
                "acknowledged" => a.acknowledged_at.is_some() && a.resolved_at.is_none(),
                "resolved" => a.resolved_at.is_some(),
                _ => true,
            }
        })
        .collect();
    filtered.sort_by(|a, b| b.triggered_at.cmp(&a.triggered_at));

    let severity_count =
        |sev: Severity| filtered.iter().filter(|a| a.severity == sev).count();
    let total = filtered.len();
    let critical = severity_count(Severity::Critical);
    let high = severity_count(Severity::High);
    let medium = severity_count(Severity::Medium);
    let low = severity_count(Severity::Low);
    filtered.truncate(q.limit);

    Ok(ok(json!({
        "alerts": filtered,
        "summary": {
            "total_alerts": total,
            "by_severity": {
                "critical": critical,
                "high": high,
                "medium": medium,
                "low": low,
            },
        },
    })))
}

#[derive(Deserialize)]
struct AssessQualityRequest {
    interaction_id: Option<String>,
    assessor_id: Option<String>,
    #[serde(default)]
    metric_scores: HashMap<QualityMetric, f64>,
    #[serde(default)]
    feedback_provided: bool,
    #[serde(default)]
    improvement_suggestions: Vec<String>,
}

async fn assess_quality(
    State(st): State<Arc<AppState>>,
    Json(req): Json<AssessQualityRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let interaction_id = required(req.interaction_id, "interaction_id")?;
    let assessor_id = required(req.assessor_id, "assessor_id")?;

    let (session_id, organization_id) = {
        let interactions = st.observability.interactions.safe_read()?;
        let interaction = interactions
            .get(&interaction_id)
            .ok_or_else(|| ApiError::not_found("Interaction not found"))?;
        (
            interaction.session_id.clone(),
            interaction.organization_id.clone(),
        )
    };

    let overall_score = if req.metric_scores.is_empty() {
        0.0
    } else {
        req.metric_scores.values().sum::<f64>() / req.metric_scores.len() as f64
    };

    let assessment = QualityAssessment {
        id: Uuid::new_v4().to_string(),
        interaction_id,
        session_id,
        organization_id,
        overall_score,
        metric_scores: req.metric_scores,
        assessment_method: "human".to_string(),
        assessor_id: Some(assessor_id),
        assessment_timestamp: Utc::now(),
        feedback_provided: req.feedback_provided,
        improvement_suggestions: req.improvement_suggestions,
    };

    st.observability
        .assessments
        .safe_write()?
        .insert(assessment.id.clone(), assessment.clone());

    Ok(created(json!({
        "assessment": assessment,
        "message": "Quality assessment completed successfully",
    })))
}

async fn session_details(
    State(st): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let sessions = st.observability.sessions.safe_read()?;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| ApiError::not_found("Session not found"))?;

    let interactions = st.observability.interactions.safe_read()?;
    let mut session_interactions: Vec<&LlmInteraction> = interactions
        .values()
        .filter(|i| i.session_id == session_id)
        .collect();
    session_interactions.sort_by_key(|i| i.timestamp);

    let risks = st.observability.risks.safe_read()?;
    let session_risks: Vec<&RiskDetection> = risks
        .values()
        .filter(|r| r.session_id == session_id)
        .collect();

    let assessments = st.observability.assessments.safe_read()?;
    let session_quality: Vec<&QualityAssessment> = assessments
        .values()
        .filter(|a| a.session_id == session_id)
        .collect();

    let total_tokens: u64 = session_interactions
        .iter()
        .map(|i| i.tokens_input + i.tokens_output)
        .sum();
    let total_cost: f64 = session_interactions.iter().map(|i| i.cost).sum();
    let avg_latency = if session_interactions.is_empty() {
        0.0
    } else {
        session_interactions.iter().map(|i| i.latency_ms).sum::<f64>()
            / session_interactions.len() as f64
    };
    let avg_quality = if session_quality.is_empty() {
        0.0
    } else {
        session_quality.iter().map(|a| a.overall_score).sum::<f64>()
            / session_quality.len() as f64
    };

    Ok(ok(json!({
        "session": session,
        "interactions": session_interactions,
        "risks": session_risks,
        "quality_assessments": session_quality,
        "statistics": {
            "total_interactions": session_interactions.len(),
            "total_tokens": total_tokens,
            "total_cost": total_cost,
            "average_latency": avg_latency,
            "average_quality": avg_quality,
            "risk_count": session_risks.len(),
            "high_risk_count": session_risks
                .iter()
                .filter(|r| r.severity >= Severity::High)
                .count(),
        },
    })))
}
