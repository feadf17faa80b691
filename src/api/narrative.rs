//! Narrative explainability endpoints: replays, explanations, ethical
//! alignment, audit trails, templates, and replay export.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::alignment_engine::{self, AlignmentCategory, InteractionFacts};
use crate::api::{self, created, ok, pagination, required, window_start};
use crate::api_errors::ApiError;
use crate::app_state::AppState;
use crate::errors::{SafeRead, SafeWrite};
use crate::narrative::{
    AuditTrail, EthicalAlignment, ExplanationType, NarrativeExplanation, NarrativeStyle,
    ReplayEvent, SessionReplay,
};
use crate::narrative_generator::{self, AlignmentFacts, RiskFacts};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/replays", get(list_replays).post(create_replay))
        .route("/replays/{replay_id}/events", get(replay_events))
        .route("/replay/{replay_id}/export", get(export_replay))
        .route("/explanations", get(list_explanations).post(generate_explanation))
        .route("/ethical-alignment", get(list_alignments).post(assess_alignment))
        .route("/audit-trails", get(list_audits).post(create_audit))
        .route("/templates", get(list_templates))
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

    let replays = st.narrative.replays.safe_read()?;
    let explanations = st.narrative.explanations.safe_read()?;
    let alignments = st.narrative.alignments.safe_read()?;
    let audits = st.narrative.audits.safe_read()?;

    let mut org_replays: Vec<&SessionReplay> = replays
        .values()
        .filter(|r| r.organization_id == org_id)
        .collect();
    org_replays.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let org_explanations: Vec<&NarrativeExplanation> = explanations
        .values()
        .filter(|e| e.organization_id == org_id && e.generated_at >= start)
        .collect();
    let mut org_alignments: Vec<&EthicalAlignment> = alignments
        .values()
        .filter(|a| a.organization_id == org_id && a.assessment_timestamp >= start)
        .collect();
    org_alignments.sort_by(|a, b| b.assessment_timestamp.cmp(&a.assessment_timestamp));
    let org_audits: Vec<&AuditTrail> = audits
        .values()
        .filter(|a| a.organization_id == org_id && a.audit_timestamp >= start)
        .collect();

    let avg_alignment = if org_alignments.is_empty() {
        0.0
    } else {
        org_alignments
            .iter()
            .map(|a| a.overall_alignment_score)
            .sum::<f64>()
            / org_alignments.len() as f64
    };
    let high_risk = org_alignments
        .iter()
        .filter(|a| a.overall_alignment_score < 0.5)
        .count();

    let mut explanation_types = serde_json::Map::new();
    for explanation in &org_explanations {
        let key = explanation.explanation_type.as_str().to_string();
        let entry = explanation_types.entry(key).or_insert(json!(0));
        *entry = json!(entry.as_u64().unwrap_or(0) + 1);
    }

    let critical_findings = org_audits
        .iter()
        .filter(|a| a.risk_level == "critical")
        .count();
    let pending_actions: usize = org_audits
        .iter()
        .map(|a| {
            a.action_items
                .iter()
                .filter(|item| {
                    item.get("status").and_then(|s| s.as_str()).unwrap_or("pending")
                        == "pending"
                })
                .count()
        })
        .sum();

    Ok(ok(json!({
        "overview": {
            "total_session_replays": org_replays.len(),
            "total_explanations_generated": org_explanations.len(),
            "total_ethical_assessments": org_alignments.len(),
            "total_audit_trails": org_audits.len(),
            "average_ethical_alignment": (avg_alignment * 1000.0).round() / 1000.0,
            "high_risk_interactions": high_risk,
            "critical_audit_findings": critical_findings,
            "pending_action_items": pending_actions,
        },
        "explanation_types": explanation_types,
        "recent_replays": org_replays.iter().take(5).collect::<Vec<_>>(),
        "recent_alignments": org_alignments.iter().take(5).collect::<Vec<_>>(),
        "time_range": q.time_range,
        "last_updated": Utc::now(),
    })))
}

#[derive(Deserialize)]
struct ReplayFilter {
    organization_id: Option<String>,
    session_id: Option<String>,
    tags: Option<String>,
    #[serde(default = "api::default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
}

async fn list_replays(
    State(st): State<Arc<AppState>>,
    Query(q): Query<ReplayFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());
    let wanted_tags: Vec<&str> = q
        .tags
        .as_deref()
        .map(|t| t.split(',').filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let replays = st.narrative.replays.safe_read()?;
    let events = st.narrative.events.safe_read()?;
    let explanations = st.narrative.explanations.safe_read()?;

    let mut filtered: Vec<&SessionReplay> = replays
        .values()
        .filter(|r| {
            r.organization_id == org_id
                && q.session_id
                    .as_deref()
                    .map(|s| r.session_id == s)
                    .unwrap_or(true)
                && (wanted_tags.is_empty()
                    || wanted_tags.iter().any(|t| r.tags.iter().any(|tag| tag == t)))
        })
        .collect();
    filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total = filtered.len();
    let page: Vec<&SessionReplay> = filtered
        .into_iter()
        .skip(q.offset)
        .take(q.limit)
        .collect();

    let enriched: Vec<serde_json::Value> = page
        .iter()
        .map(|replay| {
            let replay_events: Vec<&ReplayEvent> = events
                .values()
                .filter(|e| e.replay_id == replay.id)
                .collect();
            let mut event_types: Vec<&str> = replay_events
                .iter()
                .map(|e| e.event_type.as_str())
                .collect();
            event_types.sort_unstable();
            event_types.dedup();

            let explanation_count = explanations
                .values()
                .filter(|e| e.target_entity_id == replay.session_id)
                .count();

            let mut value = serde_json::to_value(replay).unwrap_or_default();
            value["event_count"] = json!(replay_events.len());
            value["event_types"] = json!(event_types);
            value["explanation_count"] = json!(explanation_count);
            value
        })
        .collect();

    Ok(ok(json!({
        "replays": enriched,
        "pagination": pagination(total, q.limit, q.offset),
    })))
}

#[derive(Deserialize)]
struct CreateReplayRequest {
    session_id: Option<String>,
    organization_id: Option<String>,
    created_by: Option<String>,
    replay_name: Option<String>,
    #[serde(default)]
    description: String,
    session_start: Option<DateTime<Utc>>,
    session_end: Option<DateTime<Utc>>,
    #[serde(default)]
    total_events: u64,
    #[serde(default)]
    total_duration_seconds: f64,
    #[serde(default)]
    participants: Vec<String>,
    #[serde(default)]
    models_used: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
}

async fn create_replay(
    State(st): State<Arc<AppState>>,
    Json(req): Json<CreateReplayRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let replay = SessionReplay {
        id: Uuid::new_v4().to_string(),
        session_id: required(req.session_id, "session_id")?,
        organization_id: required(req.organization_id, "organization_id")?,
        created_at: Utc::now(),
        created_by: required(req.created_by, "created_by")?,
        replay_name: required(req.replay_name, "replay_name")?,
        description: req.description,
        session_start: required(req.session_start, "session_start")?,
        session_end: required(req.session_end, "session_end")?,
        total_events: req.total_events,
        total_duration_seconds: req.total_duration_seconds,
        participants: req.participants,
        models_used: req.models_used,
        replay_metadata: serde_json::Value::Null,
        tags: req.tags,
        is_archived: false,
        retention_until: None,
    };

    st.narrative
        .replays
        .safe_write()?
        .insert(replay.id.clone(), replay.clone());

    Ok(created(json!({
        "replay": replay,
        "message": "Session replay created successfully",
    })))
}

async fn replay_events(
    State(st): State<Arc<AppState>>,
    Path(replay_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !st.narrative.replays.safe_read()?.contains_key(&replay_id) {
        return Err(ApiError::not_found("Replay not found"));
    }

    let events = st.narrative.events.safe_read()?;
    let mut replay_events: Vec<&ReplayEvent> = events
        .values()
        .filter(|e| e.replay_id == replay_id)
        .collect();
    replay_events.sort_by_key(|e| e.sequence_number);

    let mut event_types: Vec<&str> = replay_events.iter().map(|e| e.event_type.as_str()).collect();
    event_types.sort_unstable();
    event_types.dedup();

    let mut enriched = Vec::with_capacity(replay_events.len());
    let mut previous: Option<DateTime<Utc>> = None;
    for event in &replay_events {
        let mut value = serde_json::to_value(event).unwrap_or_default();
        let gap = previous
            .map(|prev| (event.timestamp - prev).num_milliseconds() as f64 / 1000.0)
            .unwrap_or(0.0);
        value["time_since_previous"] = json!(gap);
        previous = Some(event.timestamp);
        enriched.push(value);
    }

    Ok(ok(json!({
        "replay_id": replay_id,
        "events": enriched,
        "total_events": enriched.len(),
        "event_types": event_types,
    })))
}

async fn export_replay(
    State(st): State<Arc<AppState>>,
    Path(replay_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let replays = st.narrative.replays.safe_read()?;
    let replay = replays
        .get(&replay_id)
        .ok_or_else(|| ApiError::not_found("Replay not found"))?;

    let events = st.narrative.events.safe_read()?;
    let mut replay_events: Vec<&ReplayEvent> = events
        .values()
        .filter(|e| e.replay_id == replay_id)
        .collect();
    replay_events.sort_by_key(|e| e.sequence_number);

    Ok(ok(json!({
        "replay_metadata": replay,
        "events": replay_events,
        "export_timestamp": Utc::now(),
        "export_format": "zenthera_replay_v1.0",
    })))
}

#[derive(Deserialize)]
struct ExplanationFilter {
    organization_id: Option<String>,
    explanation_type: Option<ExplanationType>,
    narrative_style: Option<NarrativeStyle>,
    target_entity_id: Option<String>,
    #[serde(default = "api::default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
}

async fn list_explanations(
    State(st): State<Arc<AppState>>,
    Query(q): Query<ExplanationFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());

    let explanations = st.narrative.explanations.safe_read()?;
    let mut filtered: Vec<&NarrativeExplanation> = explanations
        .values()
        .filter(|e| {
            e.organization_id == org_id
                && q.explanation_type
                    .map(|t| e.explanation_type == t)
                    .unwrap_or(true)
                && q.narrative_style
                    .map(|s| e.narrative_style == s)
                    .unwrap_or(true)
                && q.target_entity_id
                    .as_deref()
                    .map(|t| e.target_entity_id == t)
                    .unwrap_or(true)
        })
        .collect();
    filtered.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));

    let total = filtered.len();
    let by_type: serde_json::Map<String, serde_json::Value> = ExplanationType::ALL
        .iter()
        .map(|t| {
            (
                t.as_str().to_string(),
                json!(filtered.iter().filter(|e| e.explanation_type == *t).count()),
            )
        })
        .collect();
    let by_style: serde_json::Map<String, serde_json::Value> = NarrativeStyle::ALL
        .iter()
        .map(|s| {
            (
                s.as_str().to_string(),
                json!(filtered.iter().filter(|e| e.narrative_style == *s).count()),
            )
        })
        .collect();

    let page: Vec<&NarrativeExplanation> = filtered
        .iter()
        .skip(q.offset)
        .take(q.limit)
        .copied()
        .collect();

    Ok(ok(json!({
        "explanations": page,
        "pagination": pagination(total, q.limit, q.offset),
        "summary": {
            "total_explanations": total,
            "by_type": by_type,
            "by_style": by_style,
        },
    })))
}

#[derive(Deserialize)]
struct GenerateExplanationRequest {
    organization_id: Option<String>,
    explanation_type: Option<ExplanationType>,
    narrative_style: Option<NarrativeStyle>,
    target_entity_id: Option<String>,
    target_entity_type: Option<String>,
    #[serde(default)]
    target_entity_data: serde_json::Value,
    #[serde(default)]
    evidence_points: Vec<serde_json::Value>,
    confidence_level: Option<f64>,
    generated_by: Option<String>,
    generation_method: Option<String>,
}

async fn generate_explanation(
    State(st): State<Arc<AppState>>,
    Json(req): Json<GenerateExplanationRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let organization_id = required(req.organization_id, "organization_id")?;
    let explanation_type = required(req.explanation_type, "explanation_type")?;
    let narrative_style = required(req.narrative_style, "narrative_style")?;
    let target_entity_id = required(req.target_entity_id, "target_entity_id")?;
    let target_entity_type = required(req.target_entity_type, "target_entity_type")?;

    let (title, summary, detailed_explanation, key_factors) = match explanation_type {
        ExplanationType::DecisionRationale => {
            let facts: InteractionFacts =
                serde_json::from_value(req.target_entity_data.clone()).unwrap_or_default();
            let model = facts
                .model_name
                .clone()
                .unwrap_or_else(|| "AI Model".to_string());
            (
                format!("Decision Analysis: {model}"),
                "Analysis of AI decision-making process and rationale".to_string(),
                narrative_generator::decision_explanation(&facts, narrative_style),
                vec![
                    "Input analysis".to_string(),
                    "Knowledge retrieval".to_string(),
                    "Response generation".to_string(),
                    "Quality assurance".to_string(),
                ],
            )
        }
        ExplanationType::RiskExplanation => {
            let facts: RiskFacts =
                serde_json::from_value(req.target_entity_data.clone()).unwrap_or_default();
            let risk_type = if facts.risk_type.is_empty() {
                "unknown".to_string()
            } else {
                facts.risk_type.clone()
            };
            (
                format!("Risk Analysis: {}", risk_type.replace('_', " ")),
                format!("Detailed explanation of {risk_type} risk detection and implications"),
                narrative_generator::risk_explanation(&facts, narrative_style),
                vec![
                    "Risk detection".to_string(),
                    "Evidence analysis".to_string(),
                    "Severity assessment".to_string(),
                    "Mitigation recommendations".to_string(),
                ],
            )
        }
        ExplanationType::EthicalAnalysis => {
            let facts: AlignmentFacts =
                serde_json::from_value(req.target_entity_data.clone()).unwrap_or_default();
            (
                "Ethical Alignment Assessment".to_string(),
                "Comprehensive ethical evaluation of AI interaction".to_string(),
                narrative_generator::ethical_analysis(&facts, narrative_style),
                vec![
                    "Ethical principles".to_string(),
                    "Alignment scoring".to_string(),
                    "Strengths identification".to_string(),
                    "Improvement areas".to_string(),
                ],
            )
        }
        other => (
            other.as_str().replace('_', " "),
            format!("Generated explanation for {}", other.as_str()),
            format!(
                "Explanation for {} generated in {} style.",
                other.as_str(),
                narrative_style.as_str()
            ),
            vec![
                "Analysis".to_string(),
                "Assessment".to_string(),
                "Recommendations".to_string(),
            ],
        ),
    };

    let explanation = NarrativeExplanation {
        id: Uuid::new_v4().to_string(),
        organization_id,
        explanation_type,
        target_entity_id,
        target_entity_type,
        narrative_style,
        title,
        summary,
        detailed_explanation,
        key_factors,
        evidence_points: req.evidence_points,
        confidence_level: req.confidence_level.unwrap_or(0.8),
        generated_at: Utc::now(),
        generated_by: req.generated_by.unwrap_or_else(|| "system".to_string()),
        generation_method: req
            .generation_method
            .unwrap_or_else(|| "automated".to_string()),
        reviewed_by: None,
        reviewed_at: None,
        is_approved: false,
    };

    st.narrative
        .explanations
        .safe_write()?
        .insert(explanation.id.clone(), explanation.clone());

    Ok(created(json!({
        "explanation": explanation,
        "message": "Narrative explanation generated successfully",
    })))
}

#[derive(Deserialize)]
struct AlignmentFilter {
    organization_id: Option<String>,
    target_entity_id: Option<String>,
    #[serde(default)]
    min_score: f64,
    #[serde(default = "default_max_score")]
    max_score: f64,
    #[serde(default = "api::default_limit")]
    limit: usize,
}

fn default_max_score() -> f64 {
    1.0
}

async fn list_alignments(
    State(st): State<Arc<AppState>>,
    Query(q): Query<AlignmentFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());

    let alignments = st.narrative.alignments.safe_read()?;
    let mut filtered: Vec<&EthicalAlignment> = alignments
        .values()
        .filter(|a| {
            a.organization_id == org_id
                && q.target_entity_id
                    .as_deref()
                    .map(|t| a.target_entity_id == t)
                    .unwrap_or(true)
                && a.overall_alignment_score >= q.min_score
                && a.overall_alignment_score <= q.max_score
        })
        .collect();
    filtered.sort_by(|a, b| b.assessment_timestamp.cmp(&a.assessment_timestamp));

    let avg = if filtered.is_empty() {
        0.0
    } else {
        filtered
            .iter()
            .map(|a| a.overall_alignment_score)
            .sum::<f64>()
            / filtered.len() as f64
    };

    let mut category_averages = serde_json::Map::new();
    if !filtered.is_empty() {
        for category in AlignmentCategory::ALL {
            let sum: f64 = filtered
                .iter()
                .map(|a| a.category_scores.get(&category).copied().unwrap_or(0.0))
                .sum();
            category_averages.insert(
                category.as_str().to_string(),
                json!(sum / filtered.len() as f64),
            );
        }
    }

    let total = filtered.len();
    let high_risk = filtered
        .iter()
        .filter(|a| a.overall_alignment_score < 0.5)
        .count();
    let requires_review = filtered.iter().filter(|a| a.requires_human_review).count();
    filtered.truncate(q.limit);

    Ok(ok(json!({
        "alignments": filtered,
        "summary": {
            "total_assessments": total,
            "average_alignment_score": (avg * 1000.0).round() / 1000.0,
            "category_averages": category_averages,
            "high_risk_count": high_risk,
            "requires_review_count": requires_review,
        },
    })))
}

#[derive(Deserialize)]
struct AssessAlignmentRequest {
    organization_id: Option<String>,
    target_entity_id: Option<String>,
    target_entity_type: Option<String>,
    #[serde(default)]
    target_entity_data: InteractionFacts,
    assessor_id: Option<String>,
    #[serde(default)]
    compliance_notes: String,
}

async fn assess_alignment(
    State(st): State<Arc<AppState>>,
    Json(req): Json<AssessAlignmentRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let organization_id = required(req.organization_id, "organization_id")?;
    let target_entity_id = required(req.target_entity_id, "target_entity_id")?;
    let target_entity_type = required(req.target_entity_type, "target_entity_type")?;

    let category_scores = alignment_engine::assess_all(&req.target_entity_data);
    let overall = alignment_engine::overall_score(&category_scores);

    let mut strengths = Vec::new();
    let mut concerns = Vec::new();
    let mut recommendations = Vec::new();
    for category in AlignmentCategory::ALL {
        let score = category_scores.get(&category).copied().unwrap_or(0.0);
        if score >= 0.8 {
            strengths.push(format!("Strong {} alignment", category.label()));
        } else if score < 0.5 {
            concerns.push(format!("Low {} score ({score:.2})", category.label()));
            recommendations.push(format!("Improve {} practices", category.label()));
        }
    }

    let analysis = if overall >= 0.8 {
        "Excellent ethical alignment across most categories. Minor improvements may be beneficial."
    } else if overall >= 0.6 {
        "Good ethical alignment with some areas for improvement identified."
    } else if overall >= 0.4 {
        "Moderate ethical alignment. Several areas require attention and improvement."
    } else {
        "Poor ethical alignment. Significant improvements needed across multiple categories."
    };

    let requires_review =
        overall < 0.6 || category_scores.values().any(|score| *score < 0.3);
    let review_priority = if overall < 0.3 {
        "critical"
    } else if overall < 0.5 {
        "high"
    } else if overall < 0.7 {
        "medium"
    } else {
        "low"
    };

    let highest = category_scores
        .iter()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(c, _)| c.as_str());
    let lowest = category_scores
        .iter()
        .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(c, _)| c.as_str());

    let alignment = EthicalAlignment {
        id: Uuid::new_v4().to_string(),
        organization_id,
        target_entity_id,
        target_entity_type,
        assessment_timestamp: Utc::now(),
        assessor_id: req.assessor_id.unwrap_or_else(|| "system".to_string()),
        overall_alignment_score: overall,
        category_scores,
        alignment_analysis: analysis.to_string(),
        strengths,
        concerns,
        recommendations,
        compliance_notes: req.compliance_notes,
        requires_human_review: requires_review,
        review_priority: review_priority.to_string(),
    };

    st.narrative
        .alignments
        .safe_write()?
        .insert(alignment.id.clone(), alignment.clone());

    tracing::info!(
        "Ethical alignment assessed: org={}, overall={:.3}, review={}",
        alignment.organization_id,
        overall,
        requires_review
    );

    Ok(created(json!({
        "alignment": alignment,
        "assessment_summary": {
            "overall_score": (overall * 1000.0).round() / 1000.0,
            "highest_category": highest,
            "lowest_category": lowest,
            "requires_review": requires_review,
            "review_priority": review_priority,
        },
        "message": "Ethical alignment assessment completed",
    })))
}

#[derive(Deserialize)]
struct AuditFilter {
    organization_id: Option<String>,
    audit_type: Option<String>,
    compliance_status: Option<String>,
    risk_level: Option<String>,
    #[serde(default = "api::default_limit")]
    limit: usize,
}

async fn list_audits(
    State(st): State<Arc<AppState>>,
    Query(q): Query<AuditFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());

    let audits = st.narrative.audits.safe_read()?;
    let mut filtered: Vec<&AuditTrail> = audits
        .values()
        .filter(|a| {
            a.organization_id == org_id
                && q.audit_type
                    .as_deref()
                    .map(|t| a.audit_type == t)
                    .unwrap_or(true)
                && q.compliance_status
                    .as_deref()
                    .map(|s| a.compliance_status == s)
                    .unwrap_or(true)
                && q.risk_level
                    .as_deref()
                    .map(|r| a.risk_level == r)
                    .unwrap_or(true)
        })
        .collect();
    filtered.sort_by(|a, b| b.audit_timestamp.cmp(&a.audit_timestamp));

    let total = filtered.len();
    let status_count = |status: &str| {
        filtered
            .iter()
            .filter(|a| a.compliance_status == status)
            .count()
    };
    let risk_count = |level: &str| filtered.iter().filter(|a| a.risk_level == level).count();
    let pending_follow_ups = filtered.iter().filter(|a| a.follow_up_required).count();
    let compliant = status_count("compliant");
    let non_compliant = status_count("non_compliant");
    let needs_review = status_count("needs_review");
    let critical = risk_count("critical");
    let high = risk_count("high");
    let medium = risk_count("medium");
    let low = risk_count("low");
    filtered.truncate(q.limit);

    Ok(ok(json!({
        "audit_trails": filtered,
        "summary": {
            "total_audits": total,
            "by_status": {
                "compliant": compliant,
                "non_compliant": non_compliant,
                "needs_review": needs_review,
            },
            "by_risk_level": {
                "critical": critical,
                "high": high,
                "medium": medium,
                "low": low,
            },
            "pending_follow_ups": pending_follow_ups,
        },
    })))
}

#[derive(Deserialize)]
struct CreateAuditRequest {
    organization_id: Option<String>,
    audit_type: Option<String>,
    target_entity_id: Option<String>,
    target_entity_type: Option<String>,
    auditor_id: Option<String>,
    audit_scope: Option<Vec<String>>,
    findings: Option<Vec<serde_json::Value>>,
    compliance_status: Option<String>,
    risk_level: Option<String>,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    action_items: Vec<serde_json::Value>,
    #[serde(default)]
    follow_up_required: bool,
    follow_up_date: Option<DateTime<Utc>>,
    #[serde(default)]
    audit_report: String,
    #[serde(default)]
    supporting_documents: Vec<String>,
}

async fn create_audit(
    State(st): State<Arc<AppState>>,
    Json(req): Json<CreateAuditRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let audit = AuditTrail {
        id: Uuid::new_v4().to_string(),
        organization_id: required(req.organization_id, "organization_id")?,
        audit_type: required(req.audit_type, "audit_type")?,
        target_entity_id: required(req.target_entity_id, "target_entity_id")?,
        target_entity_type: required(req.target_entity_type, "target_entity_type")?,
        audit_timestamp: Utc::now(),
        auditor_id: required(req.auditor_id, "auditor_id")?,
        audit_scope: required(req.audit_scope, "audit_scope")?,
        findings: required(req.findings, "findings")?,
        compliance_status: required(req.compliance_status, "compliance_status")?,
        risk_level: required(req.risk_level, "risk_level")?,
        recommendations: req.recommendations,
        action_items: req.action_items,
        follow_up_required: req.follow_up_required,
        follow_up_date: req.follow_up_date,
        audit_report: req.audit_report,
        supporting_documents: req.supporting_documents,
    };

    st.narrative
        .audits
        .safe_write()?
        .insert(audit.id.clone(), audit.clone());

    Ok(created(json!({
        "audit_trail": audit,
        "message": "Audit trail created successfully",
    })))
}

#[derive(Deserialize)]
struct TemplateFilter {
    organization_id: Option<String>,
    explanation_type: Option<ExplanationType>,
    narrative_style: Option<NarrativeStyle>,
}

async fn list_templates(
    State(st): State<Arc<AppState>>,
    Query(q): Query<TemplateFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());

    let templates = st.narrative.templates.safe_read()?;
    let mut filtered: Vec<_> = templates
        .values()
        .filter(|t| {
            t.organization_id == org_id
                && t.is_active
                && q.explanation_type
                    .map(|et| t.explanation_type == et)
                    .unwrap_or(true)
                && q.narrative_style
                    .map(|ns| t.narrative_style == ns)
                    .unwrap_or(true)
        })
        .collect();
    filtered.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));

    Ok(ok(json!({
        "templates": filtered,
        "summary": {
            "total_templates": filtered.len(),
        },
    })))
}
