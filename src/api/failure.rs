//! Failure detection endpoints: dashboard, failures, alerts, incidents,
//! monitoring rules, system health, and failure simulation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{self, created, ok, pagination, required, window_start};
use crate::api_errors::ApiError;
use crate::app_state::AppState;
use crate::errors::{SafeRead, SafeWrite};
use crate::failure::{
    Alert, AlertNote, AlertStatus, EscalationRule, FailureDetection, FailureType, Incident,
    IncidentStatus, MonitoringMetric, MonitoringRule, NotificationChannel, SystemHealth,
    TimelineEntry,
};
use crate::failure_engine;
use crate::severity::Severity;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/failures", get(list_failures).post(report_failure))
        .route("/alerts", get(list_alerts))
        .route("/alerts/{alert_id}/acknowledge", post(acknowledge_alert))
        .route("/alerts/{alert_id}/resolve", post(resolve_alert))
        .route("/incidents", get(list_incidents).post(create_incident))
        .route("/monitoring-rules", get(list_rules).post(create_rule))
        .route("/system-health", get(system_health))
        .route("/system-health/history", get(health_history))
        .route("/simulate-failure", post(simulate_failure))
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

fn health_label(score: f64) -> &'static str {
    if score >= 0.8 {
        "healthy"
    } else if score >= 0.6 {
        "degraded"
    } else {
        "unhealthy"
    }
}

async fn dashboard(
    State(st): State<Arc<AppState>>,
    Query(q): Query<DashboardQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());
    let start = window_start(&q.time_range);

    let failures = st.failure.failures.safe_read()?;
    let alerts = st.failure.alerts.safe_read()?;
    let incidents = st.failure.incidents.safe_read()?;
    let health = st.failure.health.safe_read()?;

    let org_failures: Vec<&FailureDetection> = failures
        .values()
        .filter(|f| f.organization_id == org_id && f.detected_at >= start)
        .collect();
    let org_alerts: Vec<&Alert> = alerts
        .values()
        .filter(|a| a.organization_id == org_id && a.triggered_at >= start)
        .collect();
    let org_incidents: Vec<&Incident> = incidents
        .values()
        .filter(|i| i.organization_id == org_id && i.created_at >= start)
        .collect();

    let latest_health = health.values().max_by_key(|h| h.timestamp);

    let open_alerts = org_alerts
        .iter()
        .filter(|a| a.status == AlertStatus::Open)
        .count();
    let critical_alerts = org_alerts
        .iter()
        .filter(|a| a.severity == Severity::Critical)
        .count();
    let acknowledged_alerts = org_alerts
        .iter()
        .filter(|a| a.status == AlertStatus::Acknowledged)
        .count();
    let open_incidents = org_incidents.iter().filter(|i| i.status.is_open()).count();

    let mut failure_types = serde_json::Map::new();
    for failure in &org_failures {
        let key = failure.failure_type.as_str().to_string();
        let entry = failure_types.entry(key).or_insert(json!(0));
        *entry = json!(entry.as_u64().unwrap_or(0) + 1);
    }

    // merged recent-activity feed: latest failures and alerts
    let mut recent_activity: Vec<serde_json::Value> = Vec::new();
    let mut sorted_failures = org_failures.clone();
    sorted_failures.sort_by(|a, b| b.detected_at.cmp(&a.detected_at));
    for failure in sorted_failures.iter().take(3) {
        recent_activity.push(json!({
            "timestamp": failure.detected_at,
            "type": "failure_detected",
            "description": format!(
                "{} detected in {}",
                failure.failure_type.label(),
                failure.affected_component
            ),
            "severity": if failure.severity_score > 0.7 { "high" } else { "medium" },
        }));
    }
    let mut sorted_alerts = org_alerts.clone();
    sorted_alerts.sort_by(|a, b| b.triggered_at.cmp(&a.triggered_at));
    for alert in sorted_alerts.iter().take(2) {
        recent_activity.push(json!({
            "timestamp": alert.triggered_at,
            "type": "alert_triggered",
            "description": alert.title,
            "severity": alert.severity,
        }));
    }
    recent_activity.sort_by(|a, b| {
        b["timestamp"]
            .as_str()
            .unwrap_or("")
            .cmp(a["timestamp"].as_str().unwrap_or(""))
    });
    recent_activity.truncate(10);

    Ok(ok(json!({
        "overview": {
            "total_failures_detected": org_failures.len(),
            "total_alerts_generated": org_alerts.len(),
            "total_incidents_created": org_incidents.len(),
            "open_alerts": open_alerts,
            "critical_alerts": critical_alerts,
            "acknowledged_alerts": acknowledged_alerts,
            "open_incidents": open_incidents,
            "system_health_score": latest_health.map(|h| h.overall_health_score).unwrap_or(0.85),
            "availability_percentage": latest_health.map(|h| h.availability_percentage).unwrap_or(99.5),
            "mean_response_time": latest_health.map(|h| h.mean_response_time).unwrap_or(1.2),
        },
        "failure_types": failure_types,
        "component_health": latest_health.map(|h| h.component_health.clone()).unwrap_or_default(),
        "recent_activity": recent_activity,
        "system_health": latest_health,
        "time_range": q.time_range,
        "last_updated": Utc::now(),
    })))
}

#[derive(Deserialize)]
struct FailureFilter {
    organization_id: Option<String>,
    failure_type: Option<FailureType>,
    component: Option<String>,
    #[serde(default)]
    min_severity: f64,
    #[serde(default = "api::default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
}

async fn list_failures(
    State(st): State<Arc<AppState>>,
    Query(q): Query<FailureFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());

    let failures = st.failure.failures.safe_read()?;
    let mut filtered: Vec<&FailureDetection> = failures
        .values()
        .filter(|f| {
            f.organization_id == org_id
                && q.failure_type.map(|t| f.failure_type == t).unwrap_or(true)
                && q.component
                    .as_deref()
                    .map(|c| f.affected_component == c)
                    .unwrap_or(true)
                && f.severity_score >= q.min_severity
        })
        .collect();
    filtered.sort_by(|a, b| b.detected_at.cmp(&a.detected_at));

    let total = filtered.len();
    let by_type: serde_json::Map<String, serde_json::Value> = FailureType::ALL
        .iter()
        .map(|t| {
            (
                t.as_str().to_string(),
                json!(filtered.iter().filter(|f| f.failure_type == *t).count()),
            )
        })
        .collect();
    let component_count = |component: &str| {
        filtered
            .iter()
            .filter(|f| f.affected_component == component)
            .count()
    };

    let page: Vec<&FailureDetection> = filtered
        .iter()
        .skip(q.offset)
        .take(q.limit)
        .copied()
        .collect();

    Ok(ok(json!({
        "failures": page,
        "pagination": pagination(total, q.limit, q.offset),
        "summary": {
            "total_failures": total,
            "by_type": by_type,
            "by_component": {
                "model": component_count("model"),
                "api": component_count("api"),
                "pipeline": component_count("pipeline"),
                "integration": component_count("integration"),
            },
        },
    })))
}

#[derive(Deserialize)]
struct ReportFailureRequest {
    organization_id: Option<String>,
    failure_type: Option<FailureType>,
    affected_component: Option<String>,
    component_id: Option<String>,
    severity_score: Option<f64>,
    failure_description: Option<String>,
    detection_method: Option<String>,
    #[serde(default)]
    confidence_level: Option<f64>,
    #[serde(default)]
    root_cause_analysis: String,
    #[serde(default)]
    impact_assessment: String,
    #[serde(default)]
    affected_metrics: Vec<String>,
    #[serde(default)]
    baseline_values: HashMap<String, f64>,
    #[serde(default)]
    current_values: HashMap<String, f64>,
    #[serde(default)]
    deviation_percentage: f64,
    #[serde(default)]
    detection_rules: Vec<String>,
    #[serde(default)]
    related_failures: Vec<String>,
    #[serde(default)]
    mitigation_suggestions: Vec<String>,
}

/// Record a manually reported failure. Severity 0.5 and above also raises an
/// alert.
async fn report_failure(
    State(st): State<Arc<AppState>>,
    Json(req): Json<ReportFailureRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let mut failure = FailureDetection::new(
        required(req.organization_id, "organization_id")?,
        required(req.failure_type, "failure_type")?,
        req.detection_method
            .unwrap_or_else(|| "manual".to_string()),
        required(req.affected_component, "affected_component")?,
        required(req.component_id, "component_id")?,
        required(req.severity_score, "severity_score")?,
        req.confidence_level.unwrap_or(0.8),
        required(req.failure_description, "failure_description")?,
    );
    failure.root_cause_analysis = req.root_cause_analysis;
    failure.impact_assessment = req.impact_assessment;
    failure.affected_metrics = req.affected_metrics;
    failure.baseline_values = req.baseline_values;
    failure.current_values = req.current_values;
    failure.deviation_percentage = req.deviation_percentage;
    failure.detection_rules = req.detection_rules;
    failure.related_failures = req.related_failures;
    failure.mitigation_suggestions = req.mitigation_suggestions;

    let alert = if failure.severity_score >= 0.5 {
        let alert = failure_engine::alert_from_failure(&failure, None);
        st.failure
            .alerts
            .safe_write()?
            .insert(alert.id.clone(), alert.clone());
        Some(alert)
    } else {
        None
    };

    st.failure
        .failures
        .safe_write()?
        .insert(failure.id.clone(), failure.clone());

    tracing::info!(
        "Failure reported: org={}, type={}, severity={:.2}, alert={}",
        failure.organization_id,
        failure.failure_type.as_str(),
        failure.severity_score,
        alert.is_some()
    );

    let message = if alert.is_some() {
        "Failure detected and alert created"
    } else {
        "Failure detected (no alert created due to low severity)"
    };
    Ok(created(json!({
        "failure": failure,
        "alert_created": alert,
        "message": message,
    })))
}

#[derive(Deserialize)]
struct FailureAlertFilter {
    organization_id: Option<String>,
    severity: Option<Severity>,
    status: Option<AlertStatus>,
    component: Option<String>,
    #[serde(default = "api::default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
}

async fn list_alerts(
    State(st): State<Arc<AppState>>,
    Query(q): Query<FailureAlertFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());

    let alerts = st.failure.alerts.safe_read()?;
    let failures = st.failure.failures.safe_read()?;

    let mut filtered: Vec<&Alert> = alerts
        .values()
        .filter(|a| {
            a.organization_id == org_id
                && q.severity.map(|s| a.severity == s).unwrap_or(true)
                && q.status.map(|s| a.status == s).unwrap_or(true)
                && q.component
                    .as_deref()
                    .map(|c| a.source_component == c)
                    .unwrap_or(true)
        })
        .collect();
    filtered.sort_by(|a, b| b.triggered_at.cmp(&a.triggered_at));

    let total = filtered.len();
    let severity_counts: serde_json::Map<String, serde_json::Value> = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ]
    .iter()
    .map(|sev| {
        (
            sev.as_str().to_string(),
            json!(filtered.iter().filter(|a| a.severity == *sev).count()),
        )
    })
    .collect();
    let status_counts: serde_json::Map<String, serde_json::Value> = AlertStatus::ALL
        .iter()
        .map(|status| {
            (
                status.as_str().to_string(),
                json!(filtered.iter().filter(|a| a.status == *status).count()),
            )
        })
        .collect();
    let requires_ack = filtered
        .iter()
        .filter(|a| a.acknowledgment_required && a.status == AlertStatus::Open)
        .count();

    let now = Utc::now();
    let enriched: Vec<serde_json::Value> = filtered
        .iter()
        .skip(q.offset)
        .take(q.limit)
        .map(|alert| {
            let mut value = serde_json::to_value(alert).unwrap_or_default();
            if let Some(failure) = alert
                .source_failure_id
                .as_deref()
                .and_then(|id| failures.get(id))
            {
                value["related_failure"] = json!({
                    "id": failure.id,
                    "type": failure.failure_type,
                    "severity_score": failure.severity_score,
                    "affected_metrics": failure.affected_metrics,
                });
            }
            value["age_minutes"] =
                json!((now - alert.triggered_at).num_seconds() as f64 / 60.0);
            value
        })
        .collect();

    Ok(ok(json!({
        "alerts": enriched,
        "pagination": pagination(total, q.limit, q.offset),
        "summary": {
            "total_alerts": total,
            "by_severity": severity_counts,
            "by_status": status_counts,
            "requires_acknowledgment": requires_ack,
        },
    })))
}

#[derive(Deserialize)]
struct AckRequest {
    acknowledged_by: Option<String>,
    #[serde(default)]
    notes: String,
}

async fn acknowledge_alert(
    State(st): State<Arc<AppState>>,
    Path(alert_id): Path<String>,
    Json(req): Json<AckRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut alerts = st.failure.alerts.safe_write()?;
    let alert = alerts
        .get_mut(&alert_id)
        .ok_or_else(|| ApiError::not_found("Alert not found"))?;

    if alert.status != AlertStatus::Open {
        return Err(ApiError::bad_request("Alert is not in open status"));
    }

    let actor = req
        .acknowledged_by
        .unwrap_or_else(|| "unknown".to_string());
    alert.status = AlertStatus::Acknowledged;
    alert.acknowledged_at = Some(Utc::now());
    alert.acknowledged_by = Some(actor.clone());
    alert.notification_history.push(AlertNote {
        timestamp: Utc::now(),
        action: "acknowledged".to_string(),
        actor,
        notes: req.notes,
    });

    Ok(ok(json!({
        "alert": alert.clone(),
        "message": "Alert acknowledged successfully",
    })))
}

#[derive(Deserialize)]
struct ResolveRequest {
    resolved_by: Option<String>,
    #[serde(default)]
    resolution_notes: String,
}

async fn resolve_alert(
    State(st): State<Arc<AppState>>,
    Path(alert_id): Path<String>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut alerts = st.failure.alerts.safe_write()?;
    let alert = alerts
        .get_mut(&alert_id)
        .ok_or_else(|| ApiError::not_found("Alert not found"))?;

    if matches!(alert.status, AlertStatus::Resolved | AlertStatus::Closed) {
        return Err(ApiError::bad_request("Alert is already resolved"));
    }

    let actor = req.resolved_by.unwrap_or_else(|| "unknown".to_string());
    alert.status = AlertStatus::Resolved;
    alert.resolved_at = Some(Utc::now());
    alert.resolved_by = Some(actor.clone());
    alert.resolution_notes = req.resolution_notes.clone();
    alert.notification_history.push(AlertNote {
        timestamp: Utc::now(),
        action: "resolved".to_string(),
        actor,
        notes: req.resolution_notes,
    });

    Ok(ok(json!({
        "alert": alert.clone(),
        "message": "Alert resolved successfully",
    })))
}

#[derive(Deserialize)]
struct IncidentFilter {
    organization_id: Option<String>,
    status: Option<IncidentStatus>,
    severity: Option<Severity>,
    #[serde(default = "api::default_limit")]
    limit: usize,
}

async fn list_incidents(
    State(st): State<Arc<AppState>>,
    Query(q): Query<IncidentFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());

    let incidents = st.failure.incidents.safe_read()?;
    let mut filtered: Vec<&Incident> = incidents
        .values()
        .filter(|i| {
            i.organization_id == org_id
                && q.status.map(|s| i.status == s).unwrap_or(true)
                && q.severity.map(|s| i.severity == s).unwrap_or(true)
        })
        .collect();
    filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total = filtered.len();
    let by_status: serde_json::Map<String, serde_json::Value> = IncidentStatus::ALL
        .iter()
        .map(|status| {
            (
                status.as_str().to_string(),
                json!(filtered.iter().filter(|i| i.status == *status).count()),
            )
        })
        .collect();
    let open = filtered.iter().filter(|i| i.status.is_open()).count();
    filtered.truncate(q.limit);

    Ok(ok(json!({
        "incidents": filtered,
        "summary": {
            "total_incidents": total,
            "by_status": by_status,
            "open_incidents": open,
        },
    })))
}

#[derive(Deserialize)]
struct CreateIncidentRequest {
    organization_id: Option<String>,
    incident_title: Option<String>,
    incident_description: Option<String>,
    severity: Option<Severity>,
    created_by: Option<String>,
    #[serde(default = "default_priority")]
    priority: u8,
    assigned_to: Option<String>,
    incident_commander: Option<String>,
    #[serde(default)]
    affected_services: Vec<String>,
    #[serde(default)]
    affected_users: u64,
    #[serde(default)]
    business_impact: String,
    #[serde(default)]
    related_alerts: Vec<String>,
    #[serde(default)]
    related_failures: Vec<String>,
    estimated_resolution: Option<DateTime<Utc>>,
}

fn default_priority() -> u8 {
    3
}

async fn create_incident(
    State(st): State<Arc<AppState>>,
    Json(req): Json<CreateIncidentRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let created_by = required(req.created_by, "created_by")?;
    let now = Utc::now();

    let incident = Incident {
        id: Uuid::new_v4().to_string(),
        organization_id: required(req.organization_id, "organization_id")?,
        incident_title: required(req.incident_title, "incident_title")?,
        incident_description: required(req.incident_description, "incident_description")?,
        status: IncidentStatus::Detected,
        severity: required(req.severity, "severity")?,
        priority: req.priority,
        created_at: now,
        created_by: created_by.clone(),
        assigned_to: req.assigned_to,
        incident_commander: req.incident_commander,
        affected_services: req.affected_services,
        affected_users: req.affected_users,
        business_impact: req.business_impact,
        related_alerts: req.related_alerts,
        related_failures: req.related_failures,
        timeline: vec![TimelineEntry {
            timestamp: now,
            event: "Incident created".to_string(),
            description: "Incident opened and initial assessment started".to_string(),
            actor: created_by,
        }],
        resolution_steps: Vec::new(),
        root_cause: String::new(),
        lessons_learned: String::new(),
        estimated_resolution: req.estimated_resolution,
        actual_resolution: None,
    };

    st.failure
        .incidents
        .safe_write()?
        .insert(incident.id.clone(), incident.clone());

    Ok(created(json!({
        "incident": incident,
        "message": "Incident created successfully",
    })))
}

#[derive(Deserialize)]
struct RuleFilter {
    organization_id: Option<String>,
    is_active: Option<bool>,
    component_type: Option<String>,
}

async fn list_rules(
    State(st): State<Arc<AppState>>,
    Query(q): Query<RuleFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());

    let rules = st.failure.rules.safe_read()?;
    let mut filtered: Vec<&MonitoringRule> = rules
        .values()
        .filter(|r| {
            r.organization_id == org_id
                && q.is_active.map(|active| r.is_active == active).unwrap_or(true)
                && q.component_type
                    .as_deref()
                    .map(|c| r.component_type == c)
                    .unwrap_or(true)
        })
        .collect();
    filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let component_count = |component: &str| {
        filtered
            .iter()
            .filter(|r| r.component_type == component)
            .count()
    };
    let by_metric: serde_json::Map<String, serde_json::Value> = MonitoringMetric::ALL
        .iter()
        .map(|metric| {
            (
                metric.as_str().to_string(),
                json!(filtered.iter().filter(|r| r.metric_name == *metric).count()),
            )
        })
        .collect();

    Ok(ok(json!({
        "monitoring_rules": filtered,
        "summary": {
            "total_rules": filtered.len(),
            "active_rules": filtered.iter().filter(|r| r.is_active).count(),
            "by_component": {
                "model": component_count("model"),
                "api": component_count("api"),
                "pipeline": component_count("pipeline"),
            },
            "by_metric": by_metric,
        },
    })))
}

#[derive(Deserialize)]
struct CreateRuleRequest {
    organization_id: Option<String>,
    rule_name: Option<String>,
    rule_description: Option<String>,
    metric_name: Option<MonitoringMetric>,
    component_type: Option<String>,
    threshold_type: Option<String>,
    #[serde(default = "default_true")]
    is_active: bool,
    #[serde(default)]
    component_filter: serde_json::Value,
    threshold_value: Option<f64>,
    threshold_operator: Option<String>,
    baseline_period: Option<u32>,
    evaluation_window: Option<u32>,
    sensitivity: Option<f64>,
    min_data_points: Option<u32>,
    failure_type: Option<FailureType>,
    alert_severity: Option<Severity>,
    notification_channels: Option<Vec<NotificationChannel>>,
    suppression_duration: Option<u32>,
    #[serde(default)]
    escalation_rules: Vec<EscalationRule>,
    created_by: Option<String>,
}

fn default_true() -> bool {
    true
}

async fn create_rule(
    State(st): State<Arc<AppState>>,
    Json(req): Json<CreateRuleRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let rule = MonitoringRule {
        id: Uuid::new_v4().to_string(),
        organization_id: required(req.organization_id, "organization_id")?,
        rule_name: required(req.rule_name, "rule_name")?,
        rule_description: required(req.rule_description, "rule_description")?,
        is_active: req.is_active,
        metric_name: required(req.metric_name, "metric_name")?,
        component_type: required(req.component_type, "component_type")?,
        component_filter: req.component_filter,
        threshold_type: required(req.threshold_type, "threshold_type")?,
        threshold_value: req.threshold_value,
        threshold_operator: req.threshold_operator.unwrap_or_else(|| ">".to_string()),
        baseline_period: req.baseline_period.unwrap_or(24),
        evaluation_window: req.evaluation_window.unwrap_or(5),
        sensitivity: req.sensitivity.unwrap_or(0.8),
        min_data_points: req.min_data_points.unwrap_or(3),
        failure_type: req.failure_type.unwrap_or(FailureType::PerformanceAnomaly),
        alert_severity: req.alert_severity.unwrap_or(Severity::Medium),
        notification_channels: req
            .notification_channels
            .unwrap_or_else(|| vec![NotificationChannel::Email]),
        suppression_duration: req.suppression_duration.unwrap_or(60),
        escalation_rules: req.escalation_rules,
        created_at: Utc::now(),
        created_by: req.created_by.unwrap_or_else(|| "system".to_string()),
        last_triggered: None,
        trigger_count: 0,
        false_positive_count: 0,
    };

    st.failure
        .rules
        .safe_write()?
        .insert(rule.id.clone(), rule.clone());

    Ok(created(json!({
        "monitoring_rule": rule,
        "message": "Monitoring rule created successfully",
    })))
}

#[derive(Deserialize)]
struct HealthQuery {
    organization_id: Option<String>,
}

async fn system_health(
    State(st): State<Arc<AppState>>,
    Query(q): Query<HealthQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());

    let current: SystemHealth = {
        let health = st.failure.health.safe_read()?;
        health
            .values()
            .filter(|h| h.organization_id == org_id)
            .max_by_key(|h| h.timestamp)
            .cloned()
    }
    .map(Ok::<_, ApiError>)
    .unwrap_or_else(|| {
        // nothing stored yet: compute a snapshot from live state
        let alerts: Vec<Alert> = st.failure.alerts.safe_read()?.values().cloned().collect();
        let incidents: Vec<Incident> = st
            .failure
            .incidents
            .safe_read()?
            .values()
            .cloned()
            .collect();
        let failures: Vec<FailureDetection> = st
            .failure
            .failures
            .safe_read()?
            .values()
            .cloned()
            .collect();
        let snapshot = failure_engine::system_health(
            &org_id,
            &alerts,
            &incidents,
            &failures,
            &HashMap::from([
                ("response_time".to_string(), 1.2),
                ("error_rate".to_string(), 0.015),
                ("throughput".to_string(), 150.0),
                ("quality_score".to_string(), 0.85),
            ]),
        );
        st.failure
            .health
            .safe_write()?
            .insert(snapshot.id.clone(), snapshot.clone());
        Ok(snapshot)
    })?;

    let components: serde_json::Map<String, serde_json::Value> = current
        .component_health
        .iter()
        .map(|(component, score)| (component.clone(), json!(health_label(*score))))
        .collect();

    Ok(ok(json!({
        "system_health": current,
        "health_status": {
            "overall": health_label(current.overall_health_score),
            "components": components,
        },
    })))
}

#[derive(Deserialize)]
struct HealthHistoryQuery {
    organization_id: Option<String>,
    #[serde(default = "default_hours")]
    hours: i64,
}

fn default_hours() -> i64 {
    24
}

async fn health_history(
    State(st): State<Arc<AppState>>,
    Query(q): Query<HealthHistoryQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());
    let start = Utc::now() - Duration::hours(q.hours);

    let health = st.failure.health.safe_read()?;
    let mut records: Vec<&SystemHealth> = health
        .values()
        .filter(|h| h.organization_id == org_id && h.timestamp >= start)
        .collect();
    records.sort_by_key(|h| h.timestamp);

    Ok(ok(json!({
        "health_history": records,
        "time_range_hours": q.hours,
        "data_points": records.len(),
    })))
}

#[derive(Deserialize)]
struct SimulateRequest {
    #[serde(default = "default_simulation")]
    simulation_type: String,
    organization_id: Option<String>,
}

fn default_simulation() -> String {
    "model_degradation".to_string()
}

/// Run a named detector against canned inputs, recording whatever it finds.
async fn simulate_failure(
    State(st): State<Arc<AppState>>,
    Json(req): Json<SimulateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = req
        .organization_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());

    let failure = match req.simulation_type.as_str() {
        "model_degradation" => failure_engine::detect_model_degradation(
            &org_id,
            &HashMap::from([
                ("accuracy".to_string(), 0.75),
                ("f1_score".to_string(), 0.72),
            ]),
            &HashMap::from([
                ("accuracy".to_string(), 0.92),
                ("f1_score".to_string(), 0.89),
            ]),
            0.1,
        ),
        "latency_spike" => failure_engine::detect_latency_spike(&org_id, 4.5, 1.2, 2.0),
        "error_rate_increase" => {
            failure_engine::detect_error_rate_increase(&org_id, 0.08, 0.01, 0.05)
        }
        other => {
            return Err(ApiError::bad_request(format!(
                "Unknown simulation type: {other}"
            )))
        }
    };

    match failure {
        Some(failure) => {
            let alert = failure_engine::alert_from_failure(&failure, None);
            st.failure
                .alerts
                .safe_write()?
                .insert(alert.id.clone(), alert.clone());
            st.failure
                .failures
                .safe_write()?
                .insert(failure.id.clone(), failure.clone());

            tracing::info!(
                "Simulated {} for org={}",
                req.simulation_type,
                org_id
            );

            Ok(ok(json!({
                "simulation_type": req.simulation_type,
                "failure": failure,
                "alert": alert,
                "message": format!("Successfully simulated {}", req.simulation_type),
            })))
        }
        None => Ok(ok(json!({
            "simulation_type": req.simulation_type,
            "failure": null,
            "message": format!(
                "Simulation ran but no failure detected for {}",
                req.simulation_type
            ),
        }))),
    }
}
