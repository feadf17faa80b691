//! Regulation sync endpoints: regulations, alerts, templates, monitors, and
//! the simulated EUR-Lex sync.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::api::{created, ok, required};
use crate::api_errors::ApiError;
use crate::app_state::AppState;
use crate::errors::{SafeRead, SafeWrite};
use crate::regulation::{
    ImpactLevel, RegAlertStatus, Regulation, RegulationMonitor, RegulatoryAlert,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/regulations", get(list_regulations))
        .route("/regulations/{regulation_id}", get(get_regulation))
        .route("/alerts", get(list_alerts).post(create_alert))
        .route("/alerts/{alert_id}/acknowledge", put(acknowledge_alert))
        .route("/alerts/{alert_id}/resolve", put(resolve_alert))
        .route("/templates", get(list_templates))
        .route("/templates/{template_id}", get(get_template))
        .route("/templates/{template_id}/validate", post(validate_template))
        .route("/monitors", get(list_monitors).post(create_monitor))
        .route("/sync/eur-lex", post(sync_eur_lex))
}

// Hard-coded readiness figures surfaced on the dashboard; a real deployment
// would derive these from assessment data.
fn ai_act_readiness() -> f64 {
    78.5
}

fn gdpr_compliance() -> f64 {
    92.3
}

fn overall_compliance_score() -> f64 {
    ai_act_readiness() * 0.6 + gdpr_compliance() * 0.4
}

async fn dashboard(
    State(st): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let regulations = st.regulation.regulations.safe_read()?;
    let alerts = st.regulation.alerts.safe_read()?;
    let monitors = st.regulation.monitors.safe_read()?;

    let active_alerts = alerts
        .values()
        .filter(|a| a.status == RegAlertStatus::Active)
        .count();
    let active_monitors = monitors.values().filter(|m| m.is_active).count();

    let thirty_days_ago = Utc::now() - Duration::days(30);
    let mut recent_alerts: Vec<&RegulatoryAlert> = alerts
        .values()
        .filter(|a| a.created_at >= thirty_days_ago)
        .collect();
    recent_alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent_alerts.truncate(10);

    let mut reg_breakdown = serde_json::Map::new();
    for reg in regulations.values() {
        let entry = reg_breakdown
            .entry(reg.regulation_type.clone())
            .or_insert(json!(0));
        *entry = json!(entry.as_u64().unwrap_or(0) + 1);
    }

    let impact_count = |level: ImpactLevel| {
        alerts.values().filter(|a| a.impact_level == level).count()
    };

    Ok(ok(json!({
        "summary": {
            "total_regulations": regulations.len(),
            "active_alerts": active_alerts,
            "active_monitors": active_monitors,
            "last_sync": Utc::now(),
        },
        "regulation_breakdown": reg_breakdown,
        "alert_breakdown": {
            "low": impact_count(ImpactLevel::Low),
            "medium": impact_count(ImpactLevel::Medium),
            "high": impact_count(ImpactLevel::High),
            "critical": impact_count(ImpactLevel::Critical),
        },
        "recent_alerts": recent_alerts,
        "compliance_status": {
            "ai_act_ready": ai_act_readiness(),
            "gdpr_compliant": gdpr_compliance(),
            "overall_score": overall_compliance_score(),
        },
    })))
}

#[derive(Deserialize)]
struct RegulationFilter {
    #[serde(rename = "type")]
    regulation_type: Option<String>,
    status: Option<String>,
    jurisdiction: Option<String>,
    search: Option<String>,
}

async fn list_regulations(
    State(st): State<Arc<AppState>>,
    Query(q): Query<RegulationFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let regulations = st.regulation.regulations.safe_read()?;
    let search = q.search.as_deref().map(str::to_lowercase);

    let mut filtered: Vec<&Regulation> = regulations
        .values()
        .filter(|r| {
            q.regulation_type
                .as_deref()
                .map(|t| r.regulation_type == t)
                .unwrap_or(true)
                && q.status.as_deref().map(|s| r.status == s).unwrap_or(true)
                && q.jurisdiction
                    .as_deref()
                    .map(|j| r.jurisdiction == j)
                    .unwrap_or(true)
                && search
                    .as_deref()
                    .map(|needle| {
                        r.title.to_lowercase().contains(needle)
                            || r.content.to_lowercase().contains(needle)
                    })
                    .unwrap_or(true)
        })
        .collect();
    filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(ok(json!({
        "regulations": filtered,
        "total": filtered.len(),
        "filters_applied": {
            "type": q.regulation_type,
            "status": q.status,
            "jurisdiction": q.jurisdiction,
            "search": q.search,
        },
    })))
}

async fn get_regulation(
    State(st): State<Arc<AppState>>,
    Path(regulation_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let regulations = st.regulation.regulations.safe_read()?;
    let regulation = regulations
        .get(&regulation_id)
        .ok_or_else(|| ApiError::not_found("Regulation not found"))?;

    let alerts = st.regulation.alerts.safe_read()?;
    let related: Vec<&RegulatoryAlert> = alerts
        .values()
        .filter(|a| a.regulation_id == regulation_id)
        .collect();

    Ok(ok(json!({
        "regulation": regulation,
        "related_alerts": related,
    })))
}

#[derive(Deserialize)]
struct RegAlertFilter {
    status: Option<RegAlertStatus>,
    impact_level: Option<ImpactLevel>,
    #[serde(rename = "type")]
    alert_type: Option<String>,
    regulation_id: Option<String>,
}

async fn list_alerts(
    State(st): State<Arc<AppState>>,
    Query(q): Query<RegAlertFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let alerts = st.regulation.alerts.safe_read()?;
    let mut filtered: Vec<&RegulatoryAlert> = alerts
        .values()
        .filter(|a| {
            q.status.map(|s| a.status == s).unwrap_or(true)
                && q.impact_level.map(|l| a.impact_level == l).unwrap_or(true)
                && q.alert_type
                    .as_deref()
                    .map(|t| a.alert_type == t)
                    .unwrap_or(true)
                && q.regulation_id
                    .as_deref()
                    .map(|r| a.regulation_id == r)
                    .unwrap_or(true)
        })
        .collect();
    // highest priority first, newest first inside the same priority
    filtered.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(b.created_at.cmp(&a.created_at))
    });

    let active = filtered
        .iter()
        .filter(|a| a.status == RegAlertStatus::Active)
        .count();
    let high_priority = filtered.iter().filter(|a| a.priority <= 2).count();
    let action_required = filtered.iter().filter(|a| a.action_required).count();

    Ok(ok(json!({
        "alerts": filtered,
        "total": filtered.len(),
        "summary": {
            "active": active,
            "high_priority": high_priority,
            "action_required": action_required,
        },
    })))
}

#[derive(Deserialize)]
struct CreateRegAlertRequest {
    regulation_id: Option<String>,
    alert_type: Option<String>,
    title: Option<String>,
    description: Option<String>,
    impact_level: Option<ImpactLevel>,
    #[serde(default)]
    affected_systems: Vec<String>,
    deadline: Option<DateTime<Utc>>,
}

async fn create_alert(
    State(st): State<Arc<AppState>>,
    Json(req): Json<CreateRegAlertRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let mut alert = RegulatoryAlert::new(
        required(req.regulation_id, "regulation_id")?,
        required(req.alert_type, "alert_type")?,
        required(req.title, "title")?,
        required(req.description, "description")?,
        required(req.impact_level, "impact_level")?,
        req.affected_systems,
    );
    alert.deadline = req.deadline;

    st.regulation
        .alerts
        .safe_write()?
        .insert(alert.id.clone(), alert.clone());

    tracing::info!(
        "Regulatory alert created: regulation={}, type={}, priority={}",
        alert.regulation_id,
        alert.alert_type,
        alert.priority
    );

    Ok(created(json!({ "alert": alert })))
}

#[derive(Deserialize)]
struct AlertActionRequest {
    user_id: Option<String>,
    #[serde(default)]
    notes: String,
}

async fn acknowledge_alert(
    State(st): State<Arc<AppState>>,
    Path(alert_id): Path<String>,
    Json(req): Json<AlertActionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut alerts = st.regulation.alerts.safe_write()?;
    let alert = alerts
        .get_mut(&alert_id)
        .ok_or_else(|| ApiError::not_found("Alert not found"))?;

    let user = req.user_id.unwrap_or_else(|| "anonymous".to_string());
    alert.acknowledge(&user, &req.notes);

    Ok(ok(json!({ "alert": alert.clone() })))
}

async fn resolve_alert(
    State(st): State<Arc<AppState>>,
    Path(alert_id): Path<String>,
    Json(req): Json<AlertActionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut alerts = st.regulation.alerts.safe_write()?;
    let alert = alerts
        .get_mut(&alert_id)
        .ok_or_else(|| ApiError::not_found("Alert not found"))?;

    let user = req.user_id.unwrap_or_else(|| "anonymous".to_string());
    alert.resolve(&user, &req.notes);

    Ok(ok(json!({ "alert": alert.clone() })))
}

#[derive(Deserialize)]
struct TemplateFilter {
    regulation_type: Option<String>,
    template_type: Option<String>,
    #[serde(default = "default_true")]
    active_only: bool,
}

fn default_true() -> bool {
    true
}

async fn list_templates(
    State(st): State<Arc<AppState>>,
    Query(q): Query<TemplateFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let templates = st.regulation.templates.safe_read()?;
    let mut filtered: Vec<_> = templates
        .values()
        .filter(|t| {
            q.regulation_type
                .as_deref()
                .map(|rt| t.regulation_type == rt)
                .unwrap_or(true)
                && q.template_type
                    .as_deref()
                    .map(|tt| t.template_type == tt)
                    .unwrap_or(true)
                && (!q.active_only || t.is_active)
        })
        .collect();
    filtered.sort_by(|a, b| b.usage_count.cmp(&a.usage_count).then(a.name.cmp(&b.name)));

    Ok(ok(json!({
        "templates": filtered,
        "total": filtered.len(),
    })))
}

async fn get_template(
    State(st): State<Arc<AppState>>,
    Path(template_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut templates = st.regulation.templates.safe_write()?;
    let template = templates
        .get_mut(&template_id)
        .ok_or_else(|| ApiError::not_found("Template not found"))?;
    template.usage_count += 1;

    Ok(ok(json!({ "template": template.clone() })))
}

#[derive(Deserialize)]
struct ValidateRequest {
    #[serde(default)]
    content: serde_json::Map<String, serde_json::Value>,
}

async fn validate_template(
    State(st): State<Arc<AppState>>,
    Path(template_id): Path<String>,
    Json(req): Json<ValidateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let templates = st.regulation.templates.safe_read()?;
    let template = templates
        .get(&template_id)
        .ok_or_else(|| ApiError::not_found("Template not found"))?;

    let report = template.validate_content(&req.content);
    Ok(ok(serde_json::to_value(report).map_err(|e| {
        ApiError::internal(format!("Failed to serialize validation report: {e}"))
    })?))
}

#[derive(Deserialize)]
struct MonitorFilter {
    organization_id: Option<String>,
    #[serde(default = "default_true")]
    active_only: bool,
}

async fn list_monitors(
    State(st): State<Arc<AppState>>,
    Query(q): Query<MonitorFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let monitors = st.regulation.monitors.safe_read()?;
    let filtered: Vec<&RegulationMonitor> = monitors
        .values()
        .filter(|m| {
            q.organization_id
                .as_deref()
                .map(|org| m.organization_id == org)
                .unwrap_or(true)
                && (!q.active_only || m.is_active)
        })
        .collect();

    Ok(ok(json!({
        "monitors": filtered,
        "total": filtered.len(),
    })))
}

#[derive(Deserialize)]
struct CreateMonitorRequest {
    name: Option<String>,
    regulation_types: Option<Vec<String>>,
    sources: Option<Vec<String>>,
    organization_id: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    check_frequency: Option<String>,
    notification_channels: Option<Vec<String>>,
    notification_threshold: Option<ImpactLevel>,
    recipients: Option<Vec<String>>,
}

async fn create_monitor(
    State(st): State<Arc<AppState>>,
    Json(req): Json<CreateMonitorRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let mut monitor = RegulationMonitor::new(
        required(req.name, "name")?,
        required(req.regulation_types, "regulation_types")?,
        required(req.sources, "sources")?,
        req.keywords,
        required(req.organization_id, "organization_id")?,
    );
    if let Some(freq) = req.check_frequency {
        monitor.check_frequency = freq;
    }
    if let Some(channels) = req.notification_channels {
        monitor.notification_channels = channels;
    }
    if let Some(threshold) = req.notification_threshold {
        monitor.notification_threshold = threshold;
    }
    if let Some(recipients) = req.recipients {
        monitor.recipients = recipients;
    }

    st.regulation
        .monitors
        .safe_write()?
        .insert(monitor.id.clone(), monitor.clone());

    Ok(created(json!({ "monitor": monitor })))
}

/// Simulated EUR-Lex synchronization. A real deployment would call the EU
/// legal database; here the sync reports fixed counts and drops a sample
/// amendment alert while few alerts exist.
async fn sync_eur_lex(
    State(st): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let now = Utc::now();
    let mut result = json!({
        "status": "completed",
        "timestamp": now,
        "documents_checked": 15,
        "new_documents": 2,
        "updated_documents": 1,
        "alerts_generated": 1,
        "next_sync": now + Duration::hours(24),
    });

    let first_regulation_id = {
        let regulations = st.regulation.regulations.safe_read()?;
        let mut ids: Vec<&String> = regulations.keys().collect();
        ids.sort();
        ids.first().map(|id| (*id).clone())
    };

    if let Some(regulation_id) = first_regulation_id {
        let mut alerts = st.regulation.alerts.safe_write()?;
        // don't spam sample alerts on repeated syncs
        if alerts.len() < 5 {
            let alert = RegulatoryAlert::new(
                regulation_id,
                "amendment",
                "AI Act Article 6 Amendment Detected",
                "New clarification added to Article 6 regarding high-risk AI system \
                 classification. Review required for systems in healthcare and transportation \
                 sectors.",
                ImpactLevel::High,
                vec!["healthcare_ai".to_string(), "autonomous_vehicles".to_string()],
            );
            result["sample_alert"] = serde_json::to_value(&alert)
                .map_err(|e| ApiError::internal(format!("Failed to serialize alert: {e}")))?;
            alerts.insert(alert.id.clone(), alert);
        }
    }

    tracing::info!("EUR-Lex sync simulated");
    Ok(ok(result))
}
