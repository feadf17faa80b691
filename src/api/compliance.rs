//! Compliance grid endpoints: dashboard, scores, alerts, reports.

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

use crate::api::{self, created, ok, required};
use crate::api_errors::ApiError;
use crate::app_state::AppState;
use crate::compliance::{
    build_report_content, threshold_alerts, ComplianceAlert, ComplianceAlertStatus,
    ComplianceReport, ComplianceScore, ReportStatus,
};
use crate::errors::{SafeRead, SafeWrite};
use crate::severity::Severity;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/score/{org_id}", get(get_score))
        .route("/score", post(create_score))
        .route("/alerts", get(list_alerts).post(create_alert))
        .route("/alerts/{alert_id}", put(update_alert))
        .route("/reports", get(list_reports))
        .route("/reports/generate", post(generate_report))
}

#[derive(Deserialize)]
struct DashboardQuery {
    org_id: Option<String>,
}

async fn dashboard(
    State(st): State<Arc<AppState>>,
    Query(q): Query<DashboardQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let org_id = q
        .org_id
        .unwrap_or_else(|| st.config.demo.organization_id.clone());

    let scores = st.compliance.scores.safe_read()?;
    let alerts = st.compliance.alerts.safe_read()?;

    let latest = scores
        .values()
        .filter(|s| s.organization_id == org_id)
        .max_by_key(|s| s.updated_at);

    let active_alerts: Vec<&ComplianceAlert> = alerts
        .values()
        .filter(|a| a.organization_id == org_id && a.status == ComplianceAlertStatus::Active)
        .collect();
    let count_by = |sev: Severity| active_alerts.iter().filter(|a| a.severity == sev).count();

    let thirty_days_ago = Utc::now() - Duration::days(30);
    let mut historical: Vec<&ComplianceScore> = scores
        .values()
        .filter(|s| s.organization_id == org_id && s.created_at >= thirty_days_ago)
        .collect();
    historical.sort_by_key(|s| s.created_at);

    let trend_data: Vec<serde_json::Value> = historical
        .iter()
        .map(|s| {
            json!({
                "date": s.created_at.format("%Y-%m-%d").to_string(),
                "overall_score": s.overall_score,
                "bias_score": s.bias_score,
                "transparency_score": s.transparency_score,
                "logs_score": s.logs_score,
                "energy_score": s.energy_score,
            })
        })
        .collect();

    Ok(ok(json!({
        "organization_id": org_id,
        "current_score": latest,
        "alert_summary": {
            "total_active": active_alerts.len(),
            "by_severity": {
                "critical": count_by(Severity::Critical),
                "high": count_by(Severity::High),
                "medium": count_by(Severity::Medium),
                "low": count_by(Severity::Low),
            },
        },
        "trend_data": trend_data,
        "last_updated": Utc::now(),
    })))
}

async fn get_score(
    State(st): State<Arc<AppState>>,
    Path(org_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let scores = st.compliance.scores.safe_read()?;
    let latest = scores
        .values()
        .filter(|s| s.organization_id == org_id)
        .max_by_key(|s| s.updated_at)
        .ok_or_else(|| {
            ApiError::not_found(format!("No compliance score found for {org_id}"))
        })?;

    Ok(ok(json!({ "score": latest })))
}

#[derive(Deserialize)]
struct CreateScoreRequest {
    organization_id: Option<String>,
    system_name: Option<String>,
    #[serde(default)]
    bias_score: f64,
    #[serde(default)]
    transparency_score: f64,
    #[serde(default)]
    logs_score: f64,
    #[serde(default)]
    energy_score: f64,
}

async fn create_score(
    State(st): State<Arc<AppState>>,
    Json(req): Json<CreateScoreRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let organization_id = required(req.organization_id, "organization_id")?;
    let system_name = required(req.system_name, "system_name")?;

    let score = ComplianceScore::new(
        organization_id,
        system_name,
        req.bias_score,
        req.transparency_score,
        req.logs_score,
        req.energy_score,
    );

    let generated = threshold_alerts(&score);
    {
        let mut alerts = st.compliance.alerts.safe_write()?;
        for alert in &generated {
            alerts.insert(alert.id.clone(), alert.clone());
        }
    }
    st.compliance
        .scores
        .safe_write()?
        .insert(score.id.clone(), score.clone());

    tracing::info!(
        "Compliance score created: org={}, system={}, overall={:.1}, alerts={}",
        score.organization_id,
        score.system_name,
        score.overall_score,
        generated.len()
    );

    Ok(created(json!({
        "score": score,
        "alerts_generated": generated.len(),
        "message": "Compliance score created successfully",
    })))
}

#[derive(Deserialize)]
struct AlertFilter {
    org_id: Option<String>,
    status: Option<ComplianceAlertStatus>,
    severity: Option<Severity>,
    #[serde(default = "api::default_limit")]
    limit: usize,
}

async fn list_alerts(
    State(st): State<Arc<AppState>>,
    Query(q): Query<AlertFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let status = q.status.unwrap_or(ComplianceAlertStatus::Active);
    let alerts = st.compliance.alerts.safe_read()?;

    let mut filtered: Vec<&ComplianceAlert> = alerts
        .values()
        .filter(|a| {
            q.org_id
                .as_deref()
                .map(|org| a.organization_id == org)
                .unwrap_or(true)
                && a.status == status
                && q.severity.map(|sev| a.severity == sev).unwrap_or(true)
        })
        .collect();
    filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    filtered.truncate(q.limit);

    Ok(ok(json!({
        "alerts": filtered,
        "total": filtered.len(),
        "filters": {
            "org_id": q.org_id,
            "status": status,
            "severity": q.severity,
            "limit": q.limit,
        },
    })))
}

#[derive(Deserialize)]
struct CreateAlertRequest {
    organization_id: Option<String>,
    system_name: Option<String>,
    alert_type: Option<String>,
    title: Option<String>,
    #[serde(default)]
    severity: Option<Severity>,
    #[serde(default)]
    description: String,
}

async fn create_alert(
    State(st): State<Arc<AppState>>,
    Json(req): Json<CreateAlertRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let alert = ComplianceAlert::new(
        required(req.organization_id, "organization_id")?,
        required(req.system_name, "system_name")?,
        required(req.alert_type, "alert_type")?,
        req.severity.unwrap_or(Severity::Medium),
        required(req.title, "title")?,
        req.description,
    );

    st.compliance
        .alerts
        .safe_write()?
        .insert(alert.id.clone(), alert.clone());

    Ok(created(json!({
        "alert": alert,
        "message": "Alert created successfully",
    })))
}

#[derive(Deserialize)]
struct UpdateAlertRequest {
    status: Option<ComplianceAlertStatus>,
    severity: Option<Severity>,
    resolved_by: Option<String>,
}

async fn update_alert(
    State(st): State<Arc<AppState>>,
    Path(alert_id): Path<String>,
    Json(req): Json<UpdateAlertRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut alerts = st.compliance.alerts.safe_write()?;
    let alert = alerts
        .get_mut(&alert_id)
        .ok_or_else(|| ApiError::not_found(format!("Alert not found: {alert_id}")))?;

    if let Some(status) = req.status {
        alert.status = status;
        if status == ComplianceAlertStatus::Resolved {
            alert.resolved_at = Some(Utc::now());
            alert.resolved_by = Some(req.resolved_by.unwrap_or_else(|| "system".to_string()));
        }
    }
    if let Some(severity) = req.severity {
        alert.severity = severity;
    }

    Ok(ok(json!({
        "alert": alert.clone(),
        "message": "Alert updated successfully",
    })))
}

#[derive(Deserialize)]
struct ReportFilter {
    org_id: Option<String>,
    #[serde(rename = "type")]
    report_type: Option<String>,
    #[serde(default = "default_report_limit")]
    limit: usize,
}

fn default_report_limit() -> usize {
    20
}

async fn list_reports(
    State(st): State<Arc<AppState>>,
    Query(q): Query<ReportFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let reports = st.compliance.reports.safe_read()?;
    let mut filtered: Vec<&ComplianceReport> = reports
        .values()
        .filter(|r| {
            q.org_id
                .as_deref()
                .map(|org| r.organization_id == org)
                .unwrap_or(true)
                && q.report_type
                    .as_deref()
                    .map(|t| r.report_type == t)
                    .unwrap_or(true)
        })
        .collect();
    filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    filtered.truncate(q.limit);

    Ok(ok(json!({
        "reports": filtered,
        "total": filtered.len(),
    })))
}

#[derive(Deserialize)]
struct GenerateReportRequest {
    organization_id: Option<String>,
    report_type: Option<String>,
    period_start: Option<DateTime<Utc>>,
    period_end: Option<DateTime<Utc>>,
    title: Option<String>,
}

async fn generate_report(
    State(st): State<Arc<AppState>>,
    Json(req): Json<GenerateReportRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let organization_id = required(req.organization_id, "organization_id")?;
    let report_type = required(req.report_type, "report_type")?;
    let period_start = required(req.period_start, "period_start")?;
    let period_end = required(req.period_end, "period_end")?;

    let in_period = |created: DateTime<Utc>| created >= period_start && created <= period_end;
    let period_scores: Vec<ComplianceScore> = st
        .compliance
        .scores
        .safe_read()?
        .values()
        .filter(|s| s.organization_id == organization_id && in_period(s.created_at))
        .cloned()
        .collect();
    let period_alerts: Vec<ComplianceAlert> = st
        .compliance
        .alerts
        .safe_read()?
        .values()
        .filter(|a| a.organization_id == organization_id && in_period(a.created_at))
        .cloned()
        .collect();

    let content = build_report_content(period_start, period_end, &period_scores, &period_alerts);

    let report = ComplianceReport {
        id: uuid::Uuid::new_v4().to_string(),
        organization_id,
        title: req
            .title
            .unwrap_or_else(|| format!("{} Compliance Report", report_type.to_uppercase())),
        report_type,
        period_start,
        period_end,
        summary: content.summary,
        findings: content.findings,
        recommendations: content.recommendations,
        data: content.data,
        status: ReportStatus::Final,
        created_at: Utc::now(),
        generated_by: "system".to_string(),
    };

    st.compliance
        .reports
        .safe_write()?
        .insert(report.id.clone(), report.clone());

    tracing::info!(
        "Compliance report generated: org={}, type={}",
        report.organization_id,
        report.report_type
    );

    Ok(created(json!({
        "report": report,
        "message": "Report generated successfully",
    })))
}
