//! Failure detection, alerting, health, and notification heuristics.
//!
//! Detectors compare current metrics against a baseline with fixed
//! thresholds and return `None` when nothing crosses them.

use chrono::{Duration, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::failure::{
    Alert, AlertStatus, EscalationRule, FailureDetection, FailureType, Incident,
    NotificationChannel, NotificationTemplate, SystemHealth,
};
use crate::severity::Severity;

const KEY_QUALITY_METRICS: [&str; 5] =
    ["quality_score", "accuracy", "f1_score", "precision", "recall"];

/// Relative drop across key quality metrics beyond `threshold`.
pub fn detect_model_degradation(
    organization_id: &str,
    current_metrics: &HashMap<String, f64>,
    baseline_metrics: &HashMap<String, f64>,
    threshold: f64,
) -> Option<FailureDetection> {
    let mut degradation_score = 0.0;
    let mut affected_metrics = Vec::new();
    let mut current_values = HashMap::new();
    let mut baseline_values = HashMap::new();

    for metric in KEY_QUALITY_METRICS {
        let (Some(&current), Some(&baseline)) =
            (current_metrics.get(metric), baseline_metrics.get(metric))
        else {
            continue;
        };
        if baseline <= 0.0 {
            continue;
        }
        let degradation = (baseline - current) / baseline;
        if degradation > threshold {
            degradation_score += degradation;
            affected_metrics.push(metric.to_string());
            current_values.insert(metric.to_string(), current);
            baseline_values.insert(metric.to_string(), baseline);
        }
    }

    if degradation_score <= threshold {
        return None;
    }

    let mut failure = FailureDetection::new(
        organization_id,
        FailureType::ModelDegradation,
        "threshold",
        "model",
        "model_001",
        degradation_score.min(1.0),
        0.85,
        format!(
            "Model performance degraded by {:.1}%",
            degradation_score * 100.0
        ),
    );
    failure.root_cause_analysis = "Potential data drift or model staleness detected".to_string();
    failure.impact_assessment = "Reduced model accuracy may affect user experience".to_string();
    failure.affected_metrics = affected_metrics;
    failure.baseline_values = baseline_values;
    failure.current_values = current_values;
    failure.deviation_percentage = degradation_score * 100.0;
    failure.detection_rules = vec!["model_degradation_threshold".to_string()];
    failure.mitigation_suggestions = vec![
        "Retrain model with recent data".to_string(),
        "Investigate data quality issues".to_string(),
        "Consider model rollback if degradation is severe".to_string(),
    ];
    Some(failure)
}

/// Latency ratio over baseline beyond `spike_threshold`.
pub fn detect_latency_spike(
    organization_id: &str,
    current_latency: f64,
    baseline_latency: f64,
    spike_threshold: f64,
) -> Option<FailureDetection> {
    if baseline_latency <= 0.0 {
        return None;
    }
    let ratio = current_latency / baseline_latency;
    if ratio <= spike_threshold {
        return None;
    }

    let severity = ((ratio - 1.0) / 3.0).min(1.0);
    let mut failure = FailureDetection::new(
        organization_id,
        FailureType::LatencySpike,
        "threshold",
        "api",
        "api_001",
        severity,
        0.9,
        format!("Response time increased by {:.1}%", (ratio - 1.0) * 100.0),
    );
    failure.root_cause_analysis =
        "Possible resource contention or downstream service issues".to_string();
    failure.impact_assessment = "Users experiencing slower response times".to_string();
    failure.affected_metrics = vec!["response_time".to_string()];
    failure
        .baseline_values
        .insert("response_time".to_string(), baseline_latency);
    failure
        .current_values
        .insert("response_time".to_string(), current_latency);
    failure.deviation_percentage = (ratio - 1.0) * 100.0;
    failure.detection_rules = vec!["latency_spike_threshold".to_string()];
    failure.mitigation_suggestions = vec![
        "Check resource utilization".to_string(),
        "Investigate downstream dependencies".to_string(),
        "Consider scaling resources".to_string(),
        "Review recent deployments".to_string(),
    ];
    Some(failure)
}

/// Absolute error-rate increase beyond `threshold`.
pub fn detect_error_rate_increase(
    organization_id: &str,
    current_error_rate: f64,
    baseline_error_rate: f64,
    threshold: f64,
) -> Option<FailureDetection> {
    let increase = current_error_rate - baseline_error_rate;
    if increase <= threshold {
        return None;
    }

    let severity = (increase / 0.2).min(1.0);
    let mut failure = FailureDetection::new(
        organization_id,
        FailureType::ErrorRateIncrease,
        "threshold",
        "api",
        "api_001",
        severity,
        0.88,
        format!(
            "Error rate increased by {:.1} percentage points",
            increase * 100.0
        ),
    );
    failure.root_cause_analysis =
        "Possible service instability or input validation issues".to_string();
    failure.impact_assessment = "Increased failure rate affecting user requests".to_string();
    failure.affected_metrics = vec!["error_rate".to_string()];
    failure
        .baseline_values
        .insert("error_rate".to_string(), baseline_error_rate);
    failure
        .current_values
        .insert("error_rate".to_string(), current_error_rate);
    failure.deviation_percentage = increase * 100.0;
    failure.detection_rules = vec!["error_rate_threshold".to_string()];
    failure.mitigation_suggestions = vec![
        "Review error logs for patterns".to_string(),
        "Check input validation logic".to_string(),
        "Investigate service dependencies".to_string(),
        "Consider circuit breaker activation".to_string(),
    ];
    Some(failure)
}

/// Maximum absolute per-category bias drift beyond `threshold`.
pub fn detect_bias_drift(
    organization_id: &str,
    current_bias_scores: &HashMap<String, f64>,
    baseline_bias_scores: &HashMap<String, f64>,
    threshold: f64,
) -> Option<FailureDetection> {
    let mut max_drift = 0.0f64;
    let mut affected = Vec::new();
    let mut current_values = HashMap::new();
    let mut baseline_values = HashMap::new();

    for (category, &current) in current_bias_scores {
        let Some(&baseline) = baseline_bias_scores.get(category) else {
            continue;
        };
        let drift = (current - baseline).abs();
        if drift > threshold {
            max_drift = max_drift.max(drift);
            affected.push(category.clone());
            current_values.insert(category.clone(), current);
            baseline_values.insert(category.clone(), baseline);
        }
    }

    if max_drift <= threshold {
        return None;
    }

    affected.sort();
    let mut failure = FailureDetection::new(
        organization_id,
        FailureType::BiasDrift,
        "threshold",
        "model",
        "model_001",
        (max_drift / 0.3).min(1.0),
        0.82,
        format!("Bias drift detected in categories: {}", affected.join(", ")),
    );
    failure.root_cause_analysis = "Model bias patterns have shifted from baseline".to_string();
    failure.impact_assessment = "Potential fairness issues in model outputs".to_string();
    failure.affected_metrics = affected;
    failure.baseline_values = baseline_values;
    failure.current_values = current_values;
    failure.deviation_percentage = max_drift * 100.0;
    failure.detection_rules = vec!["bias_drift_threshold".to_string()];
    failure.mitigation_suggestions = vec![
        "Review training data for bias".to_string(),
        "Implement bias correction techniques".to_string(),
        "Audit recent model changes".to_string(),
        "Consider bias-aware retraining".to_string(),
    ];
    Some(failure)
}

/// Derive an alert from a detected failure. High and critical alerts require
/// acknowledgment.
pub fn alert_from_failure(
    failure: &FailureDetection,
    notification_channels: Option<Vec<NotificationChannel>>,
) -> Alert {
    let channels = notification_channels.unwrap_or_else(|| {
        vec![NotificationChannel::Email, NotificationChannel::Dashboard]
    });
    let severity = Severity::from_score(failure.severity_score);

    Alert {
        id: Uuid::new_v4().to_string(),
        organization_id: failure.organization_id.clone(),
        alert_type: "failure".to_string(),
        severity,
        status: AlertStatus::Open,
        title: format!("{} Detected", failure.failure_type.label()),
        description: format!(
            "{}\n\nAffected Component: {}\nSeverity Score: {:.2}",
            failure.failure_description, failure.affected_component, failure.severity_score
        ),
        source_failure_id: Some(failure.id.clone()),
        source_component: failure.affected_component.clone(),
        source_metric: failure.affected_metrics.first().cloned(),
        triggered_at: failure.detected_at,
        triggered_by: "system".to_string(),
        acknowledgment_required: matches!(severity, Severity::Critical | Severity::High),
        acknowledged_at: None,
        acknowledged_by: None,
        resolved_at: None,
        resolved_by: None,
        resolution_notes: String::new(),
        escalation_level: 0,
        notification_channels: channels,
        notification_history: Vec::new(),
        tags: vec![
            failure.failure_type.as_str().to_string(),
            failure.affected_component.clone(),
        ],
    }
}

/// An open alert escalates once it outlives a matching rule's time threshold.
pub fn should_escalate(alert: &Alert, escalation_rules: &[EscalationRule]) -> bool {
    let age_minutes = (Utc::now() - alert.triggered_at).num_minutes();
    escalation_rules.iter().any(|rule| {
        alert.severity == rule.severity
            && age_minutes > rule.time_threshold_minutes
            && alert.status == AlertStatus::Open
    })
}

/// Alert priority, 1 (highest) to 5.
pub fn alert_priority(alert: &Alert) -> u8 {
    let base: u8 = match alert.severity {
        Severity::Critical => 1,
        Severity::High => 2,
        Severity::Medium => 3,
        Severity::Low => 4,
        Severity::Info => 5,
    };
    let mut priority = base.saturating_sub(alert.escalation_level.min(4) as u8).max(1);
    if alert.status == AlertStatus::Open && alert.acknowledgment_required {
        priority = priority.saturating_sub(1).max(1);
    }
    priority
}

/// Overall system health snapshot from live alert/incident/failure state and
/// a bag of performance metrics.
pub fn system_health(
    organization_id: &str,
    alerts: &[Alert],
    incidents: &[Incident],
    failures: &[FailureDetection],
    performance_metrics: &HashMap<String, f64>,
) -> SystemHealth {
    let now = Utc::now();

    let active_alerts: Vec<&Alert> = alerts.iter().filter(|a| a.is_active()).collect();
    let critical_alerts: Vec<&&Alert> = active_alerts
        .iter()
        .filter(|a| a.severity == Severity::Critical)
        .collect();
    let open_incidents = incidents.iter().filter(|i| i.status.is_open()).count();
    let recent_failures: Vec<&FailureDetection> = failures
        .iter()
        .filter(|f| now - f.detected_at < Duration::hours(1))
        .collect();

    let mut health_score = 1.0;
    health_score -= critical_alerts.len() as f64 * 0.2;
    health_score -= active_alerts.len() as f64 * 0.05;
    health_score -= open_incidents as f64 * 0.15;
    health_score -= recent_failures.len() as f64 * 0.03;

    if let Some(error_rate) = performance_metrics.get("error_rate") {
        health_score -= error_rate * 0.5;
    }
    if performance_metrics
        .get("response_time")
        .is_some_and(|rt| *rt > 2.0)
    {
        health_score -= 0.1;
    }
    let health_score = health_score.clamp(0.0, 1.0);

    let failures_in = |component: &str| {
        recent_failures
            .iter()
            .filter(|f| f.affected_component == component)
            .count() as f64
    };
    let mut component_health = HashMap::new();
    component_health.insert(
        "models".to_string(),
        (0.9 - failures_in("model") * 0.1).clamp(0.0, 1.0),
    );
    component_health.insert(
        "apis".to_string(),
        (0.95 - failures_in("api") * 0.1).clamp(0.0, 1.0),
    );
    component_health.insert(
        "pipelines".to_string(),
        (0.88 - failures_in("pipeline") * 0.1).clamp(0.0, 1.0),
    );
    component_health.insert(
        "integrations".to_string(),
        (0.92 - failures_in("integration") * 0.1).clamp(0.0, 1.0),
    );

    let error_rate = performance_metrics.get("error_rate").copied().unwrap_or(0.005);
    let mut trend_analysis = HashMap::new();
    trend_analysis.insert("response_time".to_string(), "stable".to_string());
    trend_analysis.insert(
        "error_rate".to_string(),
        if error_rate < 0.01 { "improving" } else { "stable" }.to_string(),
    );
    trend_analysis.insert("throughput".to_string(), "stable".to_string());
    trend_analysis.insert("quality_score".to_string(), "improving".to_string());

    let mut resource_utilization = HashMap::new();
    resource_utilization.insert("cpu".to_string(), 65.0);
    resource_utilization.insert("memory".to_string(), 72.0);
    resource_utilization.insert("disk".to_string(), 45.0);
    resource_utilization.insert("network".to_string(), 38.0);

    SystemHealth {
        id: Uuid::new_v4().to_string(),
        organization_id: organization_id.to_string(),
        timestamp: now,
        overall_health_score: health_score,
        component_health,
        active_alerts_count: active_alerts.len(),
        critical_alerts_count: critical_alerts.len(),
        open_incidents_count: open_incidents,
        recent_failures_count: recent_failures.len(),
        performance_metrics: performance_metrics.clone(),
        availability_percentage: 99.5 - critical_alerts.len() as f64 * 0.5,
        error_rate_percentage: error_rate * 100.0,
        mean_response_time: performance_metrics
            .get("response_time")
            .copied()
            .unwrap_or(1.2),
        p95_response_time: performance_metrics
            .get("p95_response_time")
            .copied()
            .unwrap_or(2.1),
        throughput_per_minute: performance_metrics.get("throughput").copied().unwrap_or(150.0),
        resource_utilization,
        trend_analysis,
    }
}

pub struct Notification {
    pub subject: String,
    pub body: String,
}

/// Render a notification template, substituting `{variable}` placeholders.
pub fn render_notification(alert: &Alert, template: &NotificationTemplate) -> Notification {
    let variables = [
        ("alert_title", alert.title.clone()),
        ("alert_description", alert.description.clone()),
        ("severity", alert.severity.as_str().to_uppercase()),
        ("component", alert.source_component.clone()),
        (
            "triggered_at",
            alert.triggered_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ),
        ("alert_id", alert.id.clone()),
        ("organization", alert.organization_id.clone()),
    ];

    let mut subject = template.subject_template.clone();
    let mut body = template.body_template.clone();
    for (name, value) in variables {
        let placeholder = format!("{{{name}}}");
        subject = subject.replace(&placeholder, &value);
        body = body.replace(&placeholder, &value);
    }

    Notification { subject, body }
}

/// Recently sent notification, for duplicate suppression.
pub struct NotificationRecord {
    pub sent_at: chrono::DateTime<Utc>,
    pub alert_type: String,
    pub source_component: String,
}

/// Suppress when a similar notification went out inside the window.
pub fn should_suppress(
    alert: &Alert,
    recent: &[NotificationRecord],
    suppression_minutes: i64,
) -> bool {
    let window_start = Utc::now() - Duration::minutes(suppression_minutes);
    recent.iter().any(|n| {
        n.sent_at > window_start
            && n.alert_type == alert.alert_type
            && n.source_component == alert.source_component
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn degradation_below_threshold_is_ignored() {
        let current = metrics(&[("accuracy", 0.91)]);
        let baseline = metrics(&[("accuracy", 0.92)]);
        assert!(detect_model_degradation("org_test", &current, &baseline, 0.1).is_none());
    }

    #[test]
    fn degradation_above_threshold_is_detected() {
        let current = metrics(&[("accuracy", 0.75), ("f1_score", 0.72)]);
        let baseline = metrics(&[("accuracy", 0.92), ("f1_score", 0.89)]);
        let failure = detect_model_degradation("org_test", &current, &baseline, 0.1)
            .expect("degradation should be detected");
        assert_eq!(failure.failure_type, FailureType::ModelDegradation);
        assert_eq!(failure.affected_metrics.len(), 2);
        assert!(failure.severity_score > 0.3);
    }

    #[test]
    fn latency_spike_needs_double_baseline() {
        assert!(detect_latency_spike("org_test", 2.0, 1.2, 2.0).is_none());
        let failure =
            detect_latency_spike("org_test", 4.5, 1.2, 2.0).expect("spike should be detected");
        assert_eq!(failure.failure_type, FailureType::LatencySpike);
        assert!(failure.deviation_percentage > 100.0);
    }

    #[test]
    fn error_rate_increase_detected() {
        let failure = detect_error_rate_increase("org_test", 0.08, 0.01, 0.05)
            .expect("increase should be detected");
        assert_eq!(failure.failure_type, FailureType::ErrorRateIncrease);
        assert!(detect_error_rate_increase("org_test", 0.02, 0.01, 0.05).is_none());
    }

    #[test]
    fn bias_drift_reports_affected_categories() {
        let current = metrics(&[("gender", 0.4), ("age", 0.12)]);
        let baseline = metrics(&[("gender", 0.1), ("age", 0.1)]);
        let failure = detect_bias_drift("org_test", &current, &baseline, 0.1)
            .expect("drift should be detected");
        assert_eq!(failure.affected_metrics, vec!["gender".to_string()]);
    }

    #[test]
    fn alert_severity_bands_from_failure_score() {
        let failure = FailureDetection::new(
            "org_test",
            FailureType::LatencySpike,
            "threshold",
            "api",
            "api_001",
            0.85,
            0.9,
            "spike",
        );
        let alert = alert_from_failure(&failure, None);
        assert_eq!(alert.severity, Severity::Critical);
        assert!(alert.acknowledgment_required);
        assert_eq!(alert_priority(&alert), 1);
    }

    #[test]
    fn health_score_degrades_with_critical_alerts() {
        let failure = FailureDetection::new(
            "org_test",
            FailureType::ModelDegradation,
            "threshold",
            "model",
            "model_001",
            0.9,
            0.9,
            "bad",
        );
        let alert = alert_from_failure(&failure, None);
        let perf = metrics(&[("error_rate", 0.02), ("response_time", 2.5)]);
        let health = system_health("org_test", &[alert], &[], &[failure], &perf);
        assert!(health.overall_health_score < 1.0);
        assert_eq!(health.active_alerts_count, 1);
        assert_eq!(health.critical_alerts_count, 1);
        assert_eq!(health.recent_failures_count, 1);
    }

    #[test]
    fn notification_rendering_substitutes_variables() {
        let failure = FailureDetection::new(
            "org_test",
            FailureType::ErrorRateIncrease,
            "threshold",
            "api",
            "api_001",
            0.7,
            0.9,
            "errors up",
        );
        let alert = alert_from_failure(&failure, None);
        let template = NotificationTemplate {
            id: "t".to_string(),
            organization_id: "org_test".to_string(),
            template_name: "email".to_string(),
            template_type: "email".to_string(),
            subject_template: "ALERT: {alert_title}".to_string(),
            body_template: "Severity {severity} on {component}".to_string(),
            variables: vec![],
            is_active: true,
            created_at: Utc::now(),
            created_by: "system".to_string(),
            usage_count: 0,
        };
        let rendered = render_notification(&alert, &template);
        assert!(rendered.subject.contains("Error Rate Increase Detected"));
        assert!(rendered.body.contains("HIGH"));
        assert!(rendered.body.contains("api"));
    }

    #[test]
    fn suppression_matches_type_and_component() {
        let failure = FailureDetection::new(
            "org_test",
            FailureType::LatencySpike,
            "threshold",
            "api",
            "api_001",
            0.6,
            0.9,
            "spike",
        );
        let alert = alert_from_failure(&failure, None);
        let recent = vec![NotificationRecord {
            sent_at: Utc::now() - Duration::minutes(10),
            alert_type: "failure".to_string(),
            source_component: "api".to_string(),
        }];
        assert!(should_suppress(&alert, &recent, 60));
        assert!(!should_suppress(&alert, &recent, 5));
    }
}
