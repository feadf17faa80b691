//! Failure detection records: detected failures, alerts, incidents,
//! monitoring rules, system health snapshots, and notification templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::severity::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureType {
    ModelDegradation,
    PerformanceAnomaly,
    QualityDrop,
    LatencySpike,
    ErrorRateIncrease,
    BiasDrift,
    SafetyViolation,
    ComplianceBreach,
    ResourceExhaustion,
    IntegrationFailure,
    DataPipelineFailure,
    SecurityIncident,
}

impl FailureType {
    pub const ALL: [FailureType; 12] = [
        FailureType::ModelDegradation,
        FailureType::PerformanceAnomaly,
        FailureType::QualityDrop,
        FailureType::LatencySpike,
        FailureType::ErrorRateIncrease,
        FailureType::BiasDrift,
        FailureType::SafetyViolation,
        FailureType::ComplianceBreach,
        FailureType::ResourceExhaustion,
        FailureType::IntegrationFailure,
        FailureType::DataPipelineFailure,
        FailureType::SecurityIncident,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureType::ModelDegradation => "model_degradation",
            FailureType::PerformanceAnomaly => "performance_anomaly",
            FailureType::QualityDrop => "quality_drop",
            FailureType::LatencySpike => "latency_spike",
            FailureType::ErrorRateIncrease => "error_rate_increase",
            FailureType::BiasDrift => "bias_drift",
            FailureType::SafetyViolation => "safety_violation",
            FailureType::ComplianceBreach => "compliance_breach",
            FailureType::ResourceExhaustion => "resource_exhaustion",
            FailureType::IntegrationFailure => "integration_failure",
            FailureType::DataPipelineFailure => "data_pipeline_failure",
            FailureType::SecurityIncident => "security_incident",
        }
    }

    /// "model_degradation" -> "Model Degradation"
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Open,
    Acknowledged,
    Investigating,
    Resolved,
    Closed,
    Suppressed,
}

impl AlertStatus {
    pub const ALL: [AlertStatus; 6] = [
        AlertStatus::Open,
        AlertStatus::Acknowledged,
        AlertStatus::Investigating,
        AlertStatus::Resolved,
        AlertStatus::Closed,
        AlertStatus::Suppressed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Open => "open",
            AlertStatus::Acknowledged => "acknowledged",
            AlertStatus::Investigating => "investigating",
            AlertStatus::Resolved => "resolved",
            AlertStatus::Closed => "closed",
            AlertStatus::Suppressed => "suppressed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Detected,
    Triaging,
    Investigating,
    Mitigating,
    Resolved,
    PostMortem,
    Closed,
}

impl IncidentStatus {
    pub const ALL: [IncidentStatus; 7] = [
        IncidentStatus::Detected,
        IncidentStatus::Triaging,
        IncidentStatus::Investigating,
        IncidentStatus::Mitigating,
        IncidentStatus::Resolved,
        IncidentStatus::PostMortem,
        IncidentStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Detected => "detected",
            IncidentStatus::Triaging => "triaging",
            IncidentStatus::Investigating => "investigating",
            IncidentStatus::Mitigating => "mitigating",
            IncidentStatus::Resolved => "resolved",
            IncidentStatus::PostMortem => "post_mortem",
            IncidentStatus::Closed => "closed",
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, IncidentStatus::Resolved | IncidentStatus::Closed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitoringMetric {
    ResponseTime,
    ErrorRate,
    Throughput,
    QualityScore,
    BiasScore,
    SafetyScore,
    ComplianceScore,
    ResourceUsage,
    UserSatisfaction,
    ModelConfidence,
}

impl MonitoringMetric {
    pub const ALL: [MonitoringMetric; 10] = [
        MonitoringMetric::ResponseTime,
        MonitoringMetric::ErrorRate,
        MonitoringMetric::Throughput,
        MonitoringMetric::QualityScore,
        MonitoringMetric::BiasScore,
        MonitoringMetric::SafetyScore,
        MonitoringMetric::ComplianceScore,
        MonitoringMetric::ResourceUsage,
        MonitoringMetric::UserSatisfaction,
        MonitoringMetric::ModelConfidence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MonitoringMetric::ResponseTime => "response_time",
            MonitoringMetric::ErrorRate => "error_rate",
            MonitoringMetric::Throughput => "throughput",
            MonitoringMetric::QualityScore => "quality_score",
            MonitoringMetric::BiasScore => "bias_score",
            MonitoringMetric::SafetyScore => "safety_score",
            MonitoringMetric::ComplianceScore => "compliance_score",
            MonitoringMetric::ResourceUsage => "resource_usage",
            MonitoringMetric::UserSatisfaction => "user_satisfaction",
            MonitoringMetric::ModelConfidence => "model_confidence",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Slack,
    Teams,
    Webhook,
    Sms,
    Pagerduty,
    Dashboard,
}

/// Detected failure or anomaly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureDetection {
    pub id: String,
    pub organization_id: String,
    pub failure_type: FailureType,
    pub detected_at: DateTime<Utc>,
    pub detection_method: String,
    pub affected_component: String,
    pub component_id: String,
    pub severity_score: f64,
    pub confidence_level: f64,
    pub failure_description: String,
    pub root_cause_analysis: String,
    pub impact_assessment: String,
    pub affected_metrics: Vec<String>,
    pub baseline_values: HashMap<String, f64>,
    pub current_values: HashMap<String, f64>,
    pub deviation_percentage: f64,
    pub detection_rules: Vec<String>,
    pub related_failures: Vec<String>,
    pub mitigation_suggestions: Vec<String>,
    pub is_false_positive: bool,
    pub false_positive_reason: String,
}

/// Entry appended to an alert's notification history on acknowledge/resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertNote {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub actor: String,
    pub notes: String,
}

/// Rule controlling when an open alert escalates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationRule {
    pub severity: Severity,
    pub time_threshold_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub organization_id: String,
    pub alert_type: String,
    pub severity: Severity,
    pub status: AlertStatus,
    pub title: String,
    pub description: String,
    pub source_failure_id: Option<String>,
    pub source_component: String,
    pub source_metric: Option<String>,
    pub triggered_at: DateTime<Utc>,
    pub triggered_by: String,
    pub acknowledgment_required: bool,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub acknowledged_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
    pub resolution_notes: String,
    pub escalation_level: u32,
    pub notification_channels: Vec<NotificationChannel>,
    pub notification_history: Vec<AlertNote>,
    pub tags: Vec<String>,
}

impl Alert {
    pub fn is_active(&self) -> bool {
        matches!(self.status, AlertStatus::Open | AlertStatus::Acknowledged)
    }
}

/// Timeline entry on an incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub timestamp: DateTime<Utc>,
    pub event: String,
    pub description: String,
    pub actor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub organization_id: String,
    pub incident_title: String,
    pub incident_description: String,
    pub status: IncidentStatus,
    pub severity: Severity,
    pub priority: u8,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub incident_commander: Option<String>,
    pub affected_services: Vec<String>,
    pub affected_users: u64,
    pub business_impact: String,
    pub related_alerts: Vec<String>,
    pub related_failures: Vec<String>,
    pub timeline: Vec<TimelineEntry>,
    pub resolution_steps: Vec<String>,
    pub root_cause: String,
    pub lessons_learned: String,
    pub estimated_resolution: Option<DateTime<Utc>>,
    pub actual_resolution: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringRule {
    pub id: String,
    pub organization_id: String,
    pub rule_name: String,
    pub rule_description: String,
    pub is_active: bool,
    pub metric_name: MonitoringMetric,
    pub component_type: String,
    pub component_filter: serde_json::Value,
    pub threshold_type: String,
    pub threshold_value: Option<f64>,
    pub threshold_operator: String,
    /// Hours of history used for the baseline
    pub baseline_period: u32,
    /// Minutes per evaluation window
    pub evaluation_window: u32,
    pub sensitivity: f64,
    pub min_data_points: u32,
    pub failure_type: FailureType,
    pub alert_severity: Severity,
    pub notification_channels: Vec<NotificationChannel>,
    /// Minutes to suppress duplicate alerts
    pub suppression_duration: u32,
    pub escalation_rules: Vec<EscalationRule>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub last_triggered: Option<DateTime<Utc>>,
    pub trigger_count: u64,
    pub false_positive_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemHealth {
    pub id: String,
    pub organization_id: String,
    pub timestamp: DateTime<Utc>,
    pub overall_health_score: f64,
    pub component_health: HashMap<String, f64>,
    pub active_alerts_count: usize,
    pub critical_alerts_count: usize,
    pub open_incidents_count: usize,
    pub recent_failures_count: usize,
    pub performance_metrics: HashMap<String, f64>,
    pub availability_percentage: f64,
    pub error_rate_percentage: f64,
    pub mean_response_time: f64,
    pub p95_response_time: f64,
    pub throughput_per_minute: f64,
    pub resource_utilization: HashMap<String, f64>,
    pub trend_analysis: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationTemplate {
    pub id: String,
    pub organization_id: String,
    pub template_name: String,
    pub template_type: String,
    pub subject_template: String,
    pub body_template: String,
    pub variables: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub usage_count: u64,
}

/// Convenience constructor used by handlers and seeding; everything else is
/// filled with the defaults the original used.
impl FailureDetection {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        organization_id: impl Into<String>,
        failure_type: FailureType,
        detection_method: impl Into<String>,
        affected_component: impl Into<String>,
        component_id: impl Into<String>,
        severity_score: f64,
        confidence_level: f64,
        failure_description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.into(),
            failure_type,
            detected_at: Utc::now(),
            detection_method: detection_method.into(),
            affected_component: affected_component.into(),
            component_id: component_id.into(),
            severity_score,
            confidence_level,
            failure_description: failure_description.into(),
            root_cause_analysis: String::new(),
            impact_assessment: String::new(),
            affected_metrics: Vec::new(),
            baseline_values: HashMap::new(),
            current_values: HashMap::new(),
            deviation_percentage: 0.0,
            detection_rules: Vec::new(),
            related_failures: Vec::new(),
            mitigation_suggestions: Vec::new(),
            is_false_positive: false,
            false_positive_reason: String::new(),
        }
    }
}

#[derive(Default)]
pub struct FailureStore {
    pub failures: RwLock<HashMap<String, FailureDetection>>,
    pub alerts: RwLock<HashMap<String, Alert>>,
    pub incidents: RwLock<HashMap<String, Incident>>,
    pub rules: RwLock<HashMap<String, MonitoringRule>>,
    pub health: RwLock<HashMap<String, SystemHealth>>,
    pub templates: RwLock<HashMap<String, NotificationTemplate>>,
}
