//! Regulation sync records: tracked regulations, change alerts, compliance
//! templates, and monitoring configurations.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Impact scale used for regulatory changes. Ordered so monitors can compare
/// against their notification threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::Low => "low",
            ImpactLevel::Medium => "medium",
            ImpactLevel::High => "high",
            ImpactLevel::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Regulation {
    pub id: String,
    pub title: String,
    pub regulation_type: String,
    pub source: String,
    pub version: String,
    pub effective_date: DateTime<Utc>,
    pub content: String,
    pub url: Option<String>,
    pub jurisdiction: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub change_summary: String,
    pub impact_level: ImpactLevel,
    pub affected_articles: Vec<String>,
    pub keywords: Vec<String>,
}

impl Regulation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: impl Into<String>,
        regulation_type: impl Into<String>,
        source: impl Into<String>,
        version: impl Into<String>,
        effective_date: DateTime<Utc>,
        content: impl Into<String>,
        url: Option<String>,
        jurisdiction: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            regulation_type: regulation_type.into(),
            source: source.into(),
            version: version.into(),
            effective_date,
            content: content.into(),
            url,
            jurisdiction: jurisdiction.into(),
            status: "active".to_string(),
            created_at: now,
            updated_at: now,
            change_summary: String::new(),
            impact_level: ImpactLevel::Medium,
            affected_articles: Vec::new(),
            keywords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegAlertStatus {
    Active,
    Acknowledged,
    Resolved,
    Dismissed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatoryAlert {
    pub id: String,
    pub regulation_id: String,
    pub alert_type: String,
    pub title: String,
    pub description: String,
    pub impact_level: ImpactLevel,
    pub affected_systems: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub status: RegAlertStatus,
    pub priority: u8,
    pub deadline: Option<DateTime<Utc>>,
    pub action_required: bool,
    pub notification_sent: bool,
    pub acknowledged_by: Vec<String>,
    pub resolved_by: Option<String>,
    pub resolution_notes: String,
}

impl RegulatoryAlert {
    pub fn new(
        regulation_id: impl Into<String>,
        alert_type: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        impact_level: ImpactLevel,
        affected_systems: Vec<String>,
    ) -> Self {
        let alert_type = alert_type.into();
        let priority = Self::priority_for(impact_level, &alert_type);
        Self {
            id: Uuid::new_v4().to_string(),
            regulation_id: regulation_id.into(),
            alert_type,
            title: title.into(),
            description: description.into(),
            impact_level,
            affected_systems,
            created_at: Utc::now(),
            status: RegAlertStatus::Active,
            priority,
            deadline: None,
            action_required: true,
            notification_sent: false,
            acknowledged_by: Vec::new(),
            resolved_by: None,
            resolution_notes: String::new(),
        }
    }

    /// Priority 1 (highest) to 5. Deadlines raise priority, clarifications
    /// lower it.
    fn priority_for(impact: ImpactLevel, alert_type: &str) -> u8 {
        let base: i8 = match impact {
            ImpactLevel::Critical => 1,
            ImpactLevel::High => 2,
            ImpactLevel::Medium => 3,
            ImpactLevel::Low => 4,
        };
        let modifier: i8 = match alert_type {
            "deadline" => -1,
            "clarification" => 1,
            _ => 0,
        };
        (base + modifier).max(1) as u8
    }

    pub fn acknowledge(&mut self, user_id: &str, notes: &str) {
        if !self.acknowledged_by.iter().any(|u| u == user_id) {
            self.acknowledged_by.push(user_id.to_string());
        }
        self.status = RegAlertStatus::Acknowledged;
        if !notes.is_empty() {
            self.resolution_notes
                .push_str(&format!("\nAcknowledged by {user_id}: {notes}"));
        }
    }

    pub fn resolve(&mut self, user_id: &str, notes: &str) {
        self.status = RegAlertStatus::Resolved;
        self.resolved_by = Some(user_id.to_string());
        self.resolution_notes
            .push_str(&format!("\nResolved by {user_id}: {notes}"));
        self.action_required = false;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatoryTemplate {
    pub id: String,
    pub name: String,
    pub regulation_type: String,
    pub template_type: String,
    pub content: serde_json::Value,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: String,
    pub author: String,
    pub tags: Vec<String>,
    pub usage_count: u64,
    pub is_active: bool,
    pub required_fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub completion_percentage: f64,
}

impl RegulatoryTemplate {
    pub fn new(
        name: impl Into<String>,
        regulation_type: impl Into<String>,
        template_type: impl Into<String>,
        content: serde_json::Value,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            regulation_type: regulation_type.into(),
            template_type: template_type.into(),
            content,
            description: description.into(),
            created_at: now,
            updated_at: now,
            version: "1.0".to_string(),
            author: "ZenThera AI Compliance Suite".to_string(),
            tags: Vec::new(),
            usage_count: 0,
            is_active: true,
            required_fields: Vec::new(),
        }
    }

    /// Check user content against the template's required fields and compute
    /// a completion percentage over all declared fields.
    pub fn validate_content(
        &self,
        user_content: &serde_json::Map<String, serde_json::Value>,
    ) -> ValidationReport {
        let filled = |value: &serde_json::Value| match value {
            serde_json::Value::Null => false,
            serde_json::Value::String(s) => !s.is_empty(),
            serde_json::Value::Bool(b) => *b,
            _ => true,
        };

        let missing: Vec<&String> = self
            .required_fields
            .iter()
            .filter(|f| !user_content.get(f.as_str()).map(filled).unwrap_or(false))
            .collect();

        let mut errors = Vec::new();
        if !missing.is_empty() {
            let joined = missing
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(format!("Missing required fields: {joined}"));
        }

        let total_fields = self.declared_field_count();
        let completed = user_content.values().filter(|v| filled(v)).count();
        let completion_percentage = if total_fields > 0 {
            (completed as f64 / total_fields as f64) * 100.0
        } else {
            0.0
        };

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
            warnings: Vec::new(),
            completion_percentage,
        }
    }

    fn declared_field_count(&self) -> usize {
        self.content
            .get("sections")
            .and_then(|s| s.as_array())
            .map(|sections| {
                sections
                    .iter()
                    .filter_map(|sec| sec.get("fields").and_then(|f| f.as_array()))
                    .map(|fields| fields.len())
                    .sum()
            })
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulationMonitor {
    pub id: String,
    pub name: String,
    pub regulation_types: Vec<String>,
    pub sources: Vec<String>,
    pub keywords: Vec<String>,
    pub organization_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
    pub check_frequency: String,
    pub last_check: Option<DateTime<Utc>>,
    pub next_check: Option<DateTime<Utc>>,
    pub notification_channels: Vec<String>,
    pub notification_threshold: ImpactLevel,
    pub recipients: Vec<String>,
    pub total_checks: u64,
    pub alerts_generated: u64,
    pub last_alert_date: Option<DateTime<Utc>>,
}

impl RegulationMonitor {
    pub fn new(
        name: impl Into<String>,
        regulation_types: Vec<String>,
        sources: Vec<String>,
        keywords: Vec<String>,
        organization_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            regulation_types,
            sources,
            keywords,
            organization_id: organization_id.into(),
            created_at: now,
            updated_at: now,
            is_active: true,
            check_frequency: "daily".to_string(),
            last_check: None,
            next_check: None,
            notification_channels: vec!["email".to_string()],
            notification_threshold: ImpactLevel::Medium,
            recipients: Vec::new(),
            total_checks: 0,
            alerts_generated: 0,
            last_alert_date: None,
        }
    }

    pub fn should_generate_alert(&self, impact: ImpactLevel) -> bool {
        impact >= self.notification_threshold
    }

    pub fn record_check(&mut self, alerts_count: u64) {
        self.total_checks += 1;
        self.last_check = Some(Utc::now());
        if alerts_count > 0 {
            self.alerts_generated += alerts_count;
            self.last_alert_date = Some(Utc::now());
        }
    }
}

/// Seed regulations shipped with the demo.
pub fn sample_regulations() -> Vec<Regulation> {
    let mut ai_act = Regulation::new(
        "Regulation (EU) 2024/1689 - Artificial Intelligence Act",
        "ai_act",
        "eur_lex",
        "2024.1",
        Utc.with_ymd_and_hms(2026, 8, 2, 0, 0, 0).unwrap(),
        "The AI Act establishes harmonized rules for artificial intelligence...",
        Some("https://eur-lex.europa.eu/eli/reg/2024/1689/oj".to_string()),
        "EU",
    );
    ai_act.keywords = vec![
        "artificial intelligence".to_string(),
        "high-risk AI".to_string(),
        "prohibited practices".to_string(),
        "transparency".to_string(),
    ];
    ai_act.impact_level = ImpactLevel::Critical;

    let mut gdpr = Regulation::new(
        "General Data Protection Regulation (GDPR)",
        "gdpr",
        "eur_lex",
        "2016.679",
        Utc.with_ymd_and_hms(2018, 5, 25, 0, 0, 0).unwrap(),
        "This Regulation lays down rules relating to the protection of natural persons...",
        Some("https://eur-lex.europa.eu/eli/reg/2016/679/oj".to_string()),
        "EU",
    );
    gdpr.keywords = vec![
        "personal data".to_string(),
        "data protection".to_string(),
        "consent".to_string(),
        "privacy".to_string(),
    ];
    gdpr.impact_level = ImpactLevel::High;

    vec![ai_act, gdpr]
}

/// Seed templates shipped with the demo.
pub fn sample_templates() -> Vec<RegulatoryTemplate> {
    let mut template = RegulatoryTemplate::new(
        "AI Act High-Risk System Assessment",
        "ai_act",
        "assessment",
        serde_json::json!({
            "sections": [
                {
                    "title": "System Classification",
                    "fields": [
                        {"name": "system_name", "type": "text", "required": true},
                        {"name": "intended_purpose", "type": "textarea", "required": true},
                        {"name": "risk_category", "type": "select",
                         "options": ["High-risk", "Limited risk", "Minimal risk"]},
                        {"name": "prohibited_practices", "type": "checkbox", "required": true}
                    ]
                },
                {
                    "title": "Technical Documentation",
                    "fields": [
                        {"name": "training_data", "type": "textarea", "required": true},
                        {"name": "model_architecture", "type": "textarea", "required": true},
                        {"name": "performance_metrics", "type": "textarea", "required": true}
                    ]
                },
                {
                    "title": "Risk Management",
                    "fields": [
                        {"name": "risk_assessment", "type": "textarea", "required": true},
                        {"name": "mitigation_measures", "type": "textarea", "required": true},
                        {"name": "monitoring_plan", "type": "textarea", "required": true}
                    ]
                }
            ]
        }),
        "Comprehensive assessment template for AI systems under the EU AI Act",
    );
    template.required_fields = vec![
        "system_name".to_string(),
        "intended_purpose".to_string(),
        "prohibited_practices".to_string(),
        "training_data".to_string(),
        "risk_assessment".to_string(),
    ];
    template.tags = vec![
        "ai_act".to_string(),
        "risk_assessment".to_string(),
        "high_risk".to_string(),
        "compliance".to_string(),
    ];

    vec![template]
}

#[derive(Default)]
pub struct RegulationStore {
    pub regulations: RwLock<HashMap<String, Regulation>>,
    pub alerts: RwLock<HashMap<String, RegulatoryAlert>>,
    pub templates: RwLock<HashMap<String, RegulatoryTemplate>>,
    pub monitors: RwLock<HashMap<String, RegulationMonitor>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_alerts_outrank_equal_impact() {
        let deadline = RegulatoryAlert::new("reg", "deadline", "t", "d", ImpactLevel::Medium, vec![]);
        let amendment =
            RegulatoryAlert::new("reg", "amendment", "t", "d", ImpactLevel::Medium, vec![]);
        assert!(deadline.priority < amendment.priority);
    }

    #[test]
    fn critical_deadline_priority_floors_at_one() {
        let alert = RegulatoryAlert::new("reg", "deadline", "t", "d", ImpactLevel::Critical, vec![]);
        assert_eq!(alert.priority, 1);
    }

    #[test]
    fn acknowledge_and_resolve_mutate_in_place() {
        let mut alert =
            RegulatoryAlert::new("reg", "amendment", "t", "d", ImpactLevel::High, vec![]);
        alert.acknowledge("user_1", "looking into it");
        assert_eq!(alert.acknowledged_by, vec!["user_1".to_string()]);
        alert.acknowledge("user_1", "");
        assert_eq!(alert.acknowledged_by.len(), 1);

        alert.resolve("user_2", "handled");
        assert_eq!(alert.status, RegAlertStatus::Resolved);
        assert!(!alert.action_required);
        assert_eq!(alert.resolved_by.as_deref(), Some("user_2"));
    }

    #[test]
    fn monitor_threshold_gates_alerts() {
        let mut monitor = RegulationMonitor::new("m", vec![], vec![], vec![], "org_test");
        monitor.notification_threshold = ImpactLevel::High;
        assert!(monitor.should_generate_alert(ImpactLevel::Critical));
        assert!(monitor.should_generate_alert(ImpactLevel::High));
        assert!(!monitor.should_generate_alert(ImpactLevel::Medium));
    }

    #[test]
    fn template_validation_reports_missing_fields() {
        let template = &sample_templates()[0];
        let mut content = serde_json::Map::new();
        content.insert(
            "system_name".to_string(),
            serde_json::Value::String("scoring model".to_string()),
        );
        let report = template.validate_content(&content);
        assert!(!report.is_valid);
        assert!(report.errors[0].contains("intended_purpose"));
        assert!(report.completion_percentage > 0.0);
    }

    #[test]
    fn template_validation_accepts_complete_content() {
        let template = &sample_templates()[0];
        let mut content = serde_json::Map::new();
        for field in &template.required_fields {
            content.insert(field.clone(), serde_json::Value::String("filled".to_string()));
        }
        let report = template.validate_content(&content);
        assert!(report.is_valid);
    }
}
