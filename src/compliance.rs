//! Compliance grid records and scoring.
//!
//! A compliance score is the mean of four 0-100 sub-scores (bias,
//! transparency, logging, energy). Scores below fixed thresholds generate
//! alerts automatically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::severity::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceScore {
    pub id: String,
    pub organization_id: String,
    pub system_name: String,
    pub bias_score: f64,
    pub transparency_score: f64,
    pub logs_score: f64,
    pub energy_score: f64,
    pub overall_score: f64,
    pub risk_level: RiskLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ComplianceScore {
    pub fn new(
        organization_id: impl Into<String>,
        system_name: impl Into<String>,
        bias_score: f64,
        transparency_score: f64,
        logs_score: f64,
        energy_score: f64,
    ) -> Self {
        let now = Utc::now();
        let mut score = Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.into(),
            system_name: system_name.into(),
            bias_score,
            transparency_score,
            logs_score,
            energy_score,
            overall_score: 0.0,
            risk_level: RiskLevel::Medium,
            created_at: now,
            updated_at: now,
        };
        score.recalculate();
        score
    }

    /// Recompute the overall score and risk level from the sub-scores.
    pub fn recalculate(&mut self) {
        let parts = [
            self.bias_score,
            self.transparency_score,
            self.logs_score,
            self.energy_score,
        ];
        self.overall_score = parts.iter().sum::<f64>() / parts.len() as f64;

        self.risk_level = if self.overall_score >= 80.0 {
            RiskLevel::Low
        } else if self.overall_score >= 60.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        };
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceAlertStatus {
    Active,
    Resolved,
    Ignored,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceAlert {
    pub id: String,
    pub organization_id: String,
    pub system_name: String,
    pub alert_type: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub status: ComplianceAlertStatus,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ComplianceAlert {
    pub fn new(
        organization_id: impl Into<String>,
        system_name: impl Into<String>,
        alert_type: impl Into<String>,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.into(),
            system_name: system_name.into(),
            alert_type: alert_type.into(),
            severity,
            title: title.into(),
            description: description.into(),
            status: ComplianceAlertStatus::Active,
            resolved_at: None,
            resolved_by: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Draft,
    Final,
    Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub id: String,
    pub organization_id: String,
    pub report_type: String,
    pub title: String,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub summary: String,
    pub findings: String,
    pub recommendations: String,
    pub data: serde_json::Value,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub generated_by: String,
}

/// Alerts triggered automatically when a score falls below fixed thresholds.
pub fn threshold_alerts(score: &ComplianceScore) -> Vec<ComplianceAlert> {
    let mut alerts = Vec::new();

    if score.overall_score < 60.0 {
        let severity = if score.overall_score < 40.0 {
            Severity::Critical
        } else {
            Severity::High
        };
        alerts.push(ComplianceAlert::new(
            &score.organization_id,
            &score.system_name,
            "low_compliance_score",
            severity,
            format!("Low Compliance Score: {:.1}%", score.overall_score),
            format!(
                "System {} has a compliance score of {:.1}%, which is below the acceptable threshold.",
                score.system_name, score.overall_score
            ),
        ));
    }

    let metrics = [
        ("bias score", score.bias_score, "bias_violation", "High Bias Risk"),
        (
            "transparency score",
            score.transparency_score,
            "transparency_issue",
            "Low Transparency",
        ),
        ("logs score", score.logs_score, "logging_deficiency", "Inadequate Logging"),
        (
            "energy score",
            score.energy_score,
            "energy_inefficiency",
            "High Energy Consumption",
        ),
    ];

    for (metric_name, value, alert_type, title_prefix) in metrics {
        if value < 50.0 {
            let severity = if value < 30.0 {
                Severity::High
            } else {
                Severity::Medium
            };
            alerts.push(ComplianceAlert::new(
                &score.organization_id,
                &score.system_name,
                alert_type,
                severity,
                format!("{title_prefix}: {value:.1}%"),
                format!("{metric_name} is {value:.1}%, indicating potential compliance issues."),
            ));
        }
    }

    alerts
}

pub struct ReportContent {
    pub summary: String,
    pub findings: String,
    pub recommendations: String,
    pub data: serde_json::Value,
}

/// Build report text and structured data from the scores and alerts recorded
/// inside the report period.
pub fn build_report_content(
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
    scores: &[ComplianceScore],
    alerts: &[ComplianceAlert],
) -> ReportContent {
    let (avg, min, max) = if scores.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let avg = scores.iter().map(|s| s.overall_score).sum::<f64>() / scores.len() as f64;
        let min = scores
            .iter()
            .map(|s| s.overall_score)
            .fold(f64::INFINITY, f64::min);
        let max = scores
            .iter()
            .map(|s| s.overall_score)
            .fold(f64::NEG_INFINITY, f64::max);
        (avg, min, max)
    };

    let count_by = |sev: Severity| alerts.iter().filter(|a| a.severity == sev).count();
    let alert_counts = serde_json::json!({
        "critical": count_by(Severity::Critical),
        "high": count_by(Severity::High),
        "medium": count_by(Severity::Medium),
        "low": count_by(Severity::Low),
    });

    let systems: std::collections::HashSet<&str> =
        scores.iter().map(|s| s.system_name.as_str()).collect();

    let performance = if avg >= 80.0 {
        "Good"
    } else if avg >= 60.0 {
        "Needs Improvement"
    } else {
        "Critical"
    };

    let summary = format!(
        "Executive Summary:\n\
         During the period from {} to {}, the organization maintained an average compliance score of {:.1}%.\n\n\
         Key Metrics:\n\
         - Average Compliance Score: {:.1}%\n\
         - Minimum Score: {:.1}%\n\
         - Maximum Score: {:.1}%\n\
         - Total Alerts Generated: {}",
        period_start.format("%Y-%m-%d"),
        period_end.format("%Y-%m-%d"),
        avg,
        avg,
        min,
        max,
        alerts.len()
    );

    let findings = format!(
        "Key Findings:\n\
         1. Compliance Performance: {}\n\
         2. Alert Distribution: {} critical, {} high, {} medium, {} low\n\
         3. Systems Monitored: {}",
        performance,
        count_by(Severity::Critical),
        count_by(Severity::High),
        count_by(Severity::Medium),
        count_by(Severity::Low),
        systems.len()
    );

    let recommendations = format!(
        "Recommendations:\n\
         1. {}\n\
         2. {}\n\
         3. Regular monitoring and assessment of AI systems",
        if avg >= 80.0 {
            "Maintain current practices"
        } else {
            "Improve compliance processes"
        },
        if avg >= 80.0 {
            "Monitor for any degradation"
        } else {
            "Address critical alerts immediately"
        }
    );

    let data = serde_json::json!({
        "period": {
            "start": period_start,
            "end": period_end,
        },
        "statistics": {
            "average_score": avg,
            "minimum_score": min,
            "maximum_score": max,
            "total_assessments": scores.len(),
            "total_alerts": alerts.len(),
        },
        "alert_breakdown": alert_counts,
        "scores": scores,
        "alerts": alerts,
    });

    ReportContent {
        summary,
        findings,
        recommendations,
        data,
    }
}

#[derive(Default)]
pub struct ComplianceStore {
    pub scores: RwLock<HashMap<String, ComplianceScore>>,
    pub alerts: RwLock<HashMap<String, ComplianceAlert>>,
    pub reports: RwLock<HashMap<String, ComplianceReport>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_score_is_mean_of_parts() {
        let score = ComplianceScore::new("org_test", "chatbot", 80.0, 90.0, 70.0, 60.0);
        assert!((score.overall_score - 75.0).abs() < f64::EPSILON);
        assert_eq!(score.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn risk_level_bands() {
        let high = ComplianceScore::new("org_test", "a", 50.0, 50.0, 50.0, 50.0);
        assert_eq!(high.risk_level, RiskLevel::High);
        let low = ComplianceScore::new("org_test", "b", 85.0, 85.0, 85.0, 85.0);
        assert_eq!(low.risk_level, RiskLevel::Low);
    }

    #[test]
    fn low_scores_generate_threshold_alerts() {
        let score = ComplianceScore::new("org_test", "risky", 25.0, 45.0, 90.0, 70.0);
        let alerts = threshold_alerts(&score);
        // one low-overall alert plus bias and transparency metric alerts
        assert_eq!(alerts.len(), 3);
        assert!(alerts
            .iter()
            .any(|a| a.alert_type == "low_compliance_score"));
        let bias = alerts
            .iter()
            .find(|a| a.alert_type == "bias_violation")
            .unwrap();
        assert_eq!(bias.severity, Severity::High);
        let transparency = alerts
            .iter()
            .find(|a| a.alert_type == "transparency_issue")
            .unwrap();
        assert_eq!(transparency.severity, Severity::Medium);
    }

    #[test]
    fn healthy_score_generates_no_alerts() {
        let score = ComplianceScore::new("org_test", "clean", 90.0, 85.0, 88.0, 92.0);
        assert!(threshold_alerts(&score).is_empty());
    }

    #[test]
    fn report_content_summarizes_period() {
        let now = Utc::now();
        let scores = vec![
            ComplianceScore::new("org_test", "a", 80.0, 80.0, 80.0, 80.0),
            ComplianceScore::new("org_test", "b", 60.0, 60.0, 60.0, 60.0),
        ];
        let content = build_report_content(now - chrono::Duration::days(30), now, &scores, &[]);
        assert!(content.summary.contains("70.0%"));
        assert!(content.findings.contains("Systems Monitored: 2"));
    }
}
