//! LLM observability records: sessions, interactions, detected risks,
//! quality assessments, and model comparisons.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::severity::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Gpt,
    Claude,
    Llama,
    Gemini,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskType {
    Hallucination,
    Bias,
    Toxicity,
    PrivacyLeak,
    Misinformation,
    PromptInjection,
    Jailbreak,
    Copyright,
}

impl RiskType {
    pub const ALL: [RiskType; 8] = [
        RiskType::Hallucination,
        RiskType::Bias,
        RiskType::Toxicity,
        RiskType::PrivacyLeak,
        RiskType::Misinformation,
        RiskType::PromptInjection,
        RiskType::Jailbreak,
        RiskType::Copyright,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskType::Hallucination => "hallucination",
            RiskType::Bias => "bias",
            RiskType::Toxicity => "toxicity",
            RiskType::PrivacyLeak => "privacy_leak",
            RiskType::Misinformation => "misinformation",
            RiskType::PromptInjection => "prompt_injection",
            RiskType::Jailbreak => "jailbreak",
            RiskType::Copyright => "copyright",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityMetric {
    Relevance,
    Coherence,
    Factuality,
    Completeness,
    Clarity,
    Creativity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSession {
    pub id: String,
    pub organization_id: String,
    pub model_name: String,
    pub model_type: ModelKind,
    pub model_version: String,
    pub user_id: Option<String>,
    pub session_start: DateTime<Utc>,
    pub session_end: Option<DateTime<Utc>>,
    pub total_interactions: u64,
    pub total_tokens_input: u64,
    pub total_tokens_output: u64,
    pub total_cost: f64,
    pub average_latency: f64,
    #[serde(default)]
    pub session_metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmInteraction {
    pub id: String,
    pub session_id: String,
    pub organization_id: String,
    pub model_name: String,
    pub prompt: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub latency_ms: f64,
    pub tokens_input: u64,
    pub tokens_output: u64,
    pub cost: f64,
    pub temperature: f64,
    pub max_tokens: u32,
    pub user_id: Option<String>,
    #[serde(default)]
    pub interaction_metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskDetection {
    pub id: String,
    pub interaction_id: String,
    pub session_id: String,
    pub organization_id: String,
    pub risk_type: RiskType,
    pub risk_score: f64,
    pub confidence: f64,
    pub description: String,
    pub evidence: serde_json::Value,
    pub detected_at: DateTime<Utc>,
    pub severity: Severity,
    pub is_false_positive: bool,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub mitigation_applied: bool,
    pub mitigation_details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub id: String,
    pub interaction_id: String,
    pub session_id: String,
    pub organization_id: String,
    pub overall_score: f64,
    pub metric_scores: HashMap<QualityMetric, f64>,
    pub assessment_method: String,
    pub assessor_id: Option<String>,
    pub assessment_timestamp: DateTime<Utc>,
    pub feedback_provided: bool,
    pub improvement_suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelComparison {
    pub id: String,
    pub organization_id: String,
    pub comparison_name: String,
    pub models_compared: Vec<String>,
    pub comparison_period_start: DateTime<Utc>,
    pub comparison_period_end: DateTime<Utc>,
    pub comparison_metrics: serde_json::Value,
    pub winner_model: String,
    pub winner_criteria: Vec<String>,
    pub detailed_analysis: serde_json::Value,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmAlert {
    pub id: String,
    pub organization_id: String,
    pub alert_type: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub model_name: String,
    pub trigger_value: f64,
    pub threshold_value: f64,
    pub related_entity_id: String,
    pub related_entity_type: String,
    pub triggered_at: DateTime<Utc>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub acknowledged_by: Option<String>,
    pub resolved_by: Option<String>,
    pub resolution_notes: Option<String>,
}

/// Deterministic stand-in quality score for interactions that never went
/// through a real assessment. Derived from the interaction id so listings
/// stay stable between calls.
pub fn simulated_quality_score(interaction_id: &str) -> f64 {
    let sum: u64 = interaction_id.bytes().map(u64::from).sum();
    0.75 + (sum % 25) as f64 / 100.0
}

/// Nearest-rank percentile over unsorted samples. Returns 0.0 for an empty
/// slice.
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = (pct / 100.0 * sorted.len() as f64).ceil().max(1.0) as usize;
    sorted[(rank - 1).min(sorted.len() - 1)]
}

#[derive(Default)]
pub struct ObservabilityStore {
    pub sessions: RwLock<HashMap<String, LlmSession>>,
    pub interactions: RwLock<HashMap<String, LlmInteraction>>,
    pub risks: RwLock<HashMap<String, RiskDetection>>,
    pub assessments: RwLock<HashMap<String, QualityAssessment>>,
    pub comparisons: RwLock<HashMap<String, ModelComparison>>,
    pub alerts: RwLock<HashMap<String, LlmAlert>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_quality_is_stable_and_bounded() {
        let a = simulated_quality_score("interaction_001");
        let b = simulated_quality_score("interaction_001");
        assert_eq!(a, b);
        assert!((0.75..1.0).contains(&a));
    }

    #[test]
    fn percentile_handles_edges() {
        assert_eq!(percentile(&[], 95.0), 0.0);
        assert_eq!(percentile(&[42.0], 99.0), 42.0);
        let values: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        assert_eq!(percentile(&values, 95.0), 95.0);
        assert_eq!(percentile(&values, 50.0), 50.0);
    }

    #[test]
    fn risk_type_serializes_snake_case() {
        let json = serde_json::to_string(&RiskType::PrivacyLeak).unwrap();
        assert_eq!(json, "\"privacy_leak\"");
    }
}
