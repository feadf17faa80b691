//! Narrative explainability records: session replays, generated
//! explanations, ethical alignment assessments, and audit trails.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::alignment_engine::AlignmentCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationType {
    DecisionRationale,
    EthicalAnalysis,
    RiskExplanation,
    QualityBreakdown,
    ComplianceAssessment,
    BiasAnalysis,
    SafetyEvaluation,
}

impl ExplanationType {
    pub const ALL: [ExplanationType; 7] = [
        ExplanationType::DecisionRationale,
        ExplanationType::EthicalAnalysis,
        ExplanationType::RiskExplanation,
        ExplanationType::QualityBreakdown,
        ExplanationType::ComplianceAssessment,
        ExplanationType::BiasAnalysis,
        ExplanationType::SafetyEvaluation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExplanationType::DecisionRationale => "decision_rationale",
            ExplanationType::EthicalAnalysis => "ethical_analysis",
            ExplanationType::RiskExplanation => "risk_explanation",
            ExplanationType::QualityBreakdown => "quality_breakdown",
            ExplanationType::ComplianceAssessment => "compliance_assessment",
            ExplanationType::BiasAnalysis => "bias_analysis",
            ExplanationType::SafetyEvaluation => "safety_evaluation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeStyle {
    Technical,
    Executive,
    Regulatory,
    UserFriendly,
    Audit,
}

impl NarrativeStyle {
    pub const ALL: [NarrativeStyle; 5] = [
        NarrativeStyle::Technical,
        NarrativeStyle::Executive,
        NarrativeStyle::Regulatory,
        NarrativeStyle::UserFriendly,
        NarrativeStyle::Audit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NarrativeStyle::Technical => "technical",
            NarrativeStyle::Executive => "executive",
            NarrativeStyle::Regulatory => "regulatory",
            NarrativeStyle::UserFriendly => "user_friendly",
            NarrativeStyle::Audit => "audit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayEventType {
    UserInput,
    ModelResponse,
    RiskDetection,
    QualityAssessment,
    SystemIntervention,
    HumanReview,
    ComplianceCheck,
    EthicalEvaluation,
}

impl ReplayEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplayEventType::UserInput => "user_input",
            ReplayEventType::ModelResponse => "model_response",
            ReplayEventType::RiskDetection => "risk_detection",
            ReplayEventType::QualityAssessment => "quality_assessment",
            ReplayEventType::SystemIntervention => "system_intervention",
            ReplayEventType::HumanReview => "human_review",
            ReplayEventType::ComplianceCheck => "compliance_check",
            ReplayEventType::EthicalEvaluation => "ethical_evaluation",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReplay {
    pub id: String,
    pub session_id: String,
    pub organization_id: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub replay_name: String,
    pub description: String,
    pub session_start: DateTime<Utc>,
    pub session_end: DateTime<Utc>,
    pub total_events: u64,
    pub total_duration_seconds: f64,
    pub participants: Vec<String>,
    pub models_used: Vec<String>,
    #[serde(default)]
    pub replay_metadata: serde_json::Value,
    pub tags: Vec<String>,
    pub is_archived: bool,
    pub retention_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayEvent {
    pub id: String,
    pub replay_id: String,
    pub session_id: String,
    pub organization_id: String,
    pub event_type: ReplayEventType,
    pub timestamp: DateTime<Utc>,
    pub sequence_number: u64,
    pub event_data: serde_json::Value,
    pub actor_id: Option<String>,
    pub actor_type: String,
    pub duration_ms: Option<f64>,
    pub related_interaction_id: Option<String>,
    pub related_risk_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeExplanation {
    pub id: String,
    pub organization_id: String,
    pub explanation_type: ExplanationType,
    pub target_entity_id: String,
    pub target_entity_type: String,
    pub narrative_style: NarrativeStyle,
    pub title: String,
    pub summary: String,
    pub detailed_explanation: String,
    pub key_factors: Vec<String>,
    pub evidence_points: Vec<serde_json::Value>,
    pub confidence_level: f64,
    pub generated_at: DateTime<Utc>,
    pub generated_by: String,
    pub generation_method: String,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub is_approved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthicalAlignment {
    pub id: String,
    pub organization_id: String,
    pub target_entity_id: String,
    pub target_entity_type: String,
    pub assessment_timestamp: DateTime<Utc>,
    pub assessor_id: String,
    pub overall_alignment_score: f64,
    pub category_scores: HashMap<AlignmentCategory, f64>,
    pub alignment_analysis: String,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub recommendations: Vec<String>,
    pub compliance_notes: String,
    pub requires_human_review: bool,
    pub review_priority: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditTrail {
    pub id: String,
    pub organization_id: String,
    pub audit_type: String,
    pub target_entity_id: String,
    pub target_entity_type: String,
    pub audit_timestamp: DateTime<Utc>,
    pub auditor_id: String,
    pub audit_scope: Vec<String>,
    pub findings: Vec<serde_json::Value>,
    pub compliance_status: String,
    pub risk_level: String,
    pub recommendations: Vec<String>,
    pub action_items: Vec<serde_json::Value>,
    pub follow_up_required: bool,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub audit_report: String,
    pub supporting_documents: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationTemplate {
    pub id: String,
    pub organization_id: String,
    pub template_name: String,
    pub explanation_type: ExplanationType,
    pub narrative_style: NarrativeStyle,
    pub template_content: String,
    pub variables: Vec<String>,
    pub usage_context: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub is_active: bool,
    pub usage_count: u64,
}

#[derive(Default)]
pub struct NarrativeStore {
    pub replays: RwLock<HashMap<String, SessionReplay>>,
    pub events: RwLock<HashMap<String, ReplayEvent>>,
    pub explanations: RwLock<HashMap<String, NarrativeExplanation>>,
    pub alignments: RwLock<HashMap<String, EthicalAlignment>>,
    pub audits: RwLock<HashMap<String, AuditTrail>>,
    pub templates: RwLock<HashMap<String, ExplanationTemplate>>,
}
