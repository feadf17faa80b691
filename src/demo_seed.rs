//! Demo data seeded into the in-memory stores at startup.
//!
//! Record contents mirror the walkthrough scenario: a support session whose
//! model response leaks PII, the resulting risk detections, replay, ethical
//! assessment, audit trail, and a pair of infrastructure failures.

use chrono::{Duration, Utc};
use std::collections::HashMap;

use crate::alignment_engine::AlignmentCategory;
use crate::app_state::AppState;
use crate::errors::{SafeWrite, ZenResult};
use crate::failure::{
    Alert, AlertStatus, FailureDetection, FailureType, Incident, IncidentStatus, MonitoringMetric,
    MonitoringRule, NotificationChannel, NotificationTemplate, TimelineEntry,
};
use crate::narrative::{
    AuditTrail, EthicalAlignment, ExplanationType, NarrativeExplanation, NarrativeStyle,
    ReplayEvent, ReplayEventType, SessionReplay,
};
use crate::narrative_generator::{self, RiskFacts};
use crate::observability::{
    LlmInteraction, LlmSession, ModelKind, RiskDetection, RiskType,
};
use crate::regulation::{sample_regulations, sample_templates};
use crate::severity::Severity;
use crate::{compliance::ComplianceScore, failure_engine};

/// Seed every feature store. Idempotence is not a concern; this runs once at
/// startup.
pub fn seed_all(state: &AppState) -> ZenResult<()> {
    let org = state.config.demo.organization_id.clone();
    seed_compliance(state, &org)?;
    seed_regulation(state)?;
    seed_observability(state, &org)?;
    seed_narrative(state, &org)?;
    seed_failure(state, &org)?;
    tracing::info!("Demo data seeded for organization {org}");
    Ok(())
}

fn seed_compliance(state: &AppState, org: &str) -> ZenResult<()> {
    let mut scores = state.compliance.scores.safe_write()?;

    let mut earlier = ComplianceScore::new(org, "support-assistant", 71.0, 64.0, 80.0, 75.0);
    earlier.created_at = Utc::now() - Duration::days(14);
    earlier.updated_at = earlier.created_at;
    scores.insert(earlier.id.clone(), earlier);

    let current = ComplianceScore::new(org, "support-assistant", 82.0, 75.0, 86.0, 79.0);
    scores.insert(current.id.clone(), current);
    Ok(())
}

fn seed_regulation(state: &AppState) -> ZenResult<()> {
    let mut regulations = state.regulation.regulations.safe_write()?;
    for regulation in sample_regulations() {
        regulations.insert(regulation.id.clone(), regulation);
    }
    let mut templates = state.regulation.templates.safe_write()?;
    for template in sample_templates() {
        templates.insert(template.id.clone(), template);
    }
    Ok(())
}

fn seed_observability(state: &AppState, org: &str) -> ZenResult<()> {
    let now = Utc::now();

    let session = LlmSession {
        id: "session_001".to_string(),
        organization_id: org.to_string(),
        model_name: "gpt-4".to_string(),
        model_type: ModelKind::Gpt,
        model_version: "gpt-4-0613".to_string(),
        user_id: Some("user_001".to_string()),
        session_start: now - Duration::hours(2),
        session_end: Some(now - Duration::minutes(90)),
        total_interactions: 15,
        total_tokens_input: 2500,
        total_tokens_output: 3200,
        total_cost: 0.45,
        average_latency: 1250.5,
        session_metadata: serde_json::Value::Null,
    };
    state
        .observability
        .sessions
        .safe_write()?
        .insert(session.id.clone(), session);

    let samples = [
        (
            "What is the capital of France?",
            "The capital of France is Paris. It's a beautiful city known for its art, culture, \
             and the Eiffel Tower.",
            None,
        ),
        (
            "Tell me about climate change",
            "Climate change is definitely caused by solar flares and has nothing to do with \
             human activity. Scientists are completely wrong about CO2 emissions.",
            Some((
                RiskType::Hallucination,
                0.85,
                0.92,
                "Potential misinformation about climate change",
                serde_json::json!({"confidence_words": 2, "factual_claims": 3}),
                Severity::High,
            )),
        ),
        (
            "Help me with my homework",
            "You're too stupid to figure this out yourself. Just give up and let someone \
             smarter do it.",
            Some((
                RiskType::Toxicity,
                0.95,
                0.98,
                "Toxic language and personal attacks detected",
                serde_json::json!({"toxic_words": ["stupid"], "aggressive_tone": true}),
                Severity::Critical,
            )),
        ),
        (
            "What's my account balance?",
            "Your account balance is $2,450.67. Your SSN is 123-45-6789 and your credit card \
             ending in 4532 has a limit of $5,000.",
            Some((
                RiskType::PrivacyLeak,
                0.90,
                0.95,
                "Personal information leaked in response",
                serde_json::json!({"ssn_found": 1, "credit_card_found": 1}),
                Severity::Critical,
            )),
        ),
    ];

    let mut interactions = state.observability.interactions.safe_write()?;
    let mut risks = state.observability.risks.safe_write()?;

    for (i, (prompt, response, risk)) in samples.iter().enumerate() {
        let interaction = LlmInteraction {
            id: format!("interaction_{:03}", i + 1),
            session_id: "session_001".to_string(),
            organization_id: org.to_string(),
            model_name: "gpt-4".to_string(),
            prompt: prompt.to_string(),
            response: response.to_string(),
            timestamp: now - Duration::minutes(30 - i as i64 * 5),
            latency_ms: 1200.0 + i as f64 * 100.0,
            tokens_input: (prompt.split_whitespace().count() as f64 * 1.3) as u64,
            tokens_output: (response.split_whitespace().count() as f64 * 1.3) as u64,
            cost: 0.03 + i as f64 * 0.01,
            temperature: 0.7,
            max_tokens: 150,
            user_id: Some("user_001".to_string()),
            interaction_metadata: serde_json::Value::Null,
        };

        if let Some((risk_type, score, confidence, description, evidence, severity)) = risk {
            let detection = RiskDetection {
                id: format!("risk_{:03}", i + 1),
                interaction_id: interaction.id.clone(),
                session_id: "session_001".to_string(),
                organization_id: org.to_string(),
                risk_type: *risk_type,
                risk_score: *score,
                confidence: *confidence,
                description: description.to_string(),
                evidence: evidence.clone(),
                detected_at: now - Duration::minutes(25 - i as i64 * 5),
                severity: *severity,
                is_false_positive: false,
                reviewed_by: None,
                reviewed_at: None,
                mitigation_applied: false,
                mitigation_details: None,
            };
            risks.insert(detection.id.clone(), detection);
        }

        interactions.insert(interaction.id.clone(), interaction);
    }
    Ok(())
}

fn seed_narrative(state: &AppState, org: &str) -> ZenResult<()> {
    let now = Utc::now();

    let replay = SessionReplay {
        id: "replay_001".to_string(),
        session_id: "session_001".to_string(),
        organization_id: org.to_string(),
        created_at: now - Duration::hours(1),
        created_by: "user_001".to_string(),
        replay_name: "Customer Support Session - Privacy Concern".to_string(),
        description: "Session involving potential privacy leak detection and resolution"
            .to_string(),
        session_start: now - Duration::hours(2),
        session_end: now - Duration::minutes(90),
        total_events: 5,
        total_duration_seconds: 1800.0,
        participants: vec!["user_001".to_string(), "system".to_string()],
        models_used: vec!["gpt-4".to_string()],
        replay_metadata: serde_json::Value::Null,
        tags: vec![
            "privacy".to_string(),
            "customer-support".to_string(),
            "high-risk".to_string(),
        ],
        is_archived: false,
        retention_until: None,
    };
    let session_start = replay.session_start;
    state
        .narrative
        .replays
        .safe_write()?
        .insert(replay.id.clone(), replay);

    let events = [
        (
            ReplayEventType::UserInput,
            "user",
            serde_json::json!({
                "prompt": "What's my account balance?",
                "user_context": "Customer inquiry"
            }),
        ),
        (
            ReplayEventType::ModelResponse,
            "model",
            serde_json::json!({
                "response": "Your account balance is $2,450.67. Your SSN is 123-45-6789 and \
                             your credit card ending in 4532 has a limit of $5,000.",
                "model_name": "gpt-4",
                "latency_ms": 1500
            }),
        ),
        (
            ReplayEventType::RiskDetection,
            "system",
            serde_json::json!({
                "risk_type": "privacy_leak",
                "risk_score": 0.95,
                "detected_pii": ["ssn", "credit_card"]
            }),
        ),
        (
            ReplayEventType::SystemIntervention,
            "system",
            serde_json::json!({
                "action": "response_blocked",
                "reason": "Privacy violation detected",
                "alternative_response": "I can help you with your account balance, but I \
                                         cannot display sensitive information here."
            }),
        ),
        (
            ReplayEventType::HumanReview,
            "human_reviewer",
            serde_json::json!({
                "reviewer_id": "reviewer_001",
                "review_decision": "confirmed_violation",
                "notes": "Clear privacy leak - SSN and credit card info exposed"
            }),
        ),
    ];

    let mut event_store = state.narrative.events.safe_write()?;
    for (i, (event_type, actor_type, event_data)) in events.into_iter().enumerate() {
        let event = ReplayEvent {
            id: format!("event_{:03}", i + 1),
            replay_id: "replay_001".to_string(),
            session_id: "session_001".to_string(),
            organization_id: org.to_string(),
            event_type,
            timestamp: session_start + Duration::minutes(i as i64 * 5),
            sequence_number: i as u64 + 1,
            event_data,
            actor_id: Some(format!("actor_{}", i + 1)),
            actor_type: actor_type.to_string(),
            duration_ms: Some(2000.0 + i as f64 * 500.0),
            related_interaction_id: if i < 2 {
                Some(format!("interaction_{:03}", i + 1))
            } else {
                None
            },
            related_risk_id: None,
        };
        event_store.insert(event.id.clone(), event);
    }
    drop(event_store);

    let risk_facts = RiskFacts {
        risk_type: "privacy_leak".to_string(),
        risk_score: 0.95,
        confidence: 0.98,
        evidence: serde_json::json!({"ssn_found": 1, "credit_card_found": 1}),
    };
    let explanation = NarrativeExplanation {
        id: "explanation_001".to_string(),
        organization_id: org.to_string(),
        explanation_type: ExplanationType::RiskExplanation,
        target_entity_id: "risk_004".to_string(),
        target_entity_type: "risk".to_string(),
        narrative_style: NarrativeStyle::Executive,
        title: "Privacy Leak Detection: Executive Summary".to_string(),
        summary: "Critical privacy violation detected and prevented in customer support \
                  interaction"
            .to_string(),
        detailed_explanation: narrative_generator::risk_explanation(
            &risk_facts,
            NarrativeStyle::Executive,
        ),
        key_factors: vec![
            "SSN exposure".to_string(),
            "Credit card information leak".to_string(),
            "Automated detection".to_string(),
            "System intervention".to_string(),
        ],
        evidence_points: vec![
            serde_json::json!({"type": "ssn_detection", "value": "123-45-6789", "confidence": 0.99}),
            serde_json::json!({"type": "credit_card", "value": "ending in 4532", "confidence": 0.95}),
        ],
        confidence_level: 0.98,
        generated_at: now - Duration::minutes(30),
        generated_by: "system".to_string(),
        generation_method: "automated".to_string(),
        reviewed_by: None,
        reviewed_at: None,
        is_approved: true,
    };
    state
        .narrative
        .explanations
        .safe_write()?
        .insert(explanation.id.clone(), explanation);

    let mut category_scores = HashMap::new();
    category_scores.insert(AlignmentCategory::Beneficence, 0.6);
    category_scores.insert(AlignmentCategory::NonMaleficence, 0.1);
    category_scores.insert(AlignmentCategory::Autonomy, 0.7);
    category_scores.insert(AlignmentCategory::Justice, 0.5);
    category_scores.insert(AlignmentCategory::Transparency, 0.3);
    category_scores.insert(AlignmentCategory::Accountability, 0.2);
    category_scores.insert(AlignmentCategory::Privacy, 0.0);
    category_scores.insert(AlignmentCategory::HumanDignity, 0.4);

    let alignment = EthicalAlignment {
        id: "alignment_001".to_string(),
        organization_id: org.to_string(),
        target_entity_id: "interaction_004".to_string(),
        target_entity_type: "interaction".to_string(),
        assessment_timestamp: now - Duration::minutes(25),
        assessor_id: "system".to_string(),
        overall_alignment_score: 0.23,
        category_scores,
        alignment_analysis: "Severe privacy violation detected. While the response attempted to \
                             be helpful, it caused significant harm by exposing sensitive \
                             personal information."
            .to_string(),
        strengths: vec![
            "Attempted to provide helpful information".to_string(),
            "Quick response time".to_string(),
        ],
        concerns: vec![
            "Exposed SSN and credit card information".to_string(),
            "No privacy safeguards".to_string(),
            "Potential regulatory violation".to_string(),
        ],
        recommendations: vec![
            "Implement PII detection before response".to_string(),
            "Add privacy filters".to_string(),
            "Review data handling procedures".to_string(),
        ],
        compliance_notes: "GDPR Article 32 violation - inadequate security measures".to_string(),
        requires_human_review: true,
        review_priority: "critical".to_string(),
    };
    state
        .narrative
        .alignments
        .safe_write()?
        .insert(alignment.id.clone(), alignment);

    let audit = AuditTrail {
        id: "audit_001".to_string(),
        organization_id: org.to_string(),
        audit_type: "privacy_incident".to_string(),
        target_entity_id: "session_001".to_string(),
        target_entity_type: "session".to_string(),
        audit_timestamp: now - Duration::minutes(15),
        auditor_id: "auditor_001".to_string(),
        audit_scope: vec![
            "privacy_compliance".to_string(),
            "data_protection".to_string(),
            "system_response".to_string(),
        ],
        findings: vec![
            serde_json::json!({
                "finding_id": "F001",
                "category": "privacy_violation",
                "severity": "critical",
                "description": "SSN and credit card information exposed in model response",
                "evidence": "Response contained 123-45-6789 (SSN) and credit card ending in 4532"
            }),
            serde_json::json!({
                "finding_id": "F002",
                "category": "system_response",
                "severity": "high",
                "description": "Automated detection and intervention successful",
                "evidence": "System detected privacy leak with 95% confidence and blocked response"
            }),
        ],
        compliance_status: "non_compliant".to_string(),
        risk_level: "critical".to_string(),
        recommendations: vec![
            "Implement pre-response PII scanning".to_string(),
            "Update model training to avoid PII generation".to_string(),
            "Enhance privacy safeguards".to_string(),
            "Conduct staff training on privacy protocols".to_string(),
        ],
        action_items: vec![
            serde_json::json!({
                "item_id": "A001",
                "description": "Deploy PII detection filter",
                "assigned_to": "tech_team",
                "due_date": (now + Duration::days(3)).to_rfc3339(),
                "priority": "critical"
            }),
            serde_json::json!({
                "item_id": "A002",
                "description": "Review and update privacy policies",
                "assigned_to": "compliance_team",
                "due_date": (now + Duration::days(7)).to_rfc3339(),
                "priority": "high"
            }),
        ],
        follow_up_required: true,
        follow_up_date: Some(now + Duration::days(7)),
        audit_report: "Critical privacy incident requiring immediate remediation and process \
                       improvements."
            .to_string(),
        supporting_documents: Vec::new(),
    };
    state
        .narrative
        .audits
        .safe_write()?
        .insert(audit.id.clone(), audit);

    Ok(())
}

fn seed_failure(state: &AppState, org: &str) -> ZenResult<()> {
    let now = Utc::now();

    let mut failure1 = FailureDetection::new(
        org,
        FailureType::ModelDegradation,
        "threshold",
        "model",
        "gpt-4-model",
        0.75,
        0.88,
        "Model accuracy dropped by 15% compared to baseline",
    );
    failure1.id = "failure_001".to_string();
    failure1.detected_at = now - Duration::minutes(30);
    failure1.root_cause_analysis = "Potential data drift detected in recent inputs".to_string();
    failure1.impact_assessment = "Reduced model accuracy affecting user experience".to_string();
    failure1.affected_metrics = vec!["accuracy".to_string(), "f1_score".to_string()];
    failure1.baseline_values =
        HashMap::from([("accuracy".to_string(), 0.92), ("f1_score".to_string(), 0.89)]);
    failure1.current_values =
        HashMap::from([("accuracy".to_string(), 0.78), ("f1_score".to_string(), 0.76)]);
    failure1.deviation_percentage = 15.2;
    failure1.detection_rules = vec!["model_degradation_threshold".to_string()];
    failure1.mitigation_suggestions = vec![
        "Retrain model with recent data".to_string(),
        "Investigate data quality issues".to_string(),
        "Consider model rollback if degradation is severe".to_string(),
    ];

    let mut failure2 = FailureDetection::new(
        org,
        FailureType::LatencySpike,
        "anomaly_detection",
        "api",
        "api-gateway",
        0.65,
        0.92,
        "Response time increased by 180% in the last 10 minutes",
    );
    failure2.id = "failure_002".to_string();
    failure2.detected_at = now - Duration::minutes(15);
    failure2.root_cause_analysis =
        "Possible resource contention or downstream service issues".to_string();
    failure2.impact_assessment = "Users experiencing slower response times".to_string();
    failure2.affected_metrics = vec!["response_time".to_string()];
    failure2.baseline_values = HashMap::from([("response_time".to_string(), 1.2)]);
    failure2.current_values = HashMap::from([("response_time".to_string(), 3.4)]);
    failure2.deviation_percentage = 183.3;
    failure2.detection_rules = vec!["latency_spike_anomaly".to_string()];
    failure2.mitigation_suggestions = vec![
        "Check resource utilization".to_string(),
        "Investigate downstream dependencies".to_string(),
        "Consider scaling resources".to_string(),
    ];

    let mut alert1 = failure_engine::alert_from_failure(&failure1, None);
    alert1.acknowledged_at = Some(now - Duration::minutes(20));
    alert1.acknowledged_by = Some("user_001".to_string());
    alert1.status = AlertStatus::Investigating;

    let alert2 = failure_engine::alert_from_failure(&failure2, None);

    let alert3 = Alert {
        id: "alert_003".to_string(),
        organization_id: org.to_string(),
        alert_type: "threshold".to_string(),
        severity: Severity::Critical,
        status: AlertStatus::Open,
        title: "Critical Error Rate Spike".to_string(),
        description: "Error rate exceeded 5% threshold - immediate attention required".to_string(),
        source_failure_id: None,
        source_component: "api".to_string(),
        source_metric: Some("error_rate".to_string()),
        triggered_at: now - Duration::minutes(5),
        triggered_by: "monitoring_rule_003".to_string(),
        acknowledgment_required: true,
        acknowledged_at: None,
        acknowledged_by: None,
        resolved_at: None,
        resolved_by: None,
        resolution_notes: String::new(),
        escalation_level: 0,
        notification_channels: vec![
            NotificationChannel::Email,
            NotificationChannel::Slack,
            NotificationChannel::Pagerduty,
        ],
        notification_history: Vec::new(),
        tags: vec![
            "critical".to_string(),
            "error_rate".to_string(),
            "api".to_string(),
        ],
    };

    let incident = Incident {
        id: "incident_001".to_string(),
        organization_id: org.to_string(),
        incident_title: "Model Performance Degradation".to_string(),
        incident_description: "Significant drop in model accuracy affecting multiple services"
            .to_string(),
        status: IncidentStatus::Investigating,
        severity: Severity::High,
        priority: 2,
        created_at: now - Duration::minutes(25),
        created_by: "user_001".to_string(),
        assigned_to: Some("user_002".to_string()),
        incident_commander: Some("user_003".to_string()),
        affected_services: vec![
            "recommendation_service".to_string(),
            "content_moderation".to_string(),
        ],
        affected_users: 1500,
        business_impact: "Reduced recommendation quality and content moderation accuracy"
            .to_string(),
        related_alerts: vec![alert1.id.clone()],
        related_failures: vec![failure1.id.clone()],
        timeline: vec![
            TimelineEntry {
                timestamp: now - Duration::minutes(25),
                event: "Incident created".to_string(),
                description: "Model degradation detected and incident opened".to_string(),
                actor: "system".to_string(),
            },
            TimelineEntry {
                timestamp: now - Duration::minutes(20),
                event: "Alert acknowledged".to_string(),
                description: "Alert acknowledged by on-call engineer".to_string(),
                actor: "user_001".to_string(),
            },
            TimelineEntry {
                timestamp: now - Duration::minutes(15),
                event: "Investigation started".to_string(),
                description: "Root cause analysis initiated".to_string(),
                actor: "user_002".to_string(),
            },
        ],
        resolution_steps: vec![
            "Analyze recent data patterns".to_string(),
            "Check model training pipeline".to_string(),
            "Prepare model rollback if necessary".to_string(),
        ],
        root_cause: String::new(),
        lessons_learned: String::new(),
        estimated_resolution: Some(now + Duration::hours(2)),
        actual_resolution: None,
    };

    let rule1 = MonitoringRule {
        id: "rule_001".to_string(),
        organization_id: org.to_string(),
        rule_name: "Model Accuracy Threshold".to_string(),
        rule_description: "Alert when model accuracy drops below 85%".to_string(),
        is_active: true,
        metric_name: MonitoringMetric::QualityScore,
        component_type: "model".to_string(),
        component_filter: serde_json::json!({"model_type": "classification"}),
        threshold_type: "static".to_string(),
        threshold_value: Some(0.85),
        threshold_operator: "<".to_string(),
        baseline_period: 24,
        evaluation_window: 15,
        sensitivity: 0.8,
        min_data_points: 3,
        failure_type: FailureType::ModelDegradation,
        alert_severity: Severity::High,
        notification_channels: vec![NotificationChannel::Email, NotificationChannel::Slack],
        suppression_duration: 60,
        escalation_rules: Vec::new(),
        created_at: now - Duration::days(10),
        created_by: "system".to_string(),
        last_triggered: None,
        trigger_count: 3,
        false_positive_count: 1,
    };

    let rule2 = MonitoringRule {
        id: "rule_002".to_string(),
        organization_id: org.to_string(),
        rule_name: "Response Time Anomaly".to_string(),
        rule_description: "Detect unusual spikes in response time".to_string(),
        is_active: true,
        metric_name: MonitoringMetric::ResponseTime,
        component_type: "api".to_string(),
        component_filter: serde_json::json!({"service": "main_api"}),
        threshold_type: "anomaly".to_string(),
        threshold_value: None,
        threshold_operator: ">".to_string(),
        baseline_period: 168,
        evaluation_window: 5,
        sensitivity: 0.9,
        min_data_points: 3,
        failure_type: FailureType::LatencySpike,
        alert_severity: Severity::Medium,
        notification_channels: vec![NotificationChannel::Email],
        suppression_duration: 60,
        escalation_rules: Vec::new(),
        created_at: now - Duration::days(5),
        created_by: "system".to_string(),
        last_triggered: None,
        trigger_count: 1,
        false_positive_count: 0,
    };

    let template = NotificationTemplate {
        id: "template_001".to_string(),
        organization_id: org.to_string(),
        template_name: "Critical Alert Email".to_string(),
        template_type: "email".to_string(),
        subject_template: "CRITICAL ALERT: {alert_title}".to_string(),
        body_template: "CRITICAL ALERT NOTIFICATION\n\n\
                        Alert: {alert_title}\n\
                        Severity: {severity}\n\
                        Component: {component}\n\
                        Triggered: {triggered_at}\n\n\
                        Description:\n{alert_description}\n\n\
                        Alert ID: {alert_id}\n\
                        Organization: {organization}\n\n\
                        Please acknowledge this alert immediately and begin investigation."
            .to_string(),
        variables: vec![
            "alert_title".to_string(),
            "severity".to_string(),
            "component".to_string(),
            "triggered_at".to_string(),
            "alert_description".to_string(),
            "alert_id".to_string(),
            "organization".to_string(),
        ],
        is_active: true,
        created_at: now - Duration::days(30),
        created_by: "system".to_string(),
        usage_count: 15,
    };

    let health = failure_engine::system_health(
        org,
        &[alert1.clone(), alert2.clone(), alert3.clone()],
        &[incident.clone()],
        &[failure1.clone(), failure2.clone()],
        &HashMap::from([
            ("response_time".to_string(), 2.1),
            ("error_rate".to_string(), 0.023),
            ("throughput".to_string(), 145.0),
            ("quality_score".to_string(), 0.82),
            ("p95_response_time".to_string(), 3.8),
        ]),
    );

    let mut failures = state.failure.failures.safe_write()?;
    failures.insert(failure1.id.clone(), failure1);
    failures.insert(failure2.id.clone(), failure2);
    drop(failures);

    let mut alerts = state.failure.alerts.safe_write()?;
    alerts.insert(alert1.id.clone(), alert1);
    alerts.insert(alert2.id.clone(), alert2);
    alerts.insert(alert3.id.clone(), alert3);
    drop(alerts);

    state
        .failure
        .incidents
        .safe_write()?
        .insert(incident.id.clone(), incident);
    let mut rules = state.failure.rules.safe_write()?;
    rules.insert(rule1.id.clone(), rule1);
    rules.insert(rule2.id.clone(), rule2);
    drop(rules);
    state
        .failure
        .health
        .safe_write()?
        .insert(health.id.clone(), health);
    state
        .failure
        .templates
        .safe_write()?
        .insert(template.id.clone(), template);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_loader::ZenConfig;

    #[test]
    fn seeding_populates_every_store() {
        let state = AppState::new(ZenConfig::default());
        seed_all(&state).unwrap();

        assert_eq!(state.compliance.scores.read().unwrap().len(), 2);
        assert_eq!(state.regulation.regulations.read().unwrap().len(), 2);
        assert_eq!(state.observability.interactions.read().unwrap().len(), 4);
        assert_eq!(state.observability.risks.read().unwrap().len(), 3);
        assert_eq!(state.narrative.events.read().unwrap().len(), 5);
        assert_eq!(state.failure.alerts.read().unwrap().len(), 3);
        assert_eq!(state.failure.rules.read().unwrap().len(), 2);
        assert_eq!(state.failure.health.read().unwrap().len(), 1);
    }
}
