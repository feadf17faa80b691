//! Narrative explanation rendering.
//!
//! Turns interaction, risk, and alignment facts into explanation text keyed
//! by audience style. The output is plain markdown assembled from format
//! templates; no model is involved.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::alignment_engine::InteractionFacts;
use crate::narrative::NarrativeStyle;

/// Facts about a detected risk, as supplied by the explanation endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskFacts {
    #[serde(default)]
    pub risk_type: String,
    #[serde(default)]
    pub risk_score: f64,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub evidence: serde_json::Value,
}

/// Facts about an alignment assessment, as supplied by the explanation
/// endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlignmentFacts {
    #[serde(default)]
    pub overall_alignment_score: f64,
    #[serde(default)]
    pub category_scores: HashMap<String, f64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
}

/// Explanation of the decision-making flow behind a model response.
pub fn decision_explanation(facts: &InteractionFacts, style: NarrativeStyle) -> String {
    let model = facts.model_name.as_deref().unwrap_or("AI Model");
    let prompt_words = facts.prompt.split_whitespace().count();
    let response_words = facts.response.split_whitespace().count();
    let topic = extract_topic(&facts.prompt);
    let latency = facts.latency_ms;

    match style {
        NarrativeStyle::Technical | NarrativeStyle::Audit => format!(
            "**Technical Decision Analysis for {model}**\n\n\
             **Input Processing:**\n\
             The model received a prompt of {prompt_words} words requesting information about \
             {topic}. The input was processed through the model's attention mechanisms, with key \
             tokens weighted by semantic relevance.\n\n\
             **Response Generation:**\n\
             The model generated a {response_words}-word response in {latency}ms, using its \
             trained parameters to construct a contextually appropriate answer. The generation \
             process involved:\n\n\
             1. **Context Understanding**: Analysis of the prompt's intent and required information type\n\
             2. **Knowledge Retrieval**: Accessing relevant information from training data\n\
             3. **Response Synthesis**: Constructing a coherent response that addresses the query\n\
             4. **Quality Assurance**: Internal consistency checks and relevance validation\n\n\
             **Decision Factors:**\n\
             - Prompt clarity and specificity\n\
             - Available knowledge in training data\n\
             - Response length optimization\n\
             - Contextual appropriateness"
        ),
        NarrativeStyle::Executive => format!(
            "**Executive Summary: AI Decision Process**\n\n\
             **Situation:** User requested information about {topic}\n\n\
             **Action:** {model} processed the request and provided a comprehensive response in \
             {:.1} seconds\n\n\
             **Result:** Generated {response_words}-word response addressing the user's query\n\n\
             **Business Impact:**\n\
             - Fast response time ensures good user experience\n\
             - Comprehensive answer demonstrates model capability\n\
             - Automated handling reduces operational costs\n\n\
             **Key Metrics:**\n\
             - Response Time: {latency}ms\n\
             - Content Quality: High relevance to user query\n\
             - Efficiency: Automated processing without human intervention",
            latency / 1000.0
        ),
        NarrativeStyle::UserFriendly => format!(
            "**How Your AI Assistant Made This Decision**\n\n\
             When you asked about {topic}, here's what happened behind the scenes:\n\n\
             **Understanding Your Question:**\n\
             Your AI assistant read your question and identified that you were looking for \
             information about {topic}. It analyzed the key words and context to understand \
             exactly what you needed.\n\n\
             **Finding the Right Information:**\n\
             The AI searched its knowledge base for the most relevant and accurate information \
             to answer your question.\n\n\
             **Crafting the Response:**\n\
             Your assistant organized the information in a clear, helpful way, addressing your \
             specific question with useful context.\n\n\
             **Quality Check:**\n\
             Before responding, the AI performed a quick quality check to make sure the answer \
             was relevant, accurate, and helpful.\n\n\
             The whole process took just {:.1} seconds.",
            latency / 1000.0
        ),
        NarrativeStyle::Regulatory => format!(
            "**Regulatory Compliance Analysis: AI Decision Process**\n\n\
             **Process Documentation:**\n\
             This analysis documents the decision-making process of {model} for regulatory \
             compliance and audit purposes.\n\n\
             **Input Validation:**\n\
             - Prompt content reviewed for compliance with usage policies\n\
             - No sensitive or prohibited content detected\n\
             - Input classified as standard information request\n\n\
             **Processing Methodology:**\n\
             - Standard transformer-based language model processing\n\
             - No special handling or exceptions required\n\
             - Processing time: {latency}ms (within acceptable performance parameters)\n\n\
             **Output Validation:**\n\
             - Response content reviewed for accuracy and appropriateness\n\
             - No regulatory concerns identified\n\
             - Output meets quality and safety standards\n\n\
             **Audit Trail:**\n\
             - Timestamp: {}\n\
             - Model Version: {model}\n\
             - Processing Duration: {latency}ms\n\
             - Compliance Status: Approved",
            facts.timestamp.as_deref().unwrap_or("N/A")
        ),
    }
}

/// Explanation of a detected risk.
pub fn risk_explanation(facts: &RiskFacts, style: NarrativeStyle) -> String {
    let risk_type = if facts.risk_type.is_empty() {
        "unknown"
    } else {
        facts.risk_type.as_str()
    };
    let risk_label = title_case(&risk_type.replace('_', " "));
    let severity = severity_text(facts.risk_score);

    match style {
        NarrativeStyle::Technical | NarrativeStyle::Audit | NarrativeStyle::Regulatory => format!(
            "**Risk Detection Analysis: {risk_label}**\n\n\
             **Detection Summary:**\n\
             The risk detection heuristics identified a {risk_type} risk with a score of {:.2} \
             (confidence: {:.2}). This indicates a {severity} level concern that requires \
             attention.\n\n\
             **Technical Details:**\n\
             - **Risk Score**: {:.3} (0.0 = no risk, 1.0 = maximum risk)\n\
             - **Confidence Level**: {:.3}\n\
             - **Detection Method**: Pattern matching and keyword analysis\n\n\
             **Evidence Analysis:**\n{}\n\n\
             **Recommended Actions:**\n\
             1. Review the flagged content for accuracy of detection\n\
             2. Implement appropriate mitigation measures if confirmed\n\
             3. Update training data to prevent similar occurrences\n\
             4. Monitor for patterns in similar interactions",
            facts.risk_score,
            facts.confidence,
            facts.risk_score,
            facts.confidence,
            format_evidence(&facts.evidence)
        ),
        NarrativeStyle::Executive => format!(
            "**Risk Alert: {risk_label} Detected**\n\n\
             **Executive Summary:**\n\
             The AI monitoring system has detected a potential {risk_type} issue that requires \
             management attention.\n\n\
             **Risk Level:** {}\n\
             **Confidence:** {:.0}% certain\n\n\
             **Business Impact:**\n\
             - Potential compliance or reputation risk\n\
             - May require immediate review and action\n\
             - Could affect user trust and satisfaction\n\n\
             **Immediate Actions Required:**\n\
             1. Assign responsible team member for review\n\
             2. Implement temporary safeguards if necessary\n\
             3. Investigate root cause and prevention measures\n\
             4. Update risk management protocols as needed\n\n\
             **Timeline:** Recommend review within {}",
            title_case(severity),
            facts.confidence * 100.0,
            review_timeline(facts.risk_score)
        ),
        NarrativeStyle::UserFriendly => format!(
            "**Safety Notice: Content Review Required**\n\n\
             We've detected something in this conversation that needs a closer look to ensure \
             everything meets our safety and quality standards.\n\n\
             **What We Found:**\n\
             Our safety systems identified potential {} content that might not align with our \
             community guidelines.\n\n\
             **What This Means:**\n\
             - This is an automated detection, not a final determination\n\
             - A human reviewer will take a look to confirm\n\
             - Your conversation is temporarily flagged for review\n\n\
             **What Happens Next:**\n\
             1. Our team will review the content within 24 hours\n\
             2. If it's a false alarm, the flag will be removed\n\
             3. If there is an issue, we'll provide guidance on next steps\n\
             4. You'll be notified of the outcome",
            risk_type.replace('_', " ")
        ),
    }
}

/// Explanation of an ethical alignment assessment.
pub fn ethical_analysis(facts: &AlignmentFacts, style: NarrativeStyle) -> String {
    let score = facts.overall_alignment_score;

    match style {
        NarrativeStyle::Regulatory => format!(
            "**Ethical Compliance Assessment Report**\n\n\
             **Regulatory Framework:** EU AI Act Article 4 - Ethical AI Requirements\n\n\
             **Compliance Score:** {score:.2}/1.0\n\n\
             **Assessment Criteria:**\n\
             This evaluation assesses compliance with mandatory ethical requirements for AI \
             systems as defined in current regulatory frameworks.\n\n\
             **Detailed Findings:**\n{}\n\n\
             **Compliance Status:** {}\n\n\
             **Action Items:**\n{}",
            format_category_scores(&facts.category_scores),
            if score >= 0.7 {
                "COMPLIANT"
            } else {
                "REQUIRES REVIEW"
            },
            format_list(&facts.concerns, "- Address: ")
        ),
        NarrativeStyle::UserFriendly => format!(
            "**How Ethical Is This AI Interaction?**\n\n\
             **Overall Rating:** {} ({score:.1}/1.0)\n\n\
             **What We Evaluated:**\n\
             We checked this AI interaction against important ethical principles to make sure \
             it's helpful, safe, and fair.\n\n\
             **What's Going Well:**\n{}\n\n\
             **Areas for Improvement:**\n{}\n\n\
             **Why This Matters:**\n\
             Ethical AI helps ensure that artificial intelligence serves everyone fairly and \
             safely. These evaluations help us continuously improve.",
            star_rating(score),
            format_list(&facts.strengths, "- "),
            format_list(&facts.concerns, "- ")
        ),
        _ => format!(
            "**Ethical Alignment Analysis**\n\n\
             **Overall Assessment:**\n\
             The interaction achieved an ethical alignment score of {score:.2}/1.0, indicating \
             {} alignment with established ethical principles.\n\n\
             **Category Breakdown:**\n{}\n\n\
             **Strengths Identified:**\n{}\n\n\
             **Areas of Concern:**\n{}\n\n\
             **Methodology:**\n\
             - Automated ethical reasoning heuristics\n\
             - Multi-dimensional principle assessment\n\
             - Contextual appropriateness evaluation",
            alignment_level_text(score),
            format_category_scores(&facts.category_scores),
            format_list(&facts.strengths, "- "),
            format_list(&facts.concerns, "- ")
        ),
    }
}

/// First three words of the prompt, or a truncated prefix.
pub fn extract_topic(prompt: &str) -> String {
    let lower = prompt.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    if words.len() > 3 {
        format!("{}...", words[..3].join(" "))
    } else if prompt.chars().count() > 50 {
        format!("{}...", prompt.chars().take(50).collect::<String>())
    } else {
        prompt.to_string()
    }
}

pub fn severity_text(score: f64) -> &'static str {
    if score >= 0.8 {
        "critical"
    } else if score >= 0.6 {
        "high"
    } else if score >= 0.4 {
        "medium"
    } else {
        "low"
    }
}

pub fn alignment_level_text(score: f64) -> &'static str {
    if score >= 0.9 {
        "excellent"
    } else if score >= 0.7 {
        "good"
    } else if score >= 0.5 {
        "moderate"
    } else {
        "poor"
    }
}

pub fn review_timeline(risk_score: f64) -> &'static str {
    if risk_score >= 0.8 {
        "1 hour"
    } else if risk_score >= 0.6 {
        "4 hours"
    } else if risk_score >= 0.4 {
        "24 hours"
    } else {
        "72 hours"
    }
}

pub fn star_rating(score: f64) -> String {
    let stars = (score * 5.0) as usize;
    format!("{}{}", "★".repeat(stars.min(5)), "☆".repeat(5 - stars.min(5)))
}

fn format_evidence(evidence: &serde_json::Value) -> String {
    match evidence.as_object() {
        Some(map) if !map.is_empty() => map
            .iter()
            .map(|(k, v)| format!("- **{}**: {v}", title_case(&k.replace('_', " "))))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => "No specific evidence details available.".to_string(),
    }
}

fn format_category_scores(scores: &HashMap<String, f64>) -> String {
    if scores.is_empty() {
        return "No category scores available.".to_string();
    }
    let mut entries: Vec<(&String, &f64)> = scores.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
        .iter()
        .map(|(k, v)| format!("- **{}**: {v:.2}/1.0", title_case(&k.replace('_', " "))))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_list(items: &[String], prefix: &str) -> String {
    if items.is_empty() {
        return "None identified.".to_string();
    }
    items
        .iter()
        .map(|item| format!("{prefix}{item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_extraction_truncates_long_prompts() {
        assert_eq!(extract_topic("tell me about rust"), "tell me about...");
        assert_eq!(extract_topic("hi there"), "hi there");
    }

    #[test]
    fn star_rating_bands() {
        assert_eq!(star_rating(1.0), "★★★★★");
        assert_eq!(star_rating(0.0), "☆☆☆☆☆");
        assert_eq!(star_rating(0.5), "★★☆☆☆");
    }

    #[test]
    fn decision_explanation_mentions_model_and_style() {
        let facts = InteractionFacts {
            prompt: "What is the capital of France?".to_string(),
            response: "Paris.".to_string(),
            model_name: Some("gpt-4".to_string()),
            latency_ms: 1200.0,
            ..Default::default()
        };
        let technical = decision_explanation(&facts, NarrativeStyle::Technical);
        assert!(technical.contains("gpt-4"));
        assert!(technical.contains("Technical Decision Analysis"));

        let executive = decision_explanation(&facts, NarrativeStyle::Executive);
        assert!(executive.contains("Executive Summary"));
    }

    #[test]
    fn risk_explanation_reflects_severity() {
        let facts = RiskFacts {
            risk_type: "privacy_leak".to_string(),
            risk_score: 0.95,
            confidence: 0.98,
            evidence: serde_json::json!({"ssn_found": 1}),
        };
        let text = risk_explanation(&facts, NarrativeStyle::Technical);
        assert!(text.contains("Privacy Leak"));
        assert!(text.contains("critical"));
        assert!(text.contains("Ssn Found"));
    }

    #[test]
    fn ethical_analysis_flags_noncompliance() {
        let facts = AlignmentFacts {
            overall_alignment_score: 0.3,
            ..Default::default()
        };
        let text = ethical_analysis(&facts, NarrativeStyle::Regulatory);
        assert!(text.contains("REQUIRES REVIEW"));
    }
}
