//! Response quality heuristics: relevance, coherence, completeness, clarity.
//!
//! Factuality and creativity have no heuristic here; callers supply fixed
//! placeholder values for those metrics.

use std::collections::HashSet;

const ANSWER_WORDS: [&str; 4] = ["answer", "solution", "result", "conclusion"];
const TRANSITION_WORDS: [&str; 6] = [
    "however",
    "therefore",
    "furthermore",
    "additionally",
    "consequently",
    "meanwhile",
];
const CONNECTORS: [&str; 6] = [
    "because",
    "since",
    "as a result",
    "due to",
    "leads to",
    "causes",
];
const QUESTION_INDICATORS: [&str; 6] = ["what", "how", "why", "when", "where", "who"];

/// Word overlap between prompt and response, boosted when the response uses
/// answer-framing vocabulary.
pub fn assess_relevance(prompt: &str, response: &str) -> f64 {
    let prompt_words: HashSet<String> = prompt
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let response_words: HashSet<String> = response
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    if prompt_words.is_empty() {
        return 0.0;
    }

    let overlap = prompt_words.intersection(&response_words).count();
    let mut score = (overlap as f64 / prompt_words.len() as f64).min(1.0);

    let lower = response.to_lowercase();
    if ANSWER_WORDS.iter().any(|w| lower.contains(w)) {
        score = (score + 0.2).min(1.0);
    }

    score
}

/// Transition-word and connector density over a 0.5 base.
pub fn assess_coherence(response: &str) -> f64 {
    let sentences: Vec<&str> = response.split('.').collect();
    if sentences.len() < 2 {
        return 0.5;
    }

    let count_in_sentences = |words: &[&str]| -> usize {
        sentences
            .iter()
            .map(|s| {
                let lower = s.to_lowercase();
                words.iter().filter(|w| lower.contains(*w)).count()
            })
            .sum()
    };

    let transitions = count_in_sentences(&TRANSITION_WORDS);
    let connectors = count_in_sentences(&CONNECTORS);

    let mut score = 0.5;
    score += (transitions as f64 * 0.1).min(0.3);
    score += (connectors as f64 * 0.1).min(0.2);
    score.min(1.0)
}

/// Did the response cover the questions the prompt asked, at a plausible
/// length?
pub fn assess_completeness(prompt: &str, response: &str) -> f64 {
    let prompt_lower = prompt.to_lowercase();
    let questions = QUESTION_INDICATORS
        .iter()
        .filter(|w| prompt_lower.contains(*w))
        .count();

    if questions == 0 {
        return 0.8;
    }

    let word_count = response.split_whitespace().count();
    if word_count < 10 {
        0.3
    } else if word_count < 50 {
        0.6
    } else {
        0.9
    }
}

/// Sentence-length band plus a long-word penalty.
pub fn assess_clarity(response: &str) -> f64 {
    let words: Vec<&str> = response.split_whitespace().collect();
    let sentence_count = response.split('.').filter(|s| !s.trim().is_empty()).count();
    if words.is_empty() || sentence_count == 0 {
        return 0.0;
    }

    let avg_sentence_length = words.len() as f64 / sentence_count as f64;
    let length_score = if (10.0..=25.0).contains(&avg_sentence_length) {
        1.0
    } else if (5.0..10.0).contains(&avg_sentence_length)
        || (25.0..=35.0).contains(&avg_sentence_length)
    {
        0.7
    } else {
        0.4
    };

    let complex_words = words.iter().filter(|w| w.len() > 8).count();
    let complexity_ratio = complex_words as f64 / words.len() as f64;
    let complexity_score = 1.0 - (complexity_ratio * 2.0).min(0.5);

    (length_score + complexity_score) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relevance_rewards_overlap() {
        let high = assess_relevance("capital of France", "The capital of France is Paris.");
        let low = assess_relevance("capital of France", "Bananas are yellow.");
        assert!(high > low);
    }

    #[test]
    fn relevance_on_empty_prompt_is_zero() {
        assert_eq!(assess_relevance("", "anything"), 0.0);
    }

    #[test]
    fn single_sentence_coherence_is_moderate() {
        assert_eq!(assess_coherence("One sentence"), 0.5);
    }

    #[test]
    fn connectors_raise_coherence() {
        let text = "It rained. Therefore the match was cancelled. This happened because the \
                    pitch flooded.";
        assert!(assess_coherence(text) > 0.5);
    }

    #[test]
    fn completeness_depends_on_length_for_questions() {
        assert_eq!(assess_completeness("what is rust?", "A language."), 0.3);
        let long_answer = "word ".repeat(60);
        assert_eq!(assess_completeness("what is rust?", &long_answer), 0.9);
        assert_eq!(assess_completeness("statement only", "fine"), 0.8);
    }

    #[test]
    fn clarity_penalizes_empty_and_rambling_text() {
        assert_eq!(assess_clarity(""), 0.0);
        let clear = "This sentence is a reasonable length for most readers to follow easily.";
        let rambling = "word ".repeat(80) + ".";
        assert!(assess_clarity(clear) > assess_clarity(&rambling));
    }
}
