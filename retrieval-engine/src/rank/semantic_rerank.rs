use std::sync::Arc;

use retrieval_core::constants::RERANK_WINDOW;
use retrieval_core::result::RetrievalResult;
use retrieval_core::traits::{ChatMessage, ILanguageModelCaller, Role};
use serde_json::Value;
use tracing::warn;

use crate::text::word_set;

/// Reorders results by fine-grained relevance, either by keyword overlap
/// (default) or by asking a language model to permute the top window.
/// Any failure in model mode falls back to the input unchanged.
pub struct SemanticRerankStage {
    caller: Option<Arc<dyn ILanguageModelCaller>>,
}

impl SemanticRerankStage {
    pub fn rule_mode() -> Self {
        Self { caller: None }
    }

    pub fn model_mode(caller: Arc<dyn ILanguageModelCaller>) -> Self {
        Self { caller: Some(caller) }
    }

    pub fn process(&self, query: &str, results: Vec<RetrievalResult>) -> Vec<RetrievalResult> {
        if results.len() <= 1 {
            return results;
        }
        match &self.caller {
            Some(caller) => llm_rerank(caller.as_ref(), query, results.clone())
                .unwrap_or(results),
            None => rule_based_rerank(query, results),
        }
    }
}

fn rule_based_rerank(query: &str, mut results: Vec<RetrievalResult>) -> Vec<RetrievalResult> {
    let query_words = word_set(query);
    let denom = query_words.len().max(1) as f64;

    for result in &mut results {
        let content_words = word_set(&result.content);
        let overlap = query_words.intersection(&content_words).count();
        let overlap_ratio = overlap as f64 / denom;
        let boost = overlap_ratio * 0.1;
        result.score += boost;
        result
            .metadata
            .insert("keyword_overlap".to_string(), Value::from(overlap as u64));
        result
            .metadata
            .insert("rerank_boost".to_string(), Value::from(boost));
    }

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results
}

fn llm_rerank(
    caller: &dyn ILanguageModelCaller,
    query: &str,
    results: Vec<RetrievalResult>,
) -> Option<Vec<RetrievalResult>> {
    let window = RERANK_WINDOW.min(results.len());
    let (top, rest) = results.split_at(window);
    let mut top: Vec<RetrievalResult> = top.to_vec();
    let rest: Vec<RetrievalResult> = rest.to_vec();

    let prompt = build_prompt(query, &top);
    let response = caller
        .generate(
            &[ChatMessage {
                role: Role::User,
                content: prompt,
            }],
            None,
        )
        .map_err(|e| warn!(error = %e, "rerank model call failed, falling back"))
        .ok()?;

    let indices = parse_indices(&response.content);
    if indices.is_empty() {
        return None;
    }

    let mut reordered = Vec::with_capacity(top.len());
    let mut used = vec![false; top.len()];
    for idx in indices {
        if idx < top.len() && !used[idx] {
            used[idx] = true;
            reordered.push(std::mem::replace(&mut top[idx], placeholder()));
        }
    }
    for (idx, taken) in used.iter().enumerate() {
        if !taken {
            reordered.push(std::mem::replace(&mut top[idx], placeholder()));
        }
    }

    reordered.extend(rest);
    Some(reordered)
}

fn placeholder() -> RetrievalResult {
    RetrievalResult::new("", 0.0, retrieval_core::result::Source::Unknown)
}

fn build_prompt(query: &str, top: &[RetrievalResult]) -> String {
    let mut prompt = format!(
        "Query: {query}\nRank the following documents by relevance, most relevant first. \
         Reply with a comma-separated list of indices only.\n"
    );
    for (i, result) in top.iter().enumerate() {
        let snippet: String = result.content.chars().take(200).collect();
        prompt.push_str(&format!("{i}: {snippet}\n"));
    }
    prompt
}

fn parse_indices(content: &str) -> Vec<usize> {
    content
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<usize>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrieval_core::result::Source;

    #[test]
    fn rule_mode_never_decreases_score() {
        let results = vec![
            RetrievalResult::new("apple banana", 0.5, Source::Vector),
            RetrievalResult::new("durian", 0.4, Source::Vector),
        ];
        let stage = SemanticRerankStage::rule_mode();
        let ranked = stage.process("apple banana", results);
        assert!(ranked[0].score >= 0.5);
    }

    #[test]
    fn single_result_is_passthrough() {
        let results = vec![RetrievalResult::new("only", 0.5, Source::Vector)];
        let stage = SemanticRerankStage::rule_mode();
        let ranked = stage.process("q", results);
        assert_eq!(ranked.len(), 1);
        assert!(!ranked[0].metadata.contains_key("keyword_overlap"));
    }

    #[test]
    fn parse_indices_extracts_ints_from_comma_list() {
        assert_eq!(parse_indices("2, 0, 1"), vec![2, 0, 1]);
    }
}
