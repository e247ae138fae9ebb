use retrieval_core::result::RetrievalResult;
use serde_json::Value;

use crate::text::jaccard_similarity;

/// Maximal Marginal Relevance selection. Output is a permutation of
/// the input — the pipeline, not this stage, truncates to `top_k`.
pub struct DiversityFilterStage {
    lambda: f64,
}

impl DiversityFilterStage {
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }

    pub fn process(&self, results: Vec<RetrievalResult>) -> Vec<RetrievalResult> {
        if results.len() <= 1 {
            return results;
        }

        let mut remaining = results;
        let mut selected = vec![remaining.remove(0)];

        while !remaining.is_empty() {
            let mut best_index = 0;
            let mut best_mmr = f64::NEG_INFINITY;

            for (i, candidate) in remaining.iter().enumerate() {
                let max_sim = selected
                    .iter()
                    .map(|s| jaccard_similarity(&candidate.content, &s.content))
                    .fold(0.0_f64, f64::max);
                let mmr = self.lambda * candidate.score - (1.0 - self.lambda) * max_sim;
                if mmr > best_mmr {
                    best_mmr = mmr;
                    best_index = i;
                }
            }

            let mut chosen = remaining.remove(best_index);
            chosen
                .metadata
                .insert("mmr_score".to_string(), Value::from(best_mmr));
            selected.push(chosen);
        }

        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use retrieval_core::result::Source;

    #[test]
    fn scenario_diversity_filter_prefers_dissimilar_candidate() {
        let results = vec![
            RetrievalResult::new("apple banana", 1.0, Source::Vector),
            RetrievalResult::new("apple banana cherry", 0.95, Source::Vector),
            RetrievalResult::new("durian", 0.90, Source::Vector),
        ];
        let stage = DiversityFilterStage::new(0.5);
        let ranked = stage.process(results);
        assert_eq!(
            ranked.iter().map(|r| r.content.as_str()).collect::<Vec<_>>(),
            vec!["apple banana", "durian", "apple banana cherry"]
        );
    }

    #[test]
    fn output_is_a_permutation_of_input() {
        let results = vec![
            RetrievalResult::new("a", 0.9, Source::Vector),
            RetrievalResult::new("b", 0.8, Source::Vector),
            RetrievalResult::new("c", 0.7, Source::Vector),
        ];
        let original_count = results.len();
        let ranked = DiversityFilterStage::new(0.7).process(results);
        assert_eq!(ranked.len(), original_count);
    }

    #[test]
    fn short_input_is_passthrough() {
        let results = vec![RetrievalResult::new("only", 0.9, Source::Vector)];
        let ranked = DiversityFilterStage::new(0.7).process(results);
        assert!(!ranked[0].metadata.contains_key("mmr_score"));
    }

    proptest! {
        #[test]
        fn output_is_always_a_permutation_of_input(
            contents in proptest::collection::vec("[a-c]{1,3}", 0..10),
            lambda in 0.0f64..1.0,
        ) {
            let mut input_scores: Vec<(String, f64)> = contents
                .into_iter()
                .enumerate()
                .map(|(i, content)| (content, 1.0 - (i as f64) * 0.01))
                .collect();
            let results: Vec<RetrievalResult> = input_scores
                .iter()
                .map(|(content, score)| RetrievalResult::new(content.clone(), *score, Source::Vector))
                .collect();

            let ranked = DiversityFilterStage::new(lambda).process(results);

            prop_assert_eq!(ranked.len(), input_scores.len());
            let mut ranked_contents: Vec<String> = ranked.iter().map(|r| r.content.clone()).collect();
            ranked_contents.sort();
            let mut expected_contents: Vec<String> = input_scores.drain(..).map(|(c, _)| c).collect();
            expected_contents.sort();
            prop_assert_eq!(ranked_contents, expected_contents);
        }
    }
}
