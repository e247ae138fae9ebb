use std::collections::HashMap;

use retrieval_core::result::{RetrievalResult, Source};
use serde_json::Value;

/// Groups by `doc_id`, summing scores and unioning source tags into
/// `fused_sources`. Results without a `doc_id` pass through as singletons
/// keyed by their position in `results` (there is no object identity to
/// hash in Rust, unlike the `id()`-keyed fallback this is grounded on).
pub fn fuse(results: Vec<RetrievalResult>) -> Vec<RetrievalResult> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, (RetrievalResult, f64, Vec<String>)> = HashMap::new();

    for (index, result) in results.into_iter().enumerate() {
        let key = result
            .doc_id()
            .map(str::to_string)
            .unwrap_or_else(|| format!("unknown_{index}"));
        let source_tag = result
            .source_stage()
            .map(str::to_string)
            .unwrap_or_else(|| "unknown".to_string());

        match groups.get_mut(&key) {
            Some((_first, score, sources)) => {
                *score += result.score;
                if !sources.contains(&source_tag) {
                    sources.push(source_tag);
                }
            }
            None => {
                order.push(key.clone());
                groups.insert(key, (result.clone(), result.score, vec![source_tag]));
            }
        }
    }

    let mut fused: Vec<RetrievalResult> = order
        .into_iter()
        .map(|key| {
            let (mut result, score, sources) = groups.remove(&key).expect("key was just inserted");
            result.score = score;
            result.source = Source::Fused;
            result
                .metadata
                .insert("fusion_method".to_string(), Value::String("weighted_sum".to_string()));
            result
                .metadata
                .insert("fused_sources".to_string(), Value::from(sources));
            result.set_stage("Fusion");
            result
        })
        .collect();

    fused.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    fused
}
