use std::collections::HashMap;

use retrieval_core::result::{RetrievalResult, Source};
use serde_json::Value;

/// Reciprocal Rank Fusion, partitioned by `metadata.source_stage` — the
/// write-once retrieval-origin tag, not the mutable `metadata.stage` key,
/// which every downstream stage (including this one) overwrites. Using
/// `stage` as the partition key is wrong: by the time fusion runs, `stage`
/// no longer reflects which retriever actually produced the result.
pub fn fuse(results: Vec<RetrievalResult>, k: u32) -> Vec<RetrievalResult> {
    let mut partitions: HashMap<String, Vec<RetrievalResult>> = HashMap::new();
    for result in results {
        let key = result
            .source_stage()
            .map(str::to_string)
            .unwrap_or_else(|| "unknown".to_string());
        partitions.entry(key).or_default().push(result);
    }

    let mut rrf_scores: HashMap<String, f64> = HashMap::new();
    let mut first_seen: HashMap<String, RetrievalResult> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for (_source, mut group) in partitions {
        group.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        for (rank, result) in group.into_iter().enumerate() {
            let doc_key = result
                .doc_id()
                .map(str::to_string)
                .unwrap_or_else(|| format!("unknown_{}", order.len()));
            let contribution = 1.0 / (k as f64 + rank as f64 + 1.0);
            *rrf_scores.entry(doc_key.clone()).or_insert(0.0) += contribution;
            first_seen.entry(doc_key.clone()).or_insert_with(|| {
                order.push(doc_key.clone());
                result
            });
        }
    }

    let mut fused: Vec<RetrievalResult> = order
        .into_iter()
        .map(|key| {
            let mut result = first_seen.remove(&key).expect("key was just inserted");
            result.score = rrf_scores.remove(&key).unwrap_or(0.0);
            result.source = Source::Fused;
            result
                .metadata
                .insert("fusion_method".to_string(), Value::String("rrf".to_string()));
            result.set_stage("Fusion");
            result
        })
        .collect();

    fused.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    fused
}
