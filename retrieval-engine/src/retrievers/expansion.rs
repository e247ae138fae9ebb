use std::collections::HashSet;
use std::sync::Arc;

use retrieval_core::constants::{MAX_HOPS_CAP, MAX_MULTI_HOP_SEEDS};
use retrieval_core::result::{RetrievalResult, Source};
use retrieval_core::traits::IGraphStore;
use serde_json::Value;
use tracing::warn;

/// Expands the top five initial graph hits by up to `max_hops` edges,
/// decaying score by `0.7^distance`. A hard cap on both seeds
/// and hops bounds the traversal independent of configuration.
pub fn expand_multi_hop(
    store: &Arc<dyn IGraphStore>,
    initial: &[RetrievalResult],
    max_hops: u8,
) -> Vec<RetrievalResult> {
    let max_hops = max_hops.min(MAX_HOPS_CAP);
    let existing_doc_ids: HashSet<String> = initial
        .iter()
        .filter_map(|r| r.doc_id().map(str::to_string))
        .collect();

    let mut expanded = Vec::new();
    let mut seen: HashSet<String> = existing_doc_ids.clone();

    for seed in initial.iter().take(MAX_MULTI_HOP_SEEDS) {
        let Some(doc_id) = seed.doc_id() else {
            continue;
        };

        let related = match store.find_related_docs(doc_id, max_hops, 10) {
            Ok(related) => related,
            Err(e) => {
                warn!(doc_id, error = %e, "multi-hop expansion failed for seed, skipping");
                continue;
            }
        };

        for rel in related {
            if seen.contains(&rel.doc_id) {
                continue;
            }
            seen.insert(rel.doc_id.clone());

            let decay = 0.7_f64.powi(rel.distance as i32);
            let mut result = RetrievalResult::new("", seed.score * decay, Source::GraphExpanded);
            result.metadata.insert("doc_id".to_string(), Value::String(rel.doc_id));
            result.metadata.insert("hop_distance".to_string(), Value::from(rel.distance));
            result.metadata.insert(
                "base_doc_id".to_string(),
                Value::String(doc_id.to_string()),
            );
            if !rel.shared_entities.is_empty() {
                result.metadata.insert(
                    "shared_entities".to_string(),
                    Value::from(rel.shared_entities),
                );
            }
            result.set_stage("GraphRetrieval");
            result.set_source_stage_if_absent("GraphRetrieval");
            expanded.push(result);
        }
    }

    expanded
}
