use std::collections::HashSet;
use std::sync::Arc;

use retrieval_core::result::{RetrievalResult, Source};
use retrieval_core::traits::{IGraphStore, INamedEntityRecognizer};
use serde_json::Value;
use tracing::{error, warn};

use super::expansion::expand_multi_hop;

/// Entity-anchored retrieval over the graph backend, with optional
/// multi-hop expansion from the top initial hits.
pub struct GraphRetriever {
    store: Arc<dyn IGraphStore>,
    ner: Arc<dyn INamedEntityRecognizer>,
    enable_multi_hop: bool,
    max_hops: u8,
}

impl GraphRetriever {
    pub fn new(
        store: Arc<dyn IGraphStore>,
        ner: Arc<dyn INamedEntityRecognizer>,
        enable_multi_hop: bool,
        max_hops: u8,
    ) -> Self {
        Self {
            store,
            ner,
            enable_multi_hop,
            max_hops,
        }
    }

    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<RetrievalResult> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let entities = match self.ner.extract(query) {
            Ok(entities) => entities,
            Err(e) => {
                warn!(error = %e, "graph retriever entity extraction failed");
                Vec::new()
            }
        };
        if entities.is_empty() {
            return Vec::new();
        }
        let entity_texts: Vec<String> = entities.into_iter().map(|e| e.text).collect();

        let hits = match self.store.search_by_entities(&entity_texts, top_k * 2) {
            Ok(hits) => hits,
            Err(e) => {
                error!(error = %e, "graph backend query failed");
                return Vec::new();
            }
        };

        let mut results: Vec<RetrievalResult> = hits
            .into_iter()
            .map(|hit| {
                let mut result = RetrievalResult::new("", hit.score, Source::Graph);
                result
                    .metadata
                    .insert("doc_id".to_string(), Value::String(hit.doc_id));
                if !hit.matched_entities.is_empty() {
                    result.metadata.insert(
                        "matched_entities".to_string(),
                        Value::from(hit.matched_entities),
                    );
                }
                result.set_stage("GraphRetrieval");
                result.set_source_stage_if_absent("GraphRetrieval");
                result
            })
            .collect();

        if self.enable_multi_hop {
            let expanded = expand_multi_hop(&self.store, &results, self.max_hops);
            let mut seen: HashSet<String> = results
                .iter()
                .filter_map(|r| r.doc_id().map(str::to_string))
                .collect();
            for result in expanded {
                if let Some(doc_id) = result.doc_id() {
                    if seen.contains(doc_id) {
                        continue;
                    }
                    seen.insert(doc_id.to_string());
                }
                results.push(result);
            }
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);
        results
    }
}
