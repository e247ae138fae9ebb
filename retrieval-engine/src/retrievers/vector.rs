use std::collections::HashMap;
use std::sync::Arc;

use retrieval_core::result::{RetrievalResult, Source};
use retrieval_core::traits::IVectorStore;
use serde_json::Value;
use tracing::{error, warn};

/// Wraps an [`IVectorStore`] and an embedding provider behind the same
/// shape every retriever in this crate exposes: embed once, oversample,
/// convert, and never let a backend error escape.
pub struct VectorRetriever {
    store: Arc<dyn IVectorStore>,
    embedder: Arc<dyn retrieval_core::traits::IEmbeddingProvider>,
}

impl VectorRetriever {
    pub fn new(
        store: Arc<dyn IVectorStore>,
        embedder: Arc<dyn retrieval_core::traits::IEmbeddingProvider>,
    ) -> Self {
        Self { store, embedder }
    }

    /// `top_k` here is whatever the caller wants back, verbatim — the
    /// oversample-then-narrow policy lives in [`crate::stage`], which asks
    /// for `2 * top_k` before applying weights and handing results onward.
    pub fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        min_score: f64,
        filters: Option<&HashMap<String, Value>>,
    ) -> Vec<RetrievalResult> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let embedding = match self.embedder.embed_text(query) {
            Ok(e) => e,
            Err(e) => {
                error!(error = %e, "vector retriever embedding failed");
                return Vec::new();
            }
        };

        let hits = match self.store.search(&embedding.vector, top_k, filters) {
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, "vector backend query failed");
                return Vec::new();
            }
        };

        let mut results: Vec<RetrievalResult> = hits
            .into_iter()
            .filter(|hit| hit.score >= min_score)
            .map(|hit| {
                let mut result = RetrievalResult::new(
                    hit.content.unwrap_or_default(),
                    hit.score,
                    Source::Vector,
                );
                result.metadata = hit.metadata;
                result
                    .metadata
                    .insert("doc_id".to_string(), Value::String(hit.doc_id));
                result.set_stage("VectorRetrieval");
                result.set_source_stage_if_absent("VectorRetrieval");
                result
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);
        results
    }
}
