use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provenance tag for a [`RetrievalResult`]. Closed set: a retriever or stage
/// that needs a finer-grained label records it in `metadata` instead of
/// growing this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Vector,
    Graph,
    GraphExpanded,
    Fused,
    Unknown,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Vector => "vector",
            Source::Graph => "graph",
            Source::GraphExpanded => "graph_expanded",
            Source::Fused => "fused",
            Source::Unknown => "unknown",
        }
    }
}

impl Default for Source {
    fn default() -> Self {
        Source::Unknown
    }
}

/// A single hit produced by a retriever and carried through the pipeline.
///
/// `metadata` is an open bag; a handful of keys have contractual meaning
/// elsewhere in the pipeline (`doc_id`, `stage`, `source_stage`,
/// `detected_intent`, `fused_sources`, `mmr_score`) but nothing here enforces
/// their presence — stages that depend on one log and skip if it is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub content: String,
    pub metadata: HashMap<String, Value>,
    pub score: f64,
    pub source: Source,
}

impl RetrievalResult {
    pub fn new(content: impl Into<String>, score: f64, source: Source) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
            score,
            source,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn doc_id(&self) -> Option<&str> {
        self.metadata.get("doc_id").and_then(Value::as_str)
    }

    /// The retrieval-origin stage, written once by the retriever that first
    /// produced this result. Falls back to the mutable `stage` key for
    /// results that predate the `source_stage` convention (e.g. constructed
    /// directly by a test without going through a retriever).
    pub fn source_stage(&self) -> Option<&str> {
        self.metadata
            .get("source_stage")
            .or_else(|| self.metadata.get("stage"))
            .and_then(Value::as_str)
    }

    pub fn set_stage(&mut self, stage: impl Into<String>) {
        self.metadata
            .insert("stage".to_string(), Value::String(stage.into()));
    }

    /// Sets `source_stage` only if it is not already set — this key is
    /// write-once by design (Redesign Flags, Open Questions).
    pub fn set_source_stage_if_absent(&mut self, stage: impl Into<String>) {
        self.metadata
            .entry("source_stage".to_string())
            .or_insert_with(|| Value::String(stage.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn source_stage_falls_back_to_stage() {
        let mut r = RetrievalResult::new("x", 1.0, Source::Vector);
        r.set_stage("VectorRetrieval");
        assert_eq!(r.source_stage(), Some("VectorRetrieval"));
    }

    #[test]
    fn source_stage_is_write_once() {
        let mut r = RetrievalResult::new("x", 1.0, Source::Vector);
        r.set_source_stage_if_absent("VectorRetrieval");
        r.set_source_stage_if_absent("Fusion");
        assert_eq!(r.source_stage(), Some("VectorRetrieval"));
    }

    #[test]
    fn doc_id_reads_through_metadata() {
        let r = RetrievalResult::new("x", 1.0, Source::Vector)
            .with_metadata("doc_id", "d1");
        assert_eq!(r.doc_id(), Some("d1"));
    }

    proptest! {
        #[test]
        fn doc_id_round_trips_for_any_string(id in "[a-zA-Z0-9_-]{0,32}") {
            let r = RetrievalResult::new("x", 1.0, Source::Vector)
                .with_metadata("doc_id", id.clone());
            prop_assert_eq!(r.doc_id(), Some(id.as_str()));
        }

        #[test]
        fn source_stage_is_write_once_for_any_pair(first in "[a-zA-Z]{1,16}", second in "[a-zA-Z]{1,16}") {
            let mut r = RetrievalResult::new("x", 1.0, Source::Vector);
            r.set_source_stage_if_absent(first.clone());
            r.set_source_stage_if_absent(second);
            prop_assert_eq!(r.source_stage(), Some(first.as_str()));
        }
    }
}
