use retrieval_cascade::intent::{Intent, SourceClass, WeightMatrix};
use retrieval_cascade::IntentClassifier;
use retrieval_core::result::RetrievalResult;
use serde_json::Value;
use tracing::debug;

/// Classifies the query's intent and reweights each result by the source
/// class its retriever produced it from. Every result, regardless of
/// whether it matched a vector- or graph-flavored source, leaves this stage
/// carrying the same `detected_intent`.
pub struct IntentAdaptiveStage {
    classifier: IntentClassifier,
    weights: WeightMatrix,
}

impl IntentAdaptiveStage {
    pub fn new(classifier: IntentClassifier, weights: WeightMatrix) -> Self {
        Self { classifier, weights }
    }

    pub fn process(&self, query: &str, mut results: Vec<RetrievalResult>) -> Vec<RetrievalResult> {
        if results.is_empty() {
            return results;
        }

        let classification = self.classifier.classify(query);
        let intent = classification.value.unwrap_or(Intent::Factual);
        debug!(intent = intent.as_str(), confidence = classification.confidence, "intent classified");

        for result in &mut results {
            let source_class = source_class_of(result);
            let multiplier = match source_class {
                Some(class) => self.weights.boost(intent, class),
                None => 1.0,
            };
            result.score *= multiplier;
            result
                .metadata
                .insert("detected_intent".to_string(), Value::String(intent.as_str().to_string()));
            result
                .metadata
                .insert("intent_adjustment".to_string(), Value::from(multiplier));
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results
    }
}

/// Reads the write-once `source_stage` tag (falling back to the mutable
/// `stage` tag for results that predate it) and classifies it as a vector-
/// or graph-flavored source, or neither (e.g. post-fusion results).
fn source_class_of(result: &RetrievalResult) -> Option<SourceClass> {
    let stage = result.source_stage()?;
    if stage.contains("Vector") {
        Some(SourceClass::Vector)
    } else if stage.contains("Graph") {
        Some(SourceClass::Graph)
    } else {
        None
    }
}
