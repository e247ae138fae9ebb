use retrieval_core::constants::RECALL_OVERSAMPLE_FACTOR;
use retrieval_core::context::StageContext;
use retrieval_core::result::RetrievalResult;
use serde_json::Value;
use tracing::warn;

use crate::fusion::FusionStage;
use crate::rank::{DiversityFilterStage, IntentAdaptiveStage, SemanticRerankStage};
use crate::retrievers::{GraphRetriever, VectorRetriever};

/// Uniform contract every pipeline stage satisfies, whether it is one of
/// the built-ins below or a caller-supplied extension. A stage
/// must not panic; a stage that cannot proceed returns an empty vector and
/// lets the pipeline decide what that means for the overall run.
pub trait Stage: Send + Sync {
    fn process(&self, previous_results: Vec<RetrievalResult>, context: &mut StageContext) -> Vec<RetrievalResult>;
    fn name(&self) -> &str;
}

/// Retrieves from the vector backend. Ignores `previous_results` — this
/// stage is expected to run first in a pipeline, matching the source
/// system's convention that only the graph stage concatenates onto prior
/// output.
pub struct VectorRetrievalStage {
    retriever: VectorRetriever,
    weight: f64,
    min_score: f64,
}

impl VectorRetrievalStage {
    pub fn new(retriever: VectorRetriever, weight: f64, min_score: f64) -> Self {
        Self {
            retriever,
            weight,
            min_score,
        }
    }
}

impl Stage for VectorRetrievalStage {
    fn process(&self, _previous_results: Vec<RetrievalResult>, context: &mut StageContext) -> Vec<RetrievalResult> {
        let recall_k = context.top_k.saturating_mul(RECALL_OVERSAMPLE_FACTOR);
        let mut results = self.retriever.retrieve(&context.query, recall_k, self.min_score, None);
        for result in &mut results {
            result.score *= self.weight;
            result
                .metadata
                .insert("retrieval_weight".to_string(), Value::from(self.weight));
        }
        results
    }

    fn name(&self) -> &str {
        "VectorRetrieval"
    }
}

/// Retrieves from the graph backend, with optional multi-hop expansion.
/// Prepends `previous_results` onto its own output, matching the source
/// system's graph-stage behavior of assuming it runs after another
/// retrieval stage in the chain.
pub struct GraphRetrievalStage {
    retriever: GraphRetriever,
    weight: f64,
}

impl GraphRetrievalStage {
    pub fn new(retriever: GraphRetriever, weight: f64) -> Self {
        Self { retriever, weight }
    }
}

impl Stage for GraphRetrievalStage {
    fn process(&self, previous_results: Vec<RetrievalResult>, context: &mut StageContext) -> Vec<RetrievalResult> {
        let recall_k = context.top_k.saturating_mul(RECALL_OVERSAMPLE_FACTOR);
        let mut results = self.retriever.retrieve(&context.query, recall_k);
        for result in &mut results {
            result.score *= self.weight;
            result
                .metadata
                .insert("retrieval_weight".to_string(), Value::from(self.weight));
        }

        if previous_results.is_empty() {
            results
        } else {
            let mut combined = previous_results;
            combined.extend(results.drain(..));
            combined
        }
    }

    fn name(&self) -> &str {
        "GraphRetrieval"
    }
}

/// Runs vector and graph retrieval concurrently on scoped threads and
/// concatenates their output (vector first, then graph), matching the
/// combined effect of running `VectorRetrievalStage` followed by
/// `GraphRetrievalStage` in sequence. Use this in place of the two separate
/// stages when the two backends are independent and fanning them out is
/// worth the thread setup cost.
pub struct ParallelRetrievalStage {
    vector: VectorRetrievalStage,
    graph: GraphRetrievalStage,
}

impl ParallelRetrievalStage {
    pub fn new(vector: VectorRetrievalStage, graph: GraphRetrievalStage) -> Self {
        Self { vector, graph }
    }
}

impl Stage for ParallelRetrievalStage {
    fn process(&self, previous_results: Vec<RetrievalResult>, context: &mut StageContext) -> Vec<RetrievalResult> {
        let top_k = context.top_k;
        let pipeline_name = context.pipeline_name.clone();
        let query_for_graph = context.query.clone();
        let pipeline_name_for_graph = pipeline_name.clone();
        let query = context.query.clone();

        let (vector_results, graph_results) = std::thread::scope(|scope| {
            let vector_handle = scope.spawn(move || {
                let mut ctx = StageContext::new(query, top_k, pipeline_name);
                self.vector.process(Vec::new(), &mut ctx)
            });
            let graph_handle = scope.spawn(move || {
                let mut ctx = StageContext::new(query_for_graph, top_k, pipeline_name_for_graph);
                self.graph.process(Vec::new(), &mut ctx)
            });
            (
                vector_handle.join().unwrap_or_default(),
                graph_handle.join().unwrap_or_default(),
            )
        });

        let mut combined = previous_results;
        combined.extend(vector_results);
        combined.extend(graph_results);
        combined
    }

    fn name(&self) -> &str {
        "ParallelRetrieval"
    }
}

impl Stage for FusionStage {
    fn process(&self, previous_results: Vec<RetrievalResult>, _context: &mut StageContext) -> Vec<RetrievalResult> {
        if previous_results.is_empty() {
            warn!("fusion stage received no previous results");
        }
        self.process(previous_results)
    }

    fn name(&self) -> &str {
        "Fusion"
    }
}

impl Stage for IntentAdaptiveStage {
    fn process(&self, previous_results: Vec<RetrievalResult>, context: &mut StageContext) -> Vec<RetrievalResult> {
        self.process(&context.query, previous_results)
    }

    fn name(&self) -> &str {
        "IntentAdaptive"
    }
}

impl Stage for SemanticRerankStage {
    fn process(&self, previous_results: Vec<RetrievalResult>, context: &mut StageContext) -> Vec<RetrievalResult> {
        self.process(&context.query, previous_results)
    }

    fn name(&self) -> &str {
        "SemanticRerank"
    }
}

impl Stage for DiversityFilterStage {
    fn process(&self, previous_results: Vec<RetrievalResult>, _context: &mut StageContext) -> Vec<RetrievalResult> {
        self.process(previous_results)
    }

    fn name(&self) -> &str {
        "Diversity"
    }
}

/// Closed set of built-in stages, plus one escape hatch for caller-supplied
/// extensions. A sum type on the hot path avoids indirect dispatch for the
/// stages every pipeline actually uses, while `Custom` keeps the pipeline
/// open to extension without a recompile.
pub enum StageKind {
    VectorRetrieval(VectorRetrievalStage),
    GraphRetrieval(GraphRetrievalStage),
    ParallelRetrieval(ParallelRetrievalStage),
    Fusion(FusionStage),
    IntentAdaptive(IntentAdaptiveStage),
    SemanticRerank(SemanticRerankStage),
    Diversity(DiversityFilterStage),
    Custom(Box<dyn Stage>),
}

impl Stage for StageKind {
    fn process(&self, previous_results: Vec<RetrievalResult>, context: &mut StageContext) -> Vec<RetrievalResult> {
        match self {
            StageKind::VectorRetrieval(s) => Stage::process(s, previous_results, context),
            StageKind::GraphRetrieval(s) => Stage::process(s, previous_results, context),
            StageKind::ParallelRetrieval(s) => Stage::process(s, previous_results, context),
            StageKind::Fusion(s) => Stage::process(s, previous_results, context),
            StageKind::IntentAdaptive(s) => Stage::process(s, previous_results, context),
            StageKind::SemanticRerank(s) => Stage::process(s, previous_results, context),
            StageKind::Diversity(s) => Stage::process(s, previous_results, context),
            StageKind::Custom(s) => s.process(previous_results, context),
        }
    }

    fn name(&self) -> &str {
        match self {
            StageKind::VectorRetrieval(s) => s.name(),
            StageKind::GraphRetrieval(s) => s.name(),
            StageKind::ParallelRetrieval(s) => s.name(),
            StageKind::Fusion(s) => Stage::name(s),
            StageKind::IntentAdaptive(s) => s.name(),
            StageKind::SemanticRerank(s) => s.name(),
            StageKind::Diversity(s) => s.name(),
            StageKind::Custom(s) => s.name(),
        }
    }
}
