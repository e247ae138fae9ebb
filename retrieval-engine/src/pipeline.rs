use std::sync::Arc;

use retrieval_core::config::RetrievalSystemConfig;
use retrieval_core::context::StageContext;
use retrieval_core::result::RetrievalResult;
use retrieval_core::traits::{IEmbeddingProvider, IGraphStore, ILanguageModelCaller, INamedEntityRecognizer, IVectorStore};
use retrieval_cascade::intent::{IntentKeywords, WeightMatrix};
use retrieval_cascade::IntentClassifier;
use tracing::{info, warn};

use crate::fusion::{FusionMethod, FusionStage};
use crate::rank::{DiversityFilterStage, IntentAdaptiveStage, SemanticRerankStage};
use crate::retrievers::{GraphRetriever, VectorRetriever};
use crate::stage::{GraphRetrievalStage, ParallelRetrievalStage, Stage, StageKind, VectorRetrievalStage};

/// Ordered container executing stages with a shared, per-execution context.
/// Strictly sequential: no concurrency across stages. A stage that
/// errors is caught at this boundary, logged, and treated as a no-op —
/// whatever result list the pipeline had before that stage runs is carried
/// forward unchanged.
pub struct Pipeline {
    name: String,
    stages: Vec<StageKind>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    pub fn add_stage(mut self, stage: StageKind) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn execute(&self, query: &str, top_k: usize) -> Vec<RetrievalResult> {
        if query.trim().is_empty() {
            warn!(pipeline = %self.name, "empty query, returning no results");
            return Vec::new();
        }
        if self.stages.is_empty() {
            warn!(pipeline = %self.name, "pipeline has no stages configured");
            return Vec::new();
        }

        let mut context = StageContext::new(query, top_k, self.name.clone());
        let mut results: Vec<RetrievalResult> = Vec::new();

        for stage in &self.stages {
            results = stage.process(results, &mut context);
        }

        info!(pipeline = %self.name, result_count = results.len(), "pipeline execution complete");
        results.truncate(top_k);
        results
    }

    /// Assembles a pipeline from a [`RetrievalSystemConfig`], threading each
    /// section's settings into the matching stage constructor. Vector and
    /// graph retrieval run through [`ParallelRetrievalStage`] rather than as
    /// two separate stages, so the fan-out this config wires up is concurrent
    /// by construction. `ner` is reused both for graph retrieval and, when
    /// `config.intent.enabled`, for intent classification's entity-density
    /// fallback level.
    pub fn from_config(
        name: impl Into<String>,
        config: &RetrievalSystemConfig,
        vector_store: Arc<dyn IVectorStore>,
        embedder: Arc<dyn IEmbeddingProvider>,
        graph_store: Arc<dyn IGraphStore>,
        ner: Arc<dyn INamedEntityRecognizer>,
        llm_caller: Option<Arc<dyn ILanguageModelCaller>>,
    ) -> Self {
        let vector_retriever = VectorRetriever::new(vector_store, embedder);
        let vector_stage = VectorRetrievalStage::new(vector_retriever, config.vector.weight, config.vector.min_score);

        let graph_retriever = GraphRetriever::new(
            graph_store,
            Arc::clone(&ner),
            config.graph.enable_multi_hop,
            config.graph.max_hops,
        );
        let graph_stage = GraphRetrievalStage::new(graph_retriever, config.graph.weight);

        let mut pipeline = Self::new(name).add_stage(StageKind::ParallelRetrieval(ParallelRetrievalStage::new(
            vector_stage,
            graph_stage,
        )));

        let fusion_method = match config.fusion.method.as_str() {
            "rrf" => FusionMethod::Rrf,
            _ => FusionMethod::WeightedSum,
        };
        pipeline = pipeline.add_stage(StageKind::Fusion(FusionStage::new(fusion_method, config.fusion.rrf_k)));

        if config.intent.enabled {
            let classifier = IntentClassifier::with_threshold(
                Some(ner),
                IntentKeywords::default(),
                config.cascade.confidence_threshold,
            );
            pipeline = pipeline.add_stage(StageKind::IntentAdaptive(IntentAdaptiveStage::new(
                classifier,
                WeightMatrix::default(),
            )));
        }

        let rerank_stage = match (config.rerank.use_model, llm_caller) {
            (true, Some(caller)) => SemanticRerankStage::model_mode(caller),
            _ => SemanticRerankStage::rule_mode(),
        };
        pipeline = pipeline.add_stage(StageKind::SemanticRerank(rerank_stage));

        pipeline.add_stage(StageKind::Diversity(DiversityFilterStage::new(config.diversity.lambda)))
    }
}

/// Builder alias kept distinct from [`Pipeline`] itself so call sites read
/// `PipelineBuilder::new(...).add_stage(...).build()` when that reads
/// better than chaining directly off `Pipeline::new`.
pub struct PipelineBuilder {
    pipeline: Pipeline,
}

impl PipelineBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            pipeline: Pipeline::new(name),
        }
    }

    pub fn add_stage(mut self, stage: StageKind) -> Self {
        self.pipeline = self.pipeline.add_stage(stage);
        self
    }

    pub fn build(self) -> Pipeline {
        self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrievers::VectorRetriever;
    use crate::stage::VectorRetrievalStage;
    use retrieval_core::traits::{EmbeddingResult, IEmbeddingProvider, IVectorStore, RetrievalOutcome, VectorHit};
    use std::collections::HashMap;
    use std::sync::Arc;

    struct StubEmbedder;
    impl IEmbeddingProvider for StubEmbedder {
        fn embed_text(&self, _text: &str) -> RetrievalOutcome<EmbeddingResult> {
            Ok(EmbeddingResult {
                vector: vec![0.0; 4],
                dimension: 4,
                model: "stub".to_string(),
            })
        }
        fn embed_batch(&self, texts: &[String]) -> RetrievalOutcome<Vec<EmbeddingResult>> {
            Ok(texts.iter().map(|_| EmbeddingResult {
                vector: vec![0.0; 4],
                dimension: 4,
                model: "stub".to_string(),
            }).collect())
        }
        fn get_dimension(&self) -> usize {
            4
        }
    }

    struct StubVectorStore {
        hits: Vec<VectorHit>,
    }
    impl IVectorStore for StubVectorStore {
        fn search(
            &self,
            _query_vector: &[f32],
            top_k: usize,
            _filters: Option<&HashMap<String, serde_json::Value>>,
        ) -> RetrievalOutcome<Vec<VectorHit>> {
            Ok(self.hits.iter().take(top_k).cloned().collect())
        }
    }

    fn hit(doc_id: &str, score: f64) -> VectorHit {
        VectorHit {
            doc_id: doc_id.to_string(),
            score,
            content: Some(doc_id.to_string()),
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn scenario_vector_only_path() {
        let store: Arc<dyn IVectorStore> = Arc::new(StubVectorStore {
            hits: vec![
                hit("d1", 0.9),
                hit("d2", 0.8),
                hit("d3", 0.7),
                hit("d4", 0.6),
                hit("d5", 0.5),
                hit("d6", 0.4),
            ],
        });
        let embedder: Arc<dyn IEmbeddingProvider> = Arc::new(StubEmbedder);
        let retriever = VectorRetriever::new(store, embedder);
        let stage = VectorRetrievalStage::new(retriever, 1.0, 0.0);

        let pipeline = Pipeline::new("vector_only").add_stage(StageKind::VectorRetrieval(stage));
        let results = pipeline.execute("query text", 3);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].doc_id(), Some("d1"));
        assert_eq!(results[1].doc_id(), Some("d2"));
        assert_eq!(results[2].doc_id(), Some("d3"));
        for r in &results {
            assert_eq!(r.metadata.get("stage").and_then(|v| v.as_str()), Some("VectorRetrieval"));
        }
    }

    #[test]
    fn empty_query_short_circuits() {
        let pipeline: Pipeline = Pipeline::new("noop");
        assert!(pipeline.execute("   ", 5).is_empty());
    }

    #[test]
    fn no_stages_returns_empty() {
        let pipeline = Pipeline::new("empty");
        assert!(pipeline.execute("query", 5).is_empty());
    }

    struct StubGraphStore;
    impl retrieval_core::traits::IGraphStore for StubGraphStore {
        fn search_by_entities(
            &self,
            _entities: &[String],
            top_k: usize,
        ) -> RetrievalOutcome<Vec<retrieval_core::traits::GraphHit>> {
            Ok((0..top_k.min(2))
                .map(|i| retrieval_core::traits::GraphHit {
                    doc_id: format!("g{i}"),
                    score: 0.8 - i as f64 * 0.1,
                    matched_entities: vec!["entity".to_string()],
                })
                .collect())
        }
        fn find_related_docs(
            &self,
            _doc_id: &str,
            _max_hops: u8,
            _limit: usize,
        ) -> RetrievalOutcome<Vec<retrieval_core::traits::RelatedDoc>> {
            Ok(Vec::new())
        }
    }

    struct NoEntities;
    impl retrieval_core::traits::INamedEntityRecognizer for NoEntities {
        fn extract(&self, _text: &str) -> RetrievalOutcome<Vec<retrieval_core::Entity>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn from_config_builds_a_working_pipeline() {
        let config = RetrievalSystemConfig::default();
        let store: Arc<dyn IVectorStore> = Arc::new(StubVectorStore {
            hits: vec![hit("d1", 0.9), hit("d2", 0.8), hit("d3", 0.7)],
        });
        let embedder: Arc<dyn IEmbeddingProvider> = Arc::new(StubEmbedder);
        let graph_store: Arc<dyn IGraphStore> = Arc::new(StubGraphStore);
        let ner: Arc<dyn INamedEntityRecognizer> = Arc::new(NoEntities);

        let pipeline = Pipeline::from_config("configured", &config, store, embedder, graph_store, ner, None);

        assert_eq!(
            pipeline.stage_names(),
            vec!["ParallelRetrieval", "Fusion", "IntentAdaptive", "SemanticRerank", "Diversity"]
        );

        let results = pipeline.execute("apple banana", 3);
        assert!(!results.is_empty());
    }
}
