//! Object-safe contracts for the external collaborators this crate does not
//! implement: vector store, graph store, embedding provider, language
//! model caller, and named-entity recognizer. All are synchronous and
//! `Send + Sync` plain `dyn Trait` backends rather than `async fn` traits.

use crate::entity::Entity;
use crate::errors::RetrievalError;

pub type RetrievalOutcome<T> = Result<T, RetrievalError>;

#[derive(Debug, Clone)]
pub struct VectorHit {
    pub doc_id: String,
    pub score: f64,
    pub content: Option<String>,
    pub metadata: std::collections::HashMap<String, serde_json::Value>,
}

/// A dense nearest-neighbor backend over a fixed-dimensional embedding space.
pub trait IVectorStore: Send + Sync {
    fn search(
        &self,
        query_vector: &[f32],
        top_k: usize,
        filters: Option<&std::collections::HashMap<String, serde_json::Value>>,
    ) -> RetrievalOutcome<Vec<VectorHit>>;
}

#[derive(Debug, Clone)]
pub struct GraphHit {
    pub doc_id: String,
    pub score: f64,
    pub matched_entities: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RelatedDoc {
    pub doc_id: String,
    pub score: f64,
    pub distance: u8,
    pub shared_entities: Vec<String>,
}

/// A labeled property-graph backend with temporal edge validity.
pub trait IGraphStore: Send + Sync {
    fn search_by_entities(
        &self,
        entities: &[String],
        top_k: usize,
    ) -> RetrievalOutcome<Vec<GraphHit>>;

    fn find_related_docs(
        &self,
        doc_id: &str,
        max_hops: u8,
        limit: usize,
    ) -> RetrievalOutcome<Vec<RelatedDoc>>;
}

#[derive(Debug, Clone)]
pub struct EmbeddingResult {
    pub vector: Vec<f32>,
    pub dimension: usize,
    pub model: String,
}

pub trait IEmbeddingProvider: Send + Sync {
    fn embed_text(&self, text: &str) -> RetrievalOutcome<EmbeddingResult>;
    fn embed_batch(&self, texts: &[String]) -> RetrievalOutcome<Vec<EmbeddingResult>>;
    fn get_dimension(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub usage: Option<u32>,
}

pub trait ILanguageModelCaller: Send + Sync {
    fn generate(
        &self,
        messages: &[ChatMessage],
        temperature: Option<f32>,
    ) -> RetrievalOutcome<LlmResponse>;
}

/// Named-entity recognition, shared by the intent classifier and graph
/// retriever. Implementations are expected to call
/// [`crate::entity::deduplicate_entities`] before returning.
pub trait INamedEntityRecognizer: Send + Sync {
    fn extract(&self, text: &str) -> RetrievalOutcome<Vec<Entity>>;
}
