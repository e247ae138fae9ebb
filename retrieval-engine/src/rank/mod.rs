pub mod diversity;
pub mod intent_adaptive;
pub mod semantic_rerank;

pub use diversity::DiversityFilterStage;
pub use intent_adaptive::IntentAdaptiveStage;
pub use semantic_rerank::SemanticRerankStage;
