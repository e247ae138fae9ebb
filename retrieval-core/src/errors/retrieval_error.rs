/// Errors produced by retrievers, fusion, and ranking stages.
///
/// None of these are expected to reach a pipeline caller: the pipeline
/// catches and logs them at the stage boundary, preserving whatever result
/// list it had before the failing stage ran. They exist so internal
/// code and tests have a precise vocabulary for what went wrong.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("backend query failed: {reason}")]
    BackendFailed { reason: String },

    #[error("embedding call failed: {reason}")]
    EmbeddingFailed { reason: String },

    #[error("language model call failed: {reason}")]
    LanguageModelFailed { reason: String },

    #[error("pipeline has no stages configured")]
    EmptyPipeline,

    #[error("result list contained no usable candidates")]
    NoResults,
}
