//! Tunable constants that are not exposed through [`crate::config`] because
//! they are structural rather than deployment-specific.

/// Hard cap on the number of seed documents expanded by graph multi-hop
/// traversal, regardless of configuration.
pub const MAX_MULTI_HOP_SEEDS: usize = 5;

/// Hard cap on `max_hops`, independent of any configured value.
pub const MAX_HOPS_CAP: u8 = 3;

/// Default reciprocal-rank-fusion constant `k`.
pub const DEFAULT_RRF_K: u32 = 60;

/// Default maximal-marginal-relevance trade-off parameter.
pub const DEFAULT_MMR_LAMBDA: f64 = 0.7;

/// Default cascade confidence threshold.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Oversampling multiplier applied by retrievers before truncating to `top_k`.
pub const RECALL_OVERSAMPLE_FACTOR: usize = 2;

/// Number of top results considered for model-mode reranking and for
/// multi-hop expansion seeding.
pub const RERANK_WINDOW: usize = 10;
