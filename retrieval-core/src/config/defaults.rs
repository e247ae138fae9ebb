use crate::constants::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MMR_LAMBDA, DEFAULT_RRF_K};

pub const DEFAULT_VECTOR_TOP_K: usize = 10;
pub const DEFAULT_VECTOR_MIN_SCORE: f64 = 0.0;
pub const DEFAULT_VECTOR_WEIGHT: f64 = 1.0;

pub const DEFAULT_GRAPH_TOP_K: usize = 10;
pub const DEFAULT_GRAPH_WEIGHT: f64 = 1.0;
pub const DEFAULT_GRAPH_ENABLE_MULTI_HOP: bool = true;
pub const DEFAULT_GRAPH_MAX_HOPS: u8 = 2;

pub const DEFAULT_FUSION_METHOD: &str = "weighted_sum";
pub const DEFAULT_FUSION_RRF_K: u32 = DEFAULT_RRF_K;

pub const DEFAULT_INTENT_ENABLED: bool = true;

pub const DEFAULT_RERANK_USE_MODEL: bool = false;

pub const DEFAULT_DIVERSITY_LAMBDA: f64 = DEFAULT_MMR_LAMBDA;

pub const DEFAULT_CASCADE_CONFIDENCE_THRESHOLD: f64 = DEFAULT_CONFIDENCE_THRESHOLD;
pub const DEFAULT_CASCADE_ENABLE_CACHE: bool = true;
pub const DEFAULT_CASCADE_FALLBACK_STRATEGY: &str = "cascade";

pub const DEFAULT_OBSERVABILITY_LOG_LEVEL: &str = "info";
pub const DEFAULT_OBSERVABILITY_TRACING_ENABLED: bool = false;
