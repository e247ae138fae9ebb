mod defaults;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    pub top_k: usize,
    pub min_score: f64,
    pub weight: f64,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            top_k: defaults::DEFAULT_VECTOR_TOP_K,
            min_score: defaults::DEFAULT_VECTOR_MIN_SCORE,
            weight: defaults::DEFAULT_VECTOR_WEIGHT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub top_k: usize,
    pub weight: f64,
    pub enable_multi_hop: bool,
    pub max_hops: u8,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            top_k: defaults::DEFAULT_GRAPH_TOP_K,
            weight: defaults::DEFAULT_GRAPH_WEIGHT,
            enable_multi_hop: defaults::DEFAULT_GRAPH_ENABLE_MULTI_HOP,
            max_hops: defaults::DEFAULT_GRAPH_MAX_HOPS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub method: String,
    pub rrf_k: u32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            method: defaults::DEFAULT_FUSION_METHOD.to_string(),
            rrf_k: defaults::DEFAULT_FUSION_RRF_K,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    pub enabled: bool,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_INTENT_ENABLED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankConfig {
    pub use_model: bool,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            use_model: defaults::DEFAULT_RERANK_USE_MODEL,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiversityConfig {
    pub lambda: f64,
}

impl Default for DiversityConfig {
    fn default() -> Self {
        Self {
            lambda: defaults::DEFAULT_DIVERSITY_LAMBDA,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    pub confidence_threshold: f64,
    pub enable_cache: bool,
    pub fallback_strategy: String,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: defaults::DEFAULT_CASCADE_CONFIDENCE_THRESHOLD,
            enable_cache: defaults::DEFAULT_CASCADE_ENABLE_CACHE,
            fallback_strategy: defaults::DEFAULT_CASCADE_FALLBACK_STRATEGY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub tracing_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::DEFAULT_OBSERVABILITY_LOG_LEVEL.to_string(),
            tracing_enabled: defaults::DEFAULT_OBSERVABILITY_TRACING_ENABLED,
        }
    }
}

/// Root configuration, assembled from defaults and overridden by whatever a
/// caller's TOML actually sets. Every nested config is `#[serde(default)]`
/// so a caller may specify only the fields they care to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSystemConfig {
    pub vector: VectorConfig,
    pub graph: GraphConfig,
    pub fusion: FusionConfig,
    pub intent: IntentConfig,
    pub rerank: RerankConfig,
    pub diversity: DiversityConfig,
    pub cascade: CascadeConfig,
    pub observability: ObservabilityConfig,
}

impl RetrievalSystemConfig {
    /// Parses `toml_str` and merges it over defaults field-by-field. An
    /// empty string yields all-defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, CoreError> {
        if toml_str.trim().is_empty() {
            debug!("no config supplied, using all defaults");
            return Ok(Self::default());
        }
        toml::from_str(toml_str).map_err(|e| {
            warn!(error = %e, "failed to parse retrieval system config");
            CoreError::Config(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_all_defaults() {
        let config = RetrievalSystemConfig::from_toml("").unwrap();
        assert_eq!(config.vector.top_k, 10);
        assert_eq!(config.graph.max_hops, 2);
        assert_eq!(config.fusion.rrf_k, 60);
        assert_eq!(config.cascade.confidence_threshold, 0.7);
        assert_eq!(config.diversity.lambda, 0.7);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let toml_str = r#"
            [vector]
            top_k = 25

            [cascade]
            confidence_threshold = 0.9
        "#;
        let config = RetrievalSystemConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.vector.top_k, 25);
        assert_eq!(config.vector.weight, 1.0);
        assert_eq!(config.cascade.confidence_threshold, 0.9);
        assert!(config.cascade.enable_cache);
    }
}
