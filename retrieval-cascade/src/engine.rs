use std::collections::HashMap;

use retrieval_core::errors::CascadeError;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::cache::InferenceCache;

/// Which tier produced an [`InferenceResult`]. `Ensemble` marks a result
/// chosen by the ensemble fallback strategy rather than the cascade ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InferenceLevel {
    Rule,
    FastModel,
    Llm,
    Ensemble,
}

impl InferenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferenceLevel::Rule => "rule",
            InferenceLevel::FastModel => "fast_model",
            InferenceLevel::Llm => "llm",
            InferenceLevel::Ensemble => "ensemble",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackStrategy {
    Cascade,
    Ensemble,
}

/// The outcome of one `infer` call, whether served from cache or computed
/// fresh — the two are indistinguishable to a caller.
#[derive(Debug, Clone)]
pub struct InferenceResult<V> {
    pub value: Option<V>,
    pub confidence: f64,
    pub level: InferenceLevel,
    pub metadata: HashMap<String, Value>,
}

impl<V> InferenceResult<V> {
    pub fn new(value: V, confidence: f64, level: InferenceLevel) -> Self {
        Self {
            value: Some(value),
            confidence,
            level,
            metadata: HashMap::new(),
        }
    }

    pub fn failed(level: InferenceLevel, reason: impl Into<String>) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("error".to_string(), Value::String(reason.into()));
        Self {
            value: None,
            confidence: 0.0,
            level,
            metadata,
        }
    }
}

impl<V: PartialEq> PartialEq for InferenceResult<V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.confidence == other.confidence
            && self.level == other.level
    }
}

/// One tier of the cascade ladder. `I` is the input type, `V` the value a
/// successful inference produces.
pub trait CascadeLevel<I, V>: Send + Sync {
    fn infer(&self, input: &I, context: Option<&HashMap<String, Value>>) -> Result<InferenceResult<V>, CascadeError>;
    fn get_level(&self) -> InferenceLevel;
    fn get_name(&self) -> &str;
}

/// Confidence-gated multi-tier inference engine. Generic over the
/// input type so the same mechanism backs both the intent classifier
/// (`I = str`) and the NER helper (`I = str`) without either owning the
/// other's logic.
pub struct CascadeEngine<I, V: Clone + Send + Sync + 'static> {
    levels: Vec<Box<dyn CascadeLevel<I, V>>>,
    confidence_threshold: f64,
    fallback_strategy: FallbackStrategy,
    cache: Option<InferenceCache<InferenceResult<V>>>,
    hasher: Box<dyn Fn(&I) -> u64 + Send + Sync>,
}

impl<I, V: Clone + Send + Sync + 'static> CascadeEngine<I, V> {
    /// `hasher` replaces the source system's identity-based cache keying
    /// it must be deterministic across calls for equal
    /// inputs. There is intentionally no fallback to an identity hash.
    pub fn new(
        confidence_threshold: f64,
        fallback_strategy: FallbackStrategy,
        enable_cache: bool,
        hasher: impl Fn(&I) -> u64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            levels: Vec::new(),
            confidence_threshold,
            fallback_strategy,
            cache: if enable_cache {
                Some(InferenceCache::new(10_000))
            } else {
                None
            },
            hasher: Box::new(hasher),
        }
    }

    pub fn add_level(mut self, level: Box<dyn CascadeLevel<I, V>>) -> Self {
        self.levels.push(level);
        self
    }

    pub fn infer(
        &self,
        input: &I,
        context: Option<&HashMap<String, Value>>,
        force_level: Option<InferenceLevel>,
    ) -> Result<InferenceResult<V>, CascadeError> {
        if self.levels.is_empty() {
            return Err(CascadeError::NoLevels);
        }

        let cache_key = (self.hasher)(input);
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(cache_key) {
                debug!("cascade cache hit");
                return Ok(hit);
            }
        }

        let result = if let Some(forced) = force_level {
            match self.levels.iter().find(|l| l.get_level() == forced) {
                Some(level) => level
                    .infer(input, context)
                    .unwrap_or_else(|e| InferenceResult::failed(forced, e.to_string())),
                None => {
                    warn!(
                        level = forced.as_str(),
                        "forced level not registered, falling back to cascade"
                    );
                    self.run_cascade(input, context)?
                }
            }
        } else {
            match self.fallback_strategy {
                FallbackStrategy::Cascade => self.run_cascade(input, context)?,
                FallbackStrategy::Ensemble => self.run_ensemble(input, context)?,
            }
        };

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, result.clone());
        }
        Ok(result)
    }

    fn run_cascade(
        &self,
        input: &I,
        context: Option<&HashMap<String, Value>>,
    ) -> Result<InferenceResult<V>, CascadeError> {
        let last_index = self.levels.len() - 1;
        for (i, level) in self.levels.iter().enumerate() {
            let is_last = i == last_index;
            match level.infer(input, context) {
                Ok(result) if result.confidence >= self.confidence_threshold || is_last => {
                    return Ok(result);
                }
                Ok(_) => continue,
                Err(e) if is_last => {
                    error!(level = level.get_name(), error = %e, "final cascade level failed");
                    return Ok(InferenceResult::failed(level.get_level(), e.to_string()));
                }
                Err(e) => {
                    warn!(level = level.get_name(), error = %e, "cascade level failed, advancing");
                    continue;
                }
            }
        }
        unreachable!("levels is non-empty, loop always returns")
    }

    fn run_ensemble(
        &self,
        input: &I,
        context: Option<&HashMap<String, Value>>,
    ) -> Result<InferenceResult<V>, CascadeError> {
        let mut results = Vec::new();
        for level in &self.levels {
            match level.infer(input, context) {
                Ok(result) => results.push(result),
                Err(e) => warn!(level = level.get_name(), error = %e, "ensemble level failed"),
            }
        }
        results
            .into_iter()
            .max_by(|a, b| a.confidence.partial_cmp(&b.confidence).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or(CascadeError::AllLevelsFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysLowConfidence;
    impl CascadeLevel<String, i32> for AlwaysLowConfidence {
        fn infer(&self, _input: &String, _ctx: Option<&HashMap<String, Value>>) -> Result<InferenceResult<i32>, CascadeError> {
            Ok(InferenceResult::new(1, 0.4, InferenceLevel::Rule))
        }
        fn get_level(&self) -> InferenceLevel {
            InferenceLevel::Rule
        }
        fn get_name(&self) -> &str {
            "rule"
        }
    }

    struct AlwaysHighConfidence;
    impl CascadeLevel<String, i32> for AlwaysHighConfidence {
        fn infer(&self, _input: &String, _ctx: Option<&HashMap<String, Value>>) -> Result<InferenceResult<i32>, CascadeError> {
            Ok(InferenceResult::new(2, 0.9, InferenceLevel::Llm))
        }
        fn get_level(&self) -> InferenceLevel {
            InferenceLevel::Llm
        }
        fn get_name(&self) -> &str {
            "llm"
        }
    }

    fn str_hasher(s: &String) -> u64 {
        crate::cache::hash_str(s)
    }

    #[test]
    fn cascade_escalates_past_low_confidence() {
        let engine = CascadeEngine::new(0.7, FallbackStrategy::Cascade, true, str_hasher)
            .add_level(Box::new(AlwaysLowConfidence))
            .add_level(Box::new(AlwaysHighConfidence));
        let result = engine.infer(&"x".to_string(), None, None).unwrap();
        assert_eq!(result.level, InferenceLevel::Llm);
        assert_eq!(result.value, Some(2));
    }

    #[test]
    fn cascade_returns_last_level_even_below_threshold() {
        let engine = CascadeEngine::new(0.7, FallbackStrategy::Cascade, true, str_hasher)
            .add_level(Box::new(AlwaysLowConfidence));
        let result = engine.infer(&"x".to_string(), None, None).unwrap();
        assert_eq!(result.level, InferenceLevel::Rule);
        assert_eq!(result.value, Some(1));
    }

    #[test]
    fn second_call_is_served_from_cache() {
        let engine = CascadeEngine::new(0.7, FallbackStrategy::Cascade, true, str_hasher)
            .add_level(Box::new(AlwaysHighConfidence));
        let first = engine.infer(&"x".to_string(), None, None).unwrap();
        let second = engine.infer(&"x".to_string(), None, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn ensemble_picks_highest_confidence() {
        let engine = CascadeEngine::new(0.7, FallbackStrategy::Ensemble, false, str_hasher)
            .add_level(Box::new(AlwaysLowConfidence))
            .add_level(Box::new(AlwaysHighConfidence));
        let result = engine.infer(&"x".to_string(), None, None).unwrap();
        assert_eq!(result.level, InferenceLevel::Llm);
    }

    #[test]
    fn no_levels_is_an_error() {
        let engine: CascadeEngine<String, i32> =
            CascadeEngine::new(0.7, FallbackStrategy::Cascade, true, str_hasher);
        assert!(engine.infer(&"x".to_string(), None, None).is_err());
    }
}
