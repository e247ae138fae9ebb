pub mod keywords;
pub mod weight_matrix;

use std::collections::HashMap;
use std::sync::Arc;

use retrieval_core::constants::DEFAULT_CONFIDENCE_THRESHOLD;
use retrieval_core::errors::CascadeError;
use retrieval_core::traits::INamedEntityRecognizer;
use serde_json::Value;
use tracing::debug;

use crate::engine::{CascadeEngine, CascadeLevel, FallbackStrategy, InferenceLevel, InferenceResult};

pub use weight_matrix::{SourceClass, WeightMatrix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Factual,
    Temporal,
    Relational,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Factual => "factual",
            Intent::Temporal => "temporal",
            Intent::Relational => "relational",
        }
    }
}

/// Keyword lists consulted by the rule level. Overridable wholesale so a
/// deployment can retune classification without a code change.
#[derive(Debug, Clone)]
pub struct IntentKeywords {
    pub factual: Vec<String>,
    pub temporal: Vec<String>,
    pub relational: Vec<String>,
}

impl Default for IntentKeywords {
    fn default() -> Self {
        Self {
            factual: keywords::FACTUAL_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            temporal: keywords::TEMPORAL_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            relational: keywords::RELATIONAL_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

struct RuleKeywordLevel {
    keywords: IntentKeywords,
}

impl CascadeLevel<String, Intent> for RuleKeywordLevel {
    fn infer(
        &self,
        input: &String,
        _context: Option<&HashMap<String, Value>>,
    ) -> Result<InferenceResult<Intent>, CascadeError> {
        let lowered = input.to_lowercase();
        let matches = |list: &[String]| list.iter().any(|kw| lowered.contains(kw.as_str()));

        let intent = if matches(&self.keywords.relational) {
            Some(Intent::Relational)
        } else if matches(&self.keywords.temporal) {
            Some(Intent::Temporal)
        } else if matches(&self.keywords.factual) {
            Some(Intent::Factual)
        } else {
            None
        };

        Ok(match intent {
            Some(intent) => InferenceResult::new(intent, 1.0, InferenceLevel::Rule),
            None => InferenceResult::new(Intent::Factual, 0.0, InferenceLevel::Rule),
        })
    }

    fn get_level(&self) -> InferenceLevel {
        InferenceLevel::Rule
    }

    fn get_name(&self) -> &str {
        "rule_keyword"
    }
}

struct EntityDensityLevel {
    ner: Option<Arc<dyn INamedEntityRecognizer>>,
}

impl CascadeLevel<String, Intent> for EntityDensityLevel {
    fn infer(
        &self,
        input: &String,
        _context: Option<&HashMap<String, Value>>,
    ) -> Result<InferenceResult<Intent>, CascadeError> {
        let Some(ner) = &self.ner else {
            return Ok(InferenceResult::new(Intent::Factual, 0.5, InferenceLevel::FastModel));
        };

        let entity_count = ner
            .extract(input)
            .map(|entities| entities.len())
            .unwrap_or(0);
        debug!(entity_count, "entity-density intent fallback");

        if entity_count >= 3 {
            Ok(InferenceResult::new(Intent::Relational, 0.6, InferenceLevel::FastModel))
        } else {
            Ok(InferenceResult::new(Intent::Factual, 0.5, InferenceLevel::FastModel))
        }
    }

    fn get_level(&self) -> InferenceLevel {
        InferenceLevel::FastModel
    }

    fn get_name(&self) -> &str {
        "entity_density"
    }
}

/// Classifies a query into [`Intent`] via a two-level cascade: keyword rule
/// first, entity-density fallback second.
pub struct IntentClassifier {
    engine: CascadeEngine<String, Intent>,
}

impl IntentClassifier {
    pub fn new(ner: Option<Arc<dyn INamedEntityRecognizer>>, keywords: IntentKeywords) -> Self {
        Self::with_threshold(ner, keywords, DEFAULT_CONFIDENCE_THRESHOLD)
    }

    /// Same as [`Self::new`] but with a caller-supplied cascade confidence
    /// threshold, e.g. sourced from `RetrievalSystemConfig::cascade`.
    pub fn with_threshold(
        ner: Option<Arc<dyn INamedEntityRecognizer>>,
        keywords: IntentKeywords,
        confidence_threshold: f64,
    ) -> Self {
        let engine = CascadeEngine::new(
            confidence_threshold,
            FallbackStrategy::Cascade,
            true,
            crate::cache::hash_str,
        )
        .add_level(Box::new(RuleKeywordLevel { keywords }))
        .add_level(Box::new(EntityDensityLevel { ner }));

        Self { engine }
    }

    pub fn classify(&self, query: &str) -> InferenceResult<Intent> {
        self.engine
            .infer(&query.to_string(), None, None)
            .expect("intent cascade always has two levels")
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(None, IntentKeywords::default())
    }
}
