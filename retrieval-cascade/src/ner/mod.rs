pub mod patterns;

use std::collections::HashMap;
use std::sync::Arc;

use retrieval_core::entity::{deduplicate_entities, Entity};
use retrieval_core::errors::{CascadeError, RetrievalError};
use retrieval_core::traits::{INamedEntityRecognizer, RetrievalOutcome};
use serde_json::Value;

use crate::engine::{CascadeEngine, CascadeLevel, FallbackStrategy, InferenceLevel, InferenceResult};

/// Default terminal NER level: regex/heuristic tagging of capitalized runs
/// and CJK name-shaped spans. No external calls, always succeeds.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedNer;

impl RuleBasedNer {
    fn extract_raw(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();

        for m in patterns::RE_CAPITALIZED_RUN.find_iter(text) {
            let span = m.as_str();
            let entity_type = patterns::classify_english_span(span);
            entities.push(Entity::new(span, entity_type, 0.6));
        }

        for m in patterns::RE_CJK_RUN.find_iter(text) {
            let span = m.as_str();
            let entity_type = patterns::classify_cjk_span(span);
            entities.push(Entity::new(span, entity_type, 0.6));
        }

        deduplicate_entities(entities)
    }
}

impl INamedEntityRecognizer for RuleBasedNer {
    fn extract(&self, text: &str) -> RetrievalOutcome<Vec<Entity>> {
        Ok(self.extract_raw(text))
    }
}

struct RuleNerLevel {
    ner: RuleBasedNer,
}

impl CascadeLevel<String, Vec<Entity>> for RuleNerLevel {
    fn infer(
        &self,
        input: &String,
        _context: Option<&HashMap<String, Value>>,
    ) -> Result<InferenceResult<Vec<Entity>>, CascadeError> {
        let entities = self.ner.extract_raw(input);
        let confidence = entities
            .iter()
            .map(|e| e.score)
            .fold(0.0_f64, f64::max);
        Ok(InferenceResult::new(entities, confidence, InferenceLevel::Rule))
    }

    fn get_level(&self) -> InferenceLevel {
        InferenceLevel::Rule
    }

    fn get_name(&self) -> &str {
        "rule_ner"
    }
}

struct LlmNerLevel {
    caller: Arc<dyn INamedEntityRecognizer>,
}

impl CascadeLevel<String, Vec<Entity>> for LlmNerLevel {
    fn infer(
        &self,
        input: &String,
        _context: Option<&HashMap<String, Value>>,
    ) -> Result<InferenceResult<Vec<Entity>>, CascadeError> {
        self.caller
            .extract(input)
            .map(|entities| {
                let confidence = entities.iter().map(|e| e.score).fold(0.0_f64, f64::max);
                InferenceResult::new(entities, confidence, InferenceLevel::Llm)
            })
            .map_err(|e: RetrievalError| CascadeError::LevelFailed {
                level: "llm_ner".to_string(),
                reason: e.to_string(),
            })
    }

    fn get_level(&self) -> InferenceLevel {
        InferenceLevel::Llm
    }

    fn get_name(&self) -> &str {
        "llm_ner"
    }
}

/// Cascade-backed NER: an optional higher-recall level (typically LLM-backed)
/// runs first if registered; the rule-based level is always the terminal
/// fallback so `extract` never fails outright.
pub struct CascadeNer {
    engine: CascadeEngine<String, Vec<Entity>>,
}

impl CascadeNer {
    pub fn new(high_recall_level: Option<Arc<dyn INamedEntityRecognizer>>, confidence_threshold: f64) -> Self {
        let mut engine = CascadeEngine::new(
            confidence_threshold,
            FallbackStrategy::Cascade,
            true,
            crate::cache::hash_str,
        );
        if let Some(caller) = high_recall_level {
            engine = engine.add_level(Box::new(LlmNerLevel { caller }));
        }
        engine = engine.add_level(Box::new(RuleNerLevel { ner: RuleBasedNer }));
        Self { engine }
    }
}

impl Default for CascadeNer {
    fn default() -> Self {
        Self::new(None, 0.7)
    }
}

impl INamedEntityRecognizer for CascadeNer {
    fn extract(&self, text: &str) -> RetrievalOutcome<Vec<Entity>> {
        let result = self
            .engine
            .infer(&text.to_string(), None, None)
            .map_err(|e| RetrievalError::BackendFailed {
                reason: e.to_string(),
            })?;
        Ok(result.value.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_chinese_names() {
        let ner = RuleBasedNer;
        let entities = ner.extract_raw("张三 和 李四 的 关系");
        let texts: Vec<_> = entities.iter().map(|e| e.text.as_str()).collect();
        assert!(texts.contains(&"张三"));
        assert!(texts.contains(&"李四"));
    }

    #[test]
    fn extracts_english_organization_by_suffix() {
        let ner = RuleBasedNer;
        let entities = ner.extract_raw("Acme Corp announced a merger");
        let org = entities
            .iter()
            .find(|e| e.text == "Acme Corp")
            .expect("Acme Corp detected");
        assert_eq!(org.entity_type, retrieval_core::entity::EntityType::Organization);
    }

    #[test]
    fn cascade_ner_falls_back_to_rule_level() {
        let ner = CascadeNer::default();
        let entities = ner.extract("张三 和 李四 的 关系").unwrap();
        assert!(entities.len() >= 2);
    }
}
