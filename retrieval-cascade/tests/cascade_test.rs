use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Mutex;

use retrieval_cascade::{CascadeEngine, CascadeLevel, FallbackStrategy, InferenceLevel, InferenceResult};
use retrieval_core::errors::CascadeError;
use serde_json::Value;

struct CountingLevel {
    confidence: f64,
    level: InferenceLevel,
    calls: Mutex<Cell<u32>>,
}

impl CountingLevel {
    fn new(confidence: f64, level: InferenceLevel) -> Self {
        Self {
            confidence,
            level,
            calls: Mutex::new(Cell::new(0)),
        }
    }

    fn call_count(&self) -> u32 {
        self.calls.lock().unwrap().get()
    }
}

impl CascadeLevel<String, &'static str> for CountingLevel {
    fn infer(
        &self,
        _input: &String,
        _context: Option<&HashMap<String, Value>>,
    ) -> Result<InferenceResult<&'static str>, CascadeError> {
        let cell = self.calls.lock().unwrap();
        cell.set(cell.get() + 1);
        Ok(InferenceResult::new("value", self.confidence, self.level))
    }

    fn get_level(&self) -> InferenceLevel {
        self.level
    }

    fn get_name(&self) -> &str {
        "counting"
    }
}

#[test]
fn scenario_cascade_fallback_and_caching() {
    let rule = std::sync::Arc::new(CountingLevel::new(0.4, InferenceLevel::Rule));
    let llm = std::sync::Arc::new(CountingLevel::new(0.9, InferenceLevel::Llm));

    struct ArcLevel(std::sync::Arc<CountingLevel>);
    impl CascadeLevel<String, &'static str> for ArcLevel {
        fn infer(
            &self,
            input: &String,
            context: Option<&HashMap<String, Value>>,
        ) -> Result<InferenceResult<&'static str>, CascadeError> {
            self.0.infer(input, context)
        }
        fn get_level(&self) -> InferenceLevel {
            self.0.get_level()
        }
        fn get_name(&self) -> &str {
            self.0.get_name()
        }
    }

    let engine = CascadeEngine::new(
        0.7,
        FallbackStrategy::Cascade,
        true,
        retrieval_cascade::cache::hash_str,
    )
    .add_level(Box::new(ArcLevel(rule.clone())))
    .add_level(Box::new(ArcLevel(llm.clone())));

    let first = engine.infer(&"x".to_string(), None, None).unwrap();
    assert_eq!(first.level, InferenceLevel::Llm);
    assert_eq!(rule.call_count(), 1);
    assert_eq!(llm.call_count(), 1);

    let second = engine.infer(&"x".to_string(), None, None).unwrap();
    assert_eq!(second.level, InferenceLevel::Llm);
    assert_eq!(rule.call_count(), 1, "cache hit must not re-invoke levels");
    assert_eq!(llm.call_count(), 1, "cache hit must not re-invoke levels");
}
