use std::collections::HashMap;

use serde_json::Value;

/// Shared, per-execution context threaded through every stage of a
/// pipeline run. The pipeline constructs this once per `execute` call and
/// owns it for the duration; stages read the fixed fields and may add their
/// own keys to `extra` (e.g. the Intent-Adaptive stage writes
/// `detected_intent`).
#[derive(Debug, Clone)]
pub struct StageContext {
    pub query: String,
    pub top_k: usize,
    pub pipeline_name: String,
    pub extra: HashMap<String, Value>,
}

impl StageContext {
    pub fn new(query: impl Into<String>, top_k: usize, pipeline_name: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k,
            pipeline_name: pipeline_name.into(),
            extra: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.extra.insert(key.into(), value.into());
    }
}
