use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Closed set of entity classes recognized by the NER helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Person,
    Location,
    Organization,
    Topic,
    Other,
}

/// A named entity extracted from text. Equality and hashing are by `text`
/// alone, matching the upstream convention this crate's NER helpers are
/// required to preserve: two spans with the same surface text are the same
/// entity for deduplication purposes, even if their scores or types differ
/// (the higher-scoring instance wins, see [`deduplicate_entities`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub score: f64,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Entity {
    pub fn new(text: impl Into<String>, entity_type: EntityType, score: f64) -> Self {
        Self {
            text: text.into(),
            entity_type,
            score,
            metadata: HashMap::new(),
        }
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}
impl Eq for Entity {}

impl std::hash::Hash for Entity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

/// Drops entities below `min_score` or shorter than `min_length` characters,
/// and (if `entity_types` is given) outside that allow-list.
pub fn filter_entities(
    entities: Vec<Entity>,
    min_score: f64,
    min_length: usize,
    entity_types: Option<&[EntityType]>,
) -> Vec<Entity> {
    entities
        .into_iter()
        .filter(|e| e.score >= min_score)
        .filter(|e| e.text.chars().count() >= min_length)
        .filter(|e| entity_types.map_or(true, |types| types.contains(&e.entity_type)))
        .collect()
}

/// Keeps the highest-scoring instance of each distinct `text`.
pub fn deduplicate_entities(entities: Vec<Entity>) -> Vec<Entity> {
    let mut best: HashMap<String, Entity> = HashMap::new();
    for e in entities {
        match best.get(&e.text) {
            Some(existing) if existing.score >= e.score => {}
            _ => {
                best.insert(e.text.clone(), e);
            }
        }
    }
    best.into_values().collect()
}
