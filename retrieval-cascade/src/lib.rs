//! Cascade inference engine shared by the intent classifier and the
//! named-entity recognizer: try a cheap level first, escalate only when
//! confidence is low.

pub mod cache;
pub mod engine;
pub mod intent;
pub mod ner;

pub use engine::{CascadeEngine, CascadeLevel, FallbackStrategy, InferenceLevel, InferenceResult};
pub use intent::{Intent, IntentClassifier};
pub use ner::{CascadeNer, RuleBasedNer};
