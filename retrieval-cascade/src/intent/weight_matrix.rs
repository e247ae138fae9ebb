use std::collections::HashMap;

use super::Intent;

/// Which retrieval source a weight multiplier applies to. Named separately
/// from [`retrieval_core::Source`] because the weight table is indexed by
/// retrieval *stage flavor* (vector vs. graph), not by the closed
/// `RetrievalResult::source` tag, which also has `fused`/`unknown` members
/// that never carry a multiplier of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceClass {
    Vector,
    Graph,
}

/// Per-intent, per-source-class score multipliers. Overridable at
/// construction so deployments can retune without recompiling.
#[derive(Debug, Clone)]
pub struct WeightMatrix {
    weights: HashMap<Intent, HashMap<SourceClass, f64>>,
}

impl WeightMatrix {
    pub fn boost(&self, intent: Intent, source: SourceClass) -> f64 {
        self.weights
            .get(&intent)
            .and_then(|row| row.get(&source))
            .copied()
            .unwrap_or(1.0)
    }

    fn default_weights() -> HashMap<Intent, HashMap<SourceClass, f64>> {
        let mut weights = HashMap::new();

        let mut factual = HashMap::new();
        factual.insert(SourceClass::Vector, 1.2);
        factual.insert(SourceClass::Graph, 0.8);
        weights.insert(Intent::Factual, factual);

        let mut temporal = HashMap::new();
        temporal.insert(SourceClass::Vector, 1.0);
        temporal.insert(SourceClass::Graph, 1.0);
        weights.insert(Intent::Temporal, temporal);

        let mut relational = HashMap::new();
        relational.insert(SourceClass::Vector, 0.8);
        relational.insert(SourceClass::Graph, 1.2);
        weights.insert(Intent::Relational, relational);

        weights
    }
}

impl Default for WeightMatrix {
    fn default() -> Self {
        Self {
            weights: Self::default_weights(),
        }
    }
}
