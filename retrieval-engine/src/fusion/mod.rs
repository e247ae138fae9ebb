pub mod rrf;
pub mod weighted;

use retrieval_core::result::RetrievalResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusionMethod {
    WeightedSum,
    Rrf,
}

/// Merges multi-source results by document identity. Returns an
/// empty list unchanged if `previous_results` was already empty — there is
/// nothing to merge.
pub struct FusionStage {
    method: FusionMethod,
    rrf_k: u32,
}

impl FusionStage {
    pub fn new(method: FusionMethod, rrf_k: u32) -> Self {
        Self { method, rrf_k }
    }

    pub fn process(&self, previous_results: Vec<RetrievalResult>) -> Vec<RetrievalResult> {
        if previous_results.is_empty() {
            return Vec::new();
        }
        match self.method {
            FusionMethod::WeightedSum => weighted::fuse(previous_results),
            FusionMethod::Rrf => rrf::fuse(previous_results, self.rrf_k),
        }
    }
}
