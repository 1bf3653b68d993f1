use once_cell::sync::Lazy;
use serde_json::Value;

pub mod diff;
pub mod distribution;
pub mod edit;
pub mod errors;
pub mod extractor;
pub mod lexical;
pub mod ratios;
pub mod schema;
pub mod structure;
pub mod tokenize;
pub mod vector;

pub use diff::EditDiff;
pub use distribution::ReferenceDistribution;
pub use edit::Edit;
pub use errors::{FeatureError, FeatureResult};
pub use extractor::FeatureExtractor;
pub use lexical::BadWordLexicon;
pub use schema::SCHEMA_VERSION;
pub use vector::{FeatureValue, FeatureVector};

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

pub(crate) struct Hyperparameters {
    pub(crate) smoothing: f64,
    pub(crate) lzw_min_code_bits: usize,
    pub(crate) lzw_max_code_bits: usize,
    pub(crate) section_min_depth: usize,
    pub(crate) section_max_depth: usize,
}

pub(crate) static HP: Hyperparameters = Hyperparameters {
    smoothing: 1.0,
    lzw_min_code_bits: 9,
    lzw_max_code_bits: 16,
    section_min_depth: 2,
    section_max_depth: 6,
};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

static DEFAULT_EXTRACTOR: Lazy<FeatureExtractor> = Lazy::new(FeatureExtractor::new);

/// Extract features with the default lexicon and uniform letter reference.
pub fn extract_features(edit: &Edit) -> FeatureVector {
    DEFAULT_EXTRACTOR.extract(edit)
}

pub fn extract_features_json(record: &Value) -> FeatureResult<FeatureVector> {
    DEFAULT_EXTRACTOR.extract_json(record)
}
