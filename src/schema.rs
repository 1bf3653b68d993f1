use std::collections::HashMap;

use once_cell::sync::Lazy;

// Any change to `FEATURES` bumps the version.
pub const SCHEMA_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Integer,
    Float,
    Boolean,
    Text,
    /// Distinct strings in first-occurrence order.
    TextSet,
    /// String keys with occurrence counts, in first-occurrence order.
    Counts,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureDefault {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    EmptyText,
    EmptySet,
    EmptyCounts,
}

impl FeatureDefault {
    pub fn kind(self) -> FeatureKind {
        match self {
            FeatureDefault::Integer(_) => FeatureKind::Integer,
            FeatureDefault::Float(_) => FeatureKind::Float,
            FeatureDefault::Boolean(_) => FeatureKind::Boolean,
            FeatureDefault::EmptyText => FeatureKind::Text,
            FeatureDefault::EmptySet => FeatureKind::TextSet,
            FeatureDefault::EmptyCounts => FeatureKind::Counts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub default: FeatureDefault,
}

impl FeatureSpec {
    pub fn kind(&self) -> FeatureKind {
        self.default.kind()
    }
}

const fn feature(name: &'static str, default: FeatureDefault) -> FeatureSpec {
    FeatureSpec { name, default }
}

use FeatureDefault::{Boolean, EmptyCounts, EmptySet, EmptyText, Float, Integer};

// Each default is what an edit with empty texts, comment, and metadata gets.
pub const FEATURES: &[FeatureSpec] = &[
    // Pass-through metadata
    feature("edit_id", EmptyText),
    feature("user_name", EmptyText),
    feature("user_id", EmptyText),
    feature("timestamp", EmptyText),
    feature("anonymous", Boolean(false)),
    feature("is_bot", Boolean(false)),
    feature("is_minor", Boolean(false)),
    feature("tags", EmptySet),
    feature("comment_length", Integer(0)),
    // Size
    feature("old_length", Integer(0)),
    feature("new_length", Integer(0)),
    feature("size_increment", Integer(0)),
    feature("size_ratio", Float(1.0)),
    feature("num_words", Integer(0)),
    feature("num_lines", Integer(0)),
    // Diff volume
    feature("inserted_word_count", Integer(0)),
    feature("deleted_word_count", Integer(0)),
    feature("inserted_line_count", Integer(0)),
    feature("deleted_line_count", Integer(0)),
    feature("inserted_text_length", Integer(0)),
    // Character-class ratios
    feature("upper_to_lower_ratio", Float(1.0)),
    feature("upper_to_all_ratio", Float(1.0)),
    feature("uppercase_ratio", Float(1.0)),
    feature("lowercase_ratio", Float(1.0)),
    feature("digit_ratio", Float(1.0)),
    feature("non_alphanumeric_ratio", Float(1.0)),
    // Character distribution
    feature("character_diversity", Float(0.0)),
    feature("character_distribution", Float(0.0)),
    feature("compressibility", Float(0.0)),
    // Lexical
    feature("inserted_words_case_sensitive", EmptySet),
    feature("inserted_words", EmptySet),
    feature("concatenated_inserted_words_case_sensitive", EmptyText),
    feature("concatenated_inserted_words", EmptyText),
    feature("average_term_frequency", Float(0.0)),
    feature("longest_word", Integer(0)),
    feature("longest_character_sequence", Integer(0)),
    feature("bigrams", EmptyCounts),
    feature("num_bad_words", Integer(0)),
    feature("bad_words", EmptySet),
    // Markup structure
    feature("num_templates", Integer(0)),
    feature("num_categories", Integer(0)),
    feature("num_internal_links", Integer(0)),
    feature("num_references", Integer(0)),
    feature("num_images", Integer(0)),
    feature("num_sections", Integer(0)),
    feature("num_external_links", Integer(0)),
    feature("num_redirects", Integer(0)),
];

static POSITIONS: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    FEATURES
        .iter()
        .enumerate()
        .map(|(i, spec)| (spec.name, i))
        .collect()
});

pub fn position(name: &str) -> Option<usize> {
    POSITIONS.get(name).copied()
}

/// The vocabulary entry for `name`.
pub fn lookup(name: &str) -> Option<&'static FeatureSpec> {
    position(name).map(|i| &FEATURES[i])
}
