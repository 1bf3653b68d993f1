use rayon::prelude::*;
use serde_json::Value;

use crate::diff::resolve_diff;
use crate::distribution::{compute_distribution, DistributionFeatures, ReferenceDistribution};
use crate::edit::Edit;
use crate::errors::FeatureResult;
use crate::lexical::{compute_lexical, BadWordLexicon, LexicalFeatures};
use crate::ratios::{compute_ratios, RatioFeatures};
use crate::structure::{count_structure, StructuralCounts};
use crate::tokenize::TokenSet;
use crate::vector::{FeatureValue, FeatureVector, FeatureVectorBuilder};

/// Feature extraction configured with a bad-word lexicon and a reference
/// letter distribution. Holds no mutable state.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    lexicon: BadWordLexicon,
    reference: ReferenceDistribution,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lexicon(mut self, lexicon: BadWordLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_reference(mut self, reference: ReferenceDistribution) -> Self {
        self.reference = reference;
        self
    }

    pub fn lexicon(&self) -> &BadWordLexicon {
        &self.lexicon
    }

    pub fn reference(&self) -> &ReferenceDistribution {
        &self.reference
    }

    pub fn extract(&self, edit: &Edit) -> FeatureVector {
        let old = TokenSet::new(&edit.old_text);
        let new = TokenSet::new(&edit.new_text);
        let diff = resolve_diff(edit.diff.as_ref(), &old, &new);

        let ratios = compute_ratios(&edit.old_text, &edit.new_text, &edit.comment);
        let distribution = compute_distribution(&edit.new_text, &self.reference);
        let lexical = compute_lexical(&new, &edit.new_text, &diff.inserted_words, &self.lexicon);
        let structure = count_structure(&edit.new_text);

        log::debug!(
            "extracted edit {:?}: {} -> {} chars, {} inserted words",
            edit.edit_id,
            ratios.old_length,
            ratios.new_length,
            diff.inserted_words.len()
        );

        let mut out = FeatureVectorBuilder::new();

        // Metadata; empty identifiers fall through to the schema default.
        for (name, value) in [
            ("edit_id", &edit.edit_id),
            ("user_name", &edit.user_name),
            ("user_id", &edit.user_id),
            ("timestamp", &edit.timestamp),
        ] {
            if !value.is_empty() {
                out.set(name, value.clone());
            }
        }
        out.set("anonymous", edit.anonymous);
        out.set("is_bot", edit.is_bot);
        out.set("is_minor", edit.is_minor);
        out.set("tags", edit.tags.clone());

        out.set("num_words", new.word_count());
        out.set("num_lines", new.line_count());
        out.set("inserted_word_count", diff.inserted_words.len());
        out.set("deleted_word_count", diff.deleted_words.len());
        out.set("inserted_line_count", diff.inserted_lines.len());
        out.set("deleted_line_count", diff.deleted_lines.len());
        out.set("inserted_text_length", diff.inserted_text_length());

        merge_ratios(&mut out, ratios);
        merge_distribution(&mut out, distribution);
        merge_lexical(&mut out, lexical);
        merge_structure(&mut out, structure);

        out.finish()
    }

    /// Validate a loosely-typed record, then extract it.
    pub fn extract_json(&self, record: &Value) -> FeatureResult<FeatureVector> {
        let edit = Edit::from_json(record)?;
        Ok(self.extract(&edit))
    }

    /// Extract a batch in parallel; output order matches input order.
    pub fn extract_batch(&self, edits: &[Edit]) -> Vec<FeatureVector> {
        edits.par_iter().map(|edit| self.extract(edit)).collect()
    }

    /// A record that fails validation yields its error in place.
    pub fn extract_json_batch(&self, records: &[Value]) -> Vec<FeatureResult<FeatureVector>> {
        records
            .par_iter()
            .enumerate()
            .map(|(idx, record)| {
                self.extract_json(record).inspect_err(|err| {
                    log::warn!("skipping edit record {idx}: {err}");
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Merge helpers
// ---------------------------------------------------------------------------

fn merge_ratios(out: &mut FeatureVectorBuilder, r: RatioFeatures) {
    out.set("comment_length", r.comment_length);
    out.set("old_length", r.old_length);
    out.set("new_length", r.new_length);
    out.set("size_increment", r.size_increment);
    out.set("size_ratio", r.size_ratio);
    out.set("upper_to_lower_ratio", r.upper_to_lower_ratio);
    out.set("upper_to_all_ratio", r.upper_to_all_ratio);
    out.set("uppercase_ratio", r.uppercase_ratio);
    out.set("lowercase_ratio", r.lowercase_ratio);
    out.set("digit_ratio", r.digit_ratio);
    out.set("non_alphanumeric_ratio", r.non_alphanumeric_ratio);
}

fn merge_distribution(out: &mut FeatureVectorBuilder, d: DistributionFeatures) {
    out.set("character_diversity", d.character_diversity);
    out.set("character_distribution", d.character_distribution);
    out.set("compressibility", d.compressibility);
}

fn merge_lexical(out: &mut FeatureVectorBuilder, l: LexicalFeatures) {
    out.set("inserted_words_case_sensitive", l.inserted_words_case_sensitive);
    out.set("inserted_words", l.inserted_words);
    out.set(
        "concatenated_inserted_words_case_sensitive",
        l.concatenated_inserted_words_case_sensitive,
    );
    out.set("concatenated_inserted_words", l.concatenated_inserted_words);
    out.set("average_term_frequency", l.average_term_frequency);
    out.set("longest_word", l.longest_word);
    out.set("longest_character_sequence", l.longest_character_sequence);
    out.set(
        "bigrams",
        FeatureValue::Counts(
            l.bigrams
                .into_iter()
                .map(|((first, second), count)| (format!("{first} {second}"), count))
                .collect(),
        ),
    );
    out.set("num_bad_words", l.num_bad_words);
    out.set("bad_words", l.bad_words);
}

fn merge_structure(out: &mut FeatureVectorBuilder, s: StructuralCounts) {
    out.set("num_templates", s.templates);
    out.set("num_categories", s.categories);
    out.set("num_internal_links", s.internal_links);
    out.set("num_references", s.references);
    out.set("num_images", s.images);
    out.set("num_sections", s.sections);
    out.set("num_external_links", s.external_links);
    out.set("num_redirects", s.redirects);
}
