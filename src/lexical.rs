use std::collections::{HashMap, HashSet};

use crate::tokenize::TokenSet;

pub const DEFAULT_BAD_WORDS: &[&str] = &["bad", "idiot", "stupid", "vandal", "destroy", "spam"];

/// A read-only set of case-folded words whose presence is a vandalism signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadWordLexicon {
    words: HashSet<String>,
}

impl Default for BadWordLexicon {
    fn default() -> Self {
        Self::from_words(DEFAULT_BAD_WORDS)
    }
}

impl BadWordLexicon {
    // Entries are trimmed and case-folded.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Parse a one-word-per-line list. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Self {
        Self::from_words(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    /// `word` must already be case-folded.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexicalFeatures {
    pub inserted_words_case_sensitive: Vec<String>,
    pub inserted_words: Vec<String>,
    pub concatenated_inserted_words_case_sensitive: String,
    pub concatenated_inserted_words: String,
    pub average_term_frequency: f64,
    pub longest_word: usize,
    pub longest_character_sequence: usize,
    pub bigrams: Vec<((String, String), u64)>,
    pub num_bad_words: usize,
    pub bad_words: Vec<String>,
}

fn distinct_in_order<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String> + AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for item in items {
        if seen.insert(item.as_ref().to_string()) {
            unique.push(item.into());
        }
    }
    unique
}

/// Mean share of the new text's words taken by each distinct inserted word.
fn average_term_frequency(words: &[&str], inserted: &[String]) -> f64 {
    if words.is_empty() || inserted.is_empty() {
        return 0.0;
    }
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for w in words {
        *counts.entry(*w).or_insert(0) += 1;
    }
    let total = words.len() as f64;
    let sum: f64 = inserted
        .iter()
        .map(|w| counts.get(w.as_str()).copied().unwrap_or(0) as f64 / total)
        .sum();
    sum / inserted.len() as f64
}

fn longest_word(words: &[&str]) -> usize {
    words.iter().map(|w| w.chars().count()).max().unwrap_or(0)
}

/// Length of the longest run of one repeated character.
pub fn longest_character_sequence(text: &str) -> usize {
    let mut longest = 0usize;
    let mut run = 0usize;
    let mut previous: Option<char> = None;
    for c in text.chars() {
        run = if previous == Some(c) { run + 1 } else { 1 };
        longest = longest.max(run);
        previous = Some(c);
    }
    longest
}

/// Adjacent word pairs with counts, in order of first appearance.
pub fn bigrams(words: &[&str]) -> Vec<((String, String), u64)> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut out: Vec<((String, String), u64)> = Vec::new();
    for pair in words.windows(2) {
        let key = (pair[0], pair[1]);
        match index.get(&key) {
            Some(&i) => out[i].1 += 1,
            None => {
                index.insert(key, out.len());
                out.push(((pair[0].to_string(), pair[1].to_string()), 1));
            }
        }
    }
    out
}

/// `inserted_words` is the diff's inserted-word sequence; only words that
/// also appear in the new revision count.
pub fn compute_lexical(
    new: &TokenSet<'_>,
    new_text: &str,
    inserted_words: &[String],
    lexicon: &BadWordLexicon,
) -> LexicalFeatures {
    let present: HashSet<&str> = new.words.iter().copied().collect();
    let inserted: Vec<&str> = inserted_words
        .iter()
        .map(String::as_str)
        .filter(|w| present.contains(w))
        .collect();
    let inserted_words_case_sensitive = distinct_in_order(inserted.iter().copied());
    let inserted_folded = distinct_in_order(inserted.iter().map(|w| w.to_lowercase()));

    let folded_words: Vec<String> = new.words.iter().map(|w| w.to_lowercase()).collect();
    let flagged: Vec<&str> = folded_words
        .iter()
        .map(String::as_str)
        .filter(|w| lexicon.contains(w))
        .collect();

    LexicalFeatures {
        concatenated_inserted_words_case_sensitive: inserted_words_case_sensitive.join(" "),
        concatenated_inserted_words: inserted_folded.join(" "),
        average_term_frequency: average_term_frequency(&new.words, &inserted_words_case_sensitive),
        inserted_words_case_sensitive,
        inserted_words: inserted_folded,
        longest_word: longest_word(&new.words),
        longest_character_sequence: longest_character_sequence(new_text),
        bigrams: bigrams(&new.words),
        num_bad_words: flagged.len(),
        bad_words: distinct_in_order(flagged),
    }
}
