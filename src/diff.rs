use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::edit::nullable;
use crate::tokenize::TokenSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDiff {
    #[serde(default, deserialize_with = "nullable")]
    pub inserted_words: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub deleted_words: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub inserted_lines: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub deleted_lines: Vec<String>,
}

impl EditDiff {
    /// Total characters across the inserted lines.
    pub fn inserted_text_length(&self) -> usize {
        self.inserted_lines.iter().map(|l| l.chars().count()).sum()
    }
}

// A token is inserted when the new text holds more copies of it than the old
// text, and deleted in the opposite case. This is a multiset difference, not
// a positional alignment: moved text counts as unchanged.
pub fn derive_diff(old: &TokenSet<'_>, new: &TokenSet<'_>) -> EditDiff {
    EditDiff {
        inserted_words: multiset_difference(&new.words, &old.words),
        deleted_words: multiset_difference(&old.words, &new.words),
        inserted_lines: multiset_difference(&new.lines, &old.lines),
        deleted_lines: multiset_difference(&old.lines, &new.lines),
    }
}

pub fn resolve_diff<'d>(
    supplied: Option<&'d EditDiff>,
    old: &TokenSet<'_>,
    new: &TokenSet<'_>,
) -> Cow<'d, EditDiff> {
    match supplied {
        Some(diff) => Cow::Borrowed(diff),
        None => {
            log::trace!(
                "deriving fallback diff ({} -> {} words)",
                old.word_count(),
                new.word_count()
            );
            Cow::Owned(derive_diff(old, new))
        }
    }
}

/// Tokens of `left` in order, minus as many copies of each as `right` holds.
fn multiset_difference(left: &[&str], right: &[&str]) -> Vec<String> {
    let mut remaining: HashMap<&str, usize> = HashMap::new();
    for token in right {
        *remaining.entry(*token).or_insert(0) += 1;
    }

    let mut out = Vec::new();
    for token in left {
        match remaining.get_mut(token) {
            Some(n) if *n > 0 => *n -= 1,
            _ => out.push((*token).to_string()),
        }
    }
    out
}
