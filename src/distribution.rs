use std::collections::{HashMap, HashSet};

use crate::errors::{FeatureError, FeatureResult};
use crate::HP;

const ALPHABET: usize = 26;

// English letter frequencies, a..=z, in percent.
const ENGLISH_LETTER_PERCENT: [f64; ALPHABET] = [
    8.167, 1.492, 2.782, 4.253, 12.702, 2.228, 2.015, 6.094, 6.966, 0.153, 0.772, 4.025, 2.406,
    6.749, 7.507, 1.929, 0.095, 5.987, 6.327, 9.056, 2.758, 0.978, 2.360, 0.150, 1.974, 0.074,
];

/// The expected letter distribution that `character_distribution` diverges from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ReferenceDistribution {
    #[default]
    Uniform,
    /// Per-letter probabilities for `a` through `z`, summing to one.
    Table([f64; ALPHABET]),
}

impl ReferenceDistribution {
    /// Weights are normalised to sum to one. Each must be finite and strictly
    /// positive.
    pub fn table(weights: [f64; ALPHABET]) -> FeatureResult<Self> {
        if let Some((idx, w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w <= 0.0)
        {
            let letter = (b'a' + idx as u8) as char;
            return Err(FeatureError::InvalidReference(format!(
                "weight for '{letter}' is {w}, expected a positive finite number"
            )));
        }
        let total: f64 = weights.iter().sum();
        Ok(Self::Table(weights.map(|w| w / total)))
    }

    pub fn english() -> Self {
        let total: f64 = ENGLISH_LETTER_PERCENT.iter().sum();
        Self::Table(ENGLISH_LETTER_PERCENT.map(|w| w / total))
    }

    fn probability(&self, letter: usize) -> f64 {
        match self {
            Self::Uniform => 1.0 / ALPHABET as f64,
            Self::Table(table) => table[letter],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionFeatures {
    pub character_diversity: f64,
    pub character_distribution: f64,
    pub compressibility: f64,
}

/// `length ^ (1 / distinct characters)`, or 0.0 for empty text.
pub fn character_diversity(text: &str) -> f64 {
    let length = text.chars().count();
    if length == 0 {
        return 0.0;
    }
    let distinct = text.chars().collect::<HashSet<char>>().len();
    (length as f64).powf(1.0 / distinct as f64)
}

/// Kullback-Leibler divergence of the text's letter distribution from `reference`.
///
/// Letters are folded to lowercase and only `a`..=`z` take part; text without
/// any such letter has divergence 0.0.
pub fn character_distribution(text: &str, reference: &ReferenceDistribution) -> f64 {
    let mut counts = [0usize; ALPHABET];
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() {
            counts[(c as u8 - b'a') as usize] += 1;
        }
    }
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }

    let divergence: f64 = counts
        .iter()
        .enumerate()
        .filter(|(_, &n)| n > 0)
        .map(|(letter, &n)| {
            let p = n as f64 / total as f64;
            p * (p / reference.probability(letter)).ln()
        })
        .sum();
    // Non-negative in exact arithmetic; absorb rounding.
    divergence.max(0.0)
}

fn lzw_compressed_bits(bytes: &[u8]) -> usize {
    let Some((&first, rest)) = bytes.split_first() else {
        return 0;
    };

    let max_entries = 1u32 << HP.lzw_max_code_bits;
    let mut dictionary: HashMap<(u32, u8), u32> = HashMap::new();
    let mut next_code: u32 = 256;
    let mut width = HP.lzw_min_code_bits;
    let mut bits = 0usize;
    let mut current = first as u32;

    for &byte in rest {
        if let Some(&code) = dictionary.get(&(current, byte)) {
            current = code;
            continue;
        }
        bits += width;
        if next_code < max_entries {
            dictionary.insert((current, byte), next_code);
            next_code += 1;
            if next_code > (1u32 << width) && width < HP.lzw_max_code_bits {
                width += 1;
            }
        }
        current = byte as u32;
    }
    bits + width
}

/// LZW-compressed size over UTF-8 size, or 0.0 for empty text.
///
/// Short or high-entropy input can exceed 1.0 because each code is wider
/// than a byte; that is expected, not an error.
pub fn compressibility(text: &str) -> f64 {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return 0.0;
    }
    let compressed_bytes = lzw_compressed_bits(bytes).div_ceil(8);
    compressed_bytes as f64 / bytes.len() as f64
}

pub fn compute_distribution(new_text: &str, reference: &ReferenceDistribution) -> DistributionFeatures {
    DistributionFeatures {
        character_diversity: character_diversity(new_text),
        character_distribution: character_distribution(new_text, reference),
        compressibility: compressibility(new_text),
    }
}
