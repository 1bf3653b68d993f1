use crate::HP;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioFeatures {
    pub upper_to_lower_ratio: f64,
    pub upper_to_all_ratio: f64,
    pub uppercase_ratio: f64,
    pub lowercase_ratio: f64,
    pub digit_ratio: f64,
    pub non_alphanumeric_ratio: f64,
    pub old_length: usize,
    pub new_length: usize,
    pub size_increment: i64,
    pub size_ratio: f64,
    pub comment_length: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct CharClassCounts {
    total: usize,
    upper: usize,
    lower: usize,
    digit: usize,
    alphanumeric: usize,
}

impl CharClassCounts {
    fn of(text: &str) -> Self {
        let mut counts = Self::default();
        for c in text.chars() {
            counts.total += 1;
            if c.is_alphanumeric() {
                counts.alphanumeric += 1;
                // Casing only applies to alphanumerics so upper <= alphanumeric.
                if c.is_uppercase() {
                    counts.upper += 1;
                } else if c.is_lowercase() {
                    counts.lower += 1;
                }
                if c.is_numeric() {
                    counts.digit += 1;
                }
            }
        }
        counts
    }

    fn non_alphanumeric(&self) -> usize {
        self.total - self.alphanumeric
    }
}

fn smoothed(numerator: usize, denominator: usize) -> f64 {
    (HP.smoothing + numerator as f64) / (HP.smoothing + denominator as f64)
}

// Every ratio is smoothed as (1 + numerator) / (1 + denominator). Lengths are
// in chars, not bytes.
pub fn compute_ratios(old_text: &str, new_text: &str, comment: &str) -> RatioFeatures {
    let new = CharClassCounts::of(new_text);
    let old_length = old_text.chars().count();

    let upper_to_lower_ratio = if new.lower == 0 {
        1.0
    } else {
        smoothed(new.upper, new.lower)
    };

    RatioFeatures {
        upper_to_lower_ratio,
        upper_to_all_ratio: smoothed(new.upper, new.alphanumeric),
        uppercase_ratio: smoothed(new.upper, new.total),
        lowercase_ratio: smoothed(new.lower, new.total),
        digit_ratio: smoothed(new.digit, new.total),
        non_alphanumeric_ratio: smoothed(new.non_alphanumeric(), new.total),
        old_length,
        new_length: new.total,
        size_increment: new.total as i64 - old_length as i64,
        size_ratio: smoothed(new.total, old_length),
        comment_length: comment.chars().count(),
    }
}
