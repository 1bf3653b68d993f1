pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// A trailing terminator does not produce an empty final line.
pub fn lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

#[derive(Debug, Clone)]
pub struct TokenSet<'a> {
    pub words: Vec<&'a str>,
    pub lines: Vec<&'a str>,
}

impl<'a> TokenSet<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            words: words(text),
            lines: lines(text),
        }
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}
