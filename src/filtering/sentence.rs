//! Length-based filtering
use super::Filter;

/// Simple length filter.
/// Returns `false` if provided text is less than [Length::min_size] unicode codepoints.
///
/// [Length::min_size] is 10 by default.
pub struct Length {
    min_size: usize,
}

impl Length {
    /// specify a minimum length
    pub fn with_min_size(min_size: usize) -> Self {
        Self { min_size }
    }

    /// Get a reference to the length's min size.
    pub fn min_size(&self) -> &usize {
        &self.min_size
    }
}

impl Filter<&str> for Length {
    fn detect(&self, text: &str) -> bool {
        // avoid walking the whole text: we only need to know if there are enough chars.
        self.min_size == 0 || text.chars().nth(self.min_size - 1).is_some()
    }
}

impl Default for Length {
    /// Default minimum length is 10 Unicode Codepoints
    fn default() -> Self {
        Length { min_size: 10 }
    }
}

/// Whitespace-delimited word count filter.
///
/// [WordCount::min_words] is 3 by default.
pub struct WordCount {
    min_words: usize,
}

impl WordCount {
    pub fn with_min_words(min_words: usize) -> Self {
        Self { min_words }
    }

    pub fn min_words(&self) -> &usize {
        &self.min_words
    }
}

impl Filter<&str> for WordCount {
    fn detect(&self, text: &str) -> bool {
        text.split_whitespace().take(self.min_words).count() == self.min_words
    }
}

impl Default for WordCount {
    fn default() -> Self {
        WordCount { min_words: 3 }
    }
}
