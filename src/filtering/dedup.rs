/*! Exact-duplicate detection

Each text is reduced to a short [Fingerprint] (truncated SHA-256).
Long texts are only sampled (head and tail) to keep hashing cheap,
which means that two long texts differing only in their middle are reported as duplicates,
and that some near-duplicates are missed. Both are accepted trade-offs.
!*/
use std::collections::HashSet;
use std::fmt;

use sha2::{Digest, Sha256};

use super::FilterMut;

/// Number of digest bytes kept.
pub const FINGERPRINT_LEN: usize = 8;

/// Truncated content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    /// Hash a whole text.
    pub fn of(text: &str) -> Self {
        Self::of_parts(&[text])
    }

    fn of_parts(parts: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part.as_bytes());
        }
        let digest = hasher.finalize();
        let mut truncated = [0u8; FINGERPRINT_LEN];
        truncated.copy_from_slice(&digest[..FINGERPRINT_LEN]);
        Self(truncated)
    }

    /// Hash `text` fully if it has at most `full_threshold` characters,
    /// otherwise only hash its first and last `sample_chars` characters.
    pub fn sampled(text: &str, full_threshold: usize, sample_chars: usize) -> Self {
        if text.chars().nth(full_threshold).is_none() {
            return Self::of(text);
        }

        let head_end = text
            .char_indices()
            .nth(sample_chars)
            .map(|(idx, _)| idx)
            .unwrap_or(text.len());
        let tail_start = match sample_chars {
            0 => text.len(),
            n => text
                .char_indices()
                .rev()
                .nth(n - 1)
                .map(|(idx, _)| idx)
                .unwrap_or(0),
        };

        Self::of_parts(&[&text[..head_end], &text[tail_start..]])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Set of already seen fingerprints.
///
/// Grows for the whole lifetime of the set: nothing is ever evicted.
pub struct SeenHashes {
    seen: HashSet<Fingerprint>,
    full_threshold: usize,
    sample_chars: usize,
}

impl SeenHashes {
    pub fn new(full_threshold: usize, sample_chars: usize) -> Self {
        Self {
            seen: HashSet::new(),
            full_threshold,
            sample_chars,
        }
    }

    pub fn fingerprint(&self, text: &str) -> Fingerprint {
        Fingerprint::sampled(text, self.full_threshold, self.sample_chars)
    }

    /// Returns `true` and remembers the text if it has not been seen yet,
    /// `false` if it is a duplicate.
    pub fn check_and_insert(&mut self, text: &str) -> bool {
        let fingerprint = self.fingerprint(text);
        self.seen.insert(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl Default for SeenHashes {
    /// Texts longer than 5000 chars are sampled on 1000 chars at each end.
    fn default() -> Self {
        Self::new(5000, 1000)
    }
}

impl FilterMut<&str> for SeenHashes {
    fn detect_mut(&mut self, text: &str) -> bool {
        self.check_and_insert(text)
    }
}
