/*! Filtering utilities

Filters operate on document text and tell whether it should be kept.

Filters implement [filter::Filter], [filter::FilterMut] or both:
- [filter::Filter] is implemented for filters that do not have state (see [sentence::Length] for example)
- [filter::FilterMut] is implemented for filters that do have state (see [dedup::SeenHashes], whose verdict depends on what it has already seen).
! */
pub mod dedup;
mod filter;
pub mod sentence;

pub use dedup::{Fingerprint, SeenHashes};
pub use filter::Filter;
pub use filter::FilterMut;
pub use sentence::{Length, WordCount};
