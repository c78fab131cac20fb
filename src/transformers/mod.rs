/*! Text transformers.

Transform raw document text into what ends up in the corpus:
[TextCleaner] normalizes a document (or rejects it),
[SentenceSegmenter] optionally splits accepted documents into sentences at write time.
!*/

mod cleaner;
mod segment;

pub use cleaner::TextCleaner;
pub use segment::SentenceSegmenter;
