/*!
# IO utilities

Corpus and statistics saving.
!*/
mod textwriter;
pub mod writer;

pub use textwriter::TextWriter;
pub use writer::CorpusWriter;
