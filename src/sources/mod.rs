/*! Dataset sources

Records are pulled from a [SourceClient], which opens a [config::DatasetSource](crate::config::DatasetSource)
and returns a lazy [RecordStream].

Two clients are provided:
- [HubClient] streams rows from the Hugging Face dataset viewer API,
- [LocalClient] reads JSON lines files (optionally gzipped) from a directory.

Streams are pulled one record at a time: nothing is fetched ahead of what the consumer asks for,
apart from the current page for [HubClient].
!*/
pub mod hub;
pub mod local;

use serde_json::Value;

use crate::config::DatasetSource;
use crate::error::Error;

pub use hub::HubClient;
pub use local::LocalClient;

/// A streamed dataset row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record(Value);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Record holding a single `text` field.
    pub fn from_text(text: &str) -> Self {
        Self(serde_json::json!({ "text": text }))
    }

    /// Get the textual content of `field`.
    ///
    /// Fails with [Error::MalformedRecord] if the field is absent or not a string.
    pub fn text(&self, field: &str) -> Result<&str, Error> {
        match self.0.get(field) {
            Some(Value::String(text)) => Ok(text),
            Some(other) => Err(Error::MalformedRecord(format!(
                "field {field} is not a string ({})",
                kind_of(other)
            ))),
            None => Err(Error::MalformedRecord(format!("missing field {field}"))),
        }
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Lazy, fallible sequence of records.
///
/// An `Err` item means that the stream broke: consumers should not pull further.
pub type RecordStream<'a> = Box<dyn Iterator<Item = Result<Record, Error>> + 'a>;

/// Something that can open dataset sources.
pub trait SourceClient {
    /// Open `source`, failing with [Error::SourceUnavailable] or [Error::AuthenticationRequired]
    /// if it can't be streamed.
    fn open<'a>(&'a self, source: &DatasetSource) -> Result<RecordStream<'a>, Error>;
}

impl<T: SourceClient + ?Sized> SourceClient for Box<T> {
    fn open<'a>(&'a self, source: &DatasetSource) -> Result<RecordStream<'a>, Error> {
        (**self).open(source)
    }
}

impl<T: SourceClient + ?Sized> SourceClient for &T {
    fn open<'a>(&'a self, source: &DatasetSource) -> Result<RecordStream<'a>, Error> {
        (**self).open(source)
    }
}
