//! Pipeline trait.
use crate::error::Error;

/// Implemented by each pipeline,
/// generic over the return type so that
/// pipelines producing a report can use the trait aswell.
///
/// Running a pipeline twice runs two independent collections:
/// no filtering state is kept between calls.
pub trait Pipeline<T> {
    fn run(&self) -> Result<T, Error>;
}
