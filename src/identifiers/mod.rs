/*! Script-based language identification

Documents are not identified with a statistical model but by the writing system
their characters belong to. [ScriptDetector] classifies a text sample into a [ScriptClass],
and each [crate::lang::Language] then decides whether it accepts that class.

Detection results are memoized in a [BoundedCache]. !*/
mod cache;
mod script;

pub use cache::BoundedCache;
pub use script::{ScriptClass, ScriptCounts, ScriptDetector};
