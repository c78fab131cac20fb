/*! # Bhasha

Multilingual (English, Hindi, Sanskrit) corpus collection.

Documents are streamed from [sources], identified by script ([identifiers]),
cleaned ([transformers]), deduplicated ([filtering]) and counted ([estimate])
by the [pipelines::Collector] until each language reaches its share of the token target.
Corpora and statistics are then written by [io::CorpusWriter].

```no_run
use bhasha::config::CollectionConfig;
use bhasha::io::CorpusWriter;
use bhasha::pipelines::{Collector, Pipeline};
use bhasha::sources::LocalClient;
use std::path::Path;

let config = CollectionConfig::with_target(1_000_000);
let client = LocalClient::new(Path::new("data/"));
let result = Collector::from_config(client, &config)?.run()?;
CorpusWriter::new(Path::new("corpus/")).write(&result)?;
# Ok::<(), bhasha::error::Error>(())
```
!*/
pub mod cli;
pub mod config;
pub mod error;
pub mod estimate;
pub mod filtering;
pub mod identifiers;
pub mod io;
pub mod lang;
pub mod pipelines;
pub mod sources;
pub mod transformers;
