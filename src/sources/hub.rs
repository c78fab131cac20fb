//! Hugging Face hub client.
//!
//! Rows are fetched page by page from the dataset viewer `rows` endpoint, which
//! avoids downloading whole parquet shards for datasets that we only sample.
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::config::DatasetSource;
use crate::error::Error;

use super::{Record, RecordStream, SourceClient};

pub const ROWS_ENDPOINT: &str = "https://datasets-server.huggingface.co/rows";
pub const WHOAMI_ENDPOINT: &str = "https://huggingface.co/api/whoami-v2";
/// Maximum page size accepted by the rows endpoint.
pub const PAGE_SIZE: usize = 100;
const DEFAULT_CONFIG: &str = "default";
const TOKEN_VARIABLES: [&str; 2] = ["HF_TOKEN", "HUGGING_FACE_HUB_TOKEN"];

#[derive(Debug, Deserialize)]
struct RowsPage {
    rows: Vec<RowEntry>,
    #[serde(default)]
    num_rows_total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    row: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
}

#[derive(Debug, Deserialize)]
struct WhoAmI {
    name: String,
}

pub struct HubClient {
    client: Client,
    token: Option<String>,
    endpoint: Url,
    page_size: usize,
    limit: Option<usize>,
}

impl HubClient {
    pub fn new(token: Option<String>) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(concat!("bhasha/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            token,
            endpoint: Url::parse(ROWS_ENDPOINT)?,
            page_size: PAGE_SIZE,
            limit: None,
        })
    }

    /// Use the provided token, or fall back on `HF_TOKEN` then `HUGGING_FACE_HUB_TOKEN`.
    pub fn from_env(token: Option<String>) -> Result<Self, Error> {
        let token = token.or_else(|| {
            TOKEN_VARIABLES
                .iter()
                .find_map(|var| std::env::var(var).ok())
                .filter(|token| !token.is_empty())
        });
        if token.is_none() {
            debug!("no hub token found, using anonymous access");
        }
        Self::new(token)
    }

    /// Stop every stream after `limit` records.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Check credentials, returning the account name.
    pub fn whoami(&self) -> Result<String, Error> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| Error::AuthenticationRequired("huggingface.co (no token)".to_string()))?;

        let response = self.client.get(WHOAMI_ENDPOINT).bearer_auth(token).send()?;
        let response = check_status("huggingface.co", response)?;
        let whoami: WhoAmI = response.json()?;
        info!("authenticated as {}", whoami.name);
        Ok(whoami.name)
    }

    /// Check credentials if a token is set.
    ///
    /// `Ok(None)` means anonymous access: public datasets stay readable.
    /// Only a token the hub rejects (or an unreachable hub) is an error.
    pub fn verify(&self) -> Result<Option<String>, Error> {
        if self.token.is_none() {
            return Ok(None);
        }
        self.whoami().map(Some)
    }

    fn rows_url(&self, source: &DatasetSource, offset: usize, length: usize) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("dataset", &source.dataset)
            .append_pair("config", source.config.as_deref().unwrap_or(DEFAULT_CONFIG))
            .append_pair("split", source.split_or_default())
            .append_pair("offset", &offset.to_string())
            .append_pair("length", &length.to_string());
        url
    }

    fn fetch_page(
        &self,
        source: &DatasetSource,
        offset: usize,
        length: usize,
    ) -> Result<RowsPage, Error> {
        let url = self.rows_url(source, offset, length);
        debug!("fetching {}", url);

        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| Error::source_unavailable(source.id(), e.to_string()))?;
        let response = check_status(&source.id(), response)?;
        response
            .json()
            .map_err(|e| Error::source_unavailable(source.id(), format!("invalid page: {e}")))
    }
}

impl SourceClient for HubClient {
    fn open<'a>(&'a self, source: &DatasetSource) -> Result<RecordStream<'a>, Error> {
        let owned = source.clone();
        let fetch = move |offset: usize, length: usize| self.fetch_page(&owned, offset, length);
        let mut rows = HubRows::new(fetch, self.page_size, self.limit);

        // fetch first page now so that unreachable sources fail on open
        rows.next_page()?;
        if let Some(total) = rows.total {
            info!("{}: {} rows available", source, total);
        }
        Ok(Box::new(rows))
    }
}

/// Map HTTP failures to source errors.
fn check_status(source: &str, response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let reason = response
        .json::<ApiError>()
        .map(|e| e.error)
        .unwrap_or_default();
    Err(status_error(source, status, reason))
}

fn status_error(source: &str, status: StatusCode, reason: String) -> Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            warn!("{}: {} {}", source, status, reason);
            Error::AuthenticationRequired(source.to_string())
        }
        _ if reason.is_empty() => Error::source_unavailable(source, format!("HTTP {status}")),
        _ => Error::source_unavailable(source, format!("HTTP {status}: {reason}")),
    }
}

/// Paginated row iterator over a `fetch(offset, length)` page function.
struct HubRows<F> {
    fetch: F,
    page_size: usize,
    offset: usize,
    total: Option<u64>,
    /// records that can still be yielded, if limited
    remaining: Option<usize>,
    buffer: std::vec::IntoIter<Record>,
    done: bool,
}

impl<F> HubRows<F>
where
    F: FnMut(usize, usize) -> Result<RowsPage, Error>,
{
    fn new(fetch: F, page_size: usize, limit: Option<usize>) -> Self {
        Self {
            fetch,
            page_size,
            offset: 0,
            total: None,
            remaining: limit,
            buffer: Vec::new().into_iter(),
            done: false,
        }
    }

    /// Fill the buffer with the next page.
    /// Marks the iterator as done when there is nothing left to fetch.
    fn next_page(&mut self) -> Result<(), Error> {
        if let Some(total) = self.total {
            if self.offset as u64 >= total {
                self.done = true;
                return Ok(());
            }
        }

        let length = match self.remaining {
            Some(0) => {
                self.done = true;
                return Ok(());
            }
            Some(remaining) => remaining.min(self.page_size),
            None => self.page_size,
        };

        let page = (self.fetch)(self.offset, length)?;
        if page.rows.is_empty() {
            self.done = true;
        }
        self.offset += page.rows.len();
        self.total = page.num_rows_total.or(self.total);
        self.buffer = page
            .rows
            .into_iter()
            .map(|entry| Record::new(entry.row))
            .collect::<Vec<_>>()
            .into_iter();
        Ok(())
    }
}

impl<F> Iterator for HubRows<F>
where
    F: FnMut(usize, usize) -> Result<RowsPage, Error>,
{
    type Item = Result<Record, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.remaining == Some(0) {
                return None;
            }

            if let Some(record) = self.buffer.next() {
                if let Some(remaining) = &mut self.remaining {
                    *remaining -= 1;
                }
                return Some(Ok(record));
            }

            if self.done {
                return None;
            }

            if let Err(e) = self.next_page() {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}
