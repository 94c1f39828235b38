//! Paginated fetch from the Acelerato API.
//!
//! The API exposes no next-page cursor or total count, so pagination end is
//! inferred: keep requesting 1-based pages until a page comes back empty or
//! anything unexpected happens. A failed page ends pagination for the run
//! (no per-page retry); whatever was collected before it is still synced.
//!
//! The HTTP call sits behind the [`PageFetcher`] trait so the loop itself can
//! be exercised with scripted responses.

use crate::config::ApiOpts;
use crate::target::{RecordsWrapper, SyncTarget};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{error, info, warn};

/// Raw response for one page request.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

/// One page request against the source API.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the given 1-based page. Errors represent transport failures;
    /// HTTP-level errors come back as a [`PageResponse`] with its status.
    async fn fetch_page(&self, page: u32) -> Result<PageResponse>;
}

/// [`PageFetcher`] backed by reqwest with basic auth.
pub struct HttpPageFetcher<'a> {
    client: reqwest::Client,
    target: &'a SyncTarget,
    api: &'a ApiOpts,
}

impl<'a> HttpPageFetcher<'a> {
    pub fn new(api: &'a ApiOpts, target: &'a SyncTarget) -> Self {
        HttpPageFetcher {
            client: reqwest::Client::new(),
            target,
            api,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher<'_> {
    async fn fetch_page(&self, page: u32) -> Result<PageResponse> {
        let mut params: Vec<(&str, String)> = vec![
            (self.target.page_param, page.to_string()),
            (self.target.size_param, self.target.page_size.to_string()),
        ];
        for (name, value) in &self.target.filters {
            params.push((*name, value.clone()));
        }

        let response = self
            .client
            .get(&self.target.endpoint)
            .basic_auth(&self.api.api_email, Some(&self.api.api_token))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .query(&params)
            .send()
            .await
            .with_context(|| format!("Request for page {page} of {} failed", self.target.entity))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read page {page} response body"))?;

        Ok(PageResponse { status, body })
    }
}

/// Interpretation of one page response body.
#[derive(Debug)]
pub(crate) enum PageBody {
    Records(Vec<serde_json::Value>),
    HttpError(u16, String),
    Undecodable(String),
    UnexpectedShape,
}

/// Classify a page response and pull out its records, if any.
///
/// Object bodies are unwrapped per the entity's [`RecordsWrapper`]. A missing
/// `content` key means no records. A missing `data` key means the object
/// itself is a one-record page; a `data` key that is present but null (or
/// otherwise not an array) means no records, so pagination terminates.
pub(crate) fn parse_page(status: u16, body: &str, wrapper: &RecordsWrapper) -> PageBody {
    if !(200..300).contains(&status) {
        return PageBody::HttpError(status, body.to_string());
    }

    let parsed: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => return PageBody::Undecodable(e.to_string()),
    };

    match parsed {
        serde_json::Value::Array(items) => PageBody::Records(items),
        serde_json::Value::Object(mut map) => match wrapper {
            RecordsWrapper::Content => match map.remove("content") {
                Some(serde_json::Value::Array(items)) => PageBody::Records(items),
                _ => PageBody::Records(vec![]),
            },
            RecordsWrapper::DataOrSelf => match map.remove("data") {
                Some(serde_json::Value::Array(items)) => PageBody::Records(items),
                // present-but-empty (null or any non-array) means no results
                Some(_) => PageBody::Records(vec![]),
                None => PageBody::Records(vec![serde_json::Value::Object(map)]),
            },
        },
        _ => PageBody::UnexpectedShape,
    }
}

/// Everything one fetch phase produced.
#[derive(Debug)]
pub struct FetchResult {
    /// Records accumulated across all successfully processed pages.
    pub records: Vec<serde_json::Value>,
    /// Number of pages that yielded records.
    pub pages: u32,
}

/// Fetch every page until the API runs out, something goes wrong, or the
/// optional page cap is hit. Failures end pagination but are never fatal:
/// the accumulated records are always returned.
pub async fn fetch_all(
    fetcher: &dyn PageFetcher,
    target: &SyncTarget,
    max_pages: Option<u32>,
) -> FetchResult {
    let entity = target.entity;
    let mut records = Vec::new();
    let mut pages = 0u32;
    let mut page = 1u32;

    loop {
        let response = match fetcher.fetch_page(page).await {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to fetch page {page} of {entity}: {e:#}");
                break;
            }
        };

        match parse_page(response.status, &response.body, &target.wrapper) {
            PageBody::HttpError(status, body) => {
                error!("Error fetching page {page} of {entity}: {status} - {body}");
                break;
            }
            PageBody::Undecodable(e) => {
                error!("Error decoding JSON for page {page} of {entity}: {e}");
                break;
            }
            PageBody::UnexpectedShape => {
                warn!("Unexpected response shape on page {page} of {entity}");
                break;
            }
            PageBody::Records(page_records) => {
                if page_records.is_empty() {
                    info!("No {entity} found on page {page}. Stopping.");
                    break;
                }

                info!("Page {page} processed with {} {entity}.", page_records.len());
                records.extend(page_records);
                pages += 1;

                // caller-supplied safety cap, applied after the current page
                if let Some(cap) = max_pages {
                    if page >= cap {
                        info!("Reached page cap of {cap} for {entity}.");
                        break;
                    }
                }

                page += 1;
            }
        }
    }

    FetchResult { records, pages }
}
