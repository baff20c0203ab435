pub mod error;
pub mod model;

use std::sync::LazyLock;

use regex::Regex;
use reqwest::{Client, Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info};

use crate::parser::{self, statblock::StatBlock};
use error::{NotionError, Result};
use model::{ApiError, Block, BlockChildren, Page, QueryResults, SearchHit};

pub const DEFAULT_API_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_VERSION: &str = "2022-06-28";
pub const SEARCH_LIMIT: usize = 50;
const BLOCK_PAGE_SIZE: &str = "100";

// 32 hex digits, bare or in 8-4-4-4-12 form, at the end of an id or URL path
static ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|[^0-9a-fA-F])([0-9a-fA-F]{32}|[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12})/?(?:[?#].*)?$",
    )
    .unwrap()
});

/// Pull a Notion object id out of a bare id or a share URL.
pub fn parse_id(raw: &str, what: &'static str) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(NotionError::MissingTarget(what));
    }
    ID_RE
        .captures(raw)
        .map(|caps| caps[1].to_lowercase())
        .ok_or_else(|| NotionError::InvalidTarget(raw.to_string()))
}

#[derive(Debug, Clone)]
pub struct NotionClient {
    http: Client,
    base_url: String,
    version: String,
    api_key: String,
}

impl NotionClient {
    pub fn new(api_key: &str, base_url: &str, version: &str) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(NotionError::MissingCredential);
        }
        Ok(NotionClient {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            version: version.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.api_key)
            .header("Notion-Version", &self.version)
    }

    fn page_request(&self, page_id: &str) -> Result<Request> {
        let url = format!("{}/pages/{}", self.base_url, page_id);
        Ok(self.authed(self.http.get(url)).build()?)
    }

    fn blocks_request(&self, block_id: &str, cursor: Option<&str>) -> Result<Request> {
        let url = format!("{}/blocks/{}/children", self.base_url, block_id);
        let mut builder = self.http.get(url).query(&[("page_size", BLOCK_PAGE_SIZE)]);
        if let Some(cursor) = cursor {
            builder = builder.query(&[("start_cursor", cursor)]);
        }
        Ok(self.authed(builder).build()?)
    }

    fn query_request(&self, database_id: &str, query: Option<&str>) -> Result<Request> {
        let url = format!("{}/databases/{}/query", self.base_url, database_id);
        let builder = self.http.post(url).json(&query_body(query));
        Ok(self.authed(builder).build()?)
    }

    async fn send(&self, request: Request) -> Result<Response> {
        debug!("{} {}", request.method(), request.url());
        Ok(self.http.execute(request).await?)
    }

    /// Page metadata, including the property bag.
    pub async fn fetch_page(&self, page_id: &str) -> Result<Page> {
        let response = self.send(self.page_request(page_id)?).await?;
        read_json(response, "page properties").await
    }

    /// Every top-level block of the page body, following pagination.
    pub async fn fetch_blocks(&self, page_id: &str) -> Result<Vec<Block>> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let request = self.blocks_request(page_id, cursor.as_deref())?;
            let children: BlockChildren = read_json(self.send(request).await?, "page blocks").await?;
            blocks.extend(children.results.into_iter().map(Block::from_value));
            match children.next_cursor {
                Some(next) if children.has_more => cursor = Some(next),
                _ => break,
            }
        }
        Ok(blocks)
    }

    /// Fetch a monster page and normalize it. Properties and body are read
    /// concurrently; either failing fails the whole retrieval.
    pub async fn fetch_stat_block(&self, page: &str) -> Result<StatBlock> {
        let page_id = parse_id(page, "page")?;
        let (page, blocks) =
            tokio::try_join!(self.fetch_page(&page_id), self.fetch_blocks(&page_id))?;
        debug!(page = %page.id, properties = page.properties.len(), blocks = blocks.len(), "Fetched page");
        Ok(parser::assemble(&page, &blocks))
    }

    /// Name lookup in a monster database. A blank query lists the first
    /// [`SEARCH_LIMIT`] entries.
    pub async fn search(&self, database: &str, query: Option<&str>) -> Result<Vec<SearchHit>> {
        let database_id = parse_id(database, "database")?;
        let response = self.send(self.query_request(&database_id, query)?).await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(NotionError::Query {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }
        let results: QueryResults = serde_json::from_slice(&body)?;
        let hits = search_hits(results);
        info!("Search returned {} entries", hits.len());
        Ok(hits)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, what: &'static str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(NotionError::Fetch { what, status: status.as_u16() });
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

fn query_body(query: Option<&str>) -> serde_json::Value {
    let mut body = json!({ "page_size": SEARCH_LIMIT });
    // blankness is judged trimmed, but the query goes out as typed
    if let Some(q) = query.filter(|q| !q.trim().is_empty()) {
        body["filter"] = json!({
            "property": "Name",
            "title": { "contains": q },
        });
    }
    body
}

fn api_error_message(body: &[u8]) -> String {
    let parsed: Option<ApiError> = serde_json::from_slice(body).ok();
    match parsed {
        Some(ApiError { message: Some(m), code: Some(c) }) => format!("{} ({})", m, c),
        Some(ApiError { message: Some(m), .. }) => m,
        _ => "no error message".to_string(),
    }
}

fn search_hits(results: QueryResults) -> Vec<SearchHit> {
    results
        .results
        .into_iter()
        .take(SEARCH_LIMIT)
        .map(|page| SearchHit {
            name: page
                .title()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            id: page.id,
        })
        .collect()
}

// ── Tests ──
