//! Open-data feed HTTP client.
//!
//! Every collection is served as a paginated JSON envelope. The client pages
//! through it, parses each record into its raw DTO and converts to domain
//! types. There are no retries: the first failure is returned.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Local;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::{Estimate, Line, SequenceEntry, Stop};

use super::convert::{convert_estimate, convert_line, convert_sequence, convert_stop};
use super::error::FeedError;
use super::filter;
use super::types::{Page, RawEstimate, RawLine, RawSequenceRecord, RawStop};

/// Default base URL of the urban transport open-data service.
const DEFAULT_BASE_URL: &str =
    "https://www.zaragoza.es/sede/servicio/urbanismo-infraestructuras/transporte-urbano";

const SEQUENCES_PATH: &str = "linea-autobus/secuencia";
const ESTIMATES_PATH: &str = "poste-autobus/estimacion";
const STOPS_PATH: &str = "poste-autobus";
const LINES_PATH: &str = "linea-autobus";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Records requested per page
    pub page_size: u32,
    /// Hard stop on pagination, whatever `totalCount` claims
    pub max_pages: u32,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: 500,
            max_pages: 50,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }
}

impl FeedConfig {
    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_page_size(mut self, rows: u32) -> Self {
        self.page_size = rows.max(1);
        self
    }

    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n.max(1);
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the transport open-data feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
    page_size: u32,
    max_pages: u32,
    semaphore: Arc<Semaphore>,
}

impl FeedClient {
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
            max_pages: config.max_pages,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// All sequence records mentioning a stop.
    pub async fn sequence_by_stop(&self, stop_id: &str) -> Result<Vec<SequenceEntry>, FeedError> {
        let q = filter::equals("parada", stop_id);
        let records: Vec<RawSequenceRecord> = self.fetch_all(SEQUENCES_PATH, Some(&q)).await?;
        Ok(convert_sequence(&records))
    }

    /// All sequence records for any of the given lines.
    ///
    /// An empty set yields an empty result without touching the network.
    pub async fn sequence_by_lines(
        &self,
        lines: &BTreeSet<String>,
    ) -> Result<Vec<SequenceEntry>, FeedError> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let q = filter::any_of("linea", lines.iter().map(String::as_str));
        let records: Vec<RawSequenceRecord> = self.fetch_all(SEQUENCES_PATH, Some(&q)).await?;
        Ok(convert_sequence(&records))
    }

    /// Live estimates for every line at one stop.
    pub async fn estimates_by_stop(&self, stop_id: &str) -> Result<Vec<Estimate>, FeedError> {
        let q = filter::equals("parada", stop_id);
        let records: Vec<RawEstimate> = self.fetch_all(ESTIMATES_PATH, Some(&q)).await?;
        let now = Local::now().naive_local();
        Ok(records.iter().map(|r| convert_estimate(r, now)).collect())
    }

    /// The full live estimates collection.
    pub async fn all_estimates(&self) -> Result<Vec<Estimate>, FeedError> {
        let records: Vec<RawEstimate> = self.fetch_all(ESTIMATES_PATH, None).await?;
        let now = Local::now().naive_local();
        Ok(records.iter().map(|r| convert_estimate(r, now)).collect())
    }

    /// Stops whose name contains `text`, in the feed's ranking order.
    pub async fn search_stops(&self, text: &str, limit: u32) -> Result<Vec<Stop>, FeedError> {
        let q = filter::contains("title", text);
        let page: Page<RawStop> = self.fetch_page(STOPS_PATH, Some(&q), 0, limit).await?;
        Ok(page.result.iter().map(convert_stop).collect())
    }

    /// Lines whose label or name contains `text`. Empty text lists all lines.
    pub async fn search_lines(&self, text: &str) -> Result<Vec<Line>, FeedError> {
        let q = (!text.trim().is_empty()).then(|| {
            format!(
                "{},{}",
                filter::contains("linea", text),
                filter::contains("title", text)
            )
        });
        let records: Vec<RawLine> = self.fetch_all(LINES_PATH, q.as_deref()).await?;
        Ok(records.iter().map(convert_line).collect())
    }

    /// Fetch every page of a collection and merge the records.
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        path: &str,
        q: Option<&str>,
    ) -> Result<Vec<T>, FeedError> {
        let rows = self.page_size;
        let mut records = Vec::new();
        let mut start: u64 = 0;

        for page_number in 0..self.max_pages {
            let page: Page<T> = self.fetch_page(path, q, start, rows).await?;
            let received = page.result.len() as u64;
            records.extend(page.result);
            start += received;

            // Servers may cap `rows` below what we asked for, so a short page
            // only ends paging when there is no `totalCount` to go by.
            let exhausted = match page.total_count {
                Some(total) => received == 0 || start >= total,
                None => received < u64::from(rows),
            };
            if exhausted {
                debug!(path, records = records.len(), pages = page_number + 1, "fetched collection");
                return Ok(records);
            }
        }

        warn!(
            path,
            records = records.len(),
            max_pages = self.max_pages,
            "pagination limit reached, result may be truncated"
        );
        Ok(records)
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        path: &str,
        q: Option<&str>,
        start: u64,
        rows: u32,
    ) -> Result<Page<T>, FeedError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| FeedError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/{}.json", self.base_url, path);

        let mut query = vec![
            ("start", start.to_string()),
            ("rows", rows.to_string()),
        ];
        if let Some(q) = q {
            query.push(("q", q.to_string()));
        }

        let response = self.http.get(&url).query(&query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            let snippet: String = body.chars().take(500).collect();
            warn!(path, error = %e, body = %snippet, "unparseable feed response");
            FeedError::Json {
                message: e.to_string(),
                body: Some(snippet),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = FeedConfig::default()
            .with_base_url("http://localhost:8080/")
            .with_page_size(100)
            .with_max_concurrent(10)
            .with_timeout(60);

        assert_eq!(config.base_url, "http://localhost:8080/");
        assert_eq!(config.page_size, 100);
        assert_eq!(config.max_concurrent, 10);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = FeedConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_size, 500);
        assert_eq!(config.max_pages, 50);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn zero_sizes_are_clamped() {
        let config = FeedConfig::default().with_page_size(0).with_max_concurrent(0);
        assert_eq!(config.page_size, 1);
        assert_eq!(config.max_concurrent, 1);
    }

    #[test]
    fn client_trims_trailing_slash() {
        let config = FeedConfig::default().with_base_url("http://localhost:8080/");
        let client = FeedClient::new(config).unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    /// Serve a sequence collection of `total` records, at most `cap` per page.
    async fn capped_server(total: u64, cap: u64) -> String {
        use axum::{Json, Router, extract::Query, routing::get};
        use std::collections::HashMap;

        let handler = move |Query(params): Query<HashMap<String, String>>| async move {
            let start: u64 = params.get("start").and_then(|s| s.parse().ok()).unwrap_or(0);
            let end = (start + cap).min(total);
            let result: Vec<_> = (start..end)
                .map(|i| {
                    serde_json::json!({
                        "linea": "15",
                        "sentido": 1,
                        "distancia": i as f64,
                        "parada": i.to_string(),
                        "nombreParada": format!("Stop {i}"),
                    })
                })
                .collect();
            Json(serde_json::json!({
                "totalCount": total,
                "start": start,
                "rows": cap,
                "result": result,
            }))
        };

        let app = Router::new().route(&format!("/{SEQUENCES_PATH}.json"), get(handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn pages_past_server_row_cap_until_total_count() {
        let base = capped_server(5, 2).await;
        let client = FeedClient::new(FeedConfig::default().with_base_url(base)).unwrap();

        let entries = client.sequence_by_stop("x").await.unwrap();
        assert_eq!(entries.len(), 5);
    }

    #[tokio::test]
    async fn full_pages_stop_at_total_count() {
        let base = capped_server(4, 2).await;
        let config = FeedConfig::default().with_base_url(base).with_page_size(2);
        let client = FeedClient::new(config).unwrap();

        let entries = client.sequence_by_stop("x").await.unwrap();
        assert_eq!(entries.len(), 4);
    }

    #[tokio::test]
    async fn empty_line_set_skips_network() {
        // Unroutable base URL: any request would fail.
        let config = FeedConfig::default().with_base_url("http://127.0.0.1:9");
        let client = FeedClient::new(config).unwrap();

        let entries = client.sequence_by_lines(&BTreeSet::new()).await.unwrap();
        assert!(entries.is_empty());
    }
}
