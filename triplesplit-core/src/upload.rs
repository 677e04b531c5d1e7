//! Upload of partition files to a graph store
//!
//! Runs strictly after the distributor has been closed, so every local file
//! is complete. Partitions are uploaded one at a time in ascending index
//! order; each file is read into memory and sent as a single
//! `POST <base-url>?graph=<name>`. The first failure aborts the pass and
//! reports how many graphs were stored before it.

use crate::destination::OutputLayout;
use crate::distributor::DistributionSummary;
use crate::error::{Error, Result, UploadFailure};
use crate::partition::render_name;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Media type for N-Triples, the line-oriented triple serialization.
pub const N_TRIPLES_CONTENT_TYPE: &str = "application/n-triples";

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_content_type() -> String {
    N_TRIPLES_CONTENT_TYPE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Graph-store endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStoreConfig {
    /// Graph store endpoint, e.g. `http://localhost:3030/test`.
    pub url: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl GraphStoreConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_type: default_content_type(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Result of a completed upload pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    /// Graphs uploaded.
    pub uploaded: usize,
    /// Wall-clock time of the whole pass.
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S: serde::Serializer>(
    d: &Duration,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// HTTP client for the graph store's `?graph=` endpoint.
#[derive(Clone)]
pub struct GraphStoreClient {
    client: Client,
    base_url: String,
    content_type: String,
}

impl fmt::Debug for GraphStoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphStoreClient")
            .field("base_url", &self.base_url)
            .field("content_type", &self.content_type)
            .finish()
    }
}

impl GraphStoreClient {
    /// Build a client from endpoint settings.
    ///
    /// Every request is bounded by the configured timeout.
    pub fn new(config: &GraphStoreConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(Error::config("graph store URL is empty"));
        }
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.clone(),
            content_type: config.content_type.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL a graph is posted to.
    pub fn graph_url(&self, graph: &str) -> String {
        format!("{}?graph={}", self.base_url, graph)
    }

    /// POST one graph's full contents.
    ///
    /// The caller wraps a failure with the progress of the pass.
    pub async fn upload_graph(
        &self,
        graph: &str,
        body: Vec<u8>,
    ) -> std::result::Result<(), UploadFailure> {
        let resp = self
            .client
            .post(self.graph_url(graph))
            .header(reqwest::header::CONTENT_TYPE, &self.content_type)
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let mut body = resp.text().await.unwrap_or_default();
        if body.is_empty() {
            body = "(empty body)".to_string();
        }
        Err(UploadFailure::Status { status, body })
    }
}

/// Upload every partition `0..N` of the layout.
///
/// Each file is opened, read whole and posted before the next one is
/// touched. A partition that never received a line has no file, so a corpus
/// shorter than `N` lines fails on the first missing graph.
pub async fn upload_partitions(
    client: &GraphStoreClient,
    layout: &OutputLayout,
    summary: &DistributionSummary,
) -> Result<UploadSummary> {
    let start = Instant::now();
    let mut uploaded = 0;

    for index in 0..summary.partitions {
        let graph = render_name(index, summary.partitions)?;
        let path = layout.path_for(&graph);
        let body = match tokio::fs::read(&path).await {
            Ok(body) => body,
            Err(source) => {
                return Err(Error::upload(
                    uploaded,
                    graph,
                    UploadFailure::Open { path, source },
                ));
            }
        };

        let bytes = body.len();
        client
            .upload_graph(&graph, body)
            .await
            .map_err(|e| Error::upload(uploaded, &graph, e))?;
        uploaded += 1;
        tracing::info!(graph = %graph, bytes, "uploaded graph");
    }

    let elapsed = start.elapsed();
    tracing::info!(
        url = %client.base_url(),
        uploaded,
        elapsed_ms = elapsed.as_millis() as u64,
        "upload complete"
    );
    Ok(UploadSummary { uploaded, elapsed })
}

// ============================================================================
// Tests
// ============================================================================
