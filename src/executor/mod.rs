//! Async REST boundary: SQL execution endpoint and reference-data fetches
//!
//! Fire-and-forget request/response calls, no retry, no deduplication of
//! in-flight requests; a later response simply wins.

use pyo3::prelude::*;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::catalog::{Attribute, SegmentTag};
use crate::error::Result;

const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Request body for the SQL execution endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SqlExecuteRequest {
    pub query: String,
}

/// Response body of the SQL execution endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SqlExecuteResponse {
    pub success: bool,
    #[serde(default)]
    pub rows: Vec<Vec<serde_json::Value>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Client for the admin backend's SQL and reference-data endpoints
pub struct SqlEndpointClient {
    client: Client,
    base_url: String,
}

impl SqlEndpointClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().user_agent(APP_USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST the compiled query to `/api/sql/execute`.
    ///
    /// A `success: false` body is not an error here; the caller decides how to
    /// surface it and keeps the compiled string for retry.
    pub async fn execute(&self, query: &str) -> Result<SqlExecuteResponse> {
        let url = format!("{}/api/sql/execute", self.base_url);
        debug!(%url, "executing cohort query");

        let response = self
            .client
            .post(&url)
            .json(&SqlExecuteRequest {
                query: query.to_string(),
            })
            .send()
            .await?
            .error_for_status()?;

        let body: SqlExecuteResponse = response.json().await?;
        if !body.success {
            error!(
                error = body.error.as_deref().unwrap_or("unknown"),
                "execution endpoint reported failure"
            );
        }
        Ok(body)
    }

    /// GET the attribute reference data from `/api/attributes`
    pub async fn fetch_attributes(&self) -> Result<Vec<Attribute>> {
        let url = format!("{}/api/attributes", self.base_url);
        debug!(%url, "fetching attribute catalog");
        let attributes = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(attributes)
    }

    /// GET the segment-tag reference data from `/api/segments`
    pub async fn fetch_segment_tags(&self) -> Result<Vec<SegmentTag>> {
        let url = format!("{}/api/segments", self.base_url);
        debug!(%url, "fetching segment tags");
        let tags = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(tags)
    }
}

/// ExecutionOutcome - execution-result handle for the Python-Rust boundary
///
/// Rows stay serialized; Python parses them only when it needs them.
#[pyclass]
pub struct ExecutionOutcome {
    success: bool,
    error: Option<String>,
    row_count: usize,
    rows_json: String,
}

impl ExecutionOutcome {
    pub fn from_response(response: SqlExecuteResponse) -> Self {
        let row_count = response.rows.len();
        let rows_json =
            serde_json::to_string(&response.rows).unwrap_or_else(|_| "[]".to_string());
        Self {
            success: response.success,
            error: response.error,
            row_count,
            rows_json,
        }
    }
}

#[pymethods]
impl ExecutionOutcome {
    #[getter]
    fn success(&self) -> bool {
        self.success
    }

    #[getter]
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[getter]
    fn row_count(&self) -> usize {
        self.row_count
    }

    /// Result rows as a JSON array-of-arrays string
    #[getter]
    fn rows_json(&self) -> &str {
        &self.rows_json
    }

    fn __repr__(&self) -> String {
        format!(
            "ExecutionOutcome(success={}, rows={})",
            self.success, self.row_count
        )
    }
}
