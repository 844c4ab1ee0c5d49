//! HTTP gateway for the remote employee service

use crate::error::{DashboardError, DashboardResult, Operation};
use crate::gateway::EmployeeGateway;
use async_trait::async_trait;
use recruitly_core::{Config, EmployeePayload, EmployeeRecord, FilterState, RecordId};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// API client for the `/api/employees` resource
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a new gateway using the transport's default settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: trim_base(base_url.into()),
        }
    }

    /// Create a gateway from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &Config) -> recruitly_core::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.api.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| {
            recruitly_core::Error::configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            base_url: trim_base(config.base_url().to_string()),
        })
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/api/employees", self.base_url)
    }

    fn record_url(&self, id: &RecordId) -> String {
        format!(
            "{}/api/employees/{}",
            self.base_url,
            urlencoding::encode(id.as_str())
        )
    }

    /// URL for a list request, query parameters included
    pub fn list_url(&self, filter: &FilterState) -> String {
        let query = filter
            .query_pairs()
            .into_iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{query}", self.collection_url())
    }
}

fn trim_base(base_url: String) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

async fn send(
    operation: Operation,
    request: reqwest::RequestBuilder,
) -> DashboardResult<Response> {
    let response = request.send().await.map_err(|e| {
        DashboardError::network(operation, format!("Failed to reach employee service: {e}"))
    })?;

    if !response.status().is_success() {
        return Err(DashboardError::http_status(
            operation,
            response.status().as_u16(),
        ));
    }

    Ok(response)
}

async fn decode<T: DeserializeOwned>(operation: Operation, response: Response) -> DashboardResult<T> {
    response.json().await.map_err(|e| {
        DashboardError::network(operation, format!("Failed to parse response: {e}"))
    })
}

/// Decode list items one by one; items that are not valid records are
/// skipped with a warning instead of failing the whole list.
fn decode_records(items: Vec<serde_json::Value>) -> Vec<EmployeeRecord> {
    let total = items.len();
    let records: Vec<EmployeeRecord> = items
        .into_iter()
        .filter_map(|item| {
            serde_json::from_value(item)
                .map_err(|error| warn!(%error, "skipping malformed employee record"))
                .ok()
        })
        .collect();

    let skipped = total - records.len();
    if skipped > 0 {
        warn!(skipped, total, "employee list contained malformed records");
    }
    records
}

#[async_trait]
impl EmployeeGateway for HttpGateway {
    async fn list(&self, filter: &FilterState) -> DashboardResult<Vec<EmployeeRecord>> {
        let url = self.list_url(filter);
        debug!(%url, "listing employees");

        let response = send(Operation::List, self.client.get(&url)).await?;
        let items: Vec<serde_json::Value> = decode(Operation::List, response).await?;
        Ok(decode_records(items))
    }

    async fn create(&self, payload: &EmployeePayload) -> DashboardResult<EmployeeRecord> {
        debug!(name = %payload.name, "creating employee");

        let request = self.client.post(self.collection_url()).json(payload);
        let response = send(Operation::Create, request).await?;
        decode(Operation::Create, response).await
    }

    async fn update(
        &self,
        id: &RecordId,
        payload: &EmployeePayload,
    ) -> DashboardResult<EmployeeRecord> {
        debug!(%id, "updating employee");

        let request = self.client.put(self.record_url(id)).json(payload);
        let response = send(Operation::Update, request).await?;
        decode(Operation::Update, response).await
    }

    async fn delete(&self, id: &RecordId) -> DashboardResult<()> {
        debug!(%id, "deleting employee");

        send(Operation::Delete, self.client.delete(self.record_url(id))).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}
