//! REST client for the CRM backend endpoints.
//!
//! Wraps the backend's read, write, and catalog endpoints using
//! [`reqwest`]. Every operation is attempted exactly once: there are no
//! retries, and an in-flight request runs to transport completion -- no
//! caller-side timeout or abort.

use async_trait::async_trait;
use leadline_core::query::LeadQuery;
use leadline_core::types::DbId;
use serde_json::{Map, Value};

use crate::config::ClientConfig;
use crate::envelope::{Catalog, ReadEnvelope, RecordPage, WriteEnvelope};
use crate::params::read_params;
use crate::remote::RemoteCrm;

/// HTTP client for a single CRM backend.
pub struct CrmApi {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// Errors from the CRM REST layer.
#[derive(Debug, thiserror::Error)]
pub enum CrmApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("CRM API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The backend answered 2xx but reported `success: false`.
    #[error("Rejected by CRM: {0}")]
    Rejected(String),
}

impl CrmApi {
    /// Create a new API client from connection settings.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across clients).
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key,
        }
    }

    fn records_url(&self) -> String {
        format!("{}/api/records", self.base_url)
    }

    fn record_url(&self, id: DbId) -> String {
        format!("{}/api/records/{}", self.base_url, id)
    }

    fn catalog_url(&self) -> String {
        format!("{}/api/catalog", self.base_url)
    }

    /// Attach the bearer token when one is configured.
    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`CrmApiError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, CrmApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CrmApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful response as a read envelope.
    async fn read_envelope(response: reqwest::Response) -> Result<ReadEnvelope, CrmApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<ReadEnvelope>().await?)
    }

    /// Parse a successful response as a write envelope, converting
    /// `success: false` into [`CrmApiError::Rejected`].
    async fn write_ack(response: reqwest::Response) -> Result<WriteEnvelope, CrmApiError> {
        let response = Self::ensure_success(response).await?;
        let envelope = response.json::<WriteEnvelope>().await?;
        if !envelope.success {
            return Err(CrmApiError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "unspecified failure".to_string()),
            ));
        }
        Ok(envelope)
    }
}

#[async_trait]
impl RemoteCrm for CrmApi {
    async fn fetch_page(
        &self,
        resource: &str,
        query: &LeadQuery,
    ) -> Result<RecordPage, CrmApiError> {
        let response = self
            .authorized(
                self.client
                    .get(self.records_url())
                    .query(&read_params(resource, query)),
            )
            .send()
            .await?;

        let envelope = Self::read_envelope(response).await?;
        if !envelope.success {
            return Err(CrmApiError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "unspecified failure".to_string()),
            ));
        }

        Ok(RecordPage {
            total: envelope.meta.total,
            data: envelope.data,
        })
    }

    async fn fetch_one(&self, resource: &str, id: DbId) -> Result<Option<Value>, CrmApiError> {
        let response = self
            .authorized(
                self.client
                    .get(self.record_url(id))
                    .query(&[("resource", resource)]),
            )
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let envelope = Self::read_envelope(response).await?;
        if !envelope.success {
            // Single-record misses surface as absence, not errors.
            tracing::debug!(resource, id, "Record lookup reported no match");
            return Ok(None);
        }

        Ok(envelope.data.into_iter().next())
    }

    async fn create(&self, resource: &str, body: Map<String, Value>) -> Result<DbId, CrmApiError> {
        let response = self
            .authorized(
                self.client
                    .post(self.records_url())
                    .query(&[("resource", resource)])
                    .json(&Value::Object(body)),
            )
            .send()
            .await?;

        let envelope = Self::write_ack(response).await?;
        envelope
            .id
            .ok_or_else(|| CrmApiError::Rejected("create response missing id".to_string()))
    }

    async fn update(
        &self,
        resource: &str,
        id: DbId,
        body: Map<String, Value>,
    ) -> Result<(), CrmApiError> {
        let response = self
            .authorized(
                self.client
                    .put(self.record_url(id))
                    .query(&[("resource", resource)])
                    .json(&Value::Object(body)),
            )
            .send()
            .await?;

        Self::write_ack(response).await?;
        Ok(())
    }

    async fn delete(&self, resource: &str, id: DbId) -> Result<(), CrmApiError> {
        let response = self
            .authorized(
                self.client
                    .delete(self.record_url(id))
                    .query(&[("resource", resource)]),
            )
            .send()
            .await?;

        Self::write_ack(response).await?;
        Ok(())
    }

    async fn fetch_catalog(&self) -> Result<Catalog, CrmApiError> {
        let response = self.authorized(self.client.get(self.catalog_url())).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<Catalog>().await?)
    }
}
