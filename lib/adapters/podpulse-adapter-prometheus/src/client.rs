use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use podpulse_domain::{MetricMap, MetricSample};
use podpulse_ports::{CredentialPort, MetricsError, MetricsPort};

use crate::response::decode_samples;

const QUERY_PATH: &str = "/api/v1/query";

/// Instant queries against `<endpoint>/api/v1/query`.
pub struct PrometheusClient {
    http: reqwest::Client,
    endpoint: String,
    credentials: Arc<dyn CredentialPort>,
}

impl PrometheusClient {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
        credentials: Arc<dyn CredentialPort>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self::with_http(http, endpoint, credentials))
    }

    pub fn with_http(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        credentials: Arc<dyn CredentialPort>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            credentials,
        }
    }

    fn query_url(&self) -> String {
        format!("{}{QUERY_PATH}", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl MetricsPort for PrometheusClient {
    async fn instant_query(&self, expression: &str) -> Result<MetricMap, MetricsError> {
        let token = self.credentials.bearer_token().await?;

        let mut request = self
            .http
            .post(self.query_url())
            .query(&[("query", expression)]);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| MetricsError::Transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| MetricsError::Transport(err.to_string()))?;
        if !status.is_success() {
            return Err(MetricsError::Backend {
                status: status.as_u16(),
                message: body,
            });
        }

        let samples = decode_samples(&body)?;
        tracing::debug!(query = expression, samples = samples.len(), "instant query");
        Ok(MetricSample::into_map(samples))
    }
}
