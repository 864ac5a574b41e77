use std::sync::Arc;

use podpulse_domain::MetricMap;
use podpulse_ports::{CredentialError, MetricsError, MetricsPort};

/// Instant queries with per-query failure isolation. Transport, backend and
/// decode failures degrade to an empty map; credential failures are returned
/// so the caller can tell an auth outage from an empty namespace.
#[derive(Clone)]
pub struct MetricQueryClient {
    port: Arc<dyn MetricsPort>,
}

impl MetricQueryClient {
    pub fn new(port: Arc<dyn MetricsPort>) -> Self {
        Self { port }
    }

    pub async fn query(&self, expression: &str) -> Result<MetricMap, CredentialError> {
        match self.port.instant_query(expression).await {
            Ok(samples) => Ok(samples),
            Err(MetricsError::Credential(err)) => Err(err),
            Err(err) => {
                tracing::warn!(query = expression, error = %err, "metrics query failed");
                Ok(MetricMap::new())
            }
        }
    }
}
