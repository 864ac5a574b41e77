//! Ports for the collector's external collaborators.

mod error;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use podpulse_domain::{EventRecord, MetricMap, PodRecord, PodSummary, SnapshotRow};

pub use error::{ClusterError, CredentialError, MetricsError};

/// Supplies the bearer token for one metrics request. `None` means the
/// backend is queried without authentication.
#[async_trait]
pub trait CredentialPort: Send + Sync {
    async fn bearer_token(&self) -> Result<Option<String>, CredentialError>;
}

#[async_trait]
pub trait MetricsPort: Send + Sync {
    async fn instant_query(&self, expression: &str) -> Result<MetricMap, MetricsError>;
}

/// Read-only view of one namespace in the cluster.
#[async_trait]
pub trait ClusterPort: Send + Sync {
    async fn list_pods(&self) -> Result<Vec<PodSummary>, ClusterError>;

    async fn read_pod(&self, name: &str) -> Result<PodRecord, ClusterError>;

    async fn list_pod_events(&self, pod: &str) -> Result<Vec<EventRecord>, ClusterError>;

    /// Node events are cluster-scoped, not namespaced.
    async fn list_node_events(&self, node: &str) -> Result<Vec<EventRecord>, ClusterError>;

    async fn tail_log(&self, pod: &str) -> Result<String, ClusterError>;
}

#[async_trait]
pub trait SinkPort: Send + Sync {
    async fn append(&self, rows: &[SnapshotRow]) -> Result<()>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Sources a cycle reads from. The sink is held by the scheduler.
#[derive(Clone)]
pub struct PortSet {
    pub metrics: Arc<dyn MetricsPort>,
    pub cluster: Arc<dyn ClusterPort>,
    pub clock: Arc<dyn Clock>,
}
