use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use podpulse_domain::{EventRecord, MetricMap, PodRecord, PodSummary, SnapshotRow};
use podpulse_ports::{Clock, ClusterError, ClusterPort, MetricsError, MetricsPort, SinkPort};

const BASE_SECS: i64 = 1_700_000_000;

pub fn instant(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(BASE_SECS + secs, 0).unwrap()
}

pub fn dated_event(reason: &str, secs: i64) -> EventRecord {
    EventRecord {
        event_type: Some("Normal".to_string()),
        reason: Some(reason.to_string()),
        message: Some(format!("{reason} message")),
        source: Some("kubelet".to_string()),
        last_timestamp: Some(instant(secs)),
        ..Default::default()
    }
}

pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn at(secs: i64) -> Self {
        Self(instant(secs))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Default)]
pub struct MockMetrics {
    responses: HashMap<String, Result<MetricMap, MetricsError>>,
}

impl MockMetrics {
    pub fn with(mut self, expression: &str, samples: &[(&str, f64)]) -> Self {
        let map = samples
            .iter()
            .map(|(pod, value)| (pod.to_string(), *value))
            .collect();
        self.responses.insert(expression.to_string(), Ok(map));
        self
    }

    pub fn failing(mut self, expression: &str, err: MetricsError) -> Self {
        self.responses.insert(expression.to_string(), Err(err));
        self
    }
}

#[async_trait]
impl MetricsPort for MockMetrics {
    async fn instant_query(&self, expression: &str) -> Result<MetricMap, MetricsError> {
        self.responses
            .get(expression)
            .cloned()
            .unwrap_or_else(|| Ok(MetricMap::new()))
    }
}

pub struct MockCluster {
    pods: HashMap<String, Result<PodRecord, ClusterError>>,
    listing: Result<Vec<PodSummary>, ClusterError>,
    pod_events: HashMap<String, Result<Vec<EventRecord>, ClusterError>>,
    node_events: HashMap<String, Result<Vec<EventRecord>, ClusterError>>,
    logs: HashMap<String, Result<String, ClusterError>>,
    pub lookups: Mutex<Vec<String>>,
}

impl Default for MockCluster {
    fn default() -> Self {
        Self {
            pods: HashMap::new(),
            listing: Ok(Vec::new()),
            pod_events: HashMap::new(),
            node_events: HashMap::new(),
            logs: HashMap::new(),
            lookups: Mutex::new(Vec::new()),
        }
    }
}

impl MockCluster {
    pub fn pod(mut self, record: PodRecord) -> Self {
        self.pods.insert(record.name.clone(), Ok(record));
        self
    }

    pub fn pod_error(mut self, name: &str, err: ClusterError) -> Self {
        self.pods.insert(name.to_string(), Err(err));
        self
    }

    pub fn listing(mut self, listing: Result<Vec<PodSummary>, ClusterError>) -> Self {
        self.listing = listing;
        self
    }

    pub fn pod_events(mut self, pod: &str, events: Vec<EventRecord>) -> Self {
        self.pod_events.insert(pod.to_string(), Ok(events));
        self
    }

    pub fn pod_events_error(mut self, pod: &str, err: ClusterError) -> Self {
        self.pod_events.insert(pod.to_string(), Err(err));
        self
    }

    pub fn node_events(mut self, node: &str, events: Vec<EventRecord>) -> Self {
        self.node_events.insert(node.to_string(), Ok(events));
        self
    }

    pub fn log(mut self, pod: &str, log: Result<String, ClusterError>) -> Self {
        self.logs.insert(pod.to_string(), log);
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.lookups.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ClusterPort for MockCluster {
    async fn list_pods(&self) -> Result<Vec<PodSummary>, ClusterError> {
        self.listing.clone()
    }

    async fn read_pod(&self, name: &str) -> Result<PodRecord, ClusterError> {
        self.record(format!("pod:{name}"));
        self.pods.get(name).cloned().unwrap_or_else(|| {
            Err(ClusterError::NotFound {
                name: name.to_string(),
            })
        })
    }

    async fn list_pod_events(&self, pod: &str) -> Result<Vec<EventRecord>, ClusterError> {
        self.record(format!("pod-events:{pod}"));
        self.pod_events.get(pod).cloned().unwrap_or(Ok(Vec::new()))
    }

    async fn list_node_events(&self, node: &str) -> Result<Vec<EventRecord>, ClusterError> {
        self.record(format!("node-events:{node}"));
        self.node_events.get(node).cloned().unwrap_or(Ok(Vec::new()))
    }

    async fn tail_log(&self, pod: &str) -> Result<String, ClusterError> {
        self.record(format!("log:{pod}"));
        self.logs.get(pod).cloned().unwrap_or(Ok(String::new()))
    }
}

#[derive(Default)]
pub struct MemorySink {
    pub rows: Mutex<Vec<SnapshotRow>>,
    pub fail: bool,
}

#[async_trait]
impl SinkPort for MemorySink {
    async fn append(&self, rows: &[SnapshotRow]) -> Result<()> {
        if self.fail {
            anyhow::bail!("disk full");
        }
        self.rows.lock().unwrap().extend_from_slice(rows);
        Ok(())
    }
}
