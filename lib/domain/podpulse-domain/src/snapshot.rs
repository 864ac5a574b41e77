use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::events::{EventSummary, NOT_AVAILABLE};
use crate::metrics::MetricKind;
use crate::workload::WorkloadState;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const COLUMN_COUNT: usize = 29;

pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "Timestamp",
    "Pod Name",
    "CPU Usage (%)",
    "Memory Usage (MiB)",
    "Memory Limit (MiB)",
    "Memory Usage (%)",
    "Network Traffic (B/s)",
    "Network Receive (B/s)",
    "Network Transmit (B/s)",
    "Network Receive Errors",
    "Network Transmit Errors",
    "Last Log Entry",
    "Pod Status",
    "Pod Reason",
    "Pod Restarts",
    "Ready Containers",
    "Total Containers",
    "Error Message",
    "Pod Event Type",
    "Pod Event Reason",
    "Pod Event Age",
    "Pod Event Source",
    "Pod Event Message",
    "Node Name",
    "Node Event Type",
    "Node Event Reason",
    "Node Event Age",
    "Node Event Source",
    "Node Event Message",
];

/// One pod in one collection cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub timestamp: DateTime<Utc>,
    pub pod_name: String,
    pub metrics: BTreeMap<MetricKind, f64>,
    pub memory_usage_percent: Option<f64>,
    pub last_log_entry: String,
    pub state: WorkloadState,
    pub pod_event: EventSummary,
    pub node_name: String,
    pub node_event: EventSummary,
}

impl SnapshotRow {
    pub fn metric(&self, kind: MetricKind) -> Option<f64> {
        self.metrics.get(&kind).copied()
    }

    /// Cells in `COLUMNS` order.
    pub fn cells(&self) -> [String; COLUMN_COUNT] {
        let metric = |kind| render_float(self.metric(kind));
        let [pod_type, pod_reason, pod_age, pod_source, pod_message] = self.pod_event.fields();
        let [node_type, node_reason, node_age, node_source, node_message] =
            self.node_event.fields();

        [
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.pod_name.clone(),
            metric(MetricKind::CpuUsage),
            metric(MetricKind::MemoryUsage),
            metric(MetricKind::MemoryLimit),
            render_float(self.memory_usage_percent),
            metric(MetricKind::NetworkTraffic),
            metric(MetricKind::NetworkReceive),
            metric(MetricKind::NetworkTransmit),
            metric(MetricKind::NetworkReceiveErrors),
            metric(MetricKind::NetworkTransmitErrors),
            self.last_log_entry.clone(),
            self.state.phase.to_string(),
            self.state.reason.clone().unwrap_or_default(),
            self.state.restart_count.to_string(),
            self.state.ready_count.to_string(),
            self.state.total_count.to_string(),
            self.state.error_message.clone().unwrap_or_default(),
            pod_type,
            pod_reason,
            pod_age,
            pod_source,
            pod_message,
            self.node_name.clone(),
            node_type,
            node_reason,
            node_age,
            node_source,
            node_message,
        ]
    }
}

/// `100 * usage / limit`, or `None` when there is no positive limit.
/// Missing usage against a known limit counts as zero.
pub fn usage_percent(usage: Option<f64>, limit: Option<f64>) -> Option<f64> {
    match limit {
        Some(limit) if limit > 0.0 => Some(100.0 * usage.unwrap_or(0.0) / limit),
        _ => None,
    }
}

/// Plain decimal notation, always with a fractional part for finite values.
fn render_float(value: Option<f64>) -> String {
    match value {
        Some(value) => {
            let rendered = value.to_string();
            if value.is_finite() && !rendered.contains('.') {
                format!("{rendered}.0")
            } else {
                rendered
            }
        }
        None => NOT_AVAILABLE.to_string(),
    }
}
