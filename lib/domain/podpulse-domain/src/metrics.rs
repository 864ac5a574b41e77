use std::collections::HashMap;

/// Per-pod scalar values returned by one instant query.
pub type MetricMap = HashMap<String, f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub entity_name: String,
    pub value: f64,
}

impl MetricSample {
    pub fn new(entity_name: impl Into<String>, value: f64) -> Self {
        Self {
            entity_name: entity_name.into(),
            value,
        }
    }

    /// Collapses samples into a map keyed by pod. A repeated label keeps the
    /// value seen last.
    pub fn into_map(samples: impl IntoIterator<Item = MetricSample>) -> MetricMap {
        samples
            .into_iter()
            .map(|sample| (sample.entity_name, sample.value))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKind {
    CpuUsage,
    MemoryUsage,
    MemoryLimit,
    NetworkTraffic,
    NetworkReceive,
    NetworkTransmit,
    NetworkReceiveErrors,
    NetworkTransmitErrors,
}

impl MetricKind {
    pub const ALL: [MetricKind; 8] = [
        MetricKind::CpuUsage,
        MetricKind::MemoryUsage,
        MetricKind::MemoryLimit,
        MetricKind::NetworkTraffic,
        MetricKind::NetworkReceive,
        MetricKind::NetworkTransmit,
        MetricKind::NetworkReceiveErrors,
        MetricKind::NetworkTransmitErrors,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::CpuUsage => "cpu_usage",
            MetricKind::MemoryUsage => "memory_usage",
            MetricKind::MemoryLimit => "memory_limit",
            MetricKind::NetworkTraffic => "network_traffic",
            MetricKind::NetworkReceive => "network_receive",
            MetricKind::NetworkTransmit => "network_transmit",
            MetricKind::NetworkReceiveErrors => "network_receive_errors",
            MetricKind::NetworkTransmitErrors => "network_transmit_errors",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
