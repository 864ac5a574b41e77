use crate::metrics::MetricKind;

/// PromQL templates for every metric kind, scoped to one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySet {
    namespace: String,
    window: String,
}

impl QuerySet {
    pub fn new(namespace: impl Into<String>, window: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            window: window.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn expression(&self, kind: MetricKind) -> String {
        let ns = &self.namespace;
        let w = &self.window;
        match kind {
            MetricKind::CpuUsage => format!(
                "100 * max(rate(container_cpu_usage_seconds_total{{namespace=\"{ns}\"}}[{w}])) by (pod)"
            ),
            // Bytes to MiB.
            MetricKind::MemoryUsage => format!(
                "sum(container_memory_working_set_bytes{{namespace=\"{ns}\",container!=\"\"}}) by (pod) / 1024 / 1024"
            ),
            MetricKind::MemoryLimit => format!(
                "sum(kube_pod_container_resource_limits{{resource=\"memory\",namespace=\"{ns}\"}}) by (pod) / 1024 / 1024"
            ),
            MetricKind::NetworkTraffic => format!(
                "sum(rate(container_network_receive_bytes_total{{namespace=\"{ns}\"}}[{w}]) + rate(container_network_transmit_bytes_total{{namespace=\"{ns}\"}}[{w}])) by (pod)"
            ),
            MetricKind::NetworkReceive => rate_by_pod("container_network_receive_bytes_total", ns, w),
            MetricKind::NetworkTransmit => {
                rate_by_pod("container_network_transmit_bytes_total", ns, w)
            }
            MetricKind::NetworkReceiveErrors => {
                rate_by_pod("container_network_receive_errors_total", ns, w)
            }
            MetricKind::NetworkTransmitErrors => {
                rate_by_pod("container_network_transmit_errors_total", ns, w)
            }
        }
    }
}

fn rate_by_pod(series: &str, ns: &str, w: &str) -> String {
    format!("sum(rate({series}{{namespace=\"{ns}\"}}[{w}])) by (pod)")
}
