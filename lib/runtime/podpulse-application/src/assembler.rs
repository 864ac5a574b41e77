use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use podpulse_domain::{
    EventSummary, ExclusionSet, MetricKind, MetricMap, NOT_AVAILABLE, NodePlacement, Phase,
    QuerySet, SnapshotRow, usage_percent,
};
use podpulse_ports::{Clock, ClusterPort, PortSet};

use crate::correlator::EventCorrelator;
use crate::fallback::ResultExt;
use crate::metric_client::MetricQueryClient;
use crate::state_reader::WorkloadStateReader;

pub const NO_LOGS: &str = "No logs";
pub const LOG_RETRIEVAL_ERROR: &str = "Log retrieval error";

#[derive(Debug, Clone)]
pub struct AssemblerOptions {
    pub queries: QuerySet,
    pub exclusions: ExclusionSet,
    pub capture_logs: bool,
}

/// Output of one collection cycle.
#[derive(Debug, Clone)]
pub struct Cycle {
    pub timestamp: DateTime<Utc>,
    /// Non-excluded pods and their phases, or `None` when listing failed.
    pub live: Option<BTreeMap<String, Phase>>,
    pub rows: Vec<SnapshotRow>,
}

type Samples = BTreeMap<MetricKind, MetricMap>;

pub struct SnapshotAssembler {
    options: AssemblerOptions,
    metrics: MetricQueryClient,
    cluster: Arc<dyn ClusterPort>,
    states: WorkloadStateReader,
    pod_events: EventCorrelator,
    node_events: EventCorrelator,
    clock: Arc<dyn Clock>,
}

impl SnapshotAssembler {
    pub fn new(ports: &PortSet, options: AssemblerOptions) -> Self {
        Self {
            options,
            metrics: MetricQueryClient::new(Arc::clone(&ports.metrics)),
            cluster: Arc::clone(&ports.cluster),
            states: WorkloadStateReader::new(Arc::clone(&ports.cluster)),
            pod_events: EventCorrelator::for_pods(
                Arc::clone(&ports.cluster),
                Arc::clone(&ports.clock),
            ),
            node_events: EventCorrelator::for_nodes(
                Arc::clone(&ports.cluster),
                Arc::clone(&ports.clock),
            ),
            clock: Arc::clone(&ports.clock),
        }
    }

    pub async fn collect_cycle(&self) -> Cycle {
        let timestamp = self.clock.now();
        tracing::info!(
            namespace = self.options.queries.namespace(),
            "fetching data for pods"
        );

        let live = self.live_pods().await;
        let samples = self.query_all().await;
        let candidates = self.candidates(&samples);

        let mut rows = Vec::with_capacity(candidates.len());
        for pod in &candidates {
            rows.push(self.assemble_row(timestamp, pod, &samples).await);
        }

        Cycle {
            timestamp,
            live,
            rows,
        }
    }

    async fn live_pods(&self) -> Option<BTreeMap<String, Phase>> {
        self.cluster
            .list_pods()
            .await
            .map(|pods| {
                pods.into_iter()
                    .filter(|pod| !self.options.exclusions.excludes(&pod.name))
                    .map(|pod| (pod.name, pod.phase))
                    .collect()
            })
            .map(Some)
            .or_fallback("pod listing", None)
    }

    async fn query_all(&self) -> Samples {
        let mut samples = Samples::new();
        for kind in MetricKind::ALL {
            let expression = self.options.queries.expression(kind);
            let values = self
                .metrics
                .query(&expression)
                .await
                .or_fallback(&format!("{kind} query"), MetricMap::new());
            tracing::debug!(metric = %kind, pods = values.len(), "metric query done");
            samples.insert(kind, values);
        }
        samples
    }

    /// Pods with a memory usage or limit sample, minus exclusions. Pods with
    /// no metrics produce no row.
    fn candidates(&self, samples: &Samples) -> BTreeSet<String> {
        [MetricKind::MemoryUsage, MetricKind::MemoryLimit]
            .iter()
            .filter_map(|kind| samples.get(kind))
            .flat_map(|values| values.keys())
            .filter(|pod| !self.options.exclusions.excludes(pod))
            .cloned()
            .collect()
    }

    async fn assemble_row(
        &self,
        timestamp: DateTime<Utc>,
        pod: &str,
        samples: &Samples,
    ) -> SnapshotRow {
        let metrics: BTreeMap<MetricKind, f64> = samples
            .iter()
            .filter_map(|(kind, values)| values.get(pod).map(|value| (*kind, *value)))
            .collect();
        let memory_usage_percent = usage_percent(
            metrics.get(&MetricKind::MemoryUsage).copied(),
            metrics.get(&MetricKind::MemoryLimit).copied(),
        );

        let inspection = self.states.inspect(pod).await;
        let pod_event = self.pod_events.latest(pod).await;
        let node_event = match &inspection.placement {
            NodePlacement::Assigned(node) => self.node_events.latest(node).await,
            NodePlacement::Unassigned => EventSummary::NothingFound,
            NodePlacement::Unknown => EventSummary::LookupFailed,
        };
        let last_log_entry = self.last_log_entry(pod).await;

        SnapshotRow {
            timestamp,
            pod_name: pod.to_string(),
            metrics,
            memory_usage_percent,
            last_log_entry,
            node_name: inspection.placement.display_name().to_string(),
            state: inspection.state,
            pod_event,
            node_event,
        }
    }

    async fn last_log_entry(&self, pod: &str) -> String {
        if !self.options.capture_logs {
            return NOT_AVAILABLE.to_string();
        }
        self.cluster
            .tail_log(pod)
            .await
            .map(|log| match log.lines().rev().find(|line| !line.trim().is_empty()) {
                Some(line) => line.trim_end().to_string(),
                None => NO_LOGS.to_string(),
            })
            .or_fallback("log retrieval", LOG_RETRIEVAL_ERROR.to_string())
    }
}
