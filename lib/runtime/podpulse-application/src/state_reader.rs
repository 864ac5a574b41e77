use std::sync::Arc;

use podpulse_domain::{NodePlacement, Phase, WorkloadState};
use podpulse_ports::{ClusterError, ClusterPort};

/// Workload state and placement from a single pod read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodInspection {
    pub state: WorkloadState,
    pub placement: NodePlacement,
}

#[derive(Clone)]
pub struct WorkloadStateReader {
    cluster: Arc<dyn ClusterPort>,
}

impl WorkloadStateReader {
    pub fn new(cluster: Arc<dyn ClusterPort>) -> Self {
        Self { cluster }
    }

    pub async fn read(&self, pod: &str) -> WorkloadState {
        self.inspect(pod).await.state
    }

    pub async fn inspect(&self, pod: &str) -> PodInspection {
        match self.cluster.read_pod(pod).await {
            Ok(record) => PodInspection {
                state: WorkloadState::from_record(&record),
                placement: record.placement(),
            },
            Err(err) => {
                tracing::warn!(pod, error = %err, "pod lookup failed");
                PodInspection {
                    state: unavailable_state(&err),
                    placement: NodePlacement::Unknown,
                }
            }
        }
    }
}

fn unavailable_state(err: &ClusterError) -> WorkloadState {
    let phase = match err {
        ClusterError::NotFound { .. } => Phase::NotFound,
        ClusterError::Api(_) => Phase::Error,
        ClusterError::Transport(_) => Phase::Unknown,
    };
    WorkloadState::unavailable(phase, err.to_string())
}
