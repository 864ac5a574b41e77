use std::fmt;

use crate::events::{NOT_AVAILABLE, UNKNOWN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Running,
    Pending,
    Succeeded,
    Failed,
    Unknown,
    NotFound,
    Error,
}

impl Phase {
    /// Maps a pod phase reported by the API server. Unrecognised values are `Unknown`.
    pub fn from_api(phase: Option<&str>) -> Self {
        match phase {
            Some("Running") => Phase::Running,
            Some("Pending") => Phase::Pending,
            Some("Succeeded") => Phase::Succeeded,
            Some("Failed") => Phase::Failed,
            _ => Phase::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Running => "Running",
            Phase::Pending => "Pending",
            Phase::Succeeded => "Succeeded",
            Phase::Failed => "Failed",
            Phase::Unknown => "Unknown",
            Phase::NotFound => "NotFound",
            Phase::Error => "Error",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodSummary {
    pub name: String,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    Waiting { reason: Option<String> },
    Running,
    Terminated { reason: Option<String>, exit_code: i32 },
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerStatusRecord {
    pub name: String,
    pub ready: bool,
    pub restart_count: u32,
    pub state: ContainerState,
}

/// Pod as read from the cluster API, reduced to what the collector consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodRecord {
    pub name: String,
    pub phase: Option<String>,
    pub reason: Option<String>,
    pub node_name: Option<String>,
    /// Regular containers declared in the pod spec.
    pub declared_containers: u32,
    pub init_container_statuses: Vec<ContainerStatusRecord>,
    pub container_statuses: Vec<ContainerStatusRecord>,
}

impl PodRecord {
    pub fn placement(&self) -> NodePlacement {
        match self.node_name.as_deref() {
            Some(node) if !node.is_empty() => NodePlacement::Assigned(node.to_string()),
            _ => NodePlacement::Unassigned,
        }
    }
}

/// Where a pod runs, as far as the collector could tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodePlacement {
    Assigned(String),
    /// The pod was read but is not bound to a node yet.
    Unassigned,
    /// The pod could not be read.
    Unknown,
}

impl NodePlacement {
    pub fn display_name(&self) -> &str {
        match self {
            NodePlacement::Assigned(node) => node,
            NodePlacement::Unassigned => NOT_AVAILABLE,
            NodePlacement::Unknown => UNKNOWN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadState {
    pub phase: Phase,
    pub reason: Option<String>,
    pub restart_count: u32,
    pub ready_count: u32,
    pub total_count: u32,
    pub error_message: Option<String>,
}

impl WorkloadState {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::unavailable(Phase::NotFound, message)
    }

    /// Placeholder for a pod that could not be read; every count is zero.
    pub fn unavailable(phase: Phase, message: impl Into<String>) -> Self {
        Self {
            phase,
            reason: None,
            restart_count: 0,
            ready_count: 0,
            total_count: 0,
            error_message: Some(message.into()),
        }
    }

    pub fn from_record(pod: &PodRecord) -> Self {
        let phase = Phase::from_api(pod.phase.as_deref());
        let restart_count = pod
            .init_container_statuses
            .iter()
            .chain(pod.container_statuses.iter())
            .map(|status| status.restart_count)
            .fold(0u32, u32::saturating_add);
        let ready = pod
            .container_statuses
            .iter()
            .filter(|status| status.ready)
            .count() as u32;
        let total_count = pod.declared_containers;

        Self {
            phase,
            reason: Some(derive_reason(pod, phase)),
            restart_count,
            ready_count: ready.min(total_count),
            total_count,
            error_message: None,
        }
    }
}

fn derive_reason(pod: &PodRecord, phase: Phase) -> String {
    let failed_init = pod.init_container_statuses.iter().find_map(|status| match &status.state {
        ContainerState::Terminated { reason, exit_code } if *exit_code != 0 => {
            Some(terminated_label(reason.as_deref(), *exit_code))
        }
        _ => None,
    });
    if let Some(label) = failed_init {
        return format!("Init: {label}");
    }

    let mut reason = None;
    for status in &pod.container_statuses {
        match &status.state {
            ContainerState::Waiting { reason: waiting } => {
                reason = Some(waiting.clone().unwrap_or_else(|| "Waiting".to_string()));
            }
            ContainerState::Terminated { reason: terminated, exit_code } => {
                reason = Some(terminated_label(terminated.as_deref(), *exit_code));
            }
            ContainerState::Running | ContainerState::Unknown => {}
        }
    }

    reason
        .or_else(|| pod.reason.clone())
        .unwrap_or_else(|| match pod.phase.as_deref() {
            Some(raw) if !raw.is_empty() => raw.to_string(),
            _ => phase.to_string(),
        })
}

fn terminated_label(reason: Option<&str>, exit_code: i32) -> String {
    match reason {
        Some(reason) if !reason.is_empty() => reason.to_string(),
        _ => exit_code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(name: &str, ready: bool, restarts: u32, state: ContainerState) -> ContainerStatusRecord {
        ContainerStatusRecord {
            name: name.to_string(),
            ready,
            restart_count: restarts,
            state,
        }
    }

    fn running_pod() -> PodRecord {
        PodRecord {
            name: "checkout-7f".to_string(),
            phase: Some("Running".to_string()),
            node_name: Some("node-a".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_running_pod_without_statuses() {
        let state = WorkloadState::from_record(&running_pod());
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.reason.as_deref(), Some("Running"));
        assert_eq!((state.restart_count, state.ready_count, state.total_count), (0, 0, 0));
        assert_eq!(state.error_message, None);
    }

    #[test]
    fn test_failed_init_container_short_circuits() {
        let mut pod = running_pod();
        pod.phase = Some("Pending".to_string());
        pod.declared_containers = 1;
        pod.init_container_statuses = vec![
            status("migrate", false, 2, ContainerState::Terminated {
                reason: Some("Error".to_string()),
                exit_code: 1,
            }),
            status("seed", false, 0, ContainerState::Terminated {
                reason: None,
                exit_code: 3,
            }),
        ];
        pod.container_statuses = vec![status("app", false, 1, ContainerState::Waiting {
            reason: Some("PodInitializing".to_string()),
        })];

        let state = WorkloadState::from_record(&pod);
        assert_eq!(state.reason.as_deref(), Some("Init: Error"));
        assert_eq!(state.restart_count, 3);
    }

    #[test]
    fn test_failed_init_without_reason_uses_exit_code() {
        let mut pod = running_pod();
        pod.init_container_statuses = vec![status("init", false, 0, ContainerState::Terminated {
            reason: None,
            exit_code: 137,
        })];
        let state = WorkloadState::from_record(&pod);
        assert_eq!(state.reason.as_deref(), Some("Init: 137"));
    }

    #[test]
    fn test_last_container_state_wins() {
        let mut pod = running_pod();
        pod.declared_containers = 3;
        pod.container_statuses = vec![
            status("a", false, 4, ContainerState::Waiting {
                reason: Some("CrashLoopBackOff".to_string()),
            }),
            status("b", true, 0, ContainerState::Running),
            status("c", true, 1, ContainerState::Terminated {
                reason: Some("OOMKilled".to_string()),
                exit_code: 137,
            }),
        ];
        let state = WorkloadState::from_record(&pod);
        assert_eq!(state.reason.as_deref(), Some("OOMKilled"));
        assert_eq!(state.restart_count, 5);
        assert_eq!((state.ready_count, state.total_count), (2, 3));
    }

    #[test]
    fn test_successful_init_falls_through_to_regular_containers() {
        let mut pod = running_pod();
        pod.declared_containers = 1;
        pod.init_container_statuses = vec![status("init", false, 0, ContainerState::Terminated {
            reason: Some("Completed".to_string()),
            exit_code: 0,
        })];
        pod.container_statuses = vec![status("app", false, 0, ContainerState::Waiting {
            reason: Some("ImagePullBackOff".to_string()),
        })];
        let state = WorkloadState::from_record(&pod);
        assert_eq!(state.reason.as_deref(), Some("ImagePullBackOff"));
    }

    #[test]
    fn test_top_level_reason_used_when_containers_silent() {
        let mut pod = running_pod();
        pod.phase = Some("Failed".to_string());
        pod.reason = Some("Evicted".to_string());
        let state = WorkloadState::from_record(&pod);
        assert_eq!(state.phase, Phase::Failed);
        assert_eq!(state.reason.as_deref(), Some("Evicted"));
    }

    #[test]
    fn test_ready_never_exceeds_total() {
        let mut pod = running_pod();
        pod.declared_containers = 1;
        pod.container_statuses = vec![
            status("a", true, 0, ContainerState::Running),
            status("b", true, 0, ContainerState::Running),
        ];
        let state = WorkloadState::from_record(&pod);
        assert_eq!((state.ready_count, state.total_count), (1, 1));
    }

    #[test]
    fn test_not_found_zeroes_counts() {
        let state = WorkloadState::not_found("Pod ghost not found");
        assert_eq!(state.phase, Phase::NotFound);
        assert_eq!(state.reason, None);
        assert_eq!((state.restart_count, state.ready_count, state.total_count), (0, 0, 0));
        assert_eq!(state.error_message.as_deref(), Some("Pod ghost not found"));
    }

    #[test]
    fn test_placement() {
        let mut pod = running_pod();
        assert_eq!(pod.placement(), NodePlacement::Assigned("node-a".to_string()));
        pod.node_name = None;
        assert_eq!(pod.placement(), NodePlacement::Unassigned);
        assert_eq!(NodePlacement::Unknown.display_name(), "Unknown");
        assert_eq!(NodePlacement::Unassigned.display_name(), "N/A");
    }
}
