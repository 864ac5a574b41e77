//! Conversions from Kubernetes API objects to domain records.

use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{ContainerStatus, Event, Pod};
use serde::Serialize;

use podpulse_domain::{
    ContainerState, ContainerStatusRecord, EventRecord, Phase, PodRecord, PodSummary,
};

pub fn pod_summary(pod: &Pod) -> Option<PodSummary> {
    let name = pod.metadata.name.clone()?;
    let phase = pod.status.as_ref().and_then(|status| status.phase.as_deref());
    Some(PodSummary {
        name,
        phase: Phase::from_api(phase),
    })
}

pub fn pod_record(pod: &Pod) -> PodRecord {
    let status = pod.status.as_ref();
    let spec = pod.spec.as_ref();
    PodRecord {
        name: pod.metadata.name.clone().unwrap_or_default(),
        phase: status.and_then(|status| status.phase.clone()),
        reason: status.and_then(|status| status.reason.clone()),
        node_name: spec.and_then(|spec| spec.node_name.clone()),
        declared_containers: spec.map_or(0, |spec| spec.containers.len() as u32),
        init_container_statuses: status
            .and_then(|status| status.init_container_statuses.as_ref())
            .map(|statuses| statuses.iter().map(container_status).collect())
            .unwrap_or_default(),
        container_statuses: status
            .and_then(|status| status.container_statuses.as_ref())
            .map(|statuses| statuses.iter().map(container_status).collect())
            .unwrap_or_default(),
    }
}

fn container_status(status: &ContainerStatus) -> ContainerStatusRecord {
    let state = status.state.as_ref();
    let state = if let Some(waiting) = state.and_then(|state| state.waiting.as_ref()) {
        ContainerState::Waiting {
            reason: waiting.reason.clone(),
        }
    } else if let Some(terminated) = state.and_then(|state| state.terminated.as_ref()) {
        ContainerState::Terminated {
            reason: terminated.reason.clone(),
            exit_code: terminated.exit_code,
        }
    } else if state.and_then(|state| state.running.as_ref()).is_some() {
        ContainerState::Running
    } else {
        ContainerState::Unknown
    };

    ContainerStatusRecord {
        name: status.name.clone(),
        ready: status.ready,
        restart_count: status.restart_count.max(0) as u32,
        state,
    }
}

pub fn event_record(event: &Event) -> EventRecord {
    let source = event
        .source
        .as_ref()
        .and_then(|source| source.component.clone())
        .filter(|component| !component.is_empty())
        .or_else(|| event.reporting_component.clone());
    EventRecord {
        event_type: event.type_.clone(),
        reason: event.reason.clone(),
        message: event.message.clone(),
        source,
        last_timestamp: to_utc(event.last_timestamp.as_ref()),
        event_time: to_utc(event.event_time.as_ref()),
        first_timestamp: to_utc(event.first_timestamp.as_ref()),
    }
}

/// `Time` and `MicroTime` both serialize as RFC 3339 strings.
fn to_utc<T: Serialize>(value: Option<&T>) -> Option<DateTime<Utc>> {
    let raw = serde_json::to_value(value?).ok()?;
    DateTime::parse_from_rfc3339(raw.as_str()?)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}
