//! Domain models and invariants.

pub mod events;
pub mod exclusion;
pub mod metrics;
pub mod queries;
pub mod snapshot;
pub mod workload;

pub use events::{EventDetails, EventRecord, EventSummary, NOT_AVAILABLE, UNKNOWN, format_age};
pub use exclusion::ExclusionSet;
pub use metrics::{MetricKind, MetricMap, MetricSample};
pub use queries::QuerySet;
pub use snapshot::{COLUMN_COUNT, COLUMNS, SnapshotRow, TIMESTAMP_FORMAT, usage_percent};
pub use workload::{
    ContainerState, ContainerStatusRecord, NodePlacement, Phase, PodRecord, PodSummary,
    WorkloadState,
};
