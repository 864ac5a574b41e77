//! Collection pipeline: queries, lookups, snapshot assembly and the poll loop.

pub mod assembler;
pub mod correlator;
pub mod fallback;
pub mod metric_client;
pub mod scheduler;
pub mod state_reader;
pub mod tracker;

pub use assembler::{AssemblerOptions, Cycle, SnapshotAssembler};
pub use correlator::{EventCorrelator, EventScope};
pub use fallback::ResultExt;
pub use metric_client::MetricQueryClient;
pub use scheduler::{CycleReport, Scheduler};
pub use state_reader::{PodInspection, WorkloadStateReader};
pub use tracker::{StateTracker, StateTransition};

#[cfg(test)]
mod test_support;
