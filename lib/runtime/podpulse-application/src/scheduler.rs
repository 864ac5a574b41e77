use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};

use podpulse_ports::SinkPort;

use crate::assembler::SnapshotAssembler;
use crate::tracker::{StateTracker, StateTransition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub rows: usize,
}

/// Runs one cycle per interval until shutdown is signalled.
pub struct Scheduler {
    assembler: Arc<SnapshotAssembler>,
    sink: Arc<dyn SinkPort>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(assembler: SnapshotAssembler, sink: Arc<dyn SinkPort>, interval: Duration) -> Self {
        Self {
            assembler: Arc::new(assembler),
            sink,
            interval,
        }
    }

    /// Shutdown is only observed between cycles; a running cycle always
    /// finishes, including its append.
    pub async fn run(
        &self,
        mut tracker: StateTracker,
        mut shutdown: watch::Receiver<bool>,
    ) -> StateTracker {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }

            match self.run_cycle(&mut tracker).await {
                Ok(report) => tracing::info!(rows = report.rows, "cycle complete"),
                Err(err) => tracing::error!(error = %format!("{err:#}"), "cycle failed"),
            }
        }

        tracing::info!("scheduler stopped");
        tracker
    }

    /// One collect-and-append pass. The pass runs as its own task so a panic
    /// inside it surfaces here as an error instead of unwinding the loop.
    pub async fn run_cycle(&self, tracker: &mut StateTracker) -> Result<CycleReport> {
        let assembler = Arc::clone(&self.assembler);
        let sink = Arc::clone(&self.sink);
        let task = tokio::spawn(async move {
            let cycle = assembler.collect_cycle().await;
            sink.append(&cycle.rows)
                .await
                .context("appending snapshot rows")?;
            Ok::<_, anyhow::Error>(cycle)
        });

        let cycle = match task.await {
            Ok(result) => result?,
            Err(join) => bail!("collection cycle aborted: {join}"),
        };

        if let Some(live) = &cycle.live {
            for transition in tracker.observe(live) {
                match transition {
                    StateTransition::Changed { pod, from, to } => {
                        let from = from.map_or_else(|| "None".to_string(), |phase| phase.to_string());
                        tracing::info!(pod = %pod, "status change detected: {from} -> {to}");
                    }
                    StateTransition::Vanished { pod } => {
                        tracing::info!(pod = %pod, "pod no longer exists");
                    }
                }
            }
        }

        Ok(CycleReport {
            rows: cycle.rows.len(),
        })
    }
}
