use std::sync::Arc;

use podpulse_domain::EventSummary;
use podpulse_ports::{Clock, ClusterPort};

/// Which involved-object identity the correlator matches events against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    /// Namespaced lookup by pod name.
    Pod,
    /// Cluster-wide lookup by node name.
    Node,
}

#[derive(Clone)]
pub struct EventCorrelator {
    scope: EventScope,
    cluster: Arc<dyn ClusterPort>,
    clock: Arc<dyn Clock>,
}

impl EventCorrelator {
    pub fn new(scope: EventScope, cluster: Arc<dyn ClusterPort>, clock: Arc<dyn Clock>) -> Self {
        Self {
            scope,
            cluster,
            clock,
        }
    }

    pub fn for_pods(cluster: Arc<dyn ClusterPort>, clock: Arc<dyn Clock>) -> Self {
        Self::new(EventScope::Pod, cluster, clock)
    }

    pub fn for_nodes(cluster: Arc<dyn ClusterPort>, clock: Arc<dyn Clock>) -> Self {
        Self::new(EventScope::Node, cluster, clock)
    }

    pub fn scope(&self) -> EventScope {
        self.scope
    }

    pub async fn latest(&self, name: &str) -> EventSummary {
        let events = match self.scope {
            EventScope::Pod => self.cluster.list_pod_events(name).await,
            EventScope::Node => self.cluster.list_node_events(name).await,
        };
        match events {
            Ok(events) => EventSummary::latest(events, self.clock.now()),
            Err(err) => {
                tracing::warn!(scope = ?self.scope, name, error = %err, "event lookup failed");
                EventSummary::LookupFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedClock, MockCluster, dated_event};
    use podpulse_ports::ClusterError;

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::at(1_000))
    }

    #[tokio::test]
    async fn test_pod_scope_returns_newest_event() {
        let cluster = MockCluster::default().pod_events(
            "cart",
            vec![dated_event("Pulled", 900), dated_event("BackOff", 990)],
        );
        let correlator = EventCorrelator::for_pods(Arc::new(cluster), clock());
        let fields = correlator.latest("cart").await.fields();
        assert_eq!(fields[1], "BackOff");
        assert_eq!(fields[2], "0:00:10");
    }

    #[tokio::test]
    async fn test_node_scope_queries_node_events() {
        let cluster = MockCluster::default()
            .pod_events("node-a", vec![dated_event("PodEvent", 999)])
            .node_events("node-a", vec![dated_event("NodeReady", 400)]);
        let correlator = EventCorrelator::for_nodes(Arc::new(cluster), clock());
        assert_eq!(correlator.scope(), EventScope::Node);
        assert_eq!(correlator.latest("node-a").await.fields()[1], "NodeReady");
    }

    #[tokio::test]
    async fn test_empty_and_failed_lookups_differ() {
        let cluster = MockCluster::default()
            .pod_events_error("broken", ClusterError::Transport("timeout".into()));
        let correlator = EventCorrelator::for_pods(Arc::new(cluster), clock());
        assert_eq!(correlator.latest("quiet").await, EventSummary::NothingFound);
        assert_eq!(correlator.latest("broken").await, EventSummary::LookupFailed);
    }
}
