use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Event, Pod};
use kube::Client;
use kube::api::{Api, ListParams, LogParams};

use podpulse_domain::{EventRecord, PodRecord, PodSummary};
use podpulse_ports::{ClusterError, ClusterPort};

use crate::mapping;

/// Core v1 reads for one namespace.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
    namespace: String,
}

impl KubeCluster {
    pub fn new(client: Client, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
        }
    }

    /// Builds a client from the local kubeconfig or in-cluster environment
    /// and checks that the API server answers.
    pub async fn connect(namespace: impl Into<String>) -> Result<Self> {
        let client = Client::try_default()
            .await
            .context("failed to create kube client")?;
        let version = client
            .apiserver_version()
            .await
            .context("cluster API server unreachable")?;
        tracing::info!(
            version = %version.git_version,
            "connected to cluster API server"
        );
        Ok(Self::new(client, namespace))
    }

    fn pods(&self) -> Api<Pod> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    async fn list_events(
        &self,
        api: Api<Event>,
        selector: &str,
    ) -> Result<Vec<EventRecord>, ClusterError> {
        let events = api
            .list(&ListParams::default().fields(selector))
            .await
            .map_err(classify)?;
        Ok(events.items.iter().map(mapping::event_record).collect())
    }
}

fn classify(err: kube::Error) -> ClusterError {
    match err {
        kube::Error::Api(_) => ClusterError::Api(err.to_string()),
        other => ClusterError::Transport(other.to_string()),
    }
}

#[async_trait]
impl ClusterPort for KubeCluster {
    async fn list_pods(&self) -> Result<Vec<PodSummary>, ClusterError> {
        let pods = self
            .pods()
            .list(&ListParams::default())
            .await
            .map_err(classify)?;
        Ok(pods.items.iter().filter_map(mapping::pod_summary).collect())
    }

    async fn read_pod(&self, name: &str) -> Result<PodRecord, ClusterError> {
        match self.pods().get_opt(name).await.map_err(classify)? {
            Some(pod) => Ok(mapping::pod_record(&pod)),
            None => Err(ClusterError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    async fn list_pod_events(&self, pod: &str) -> Result<Vec<EventRecord>, ClusterError> {
        let api = Api::namespaced(self.client.clone(), &self.namespace);
        self.list_events(api, &format!("involvedObject.name={pod}"))
            .await
    }

    async fn list_node_events(&self, node: &str) -> Result<Vec<EventRecord>, ClusterError> {
        let api = Api::all(self.client.clone());
        self.list_events(
            api,
            &format!("involvedObject.kind=Node,involvedObject.name={node}"),
        )
        .await
    }

    async fn tail_log(&self, pod: &str) -> Result<String, ClusterError> {
        let params = LogParams {
            tail_lines: Some(1),
            ..Default::default()
        };
        self.pods().logs(pod, &params).await.map_err(classify)
    }
}
