use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;

use podpulse_adapter_csv::CsvSink;
use podpulse_adapter_kube::KubeCluster;
use podpulse_adapter_prometheus::{AzureAdCredentials, NoCredentials, PrometheusClient};
use podpulse_application::{Scheduler, SnapshotAssembler, StateTracker};
use podpulse_ports::{CredentialPort, PortSet, SinkPort, SystemClock};

use crate::settings::{AuthMode, Settings};

/// Wires the production adapters into a scheduler.
pub async fn build_scheduler(settings: &Settings) -> Result<Scheduler> {
    settings.validate()?;

    let http = reqwest::Client::builder()
        .timeout(settings.request_timeout())
        .build()
        .context("building HTTP client")?;

    let credentials: Arc<dyn CredentialPort> = match settings.auth_mode()? {
        AuthMode::Anonymous => Arc::new(NoCredentials),
        AuthMode::AzureAd {
            tenant_id,
            client_id,
            client_secret,
        } => {
            tracing::info!(tenant = %tenant_id, "using Azure AD bearer tokens");
            Arc::new(AzureAdCredentials::new(
                http.clone(),
                tenant_id,
                client_id,
                client_secret,
                settings.token_resource.clone(),
            ))
        }
    };

    let metrics = PrometheusClient::with_http(http, settings.prometheus_url.clone(), credentials);
    let cluster = KubeCluster::connect(settings.namespace.clone()).await?;
    let sink: Arc<dyn SinkPort> = Arc::new(CsvSink::new(settings.output_file.clone()));

    let ports = PortSet {
        metrics: Arc::new(metrics),
        cluster: Arc::new(cluster),
        clock: Arc::new(SystemClock),
    };
    let assembler = SnapshotAssembler::new(&ports, settings.assembler_options());
    Ok(Scheduler::new(assembler, sink, settings.interval()))
}

pub async fn run(settings: Settings) -> Result<()> {
    let scheduler = build_scheduler(&settings).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_signal().await;
        let _ = shutdown_tx.send(true);
    });

    tracing::info!(
        namespace = %settings.namespace,
        output = %settings.output_file.display(),
        interval_secs = settings.interval_secs,
        "starting podpulse",
    );

    let tracker = scheduler.run(StateTracker::new(), shutdown_rx).await;
    tracing::info!(tracked_pods = tracker.len(), "podpulse stopped");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(err) => {
            tracing::warn!(error = %err, "failed to register SIGTERM handler");
            wait_for_ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = wait_for_ctrl_c() => {}
        _ = sigterm.recv() => {
            tracing::info!("received SIGTERM, shutting down");
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received SIGINT, shutting down"),
        Err(err) => {
            // Without a handler the process runs until killed.
            tracing::warn!(error = %err, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    }
}
