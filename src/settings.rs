use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

use podpulse_adapter_prometheus::auth::AZURE_MONITOR_RESOURCE;
use podpulse_application::AssemblerOptions;
use podpulse_domain::{ExclusionSet, QuerySet};

/// Periodic pod health snapshots from Prometheus and the Kubernetes API.
#[derive(Debug, Clone, Parser)]
#[command(name = "podpulse", version, about)]
pub struct Settings {
    /// Prometheus-compatible query endpoint.
    #[arg(long, env = "PROMETHEUS_URL", default_value = "http://127.0.0.1:9090")]
    pub prometheus_url: String,

    /// Namespace whose pods are sampled.
    #[arg(long, env = "NAMESPACE", default_value = "otel-demo")]
    pub namespace: String,

    /// CSV file rows are appended to.
    #[arg(long, env = "OUTPUT_FILE", default_value = "pod_metrics.csv")]
    pub output_file: PathBuf,

    /// Seconds between collection cycles.
    #[arg(long = "interval", env = "SLEEP_INTERVAL", default_value_t = 5)]
    pub interval_secs: u64,

    /// Range used by rate() in the metric queries.
    #[arg(long, env = "RATE_WINDOW", default_value = "5m")]
    pub rate_window: String,

    /// Pod name substrings to skip (comma separated).
    #[arg(
        long = "exclude",
        env = "EXCLUDE_POD_NAMES",
        value_delimiter = ',',
        default_values = ExclusionSet::DEFAULT_MEMBERS
    )]
    pub exclude: Vec<String>,

    #[arg(long, env = "AZURE_AD_TENANT_ID")]
    pub tenant_id: Option<String>,

    #[arg(long, env = "AZURE_AD_CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(long, env = "AZURE_AD_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Resource the Azure AD token is requested for.
    #[arg(long, env = "AZURE_MONITOR_RESOURCE", default_value = AZURE_MONITOR_RESOURCE)]
    pub token_resource: String,

    /// HTTP timeout in seconds for metric and token requests.
    #[arg(long = "request-timeout", env = "REQUEST_TIMEOUT", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Record the last log line of every pod. The env value accepts
    /// true/false, 1/0, yes/no and on/off.
    #[arg(
        long,
        env = "CAPTURE_LAST_LOG",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub capture_logs: bool,

    /// Log filter (trace, debug, info, warn, error or a full directive).
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

/// How the metrics backend is authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    Anonymous,
    AzureAd {
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            bail!("interval must be at least one second");
        }
        if self.request_timeout_secs == 0 {
            bail!("request timeout must be at least one second");
        }
        if self.namespace.trim().is_empty() {
            bail!("namespace must not be empty");
        }
        self.auth_mode().map(|_| ())
    }

    /// Bearer-token auth needs the full credential triplet; a partial one is
    /// rejected rather than silently falling back to anonymous.
    pub fn auth_mode(&self) -> Result<AuthMode> {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        match (
            present(&self.tenant_id),
            present(&self.client_id),
            present(&self.client_secret),
        ) {
            (None, None, None) => Ok(AuthMode::Anonymous),
            (Some(tenant_id), Some(client_id), Some(client_secret)) => Ok(AuthMode::AzureAd {
                tenant_id,
                client_id,
                client_secret,
            }),
            _ => bail!(
                "AZURE_AD_TENANT_ID, AZURE_AD_CLIENT_ID and AZURE_AD_CLIENT_SECRET must be set together"
            ),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn assembler_options(&self) -> AssemblerOptions {
        AssemblerOptions {
            queries: QuerySet::new(&self.namespace, &self.rate_window),
            exclusions: ExclusionSet::new(&self.exclude),
            capture_logs: self.capture_logs,
        }
    }
}
