use async_trait::async_trait;
use serde::Deserialize;

use podpulse_ports::{CredentialError, CredentialPort};

pub const AZURE_AUTHORITY: &str = "https://login.microsoftonline.com";
pub const AZURE_MONITOR_RESOURCE: &str = "https://prometheus.monitor.azure.com";

/// Unauthenticated backend, e.g. a port-forwarded Prometheus.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

#[async_trait]
impl CredentialPort for NoCredentials {
    async fn bearer_token(&self) -> Result<Option<String>, CredentialError> {
        Ok(None)
    }
}

/// Azure AD client-credentials grant. A fresh token is requested for every
/// call; nothing is cached.
#[derive(Debug, Clone)]
pub struct AzureAdCredentials {
    http: reqwest::Client,
    authority: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    resource: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

impl AzureAdCredentials {
    pub fn new(
        http: reqwest::Client,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            http,
            authority: AZURE_AUTHORITY.to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            resource: resource.into(),
        }
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/token",
            self.authority.trim_end_matches('/'),
            self.tenant_id
        )
    }
}

#[async_trait]
impl CredentialPort for AzureAdCredentials {
    async fn bearer_token(&self) -> Result<Option<String>, CredentialError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("resource", self.resource.as_str()),
        ];
        let response = self
            .http
            .post(self.token_url())
            .form(&form)
            .send()
            .await
            .map_err(|err| CredentialError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CredentialError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| CredentialError::Request(err.to_string()))?;
        match token.access_token {
            Some(token) if !token.is_empty() => Ok(Some(token)),
            _ => Err(CredentialError::MissingToken),
        }
    }
}
