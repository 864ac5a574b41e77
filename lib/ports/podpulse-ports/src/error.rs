#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("token request failed: {0}")]
    Request(String),

    #[error("token endpoint returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("token response carried no access_token")]
    MissingToken,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("metrics backend unreachable: {0}")]
    Transport(String),

    #[error("metrics backend returned HTTP {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("undecodable metrics response: {0}")]
    Decode(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    #[error("Pod {name} not found")]
    NotFound { name: String },

    /// The API server answered with an error status.
    #[error("{0}")]
    Api(String),

    #[error("{0}")]
    Transport(String),
}
