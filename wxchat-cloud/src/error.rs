use thiserror::Error;

#[derive(Debug, Error)]
pub enum CloudError {
    #[error("IAM token exchange failed: {status} - {body}")]
    Auth { status: u16, body: String },
    #[error("Failed to fetch workspaces: {status} - {body}")]
    Upstream { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
