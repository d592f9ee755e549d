use thiserror::Error;

/// Failure invoking a remote tool: connect, handshake, or remote execution.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to connect to tool host: {0}")]
    Connect(String),
    #[error("tool call '{tool_name}' failed: {reason}")]
    Call { tool_name: String, reason: String },
}

/// Failure starting or running the tool host itself.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("tool host failed: {0}")]
    Serve(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
