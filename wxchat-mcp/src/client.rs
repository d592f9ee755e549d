//! Client side of the tool protocol.
//!
//! Connections are scoped to a single call: open, invoke, close. Nothing is
//! pooled or kept warm, so a wedged tool host affects exactly one turn's
//! context fetch.

use std::process::Stdio;

use async_trait::async_trait;
use rmcp::model::{CallToolRequestParams, CallToolResult, ClientInfo};
use rmcp::service::{RoleClient, RunningService};
use rmcp::transport::child_process::TokioChildProcess;
use rmcp::transport::streamable_http_client::StreamableHttpClientTransportConfig;
use rmcp::transport::StreamableHttpClientTransport;
use rmcp::serve_client;
use tokio::process::Command;

use crate::ToolError;

#[derive(Debug, Clone)]
pub enum ToolTransport {
    /// Persistent streaming connection to an HTTP tool host.
    Http { url: String },
    /// Spawn the tool host as a child process and pipe its standard streams.
    Stdio { command: String, args: Vec<String> },
}

/// Invokes a named tool on the tool host and returns its text result.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn call(&self, tool_name: &str) -> Result<String, ToolError>;
}

#[derive(Debug, Clone)]
pub struct ToolClient {
    transport: ToolTransport,
}

impl ToolClient {
    pub fn new(transport: ToolTransport) -> Self {
        Self { transport }
    }

    pub fn http(url: impl Into<String>) -> Self {
        Self::new(ToolTransport::Http { url: url.into() })
    }

    pub fn stdio(command: impl Into<String>, args: Vec<String>) -> Self {
        Self::new(ToolTransport::Stdio {
            command: command.into(),
            args,
        })
    }

    fn client_info() -> ClientInfo {
        ClientInfo {
            meta: None,
            protocol_version: Default::default(),
            capabilities: Default::default(),
            client_info: rmcp::model::Implementation {
                name: "wxchat".into(),
                title: Some("wxchat tool client".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
        }
    }

    async fn connect(&self) -> Result<RunningService<RoleClient, ClientInfo>, ToolError> {
        match &self.transport {
            ToolTransport::Http { url } => {
                let config = StreamableHttpClientTransportConfig::with_uri(url.as_str());
                let transport = StreamableHttpClientTransport::from_config(config);
                serve_client(Self::client_info(), transport)
                    .await
                    .map_err(|err| ToolError::Connect(err.to_string()))
            }
            ToolTransport::Stdio { command, args } => {
                let mut cmd = Command::new(command);
                cmd.args(args)
                    .stdin(Stdio::piped())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::null());
                let transport = TokioChildProcess::new(cmd)
                    .map_err(|err| ToolError::Connect(err.to_string()))?;
                serve_client(Self::client_info(), transport)
                    .await
                    .map_err(|err| ToolError::Connect(err.to_string()))
            }
        }
    }
}

fn text_content(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| c.as_text().map(|t| t.text.to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl ToolInvoker for ToolClient {
    async fn call(&self, tool_name: &str) -> Result<String, ToolError> {
        let service = self.connect().await?;
        tracing::debug!(tool = %tool_name, "invoking tool");

        let outcome = service
            .peer()
            .call_tool(CallToolRequestParams {
                meta: None,
                name: tool_name.to_string().into(),
                arguments: None,
                task: None,
            })
            .await;

        // Close the connection before inspecting the result so the transport
        // is released on the failure path too.
        if let Err(err) = service.cancel().await {
            tracing::debug!(error = %err, "tool host connection teardown failed");
        }

        let result = outcome.map_err(|err| ToolError::Call {
            tool_name: tool_name.to_string(),
            reason: err.to_string(),
        })?;

        let text = text_content(&result);
        if result.is_error == Some(true) {
            return Err(ToolError::Call {
                tool_name: tool_name.to_string(),
                reason: text,
            });
        }
        Ok(text)
    }
}
