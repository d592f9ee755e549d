//! The tool host: an MCP server exposing the two workspace-listing tools.

use std::sync::Arc;
use std::time::Duration;

use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::ToolCallContext},
    model::{
        CallToolRequestParams, CallToolResult, ListToolsResult, PaginatedRequestParams,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router, ErrorData, ServerHandler,
};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use tokio_util::sync::CancellationToken;

use wxchat_cloud::{format_workspaces, IamClient, PowerVsClient, SchematicsClient};

use crate::ServeError;

const TOKEN_FAILURE_TEXT: &str = "Unable to fetch the access token.";
const EMPTY_LISTING_TEXT: &str = "Unable to fetch the workspaces";

#[derive(Clone)]
pub struct WorkspaceToolServer {
    iam: IamClient,
    powervs: PowerVsClient,
    schematics: SchematicsClient,
    tool_router: ToolRouter<Self>,
}

impl WorkspaceToolServer {
    pub fn new(iam: IamClient, powervs: PowerVsClient, schematics: SchematicsClient) -> Self {
        Self {
            iam,
            powervs,
            schematics,
            tool_router: Self::tool_router(),
        }
    }

    /// A failed token exchange becomes tool output text, not a tool error:
    /// the agent on the other side should keep its turn going with whatever
    /// context it got.
    async fn token_or_apology(&self) -> Result<String, String> {
        match self.iam.access_token().await {
            Ok(token) => Ok(token),
            Err(err) => {
                tracing::warn!(error = %err, "IAM token exchange failed");
                Err(TOKEN_FAILURE_TEXT.to_string())
            }
        }
    }
}

#[tool_router]
impl WorkspaceToolServer {
    #[tool(
        description = "Get a list of PowerVS or Power Virtual Server workspaces in the IBM Cloud account."
    )]
    async fn fetch_powervs_workspaces(&self) -> Result<String, String> {
        let token = match self.token_or_apology().await {
            Ok(token) => token,
            Err(apology) => return Ok(apology),
        };
        let records = self
            .powervs
            .list_workspaces(&token)
            .await
            .map_err(|err| err.to_string())?;
        if records.is_empty() {
            return Ok(EMPTY_LISTING_TEXT.to_string());
        }
        Ok(format_workspaces(&records))
    }

    #[tool(description = "Get a list of Schematics workspaces in the IBM Cloud account.")]
    async fn fetch_schematics_workspaces(&self) -> Result<String, String> {
        let token = match self.token_or_apology().await {
            Ok(token) => token,
            Err(apology) => return Ok(apology),
        };
        let records = self
            .schematics
            .list_workspaces(&token)
            .await
            .map_err(|err| err.to_string())?;
        if records.is_empty() {
            return Ok(EMPTY_LISTING_TEXT.to_string());
        }
        Ok(format_workspaces(&records))
    }
}

impl ServerHandler for WorkspaceToolServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: rmcp::model::Implementation {
                name: "wxchat-tools".into(),
                title: Some("wxchat IBM Cloud workspace tools".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Lists PowerVS and Schematics workspaces in the configured IBM Cloud account."
                    .into(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        }))
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move {
            let tool_name = request.name.to_string();
            tracing::debug!(tool = %tool_name, "tool call received");
            let ctx = ToolCallContext::new(self, request, context);
            self.tool_router.call(ctx).await
        }
    }
}

/// Serve over stdio; blocks until the peer disconnects.
pub async fn serve_stdio(server: WorkspaceToolServer) -> Result<(), ServeError> {
    let transport = rmcp::transport::io::stdio();
    let service = rmcp::serve_server(server, transport)
        .await
        .map_err(|err| ServeError::Serve(err.to_string()))?;
    service
        .waiting()
        .await
        .map_err(|err| ServeError::Serve(err.to_string()))?;
    Ok(())
}

fn http_router(server: WorkspaceToolServer) -> axum::Router {
    let service_factory = move || Ok(server.clone());
    let session_manager = Arc::new(LocalSessionManager::default());
    let config = StreamableHttpServerConfig {
        sse_keep_alive: Some(Duration::from_secs(15)),
        sse_retry: None,
        stateful_mode: true,
        cancellation_token: CancellationToken::new(),
    };
    let service = StreamableHttpService::new(service_factory, session_manager, config);
    axum::Router::new().nest_service("/mcp", service)
}

/// Serve over streamable HTTP, mounted at `/mcp`; blocks until shutdown.
pub async fn serve_http(server: WorkspaceToolServer, bind: &str) -> Result<(), ServeError> {
    let router = http_router(server);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(addr = %bind, "tool host listening on /mcp");
    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_router_mounts_tool_service() {
        let server = WorkspaceToolServer::new(
            IamClient::new("test-key"),
            PowerVsClient::new(),
            SchematicsClient::new(),
        );
        let _router = http_router(server);
    }
}
