mod client;
mod error;
mod server;

pub use client::{ToolClient, ToolInvoker, ToolTransport};
pub use error::{ServeError, ToolError};
pub use server::{serve_http, serve_stdio, WorkspaceToolServer};
