//! wxchat - chat about IBM Cloud workspaces from a terminal.
//!
//! Two modes: `chat` runs the interactive pipeline against a running tool
//! host; `serve` runs the tool host itself, over streamable HTTP or stdio.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::{fmt, EnvFilter};

use wxchat_agent::{build_chat_graph, Chatbot, KeywordClassifier, LlmClassifier};
use wxchat_cloud::{IamClient, PowerVsClient, SchematicsClient};
use wxchat_llm::{ChatModel, WatsonxClient};
use wxchat_mcp::{serve_http, serve_stdio, ToolClient, ToolInvoker, WorkspaceToolServer};

#[derive(Parser)]
#[command(name = "wxchat")]
#[command(about = "Chatbot for IBM Cloud PowerVS and Schematics workspaces")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session
    Chat {
        /// IBM Cloud API key
        #[arg(long, env = "IBMCLOUD_API_KEY", hide_env_values = true)]
        api_key: String,

        /// watsonx.ai project id
        #[arg(long, env = "WATSONX_PROJECT_ID")]
        project_id: String,

        /// Tool host URL
        #[arg(long, env = "WXCHAT_MCP_URL", default_value = "http://127.0.0.1:8000/mcp")]
        mcp_url: String,

        /// Override the chat model
        #[arg(long, env = "WXCHAT_MODEL_ID")]
        model_id: Option<String>,

        /// How to pick the agent for each message
        #[arg(long, value_enum, default_value_t = ClassifierKind::Keyword)]
        classifier: ClassifierKind,
    },

    /// Run the workspace tool host
    Serve {
        /// IBM Cloud API key
        #[arg(long, env = "IBMCLOUD_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Transport for the tool host
        #[arg(long, value_enum, default_value_t = Transport::Http)]
        transport: Transport,

        /// Bind address for the HTTP transport
        #[arg(long, default_value = "127.0.0.1:8000")]
        bind: String,

        /// Comma-separated PowerVS datacenter regions
        #[arg(long, env = "WXCHAT_REGIONS", value_delimiter = ',')]
        regions: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ClassifierKind {
    /// Deterministic keyword matching
    Keyword,
    /// One-shot LLM classification
    Llm,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Transport {
    Http,
    Stdio,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Keep stdout clean: the chat prompt lives there, and so does the MCP
    // stdio transport when serving.
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat {
            api_key,
            project_id,
            mcp_url,
            model_id,
            classifier,
        } => run_chat(api_key, project_id, mcp_url, model_id, classifier).await,
        Commands::Serve {
            api_key,
            transport,
            bind,
            regions,
        } => run_serve(api_key, transport, bind, regions).await,
    }
}

async fn run_chat(
    api_key: String,
    project_id: String,
    mcp_url: String,
    model_id: Option<String>,
    classifier: ClassifierKind,
) -> Result<()> {
    let mut builder = WatsonxClient::builder()
        .api_key(api_key)
        .project_id(project_id);
    if let Some(model_id) = model_id {
        builder = builder.model_id(model_id);
    }
    let model = Arc::new(builder.build().context("building watsonx client")?);
    let model_id = model.model_id().to_string();
    let chat_model: Arc<dyn ChatModel + Send + Sync> = model.clone();

    let tools: Arc<dyn ToolInvoker> = Arc::new(ToolClient::http(mcp_url));

    let graph = match classifier {
        ClassifierKind::Keyword => build_chat_graph(
            KeywordClassifier::default(),
            tools,
            chat_model,
            model_id.clone(),
        )?,
        ClassifierKind::Llm => build_chat_graph(
            LlmClassifier::new(model),
            tools,
            chat_model,
            model_id.clone(),
        )?,
    };
    let mut bot = Chatbot::new(graph);

    let mut rl = DefaultEditor::new()?;
    println!("wxchat {} - type 'exit' to quit", env!("CARGO_PKG_VERSION"));

    loop {
        match rl.readline("you: ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                if input.eq_ignore_ascii_case("exit") {
                    break;
                }
                let _ = rl.add_history_entry(input);
                match bot.turn(input).await {
                    Ok(reply) => println!("assistant: {reply}"),
                    Err(err) => {
                        tracing::error!(error = %err, "turn failed");
                        println!(
                            "assistant: Sorry, something went wrong while answering that. \
                             Please try again."
                        );
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

async fn run_serve(
    api_key: String,
    transport: Transport,
    bind: String,
    regions: Vec<String>,
) -> Result<()> {
    let iam = IamClient::new(api_key);
    let mut powervs = PowerVsClient::new();
    if !regions.is_empty() {
        powervs = powervs.with_regions(regions);
    }
    let server = WorkspaceToolServer::new(iam, powervs, SchematicsClient::new());

    match transport {
        Transport::Http => serve_http(server, &bind).await?,
        Transport::Stdio => serve_stdio(server).await?,
    }
    Ok(())
}
