use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::app_state::AppState;
use crate::config_loader::{load_config, ZenConfig};
use crate::{demo_seed, risk_engine, web};

/// Top-level CLI interface for ZenThera
#[derive(Parser)]
#[command(
    name = "zenthera",
    version = "0.1.0",
    about = "ZenThera AI Compliance Suite"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API and dashboard pages
    Serve {
        /// Host/IP to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run the risk and quality heuristics over a prompt/response pair
    Analyze {
        /// The model response text to analyze
        #[arg(long)]
        response: String,
        /// The prompt that produced the response
        #[arg(long, default_value = "")]
        prompt: String,
    },

    /// Print the effective configuration
    ShowConfig,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?;

    match cli.command {
        Commands::Serve { host, port } => serve(config, host, port),
        Commands::Analyze { response, prompt } => analyze(&prompt, &response),
        Commands::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn serve(mut config: ZenConfig, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let seed = config.demo.seed_sample_data;

    let state = Arc::new(AppState::new(config));
    if seed {
        demo_seed::seed_all(&state)
            .map_err(|e| anyhow::anyhow!("Failed to seed demo data: {e}"))?;
    }

    let app = web::build_router(state);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build Tokio runtime: {e}"))?;

    rt.block_on(async move {
        let socket_addr: std::net::SocketAddr = addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address {addr}: {e}"))?;
        let listener = tokio::net::TcpListener::bind(socket_addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind {addr}: {e}"))?;
        println!("HTTP server listening on http://{addr}");
        tracing::info!("ZenThera serving on {addr}");
        axum::serve(listener, app)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {e}"))
    })
}

fn analyze(prompt: &str, response: &str) -> anyhow::Result<()> {
    let report = serde_json::json!({
        "risks": {
            "hallucination": risk_engine::detect_hallucination(prompt, response),
            "bias": risk_engine::detect_bias(prompt, response),
            "toxicity": risk_engine::detect_toxicity(prompt, response),
            "privacy_leak": risk_engine::detect_privacy_leak(prompt, response),
        },
        "quality": {
            "relevance": crate::quality_engine::assess_relevance(prompt, response),
            "coherence": crate::quality_engine::assess_coherence(response),
            "completeness": crate::quality_engine::assess_completeness(prompt, response),
            "clarity": crate::quality_engine::assess_clarity(response),
        },
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
