//! # `vsdl serve` — Run the Custodial Server
//!
//! Builds the server state from the environment (with flag overrides),
//! seeds the reference catalog, and serves the HTTP surface until
//! interrupted.

use anyhow::Context;
use clap::Args;

use vsdl_server::{app, ServerConfig, ServerState};

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on. Falls back to VSDL_BIND_ADDR, then
    /// 127.0.0.1:8080.
    #[arg(long)]
    pub bind: Option<String>,

    /// Delegation-URL prefix handed to owners. Falls back to VSDL_BASE_URL.
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Run the server until interrupted.
pub fn run_serve(args: &ServeArgs) -> anyhow::Result<u8> {
    let mut config = ServerConfig::from_env().context("building server configuration")?;
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    let bind = args
        .bind
        .clone()
        .or_else(|| std::env::var("VSDL_BIND_ADDR").ok().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "127.0.0.1:8080".to_string());

    let state = ServerState::with_seed_data(config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;

    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(&bind)
            .await
            .with_context(|| format!("binding {bind}"))?;
        tracing::info!(%bind, "custodial server listening");
        axum::serve(listener, app(state))
            .await
            .context("serving HTTP")
    })?;

    Ok(0)
}
