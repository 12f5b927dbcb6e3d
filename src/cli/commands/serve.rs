//! Implementation of the `teaching-assistant serve` command.

use anyhow::Result;
use clap::Args;

use crate::adapters::http::{serve, HttpServerConfig};
use crate::cli::build_context;
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (defaults to server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (defaults to server.port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Disable permissive CORS headers
    #[arg(long)]
    pub no_cors: bool,
}

pub async fn execute(args: ServeArgs, config: Config) -> Result<()> {
    let ctx = build_context(config)?;

    let mut server_config = HttpServerConfig::from_context(&ctx);
    if let Some(host) = args.host {
        server_config.host = host;
    }
    if let Some(port) = args.port {
        server_config.port = port;
    }
    server_config.enable_cors = !args.no_cors;

    serve(ctx, server_config).await
}
