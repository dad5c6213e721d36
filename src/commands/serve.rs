use super::Context;
use crate::libs::config::Config;
use crate::web;
use anyhow::Result;
use clap::Args;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "BUDDY_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "BUDDY_PORT")]
    port: Option<u16>,
}

pub async fn cmd(ctx: &Context, args: ServeArgs) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .try_init()
        .ok();

    let mut config = Config::read()?.with_env_overrides();
    let mut server = config.server_config();
    if let Some(host) = args.host {
        server.host = host;
    }
    if let Some(port) = args.port {
        server.port = port;
    }
    if let Some(db) = &ctx.db {
        server.db_path = Some(db.clone());
    }
    config.server = Some(server);

    web::serve(&config).await
}
