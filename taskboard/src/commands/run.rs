use std::net::ToSocketAddrs;

use anyhow::Result;
use tracing::*;
use taskboard_core::Services;
use taskboard_http::run_server;

use crate::config::load_config;

pub(crate) async fn command(cli: &crate::Cli) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    info!(%version, "Taskboard");

    let config = load_config(&cli.config, true)?;
    if !config.store.http.enable {
        anyhow::bail!("The HTTP server is disabled in the config");
    }

    let services = Services::new(config.clone()).await?;

    let address = config
        .store
        .http
        .listen
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| anyhow::anyhow!("Failed to resolve the listen address"))?;

    if console::user_attended() {
        info!("--------------------------------------------");
        info!("Taskboard is now running.");
        info!("Accepting HTTP connections on {}", config.store.http.listen);
        info!("--------------------------------------------");
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            std::process::exit(1);
        }
        result = run_server(&services, address) => {
            if let Err(error) = result {
                error!(?error, "HTTP server error");
                std::process::exit(1);
            }
        }
    }

    info!("Exiting");
    Ok(())
}
