use anyhow::Context;
use portfolio_core::config::Config;
use std::path::Path;

pub fn run(root: &Path, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = Config::load(root).context("failed to load portfolio.yaml")?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!(
        root = %root.display(),
        data_dir = %config.data_dir(root).display(),
        ids = ?config.ids,
        missing_file = ?config.missing_file,
        "starting server"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(portfolio_server::serve(root.to_path_buf(), config))
}
