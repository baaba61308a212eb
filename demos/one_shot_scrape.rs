//! Builds an `Exposer` for a handful of kinds, waits for one reflector
//! cycle, then prints a single scrape to stdout and exits. Useful for
//! sanity-checking a kubeconfig context without standing up an HTTP server.

use ksm::{Builder, Config};
use std::io::{self, Write};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let client = kube::Client::try_default().await?;
    let cancel = CancellationToken::new();

    let config = Config {
        enabled_kinds: vec!["pods".into(), "deployments".into(), "nodes".into()],
        ..Config::default()
    };

    let exposer = Builder::new(client, cancel.clone()).build(&config)?;

    // Give the reflectors' initial list a moment to land before scraping.
    tokio::time::sleep(Duration::from_secs(2)).await;

    let mut buf = Vec::new();
    exposer.write_all(&mut buf).await?;
    io::stdout().write_all(&buf)?;

    cancel.cancel();
    Ok(())
}
