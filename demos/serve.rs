//! Runs every built-in kind against the current kubeconfig context and
//! serves the result on `/metrics`, the way a host process wires `ksm`'s
//! `Exposer` behind an HTTP server of its own choosing.

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use clap::Parser;
use ksm::{Builder, Config};
use ksm_kinds::KindName;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
struct Args {
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: SocketAddr,

    #[arg(long)]
    namespace: Option<String>,

    /// Load `Config` from a YAML file instead of the `--namespace`/built-in
    /// defaults below. `ksm::Config` is plain `serde::Deserialize`, so this
    /// host is free to pick any serde data format; YAML is the common one.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    if let Some(path) = &args.config {
        let text = std::fs::read_to_string(path)?;
        return Ok(serde_yaml::from_str(&text)?);
    }
    Ok(Config {
        enabled_kinds: KindName::ALL.iter().map(|k| k.as_str().to_string()).collect(),
        namespace_scope: match &args.namespace {
            Some(ns) => ksm::config::NamespaceScope::Only(vec![ns.clone()]),
            None => ksm::config::NamespaceScope::All,
        },
        ..Config::default()
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let client = kube::Client::try_default().await?;
    let cancel = CancellationToken::new();

    let config = load_config(&args)?;

    let exposer = Builder::new(client, cancel.clone()).build(&config)?;
    info!(kinds = ?exposer.kind_names(), "built exposer");

    let app = Router::new().route("/metrics", get(metrics_handler)).with_state(Arc::new(exposer));

    info!(%args.listen, "serving");
    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    axum::serve(listener, app).await?;

    cancel.cancel();
    Ok(())
}

async fn metrics_handler(State(exposer): State<Arc<ksm::Exposer>>) -> Vec<u8> {
    let mut buf = Vec::new();
    exposer.write_all(&mut buf).await.expect("writing to a Vec<u8> is infallible");
    buf
}
