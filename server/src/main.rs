use anyhow::Result;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use stemdex_server::{build_app, AppState};
use stemdex_core::Language;
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Documents directory to index at startup
    #[arg(long, requires = "stop_words")]
    docs: Option<PathBuf>,
    /// Stop-word file for the startup build
    #[arg(long, requires = "docs")]
    stop_words: Option<PathBuf>,
    /// Language of the startup build
    #[arg(long, default_value = "english")]
    language: Language,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let state = AppState::new(std::env::var("ADMIN_TOKEN").ok());
    if let (Some(docs), Some(stop_words)) = (args.docs, args.stop_words) {
        tracing::info!(language = %args.language, docs = %docs.display(), "building startup index");
        state.spawn_build(args.language, docs, stop_words)?;
    }
    let app: Router = build_app(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
