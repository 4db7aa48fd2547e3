use property_scout::stdio_service;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol; logs go to stderr.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    // MCP hosts may probe stdio servers with `--version`/`--help` before starting a session.
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        tracing::info!("version={}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        tracing::info!(
            "property-scout-mcp (MCP stdio server); usage: property-scout-mcp [--version|--help]; \
             requires SERPER_API_KEY, BROWSERLESS_API_KEY and HUGGINGFACE_API_KEY"
        );
        return Ok(());
    }
    stdio_service::run().await
}
