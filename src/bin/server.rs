use stocksearch::core::{config::ServerConfig, init};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init::init_logging("info");

    let config = ServerConfig::from_env()?;
    let app = stocksearch::server::router(config.data_dir.clone());

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    log::info!(
        "Serving tickers from {:?} on http://{}",
        config.data_dir,
        listener.local_addr()?
    );
    axum::serve(listener, app).await?;

    Ok(())
}
