mod models;
mod pipeline;
mod server;
mod tests;
mod utils;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chartwright=info,tower_http=info")),
        )
        .init();

    if let Err(why) = server::init::start_server().await {
        tracing::error!("[ERROR] Server error: {why:?}");
        return Err(why);
    }

    Ok(())
}
