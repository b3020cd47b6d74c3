use std::net::TcpListener;

use anyhow::Context;
use env_logger::Env;
use scout::{
    configuration::get_configuration, dal::website_store::WebsiteStore,
    services::ProductScraper, startup::run,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;

    let store = WebsiteStore::new(configuration.store.websites_file);
    let scraper =
        ProductScraper::new(&configuration.scraper).context("Failed to build http client.")?;

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address).with_context(|| format!("Failed to bind {}", address))?;
    log::info!("Listening on {}", address);

    run(listener, store, scraper)?.await?;

    Ok(())
}
