mod app;
mod client;
mod config;
mod error;
mod logging;
mod ui;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    logging::init(&config)?;
    tracing::info!("starting expenses dashboard");

    let mut app = app::App::new(config)?;
    let result = app.run().await;
    if let Err(err) = &result {
        tracing::error!("dashboard stopped: {err}");
    }
    result
}
