mod app;
mod page;

use anyhow::Result;
use app::{router, AppState};
use pdf_chat::{ChatClient, ClientConfig, HttpBackend};
use std::env;
use std::sync::Arc;

const DEFAULT_ADDR: &str = "127.0.0.1:8501";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::init();

    let config = ClientConfig::from_env()?;
    let addr = env::var("PDF_CHAT_WEB_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    log::info!("Using backend at {}", config.backend.base_url);

    let backend = HttpBackend::new(config.backend)?;
    let client = ChatClient::new(backend, config.policy);
    let app = router(Arc::new(AppState::new(client)?));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    println!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
