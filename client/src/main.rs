use anyhow::Result;
use pdf_chat::{ChatClient, ClientConfig, HttpBackend, Repl};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();
    env_logger::init();

    let config = ClientConfig::from_env()?;
    log::info!("Using backend at {}", config.backend.base_url);

    let backend = HttpBackend::new(config.backend)?;
    let mut client = ChatClient::new(backend, config.policy);

    let stdin = BufReader::new(tokio::io::stdin());
    Repl::new(&mut client, tokio::io::stdout()).run(stdin).await?;

    log::info!("Bye");
    Ok(())
}
