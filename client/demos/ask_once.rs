use pdf_chat::repl::load_pdfs;
use pdf_chat::{ChatClient, ClientConfig, HttpBackend};
use std::path::PathBuf;

// Usage: cargo run --example ask_once -- "question" file1.pdf [file2.pdf ...]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let question = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: ask_once <question> <file.pdf>..."))?;
    let paths: Vec<PathBuf> = args.map(PathBuf::from).collect();

    let config = ClientConfig::from_env()?;
    println!("🔍 Backend: {}", config.backend.base_url);

    let backend = HttpBackend::new(config.backend)?;
    let mut client = ChatClient::new(backend, config.policy);

    let files = load_pdfs(&paths).await.map_err(|e| anyhow::anyhow!(e))?;
    println!("\n📚 Processing {} document(s)...", files.len());
    let confirmation = client.process_files(files).await?;
    println!("{}", confirmation);

    println!("\n💬 Asking: {}", question);
    client.handle_question(&question).await?;

    println!("\n{}", client.render_transcript());
    Ok(())
}
