use crate::backend::Backend;
use crate::chat_client::ChatClient;
use crate::command::{Command, HELP};
use crate::models::{Message, UploadedFile};
use crate::render::render_turn;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const TITLE: &str = "📚 Chat with your PDF";
pub const CAPTION: &str = "Upload PDF documents and ask questions about their content";
pub const LARGE_FILE_NOTE: &str = "Note: Processing may take several minutes for large files";

/// Terminal conversation: reads commands line by line from `input` until
/// `/quit` or end of input. Each command finishes before the next line is
/// read.
pub struct Repl<'a, B: Backend, W> {
    client: &'a mut ChatClient<B>,
    output: W,
}

impl<'a, B, W> Repl<'a, B, W>
where
    B: Backend,
    W: AsyncWrite + Unpin,
{
    pub fn new(client: &'a mut ChatClient<B>, output: W) -> Self {
        Self { client, output }
    }

    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        self.banner().await?;

        let mut lines = input.lines();
        loop {
            self.write("> ").await?;
            let Some(line) = lines.next_line().await? else {
                break;
            };

            match Command::parse(&line) {
                Command::Quit => break,
                Command::Empty => {}
                Command::Help => self.writeln(HELP).await?,
                Command::Unknown(name) => {
                    self.writeln(&format!("Unknown command /{}. Type /help for a list.", name)).await?
                }
                Command::History => {
                    let transcript = self.client.render_transcript();
                    self.write(&transcript).await?;
                }
                Command::Status => self.status().await?,
                Command::Process(paths) => self.process(&paths).await?,
                Command::Ask(question) => self.ask(&question).await?,
            }
        }

        self.output.flush().await?;
        Ok(())
    }

    async fn banner(&mut self) -> Result<()> {
        self.writeln(TITLE).await?;
        self.writeln(CAPTION).await?;
        self.writeln(LARGE_FILE_NOTE).await?;
        self.status().await?;
        self.writeln("Type /help for commands.").await
    }

    async fn status(&mut self) -> Result<()> {
        let line = format!("Backend URL: {}", self.client.backend_url());
        self.writeln(&line).await?;
        let status = self.client.state().status();
        self.writeln(status).await
    }

    async fn process(&mut self, paths: &[PathBuf]) -> Result<()> {
        let files = match load_pdfs(paths).await {
            Ok(files) => files,
            Err(message) => return self.writeln(&format!("❌ {}", message)).await,
        };

        if !files.is_empty() {
            self.writeln("Processing PDFs ...").await?;
        }
        let line = match self.client.process_files(files).await {
            Ok(confirmation) => format!("✅ {}", confirmation),
            Err(err) => format!("❌ {}", err),
        };
        self.writeln(&line).await
    }

    async fn ask(&mut self, question: &str) -> Result<()> {
        let eager = self.client.policy().eager_question;
        if self.client.state().is_ready() {
            if eager {
                let turn = render_turn(&Message::user(question));
                self.write(&turn).await?;
            }
            self.writeln("Thinking...").await?;
        }

        let rendered = match self.client.handle_question(question).await {
            Ok(reply) => {
                let mut rendered = String::new();
                if !eager {
                    rendered.push_str(&render_turn(&Message::user(question)));
                }
                rendered.push_str(&render_turn(reply));
                rendered
            }
            Err(err) => format!("❌ {}\n", err),
        };
        self.write(&rendered).await
    }

    async fn write(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }

    async fn writeln(&mut self, text: &str) -> Result<()> {
        self.write(text).await?;
        self.write("\n").await
    }
}

/// Reads the named files for upload. Only `.pdf` paths are accepted and
/// nothing is returned unless every file could be read.
pub async fn load_pdfs(paths: &[PathBuf]) -> Result<Vec<UploadedFile>, String> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        if !is_pdf(path) {
            return Err(format!("{} is not a PDF file", path.display()));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| format!("Could not read {}: {}", path.display(), e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        log::debug!("Loaded {} ({} bytes)", name, bytes.len());
        files.push(UploadedFile::new(name, bytes));
    }
    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
