use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::models::*;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};

/// Multipart field every uploaded file is sent under.
pub const FILES_FIELD: &str = "files";
pub const PDF_MIME: &str = "application/pdf";

/// The document QA service. Everything the chat client knows about the
/// backend goes through here.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn process(&self, files: &[UploadedFile]) -> Result<ProcessResponse, BackendError>;

    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, BackendError>;

    /// Base URL, for display.
    fn base_url(&self) -> &str;
}

pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> anyhow::Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn build_form(files: &[UploadedFile]) -> Result<Form, BackendError> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(PDF_MIME)?;
            form = form.part(FILES_FIELD, part);
        }
        Ok(form)
    }

    async fn reject(response: Response) -> BackendError {
        let status = response.status();
        // A body that is not JSON counts as "no detail"
        let body: ErrorResponse = response.json().await.unwrap_or_default();
        let detail = body.detail_text();
        log::warn!("Backend rejected request with {}: {:?}", status, detail);
        BackendError::Rejected { status, detail }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn process(&self, files: &[UploadedFile]) -> Result<ProcessResponse, BackendError> {
        let url = self.config.endpoint("process");
        let form = Self::build_form(files)?;

        log::info!("Uploading {} file(s) to {}", files.len(), url);

        let response = self.client
            .post(&url)
            .multipart(form)
            .timeout(self.config.process_timeout)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(Self::reject(response).await);
        }

        let processed: ProcessResponse = response.json().await?;
        log::info!("Backend opened session {}", processed.session_id);
        Ok(processed)
    }

    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, BackendError> {
        let url = self.config.endpoint("ask");

        log::info!("Asking question for session {}", request.session_id);

        let response = self.client
            .post(&url)
            .json(request)
            .timeout(self.config.ask_timeout)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(Self::reject(response).await);
        }

        let answer: AskResponse = response.json().await?;
        log::debug!("Backend transcript now has {} entries", answer.chat_history.len());
        Ok(answer)
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }
}
