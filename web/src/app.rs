use crate::page::{Flash, Page, PageInput};
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use pdf_chat::backend::FILES_FIELD;
use pdf_chat::{Backend, ChatClient, UploadedFile};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Uploads may carry several large PDFs.
pub const UPLOAD_LIMIT: usize = 256 * 1024 * 1024;

type HandlerError = (StatusCode, String);

struct WebSession<B: Backend> {
    client: ChatClient<B>,
    flash: Option<Flash>,
}

/// One chat session behind one lock. An action holds the lock for its
/// whole backend call, so actions run one at a time.
pub struct AppState<B: Backend> {
    session: Mutex<WebSession<B>>,
    page: Page,
}

impl<B: Backend> AppState<B> {
    pub fn new(client: ChatClient<B>) -> anyhow::Result<Self> {
        Ok(Self {
            session: Mutex::new(WebSession {
                client,
                flash: None,
            }),
            page: Page::new()?,
        })
    }
}

#[derive(Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
}

pub fn router<B: Backend + 'static>(state: Arc<AppState<B>>) -> Router {
    Router::new()
        .route("/", get(index::<B>))
        .route(
            "/process",
            post(process::<B>).layer(DefaultBodyLimit::max(UPLOAD_LIMIT)),
        )
        .route("/ask", post(ask::<B>))
        .with_state(state)
}

async fn index<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
) -> Result<Html<String>, HandlerError> {
    let mut session = state.session.lock().await;
    let flash = session.flash.take();
    let client = &session.client;

    let html = state
        .page
        .render(PageInput {
            backend_url: client.backend_url(),
            ready: client.state().is_ready(),
            status: client.state().status(),
            flash,
            messages: client.state().chat_history(),
        })
        .map_err(|e| {
            log::error!("Failed to render page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok(Html(html))
}

async fn process<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
    mut multipart: Multipart,
) -> Result<Redirect, HandlerError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        // Browsers send one nameless, empty part when nothing was selected
        let name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
        files.push(UploadedFile::new(name, bytes.to_vec()));
    }

    log::info!("Received {} file(s) for processing", files.len());

    let mut session = state.session.lock().await;
    let flash = match session.client.process_files(files).await {
        Ok(confirmation) => Flash::success(confirmation),
        Err(err) => Flash::error(err.to_string()),
    };
    session.flash = Some(flash);

    Ok(Redirect::to("/"))
}

async fn ask<B: Backend>(
    State(state): State<Arc<AppState<B>>>,
    Form(form): Form<AskForm>,
) -> Redirect {
    let question = form.question.trim();
    if question.is_empty() {
        return Redirect::to("/");
    }

    let mut session = state.session.lock().await;
    let flash = match session.client.handle_question(question).await {
        Ok(_) => None,
        Err(err) => Some(Flash::error(err.to_string())),
    };
    session.flash = flash;

    Redirect::to("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use pdf_chat::{AskPolicy, AskRequest, AskResponse, BackendError, BackendTurn, ProcessResponse};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    const BOUNDARY: &str = "pdfchatboundary";

    struct FakeBackend {
        answer: String,
        calls: Arc<AtomicUsize>,
        uploads: Arc<std::sync::Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn process(&self, files: &[UploadedFile]) -> Result<ProcessResponse, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.uploads
                .lock()
                .unwrap()
                .extend(files.iter().map(|f| f.name.clone()));
            Ok(ProcessResponse {
                session_id: "web-1".to_string(),
            })
        }

        async fn ask(&self, _request: &AskRequest) -> Result<AskResponse, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AskResponse {
                chat_history: vec![BackendTurn {
                    content: self.answer.clone(),
                }],
            })
        }

        fn base_url(&self) -> &str {
            "http://backend.test"
        }
    }

    struct Harness {
        app: Router,
        calls: Arc<AtomicUsize>,
        uploads: Arc<std::sync::Mutex<Vec<String>>>,
    }

    fn harness(answer: &str) -> Harness {
        let calls = Arc::new(AtomicUsize::new(0));
        let uploads = Arc::new(std::sync::Mutex::new(Vec::new()));
        let backend = FakeBackend {
            answer: answer.to_string(),
            calls: calls.clone(),
            uploads: uploads.clone(),
        };
        let client = ChatClient::new(backend, AskPolicy::default());
        let app = router(Arc::new(AppState::new(client).unwrap()));
        Harness { app, calls, uploads }
    }

    fn multipart_body(parts: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (file_name, content) in parts {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    async fn upload(app: &Router, parts: &[(&str, &str)]) -> StatusCode {
        let request = Request::builder()
            .method("POST")
            .uri("/process")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        app.clone().oneshot(request).await.unwrap().status()
    }

    async fn ask_question(app: &Router, question: &str) -> StatusCode {
        let request = Request::builder()
            .method("POST")
            .uri("/ask")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("question={}", question.replace(' ', "+"))))
            .unwrap();
        app.clone().oneshot(request).await.unwrap().status()
    }

    async fn page(app: &Router) -> String {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn fresh_page_asks_for_documents() {
        let h = harness("unused");
        let html = page(&h.app).await;

        assert!(html.contains("Chat with your PDF"));
        assert!(html.contains("backend.test"));
        assert!(html.contains("Upload PDFs and click"));
        assert!(!html.contains("class=\"turn "));
    }

    #[tokio::test]
    async fn empty_selection_is_refused_without_backend_call() {
        let h = harness("unused");
        assert_eq!(upload(&h.app, &[("", "")]).await, StatusCode::SEE_OTHER);

        let html = page(&h.app).await;
        assert!(html.contains("Please upload at least one pdf file"));
        assert_eq!(h.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn upload_then_question_shows_transcript() {
        let h = harness("The total is <b>$42</b>.");

        assert_eq!(
            upload(&h.app, &[("doc1.pdf", "%PDF-1"), ("doc2.pdf", "%PDF-2")]).await,
            StatusCode::SEE_OTHER
        );
        assert_eq!(*h.uploads.lock().unwrap(), vec!["doc1.pdf", "doc2.pdf"]);

        let html = page(&h.app).await;
        assert!(html.contains("PDFs processed succesfully!"));
        assert!(html.contains("Documents are processed and ready for questions"));

        // flash is shown once
        let html = page(&h.app).await;
        assert!(!html.contains("PDFs processed succesfully!"));

        assert_eq!(ask_question(&h.app, "What is the total?").await, StatusCode::SEE_OTHER);
        let html = page(&h.app).await;
        let question = html.find("What is the total?").unwrap();
        let answer = html.find("The total is &lt;b&gt;$42").unwrap();
        assert!(question < answer);
        assert!(!html.contains("<b>$42"));
    }

    #[tokio::test]
    async fn question_before_upload_shows_error() {
        let h = harness("unused");
        assert_eq!(ask_question(&h.app, "Anything?").await, StatusCode::SEE_OTHER);

        let html = page(&h.app).await;
        assert!(html.contains("Please upload and process PDFs first."));
        assert_eq!(h.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blank_question_is_ignored() {
        let h = harness("unused");
        assert_eq!(ask_question(&h.app, "   ").await, StatusCode::SEE_OTHER);

        let html = page(&h.app).await;
        assert!(!html.contains("class=\"flash"));
    }
}
