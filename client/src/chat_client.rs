use crate::backend::Backend;
use crate::config::AskPolicy;
use crate::error::ChatError;
use crate::models::*;
use crate::render::render_transcript;
use crate::session::SessionState;

pub const PROCESSED_MESSAGE: &str = "PDFs processed succesfully! You can now ask questions.";

/// Owns the session state and mediates the two backend exchanges.
/// Every failure is returned as a `ChatError` and leaves the state as it
/// was, apart from the error turn `record_errors` asks for.
pub struct ChatClient<B: Backend> {
    backend: B,
    policy: AskPolicy,
    state: SessionState,
}

impl<B: Backend> ChatClient<B> {
    pub fn new(backend: B, policy: AskPolicy) -> Self {
        Self::resume(backend, policy, None)
    }

    /// Continues from state the front end kept from an earlier client.
    pub fn resume(backend: B, policy: AskPolicy, saved: Option<SessionState>) -> Self {
        Self {
            backend,
            policy,
            state: SessionState::initialize(saved),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn into_state(self) -> SessionState {
        self.state
    }

    pub fn policy(&self) -> AskPolicy {
        self.policy
    }

    pub fn backend_url(&self) -> &str {
        self.backend.base_url()
    }

    /// Uploads `files` and, on success, starts a fresh session with an
    /// empty transcript. Returns the confirmation to show.
    pub async fn process_files(&mut self, files: Vec<UploadedFile>) -> Result<&'static str, ChatError> {
        if files.is_empty() {
            return Err(ChatError::NoFiles);
        }

        let response = self.backend.process(&files).await.map_err(|e| {
            log::error!("Processing {} file(s) failed: {}", files.len(), e);
            ChatError::from_process(e)
        })?;

        log::info!(
            "Session {} ready with {} document(s)",
            response.session_id,
            files.len()
        );
        self.state.start_session(response.session_id);

        Ok(PROCESSED_MESSAGE)
    }

    /// Sends `question` and appends the exchange to the transcript.
    /// Returns the assistant reply.
    pub async fn handle_question(&mut self, question: &str) -> Result<&Message, ChatError> {
        let session_id = match self.state.session_id() {
            Some(id) => id.to_string(),
            None => return Err(ChatError::NoSession),
        };

        if self.policy.eager_question {
            self.state.push(Message::user(question));
        }

        let request = AskRequest {
            session_id,
            question: question.to_string(),
        };

        let outcome = match self.backend.ask(&request).await {
            // The backend returns its whole running transcript; only the newest turn is ours
            Ok(response) => match response.chat_history.into_iter().last() {
                Some(turn) => Ok(turn.content),
                None => Err(ChatError::Connection(
                    "backend returned an empty chat history".to_string(),
                )),
            },
            Err(e) => Err(ChatError::from_ask(e)),
        };

        match outcome {
            Ok(answer) => {
                if !self.policy.eager_question {
                    self.state.push(Message::user(question));
                }
                self.state.push(Message::assistant(answer));
                self.state
                    .chat_history()
                    .last()
                    .ok_or_else(|| ChatError::Connection("transcript is empty".to_string()))
            }
            Err(err) => {
                log::error!("Question failed: {}", err);
                if self.policy.record_errors {
                    if !self.policy.eager_question {
                        self.state.push(Message::user(question));
                    }
                    self.state.push(Message::assistant(err.to_string()));
                } else if self.policy.eager_question {
                    self.state.pop();
                }
                Err(err)
            }
        }
    }

    pub fn render_transcript(&self) -> String {
        render_transcript(self.state.chat_history())
    }
}
