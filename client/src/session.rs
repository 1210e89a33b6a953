use crate::models::Message;

pub const READY_STATUS: &str = "Documents are processed and ready for questions";
pub const EMPTY_STATUS: &str = "Upload PDFs and click 'Process Documents' to start";

/// Session id plus the local transcript. Lives as long as the front end
/// that owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    session_id: Option<String>,
    chat_history: Vec<Message>,
}

impl SessionState {
    /// Takes whatever state the front end kept, or starts an empty one.
    /// Existing state passes through untouched.
    pub fn initialize(saved: Option<SessionState>) -> SessionState {
        saved.unwrap_or_default()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn chat_history(&self) -> &[Message] {
        &self.chat_history
    }

    pub fn is_ready(&self) -> bool {
        self.session_id.is_some()
    }

    pub fn status(&self) -> &'static str {
        if self.is_ready() {
            READY_STATUS
        } else {
            EMPTY_STATUS
        }
    }

    /// A new document set invalidates the previous transcript.
    pub(crate) fn start_session(&mut self, session_id: String) {
        self.session_id = Some(session_id);
        self.chat_history.clear();
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.chat_history.push(message);
    }

    pub(crate) fn pop(&mut self) -> Option<Message> {
        self.chat_history.pop()
    }
}
