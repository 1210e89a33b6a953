pub mod models;
pub mod config;
pub mod error;
pub mod session;
pub mod backend;
pub mod chat_client;
pub mod render;
pub mod command;
pub mod repl;

pub use models::*;
pub use config::{AskPolicy, BackendConfig, ClientConfig};
pub use error::{BackendError, ChatError};
pub use session::SessionState;
pub use backend::{Backend, HttpBackend};
pub use chat_client::ChatClient;
pub use repl::Repl;
