use anyhow::Result;
use minijinja::Environment;
use pdf_chat::render::turn_label;
use pdf_chat::repl::{CAPTION, LARGE_FILE_NOTE, TITLE};
use pdf_chat::{Message, Role};
use serde::Serialize;

const INDEX: &str = "index.html";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// Outcome of the last action, shown once on the next page load.
#[derive(Debug, Clone, Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
}

impl Flash {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Serialize)]
struct TurnView<'a> {
    role: Role,
    label: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct PageView<'a> {
    title: &'static str,
    caption: &'static str,
    note: &'static str,
    backend_url: &'a str,
    ready: bool,
    status: &'a str,
    flash: Option<Flash>,
    turns: Vec<TurnView<'a>>,
}

/// Everything the page shows about the current session.
pub struct PageInput<'a> {
    pub backend_url: &'a str,
    pub ready: bool,
    pub status: &'a str,
    pub flash: Option<Flash>,
    pub messages: &'a [Message],
}

pub struct Page {
    env: Environment<'static>,
}

impl Page {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        // `.html` templates are autoescaped
        env.add_template(INDEX, include_str!("../templates/index.html"))?;
        Ok(Self { env })
    }

    pub fn render(&self, input: PageInput<'_>) -> Result<String> {
        let view = PageView {
            title: TITLE,
            caption: CAPTION,
            note: LARGE_FILE_NOTE,
            backend_url: input.backend_url,
            ready: input.ready,
            status: input.status,
            flash: input.flash,
            turns: input
                .messages
                .iter()
                .map(|m| TurnView {
                    role: m.role,
                    label: turn_label(m.role),
                    content: &m.content,
                })
                .collect(),
        };

        let template = self.env.get_template(INDEX)?;
        Ok(template.render(view)?)
    }
}
