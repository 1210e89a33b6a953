use std::path::PathBuf;

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Process(Vec<PathBuf>),
    Ask(String),
    History,
    Status,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  /process <file.pdf>...  upload and process PDF documents
  /history                show the conversation so far
  /status                 show backend and session status
  /help                   show this help
  /quit                   leave
Anything else is sent as a question about your documents.";

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }

        let Some(rest) = line.strip_prefix('/') else {
            return Command::Ask(line.to_string());
        };

        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or_default();
        match name {
            "process" | "upload" => Command::Process(words.map(PathBuf::from).collect()),
            "history" => Command::History,
            "status" => Command::Status,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_questions() {
        assert_eq!(
            Command::parse("  What is the total?  "),
            Command::Ask("What is the total?".to_string())
        );
        assert_eq!(Command::parse("   "), Command::Empty);
    }

    #[test]
    fn process_collects_paths() {
        assert_eq!(
            Command::parse("/process a.pdf  docs/b.PDF"),
            Command::Process(vec![PathBuf::from("a.pdf"), PathBuf::from("docs/b.PDF")])
        );
        assert_eq!(Command::parse("/process"), Command::Process(Vec::new()));
    }

    #[test]
    fn known_and_unknown_commands() {
        assert_eq!(Command::parse("/history"), Command::History);
        assert_eq!(Command::parse("/status"), Command::Status);
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("/exit"), Command::Quit);
        assert_eq!(Command::parse("/frobnicate"), Command::Unknown("frobnicate".to_string()));
    }
}
