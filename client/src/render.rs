use crate::models::{Message, Role};

const USER_LABEL: &str = "🧑 You";
const ASSISTANT_LABEL: &str = "🤖 Assistant";

pub fn turn_label(role: Role) -> &'static str {
    match role {
        Role::User => USER_LABEL,
        Role::Assistant => ASSISTANT_LABEL,
    }
}

/// Renders one turn as a label line followed by the content, indented so
/// multi-line answers stay visually attached to their label.
pub fn render_turn(message: &Message) -> String {
    let mut out = String::new();
    out.push_str(turn_label(message.role));
    out.push('\n');
    for line in message.content.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Transcript in insertion order, one blank line between turns. An empty
/// transcript renders as an empty string.
pub fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(render_turn)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_transcript_renders_nothing() {
        assert_eq!(render_transcript(&[]), "");
    }

    #[test]
    fn turns_render_in_order_with_labels() {
        let rendered = render_transcript(&[
            Message::user("Question"),
            Message::assistant("Answer\nsecond line"),
        ]);
        assert_eq!(
            rendered,
            "🧑 You\n  Question\n\n🤖 Assistant\n  Answer\n  second line\n"
        );
    }
}
