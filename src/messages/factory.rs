//! Constructors for the message kinds the chat loop produces.

use serde_json::Value;

use super::message::{MessageStatus, RenderContent, RenderItem, Span, UIMessage};
use crate::core::style::{Color, Style};
use crate::core::text::truncate_to_width;
use crate::error::Result;
use crate::runtime::footer::compact_count;

const TOOL_PARAMS_WIDTH: usize = 100;
const TOOL_RESULT_LINES: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_creation_tokens: u64,
    pub cache_read_tokens: u64,
}

impl TokenUsage {
    /// `1.2k in · 56 out`, plus cache counters when non-zero.
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("{} in", compact_count(self.input_tokens)),
            format!("{} out", compact_count(self.output_tokens)),
        ];
        if self.cache_creation_tokens > 0 {
            parts.push(format!("{} cache write", compact_count(self.cache_creation_tokens)));
        }
        if self.cache_read_tokens > 0 {
            parts.push(format!("{} cache read", compact_count(self.cache_read_tokens)));
        }
        format!("[{}]", parts.join(" · "))
    }
}

fn dim() -> Style {
    Style::new().dim()
}

// Only used on freshly built messages, which are never frozen yet.
fn push(msg: &mut UIMessage, content: impl Into<RenderContent>, style: Style) {
    msg.push_item(RenderItem::new(content, style));
}

pub fn welcome() -> UIMessage {
    let mut msg = UIMessage::new("welcome");
    push(&mut msg, "nano-cli", Style::new().bold().fg(Color::Cyan));
    push(
        &mut msg,
        "Type your message. /help for commands. Esc to cancel. Ctrl+D to exit.",
        dim(),
    );
    push(&mut msg, "", Style::default());
    msg.with_status(MessageStatus::Complete)
}

pub fn system(text: &str) -> UIMessage {
    let mut msg = UIMessage::new("system");
    push(&mut msg, text, dim());
    msg.with_status(MessageStatus::Complete)
}

pub fn user(text: &str) -> UIMessage {
    let mut msg = UIMessage::new("user");
    push(
        &mut msg,
        vec![
            Span::styled("> ", Style::new().bold().fg(Color::Green)),
            Span::styled(text, Style::new().bold()),
        ],
        Style::default(),
    );
    push(&mut msg, "", Style::default());
    msg.with_status(MessageStatus::Complete)
}

/// Empty assistant message, filled in by [`add_thinking`] and [`add_text`] as the reply streams.
pub fn assistant() -> UIMessage {
    UIMessage::new("assistant")
}

/// Adds the reasoning block. Blank text is ignored.
pub fn add_thinking(msg: &mut UIMessage, thinking: &str) -> Result<()> {
    if thinking.trim().is_empty() {
        return Ok(());
    }
    msg.append(thinking, dim().italic())
}

/// Adds the reply text followed by its token usage line. Blank text adds the usage line only.
pub fn add_text(msg: &mut UIMessage, text: &str, has_thinking: bool, usage: TokenUsage) -> Result<()> {
    let usage_line = dim().paint(&usage.summary());
    if text.trim().is_empty() {
        msg.append(usage_line, Style::default())?;
    } else {
        if has_thinking {
            msg.append("─".repeat(40), dim())?;
        }
        let mut lines: Vec<String> = text.lines().map(str::to_owned).collect();
        lines.push(usage_line);
        msg.append(RenderContent::Block(lines), Style::default())?;
    }

    msg.set_metadata("input_tokens", usage.input_tokens);
    msg.set_metadata("output_tokens", usage.output_tokens);
    msg.set_metadata("cache_creation_tokens", usage.cache_creation_tokens);
    msg.set_metadata("cache_read_tokens", usage.cache_read_tokens);
    Ok(())
}

fn format_params(params: &Value) -> String {
    let text = match params {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("{key}={s:?}"),
                other => format!("{key}={other}"),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    truncate_to_width(&text.replace('\n', "\\n"), TOOL_PARAMS_WIDTH)
}

pub fn tool_call(name: &str, params: &Value) -> UIMessage {
    let mut msg = UIMessage::new("tool_call");
    push(
        &mut msg,
        vec![
            Span::styled(format!("⏺ {name}"), Style::new().bold().fg(Color::Cyan)),
            Span::styled(format!("({})", format_params(params)), dim()),
        ],
        Style::default(),
    );
    msg.set_metadata("tool", name);
    msg
}

/// Indented result, cut to the first lines.
pub fn tool_result(result: &str, is_error: bool) -> UIMessage {
    let mut msg = UIMessage::new("tool_result");
    let style = if is_error {
        Style::new().fg(Color::Red)
    } else {
        dim()
    };

    let all: Vec<&str> = result.lines().collect();
    let mut lines: Vec<String> = all
        .iter()
        .take(TOOL_RESULT_LINES)
        .enumerate()
        .map(|(idx, line)| {
            let lead = if idx == 0 { "  ⎿ " } else { "    " };
            style.paint(&format!("{lead}{line}"))
        })
        .collect();
    if lines.is_empty() {
        lines.push(style.paint("  ⎿ (no output)"));
    }
    if all.len() > TOOL_RESULT_LINES {
        lines.push(dim().paint(&format!("    … ({} more lines)", all.len() - TOOL_RESULT_LINES)));
    }
    push(&mut msg, RenderContent::Block(lines), Style::default());
    msg.set_metadata("is_error", is_error);
    msg.with_status(MessageStatus::Complete)
}

pub fn error(text: &str) -> UIMessage {
    let mut msg = UIMessage::new("error");
    push(&mut msg, format!("Error: {text}"), Style::new().bold().fg(Color::Red));
    msg.with_status(MessageStatus::Error)
}

/// Edit-approval request. The caller resolves it by running a `ConfirmPrompt`.
pub fn permission_request(file_path: &str, match_count: usize, preview: &str) -> UIMessage {
    let mut msg = UIMessage::new("permission");
    push(&mut msg, "", Style::default());
    push(
        &mut msg,
        "--- Permission Required ---",
        Style::new().bold().fg(Color::Yellow),
    );
    push(&mut msg, format!("File: {file_path}"), Style::new().fg(Color::Cyan));
    if match_count > 1 {
        push(
            &mut msg,
            format!("(Replacing {match_count} occurrences)"),
            Style::new().dim().fg(Color::Yellow),
        );
    }
    push(&mut msg, "", Style::default());

    if !preview.is_empty() {
        for line in preview.lines() {
            let style = if line.starts_with("  -") {
                Style::new().fg(Color::White).bg(Color::Rgb(80, 0, 0))
            } else if line.starts_with("  +") {
                Style::new().fg(Color::White).bg(Color::Rgb(0, 60, 0))
            } else if line.starts_with("───") {
                Style::new().bold().fg(Color::Cyan)
            } else {
                dim()
            };
            push(&mut msg, line, style);
        }
        push(&mut msg, "", Style::default());
    }

    msg.set_metadata("file_path", file_path);
    msg.set_metadata("match_count", match_count);
    msg.with_status(MessageStatus::Active)
}

pub fn input_prompt() -> UIMessage {
    UIMessage::new("input").with_status(MessageStatus::Active)
}

#[cfg(test)]
mod tests {
    use super::{add_text, add_thinking, TokenUsage};
    use crate::core::text::strip_ansi;
    use crate::messages::message::{MessageStatus, RenderContent};
    use crate::messages::{factory, MessageList};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn plain(msg: &crate::messages::UIMessage) -> Vec<String> {
        msg.output_buffer()
            .iter()
            .map(|item| strip_ansi(&item.render()))
            .collect()
    }

    #[test]
    fn welcome_is_complete() {
        let msg = factory::welcome();
        assert_eq!(msg.message_type, "welcome");
        assert_eq!(msg.status(), MessageStatus::Complete);
        assert_eq!(msg.output_buffer()[0].render(), "\x1b[1;36mnano-cli\x1b[0m");
        assert_eq!(msg.visual_line_count(), 3);
    }

    #[test]
    fn user_message_has_prompt_marker() {
        let msg = factory::user("hello");
        assert_eq!(plain(&msg), vec!["> hello", ""]);
    }

    #[test]
    fn assistant_streams_thinking_then_text() {
        let mut msg = factory::assistant();
        assert_eq!(msg.status(), MessageStatus::Pending);
        add_thinking(&mut msg, "   ").expect("blank thinking");
        assert!(msg.output_buffer().is_empty());

        add_thinking(&mut msg, "pondering").expect("thinking");
        let usage = TokenUsage {
            input_tokens: 1200,
            output_tokens: 56,
            cache_creation_tokens: 0,
            cache_read_tokens: 2000,
        };
        add_text(&mut msg, "line one\nline two", true, usage).expect("text");

        let lines = plain(&msg);
        assert_eq!(lines[0], "pondering");
        assert_eq!(lines[1], "─".repeat(40));
        assert_eq!(lines[2], "line one\nline two\n[1.2k in · 56 out · 2k cache read]");
        assert_eq!(msg.metadata["input_tokens"], json!(1200));
        assert_eq!(msg.visual_line_count(), 5);
    }

    #[test]
    fn blank_text_only_adds_usage() {
        let mut msg = factory::assistant();
        add_text(&mut msg, "", false, TokenUsage::default()).expect("usage");
        assert_eq!(plain(&msg), vec!["[0 in · 0 out]"]);
    }

    #[test]
    fn frozen_assistant_rejects_text() {
        let mut list = MessageList::new();
        list.add(factory::assistant());
        list.add(factory::user("next"));
        let first = list.iter().next().expect("assistant").id.clone();
        let mut stale = factory::assistant();
        stale.freeze();
        assert!(add_text(&mut stale, "late", false, TokenUsage::default()).is_err());
        assert!(list.get_by_id(&first).is_some_and(|m| m.is_frozen()));
    }

    #[test]
    fn tool_call_and_result() {
        let call = factory::tool_call("read", &json!({"path": "src/main.rs", "limit": 20}));
        assert_eq!(plain(&call), vec![r#"⏺ read(limit=20, path="src/main.rs")"#]);

        let result = factory::tool_result("ok\ndone", false);
        assert_eq!(plain(&result), vec!["  ⎿ ok\n    done"]);
        assert_eq!(result.status(), MessageStatus::Complete);

        let long: String = (0..15).map(|n| format!("l{n}\n")).collect();
        let result = factory::tool_result(&long, true);
        let RenderContent::Block(lines) = &result.output_buffer()[0].content else {
            panic!("block expected");
        };
        assert_eq!(lines.len(), 11);
        assert!(lines[0].starts_with("\x1b[31m"));
        assert_eq!(strip_ansi(&lines[10]), "    … (5 more lines)");
    }

    #[test]
    fn error_message_status() {
        let msg = factory::error("boom");
        assert_eq!(msg.status(), MessageStatus::Error);
        assert_eq!(plain(&msg), vec!["Error: boom"]);
    }

    #[test]
    fn permission_request_colours_diff() {
        let preview = "─── src/lib.rs\n  - old\n  + new\n  ctx";
        let msg = factory::permission_request("src/lib.rs", 3, preview);
        assert_eq!(msg.status(), MessageStatus::Active);

        let rendered: Vec<String> = msg.output_buffer().iter().map(|i| i.render()).collect();
        assert_eq!(rendered[1], "\x1b[1;33m--- Permission Required ---\x1b[0m");
        assert_eq!(rendered[2], "\x1b[36mFile: src/lib.rs\x1b[0m");
        assert_eq!(strip_ansi(&rendered[3]), "(Replacing 3 occurrences)");
        assert_eq!(rendered[5], "\x1b[1;36m─── src/lib.rs\x1b[0m");
        assert_eq!(rendered[6], "\x1b[37;48;2;80;0;0m  - old\x1b[0m");
        assert_eq!(rendered[7], "\x1b[37;48;2;0;60;0m  + new\x1b[0m");
        assert_eq!(rendered[8], "\x1b[2m  ctx\x1b[0m");

        let single = factory::permission_request("a.rs", 1, "");
        assert_eq!(single.output_buffer().len(), 4);
    }

    #[test]
    fn input_prompt_is_active_and_empty() {
        let msg = factory::input_prompt();
        assert_eq!(msg.status(), MessageStatus::Active);
        assert_eq!(msg.visual_line_count(), 0);
    }
}
