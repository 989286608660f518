use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use ratatui::{
    prelude::{Backend, Rect},
    style::{Color, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::state_store::{MessageBoxItem, State};
use crate::ui_management::components::ComponentRender;

const EMPTY_CHAT_MESSAGE: &str = "Say hi to your partner!";

/// Makes user supplied text safe to draw: whitespace controls become spaces,
/// every other control character is shown as its escape sequence.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }

    let mut sanitized = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' | '\r' | '\t' => sanitized.push(' '),
            c if c.is_control() => sanitized.extend(c.escape_default()),
            c => sanitized.push(c),
        }
    }

    Cow::Owned(sanitized)
}

pub fn format_time_in<Tz: TimeZone>(timestamp: &DateTime<FixedOffset>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(tz).format("%H:%M").to_string()
}

fn message_to_line<'a>(item: &MessageBoxItem) -> Line<'a> {
    match item {
        MessageBoxItem::Message {
            content,
            timestamp,
            is_own,
            ..
        } => {
            let author = if *is_own {
                Span::from("you").bold().fg(Color::Green)
            } else {
                Span::from("partner").bold().fg(Color::Cyan)
            };

            Line::from(vec![
                Span::from(format!("[{}] ", format_time_in(timestamp, &Local))).dim(),
                author,
                Span::raw(": "),
                Span::raw(sanitize(content).into_owned()),
            ])
        }
        MessageBoxItem::Notification(content) => {
            Line::from(Span::raw(sanitize(content).into_owned()).italic())
        }
    }
}

fn calculate_list_offset(height: u16, items_len: usize) -> usize {
    // go back by (container height - 2 for borders) to get the offset
    items_len.saturating_sub((height as usize).saturating_sub(2))
}

/// Scrollback of the current chat session, newest messages at the bottom
pub struct MessageList {
    messages: Vec<MessageBoxItem>,
}

impl From<&State> for MessageList {
    fn from(state: &State) -> Self {
        MessageList {
            messages: state.messages.clone(),
        }
    }
}

pub struct RenderProps {
    pub area: Rect,
}

impl ComponentRender<RenderProps> for MessageList {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: RenderProps) {
        let items: Vec<ListItem> = if self.messages.is_empty() {
            vec![ListItem::new(Line::from(EMPTY_CHAT_MESSAGE.italic()))]
        } else {
            let offset = calculate_list_offset(props.area.height, self.messages.len());

            self.messages
                .iter()
                .skip(offset)
                .map(|item| ListItem::new(message_to_line(item)))
                .collect()
        };

        let messages =
            List::new(items).block(Block::default().borders(Borders::ALL).title("Messages"));
        frame.render_widget(messages, props.area);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_markup_is_kept_literal() {
        assert_eq!(sanitize("<b>hi</b> & bye"), "<b>hi</b> & bye");
        assert!(matches!(sanitize("<b>hi</b>"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_control_characters_are_neutralized() {
        let sanitized = sanitize("\x1b[2Jgone\nnext\tcol");

        assert!(!sanitized.contains('\x1b'));
        assert_eq!(sanitized, "\\u{1b}[2Jgone next col");
    }

    #[test]
    fn test_format_time() {
        let timestamp = DateTime::parse_from_rfc3339("2024-03-01T23:45:10+02:00").unwrap();

        assert_eq!(format_time_in(&timestamp, &Utc), "21:45");
        assert_eq!(
            format_time_in(&timestamp, &FixedOffset::east_opt(3600).unwrap()),
            "22:45"
        );
    }

    #[test]
    fn test_list_offset_keeps_latest_messages() {
        assert_eq!(calculate_list_offset(12, 4), 0);
        assert_eq!(calculate_list_offset(12, 25), 15);
        assert_eq!(calculate_list_offset(1, 3), 3);
    }

    #[test]
    fn test_message_lines() {
        let timestamp = DateTime::parse_from_rfc3339("2024-03-01T10:00:00+00:00").unwrap();
        let text = |line: Line| -> String {
            line.spans
                .iter()
                .skip(1)
                .map(|span| span.content.as_ref())
                .collect()
        };

        let own = MessageBoxItem::Message {
            sender_id: "me".into(),
            content: "hey".into(),
            timestamp,
            is_own: true,
        };
        let partner = MessageBoxItem::Message {
            sender_id: "other".into(),
            content: "<i>yo</i>".into(),
            timestamp,
            is_own: false,
        };

        assert_eq!(text(message_to_line(&own)), "you: hey");
        assert_eq!(text(message_to_line(&partner)), "partner: <i>yo</i>");
    }
}
