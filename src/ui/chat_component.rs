use crate::ApplicationMode;
use crate::advisor::ChatTurn;
use crate::model::{ChatMessage, ChatRole};
use crate::ui::theme::TableColors;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Position, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Paragraph, Wrap},
};

pub const GREETING: &str = "Greetings! I am Slimer, your network ghost. I see everything... \
suspicious or safe. Ask me anything!";

/// Chat panel: message history plus an input line.
#[derive(Debug)]
pub struct ChatComponent {
    pub messages: Vec<ChatMessage>,
    /// Current input value
    pub value: String,
    /// Cursor position in terms of character index
    pub cursor_index: usize,
    pub display: bool,
    /// a reply is outstanding
    pub is_loading: bool,
}

impl Default for ChatComponent {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::new(ChatRole::Model, GREETING)],
            value: String::new(),
            cursor_index: 0,
            display: false,
            is_loading: false,
        }
    }
}

impl ChatComponent {
    pub fn toggle(&mut self) {
        self.display = !self.display;
    }

    /// Clears the input and resets cursor
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_index = 0;
    }

    fn clamp_cursor(&self, pos: usize) -> usize {
        pos.clamp(0, self.value.chars().count())
    }

    pub fn move_cursor_left(&mut self) {
        let new_idx = self.cursor_index.saturating_sub(1);
        self.cursor_index = self.clamp_cursor(new_idx);
    }

    pub fn move_cursor_right(&mut self) {
        let new_idx = self.cursor_index.saturating_add(1);
        self.cursor_index = self.clamp_cursor(new_idx);
    }

    /// Returns the byte index corresponding to the char cursor
    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_index)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.value.insert(idx, c);
        self.move_cursor_right();
    }

    /// Deletes the character before the cursor
    pub fn delete_char(&mut self) {
        if self.cursor_index > 0 {
            let before = self.value.chars().take(self.cursor_index - 1);
            let after = self.value.chars().skip(self.cursor_index);
            self.value = before.chain(after).collect();
            self.move_cursor_left();
        }
    }

    /// Moves the input into the transcript and returns the history that preceded it
    /// together with the message. `None` while a reply is pending or the input is blank.
    pub fn begin_send(&mut self) -> Option<(Vec<ChatTurn>, String)> {
        if self.is_loading || self.value.trim().is_empty() {
            return None;
        }
        let history = self
            .messages
            .iter()
            .map(|m| ChatTurn {
                role: m.role,
                text: m.text.clone(),
            })
            .collect();
        let message = std::mem::take(&mut self.value);
        self.cursor_index = 0;
        self.messages.push(ChatMessage::new(ChatRole::User, message.clone()));
        self.is_loading = true;
        Some((history, message))
    }

    pub fn receive_reply(&mut self, text: String) {
        self.messages.push(ChatMessage::new(ChatRole::Model, text));
        self.is_loading = false;
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        colors: &TableColors,
        mode: &ApplicationMode,
    ) {
        let [history_area, input_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area);

        let mut lines: Vec<Line<'_>> = Vec::new();
        for msg in &self.messages {
            let (who, style) = match msg.role {
                ChatRole::User => ("you", Style::default().fg(colors.selected_row_style_fg)),
                ChatRole::Model => ("slimer", Style::default().fg(colors.row_fg)),
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{who} {}", msg.timestamp.format("%H:%M")),
                    style.add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.extend(msg.text.lines().map(|l| Line::styled(l, style)));
            lines.push(Line::from(""));
        }
        if self.is_loading {
            lines.push(Line::from("Analyzing ectoplasm...").italic());
        }

        let history = Paragraph::new(Text::from(lines))
            .style(Style::default().fg(colors.row_fg).bg(colors.buffer_bg))
            .wrap(Wrap { trim: false });

        // keep the newest messages in view, counting wrapped rows
        let inner = history_area.inner(Margin {
            vertical: 1,
            horizontal: 1,
        });
        #[allow(clippy::cast_possible_truncation)]
        let scroll = history
            .line_count(inner.width)
            .saturating_sub(inner.height as usize)
            .min(u16::MAX as usize) as u16;

        let history = history.scroll((scroll, 0)).block(
                Block::bordered()
                    .border_type(BorderType::Plain)
                    .border_style(Style::new().fg(colors.footer_border_color))
                    .title(" SlimerNet Agent "),
            );
        frame.render_widget(history, history_area);

        let placeholder = self.value.is_empty() && !matches!(mode, ApplicationMode::Editing);
        let input = Paragraph::new(if placeholder {
            "Ask about safe APIs... [c]"
        } else {
            self.value.as_str()
        })
        .style(Style::default().fg(colors.row_fg).bg(colors.buffer_bg))
        .block(
            Block::bordered()
                .border_type(BorderType::Plain)
                .border_style(Style::new().fg(colors.footer_border_color))
                .title("Message"),
        );
        frame.render_widget(input, input_area);

        if matches!(mode, ApplicationMode::Editing) {
            #[allow(clippy::cast_possible_truncation)]
            frame.set_cursor_position(Position::new(
                input_area.x + self.cursor_index as u16 + 1,
                input_area.y + 1,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::PALETTES;
    use ratatui::{Terminal, backend::TestBackend};

    fn typed(text: &str) -> ChatComponent {
        let mut chat = ChatComponent::default();
        for c in text.chars() {
            chat.insert_char(c);
        }
        chat
    }

    #[test]
    fn editing_respects_char_boundaries() {
        let mut chat = typed("héllo");
        chat.move_cursor_left();
        chat.move_cursor_left();
        chat.delete_char();
        assert_eq!(chat.value, "hélo");
        chat.insert_char('ł');
        assert_eq!(chat.value, "héllo".replacen('l', "ł", 1));
    }

    #[test]
    fn send_moves_input_into_transcript() {
        let mut chat = typed("is 1337 bad?");
        let (history, message) = chat.begin_send().unwrap();

        assert_eq!(message, "is 1337 bad?");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, ChatRole::Model);
        assert_eq!(history[0].text, GREETING);
        assert!(chat.value.is_empty());
        assert_eq!(chat.cursor_index, 0);
        assert_eq!(chat.messages.len(), 2);
        assert!(chat.is_loading);
    }

    #[test]
    fn no_second_send_while_waiting_or_for_blank_input() {
        let mut chat = typed("first");
        assert!(chat.begin_send().is_some());
        chat.insert_char('x');
        assert!(chat.begin_send().is_none());

        chat.receive_reply("boo".into());
        assert!(!chat.is_loading);
        assert_eq!(chat.messages.last().unwrap().role, ChatRole::Model);
        assert!(chat.begin_send().is_some());

        chat.receive_reply("boo".into());
        for c in "   ".chars() {
            chat.insert_char(c);
        }
        assert!(chat.begin_send().is_none());
    }

    #[test]
    fn long_reply_scrolls_to_its_last_wrapped_row() {
        let mut chat = ChatComponent::default();
        chat.receive_reply(format!("{}ENDMARK", "word ".repeat(60)));

        let colors = TableColors::new(&PALETTES[0]);
        let mut terminal = Terminal::new(TestBackend::new(30, 16)).unwrap();
        terminal
            .draw(|frame| chat.render(frame, frame.area(), &colors, &ApplicationMode::Normal))
            .unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("ENDMARK"));
        assert!(!screen.contains("Greetings"));
    }
}
