use crate::model::{ProcessAction, ProcessRecord};
use crate::ui::theme::{TableColors, risk_color};
use crate::util::popup_area;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Margin, Rect},
    prelude::Style,
    style::Stylize,
    text::Line,
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
};

/// Buttons in left-to-right order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionChoice {
    #[default]
    Stop,
    Terminate,
    Kill,
    Cancel,
}

const CHOICES: [ActionChoice; 4] = [
    ActionChoice::Stop,
    ActionChoice::Terminate,
    ActionChoice::Kill,
    ActionChoice::Cancel,
];

impl ActionChoice {
    fn label(self) -> &'static str {
        match self {
            ActionChoice::Stop => "Stop",
            ActionChoice::Terminate => "Terminate",
            ActionChoice::Kill => "Kill",
            ActionChoice::Cancel => "Cancel",
        }
    }

    fn action(self) -> Option<ProcessAction> {
        match self {
            ActionChoice::Stop => Some(ProcessAction::Stop),
            ActionChoice::Terminate => Some(ProcessAction::Terminate),
            ActionChoice::Kill => Some(ProcessAction::Kill),
            ActionChoice::Cancel => None,
        }
    }

    fn index(self) -> usize {
        CHOICES.iter().position(|c| *c == self).unwrap_or(0)
    }
}

/// A popup that asks what to do with a running process.
#[derive(Debug, Default)]
pub struct ActionComponent {
    /// whether popup is visible
    pub display: bool,
    /// the process the action applies to
    pub item: Option<ProcessRecord>,
    /// which button is focused
    pub choice: ActionChoice,
}

impl ActionComponent {
    pub fn show(&mut self, item: ProcessRecord) {
        self.display = true;
        self.item = Some(item);
        self.choice = ActionChoice::Stop;
    }

    pub fn hide(&mut self) {
        self.display = false;
        self.item = None;
    }

    pub fn focus_next(&mut self) {
        self.choice = CHOICES[(self.choice.index() + 1) % CHOICES.len()];
    }

    pub fn focus_prev(&mut self) {
        self.choice = CHOICES[(self.choice.index() + CHOICES.len() - 1) % CHOICES.len()];
    }

    /// Closes the popup; returns the record id and action unless Cancel was chosen.
    pub fn confirm(&mut self) -> Option<(String, ProcessAction)> {
        let result = self
            .choice
            .action()
            .zip(self.item.as_ref().map(|p| p.id.clone()))
            .map(|(action, id)| (id, action));
        self.hide();
        result
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, colors: &TableColors) {
        if !self.display {
            return;
        }

        let block = Block::bordered()
            .border_type(BorderType::Plain)
            .border_style(Style::new().fg(colors.footer_border_color))
            .bg(colors.buffer_bg)
            .title(" Process Action ");

        let area = popup_area(area, 50, 45);
        frame.render_widget(Clear, area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        let (prompt, desc) = match &self.item {
            Some(item) => (
                Paragraph::new(Line::from(format!(
                    "{} (PID {}) on {} port {}",
                    item.name, item.pid, item.protocol, item.port
                )))
                .style(Style::default().fg(risk_color(item.risk_level))),
                Paragraph::new(Line::from(format!(
                    "{} [{}]. Stopping it only changes its status in this dashboard.",
                    item.description,
                    item.risk_level.label()
                )))
                .style(Style::default().fg(colors.row_fg)),
            ),
            None => (Paragraph::new("No process selected"), Paragraph::new("")),
        };

        for (widget, chunk) in [(prompt, chunks[1]), (desc, chunks[2])] {
            frame.render_widget(
                widget
                    .bg(colors.buffer_bg)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                chunk.inner(Margin {
                    horizontal: 2,
                    vertical: 0,
                }),
            );
        }

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 5); 4])
            .flex(Flex::Center)
            .split(chunks[4]);

        for (choice, slot) in CHOICES.iter().zip(buttons.iter()) {
            let border = if *choice == self.choice {
                Style::new().fg(colors.selected_cell_style_fg)
            } else {
                Style::new().fg(colors.buffer_bg)
            };
            let button = Paragraph::new(choice.label())
                .alignment(Alignment::Center)
                .block(Block::bordered().border_style(border));
            frame.render_widget(button, *slot);
        }
    }
}
