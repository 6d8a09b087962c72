use crate::export::ExportFormat;
use crate::ui::theme::TableColors;
use crate::util::popup_area;

use ratatui::text::{Span, Text};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Margin, Rect},
    prelude::Style,
    style::Stylize,
    text::Line,
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ExportAction {
    #[default]
    Export,
    Cancel,
}

/// Popup that exports the current scan
#[derive(Debug, Default)]
pub struct SnapshotsComponent {
    /// Whether the popup is displayed
    pub display: bool,
    pub action: ExportAction,
    pub selected_format: ExportFormat,
}

impl SnapshotsComponent {
    pub fn toggle(&mut self) {
        self.display = !self.display;
        self.action = ExportAction::Export;
    }

    pub fn next_format(&mut self) {
        self.selected_format = self.selected_format.next();
    }

    pub fn prev_format(&mut self) {
        self.selected_format = self.selected_format.prev();
    }

    pub fn toggle_action(&mut self) {
        self.action = match self.action {
            ExportAction::Export => ExportAction::Cancel,
            ExportAction::Cancel => ExportAction::Export,
        };
    }

    /// Closes the popup; returns the format to export unless Cancel was focused.
    pub fn confirm(&mut self) -> Option<ExportFormat> {
        self.display = false;
        match self.action {
            ExportAction::Export => Some(self.selected_format),
            ExportAction::Cancel => None,
        }
    }

    fn render_radio(&self, label: &str, selected: bool, colors: &TableColors) -> Vec<Span<'_>> {
        let symbol = if selected { "[x]" } else { "[ ]" };

        let symbol_style = if selected {
            Style::default().fg(colors.footer_border_color)
        } else {
            Style::default()
        };

        vec![
            Span::styled(symbol, symbol_style),
            Span::raw(format!(" {}", label)),
        ]
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, colors: &TableColors, records: usize) {
        if !self.display {
            return;
        }

        let block = Block::bordered()
            .border_type(BorderType::Plain)
            .border_style(Style::new().fg(colors.footer_border_color))
            .bg(colors.buffer_bg)
            .title(" Export Scan ");

        let area = popup_area(area, 45, 55);
        frame.render_widget(Clear, area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(4),
                Constraint::Min(1),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        let explanation = Paragraph::new(Line::from(format!(
            "Writes the {records} processes of the current scan, with their risk and status, \
             to the snapshots folder."
        )))
        .style(Style::default().fg(colors.row_fg).bg(colors.buffer_bg))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

        frame.render_widget(
            explanation,
            chunks[1].inner(Margin {
                horizontal: 2,
                vertical: 0,
            }),
        );

        let lines: Vec<Line<'_>> = std::iter::once(Line::from("Export Format:"))
            .chain(
                [
                    ("JSON", ExportFormat::Json),
                    ("CSV", ExportFormat::Csv),
                    ("YAML", ExportFormat::Yaml),
                ]
                .into_iter()
                .map(|(label, format)| {
                    Line::from(self.render_radio(label, self.selected_format == format, colors))
                }),
            )
            .collect();

        frame.render_widget(
            Paragraph::new(Text::from(lines)).style(Style::default().bg(colors.buffer_bg)),
            chunks[3].inner(Margin {
                horizontal: 2,
                vertical: 0,
            }),
        );

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
            .flex(Flex::Center)
            .split(chunks[5]);

        for (label, action, slot) in [
            ("Export", ExportAction::Export, buttons[0]),
            ("Cancel", ExportAction::Cancel, buttons[1]),
        ] {
            let border = if self.action == action {
                Style::new().fg(colors.selected_cell_style_fg)
            } else {
                Style::new().fg(colors.buffer_bg)
            };
            frame.render_widget(
                Paragraph::new(label)
                    .alignment(Alignment::Center)
                    .block(Block::bordered().border_style(border)),
                slot,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_honours_focus_and_format() {
        let mut popup = SnapshotsComponent::default();
        popup.toggle();
        popup.next_format();
        assert_eq!(popup.confirm(), Some(ExportFormat::Csv));
        assert!(!popup.display);

        popup.toggle();
        popup.toggle_action();
        assert_eq!(popup.confirm(), None);
    }

    #[test]
    fn reopening_refocuses_export() {
        let mut popup = SnapshotsComponent::default();
        popup.toggle();
        popup.toggle_action();
        popup.toggle();
        popup.toggle();
        assert_eq!(popup.action, ExportAction::Export);
    }
}
