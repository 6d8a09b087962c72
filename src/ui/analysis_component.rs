use crate::advisor::Analysis;
use crate::model::ProcessRecord;
use crate::ui::theme::{TableColors, risk_color};
use crate::util::popup_area;

use ratatui::{
    Frame,
    layout::{Margin, Rect},
    prelude::Style,
    style::{Modifier, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
};

/// Popup showing what the advisor thinks of one process.
#[derive(Debug, Default)]
pub struct AnalysisComponent {
    pub display: bool,
    /// record id, name and port being analyzed
    pub target: Option<(String, String, u16)>,
    /// `None` while the request is in flight
    pub result: Option<Analysis>,
}

impl AnalysisComponent {
    pub fn show_pending(&mut self, item: &ProcessRecord) {
        self.display = true;
        self.target = Some((item.id.clone(), item.name.clone(), item.port));
        self.result = None;
    }

    /// Ignores replies for a record that is no longer the target.
    pub fn resolve(&mut self, id: &str, analysis: Analysis) -> bool {
        match &self.target {
            Some((target, _, _)) if target == id => {
                self.result = Some(analysis);
                true
            }
            _ => false,
        }
    }

    pub fn hide(&mut self) {
        self.display = false;
        self.target = None;
        self.result = None;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, colors: &TableColors) {
        if !self.display {
            return;
        }
        let Some((_, name, port)) = &self.target else {
            return;
        };

        let block = Block::bordered()
            .border_type(BorderType::Plain)
            .border_style(Style::new().fg(colors.footer_border_color))
            .bg(colors.buffer_bg)
            .title(format!(" Slimer AI Analysis: {name} "));

        let text = match &self.result {
            None => Text::from(vec![
                Line::from(format!("Port {port}")),
                Line::from(""),
                Line::from("Analyzing ectoplasm...").italic(),
            ]),
            Some(analysis) => Text::from(vec![
                Line::from(format!("Port {port}")),
                Line::from(""),
                Line::from(vec![
                    Span::raw("Risk: "),
                    Span::styled(
                        analysis.risk.token(),
                        Style::default()
                            .fg(risk_color(analysis.risk))
                            .add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(""),
                Line::from(analysis.explanation.as_str()),
                Line::from(""),
                Line::from("[Esc / Enter] close").italic(),
            ]),
        };

        let area = popup_area(area, 60, 40);
        frame.render_widget(Clear, area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(text)
                .style(Style::default().fg(colors.row_fg).bg(colors.buffer_bg))
                .wrap(Wrap { trim: true }),
            area.inner(Margin {
                horizontal: 2,
                vertical: 1,
            }),
        );
    }
}
