use crate::state::{DashboardState, Filter};
use crate::ui::theme::{TableColors, risk_color};

use crate::model::RiskLevel;
use ratatui::widgets::{Block, BorderType};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    prelude::Style,
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Bottom status line plus the transient message from the last action.
#[derive(Debug, Default)]
pub struct FooterComponent {
    pub message: Option<String>,
}

impl FooterComponent {
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    fn status_line<'a>(&'a self, state: &DashboardState) -> Line<'a> {
        let mut spans = vec![if state.is_scanning {
            Span::styled(
                "Scanning ports and protocols...",
                Style::default().add_modifier(Modifier::BOLD),
            )
        } else if let Some(at) = state.last_scan_at {
            Span::raw(format!("Last Scan: {}", at.format("%H:%M:%S")))
        } else {
            Span::styled(
                "System idle",
                Style::default().add_modifier(Modifier::ITALIC),
            )
        }];

        spans.push(Span::raw(" | Filter: "));
        spans.push(Span::raw(state.filter.label()));
        if state.filter != Filter::All {
            spans.push(Span::raw(format!(" ({} shown)", state.visible().len())));
        }

        if let Some(message) = &self.message {
            spans.push(Span::raw(" | "));
            spans.push(Span::raw(message.as_str()));
        }
        spans.push(Span::raw(" | [?] help"));
        Line::from(spans)
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        colors: &TableColors,
        state: &DashboardState,
    ) {
        let footer = Paragraph::new(self.status_line(state))
            .alignment(Alignment::Center)
            .style(Style::default().fg(colors.row_fg).bg(colors.buffer_bg))
            .block(
                Block::bordered()
                    .border_type(BorderType::Plain)
                    .border_style(Style::new().fg(colors.footer_border_color)),
            );

        frame.render_widget(footer, area);
    }

    /// Red banner recommending termination of every critical process.
    pub fn render_banner(
        &self,
        frame: &mut Frame,
        area: Rect,
        colors: &TableColors,
        critical: usize,
    ) {
        let red = risk_color(RiskLevel::Critical);
        let banner = Paragraph::new(vec![
            Line::from(Span::styled(
                "CRITICAL THREATS DETECTED",
                Style::default().fg(red).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "Recommendation: Immediate termination of {critical} processes."
            )),
        ])
        .alignment(Alignment::Center)
        .style(Style::default().fg(colors.row_fg).bg(colors.buffer_bg))
        .block(
            Block::bordered()
                .border_type(BorderType::Thick)
                .border_style(Style::new().fg(red)),
        );
        frame.render_widget(banner, area);
    }
}
