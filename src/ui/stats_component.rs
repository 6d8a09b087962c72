use crate::model::RiskLevel;
use crate::state::DashboardState;
use crate::ui::theme::{TableColors, risk_color};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Paragraph},
};

const CHART_RISKS: [RiskLevel; 3] = [RiskLevel::Safe, RiskLevel::Sus, RiskLevel::Critical];

/// Threat distribution chart next to one counter per risk level.
pub fn render(frame: &mut Frame, area: Rect, colors: &TableColors, state: &DashboardState) {
    let [chart_area, counters_area] =
        Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)]).areas(area);

    let bars: Vec<Bar<'_>> = state
        .chart_data()
        .into_iter()
        .zip(CHART_RISKS)
        .map(|((label, value), risk)| {
            Bar::default()
                .value(value)
                .label(Line::from(label))
                .style(Style::default().fg(risk_color(risk)))
                .value_style(Style::default().fg(colors.buffer_bg).bg(risk_color(risk)))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::bordered()
                .border_type(BorderType::Plain)
                .border_style(Style::new().fg(colors.footer_border_color))
                .title(" Threat Distribution "),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(2)
        .style(Style::default().bg(colors.buffer_bg));
    frame.render_widget(chart, chart_area);

    let stats = state.stats();
    let counters = [
        (stats.safe, "Safe Processes", RiskLevel::Safe),
        (stats.sus, "Suspicious", RiskLevel::Sus),
        (stats.critical, "Critical Threats", RiskLevel::Critical),
    ];
    let slots = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(counters_area);

    for ((count, label, risk), slot) in counters.into_iter().zip(slots.iter()) {
        let color = risk_color(risk);
        let widget = Paragraph::new(vec![
            Line::from(""),
            Line::styled(
                count.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Line::styled(label.to_uppercase(), Style::default().fg(color)),
        ])
        .alignment(Alignment::Center)
        .style(Style::default().bg(colors.buffer_bg))
        .block(
            Block::bordered()
                .border_type(BorderType::Plain)
                .border_style(Style::new().fg(color)),
        );
        frame.render_widget(widget, *slot);
    }
}
