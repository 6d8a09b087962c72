use crate::model::ProcessRecord;
use crate::ui::theme::{TableColors, risk_color, status_color};
use crate::util::process_constraint_len_calculator;

use ratatui::{
    Frame,
    layout::{Constraint, Margin, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{
        Block, BorderType, Cell, HighlightSpacing, Paragraph, Row, Scrollbar,
        ScrollbarOrientation, ScrollbarState, Table, TableState,
    },
};

/// A component that handles rendering a scrollable table of scan results
#[derive(Debug)]
pub struct ProcessTableComponent {
    /// Filtered processes to display
    pub items: Vec<ProcessRecord>,
    /// Table selection state
    pub state: TableState,
    /// Scrollbar state
    pub scroll: ScrollbarState,
    /// Number of visible rows (set during render)
    pub visible_rows: usize,
    /// Name and "talks to" width hints
    pub column_widths: (u16, u16),
}

impl Default for ProcessTableComponent {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            state: TableState::default(),
            scroll: ScrollbarState::new(1),
            visible_rows: 0,
            column_widths: (22, 30),
        }
    }
}

impl ProcessTableComponent {
    /// Replace current items, keeping the selection on the same record when it is still shown
    pub fn set_items(&mut self, items: Vec<ProcessRecord>) {
        let selected_id = self.selected_item().map(|p| p.id.clone());
        self.items = items;
        self.column_widths = process_constraint_len_calculator(&self.items);
        let content_len = self.items.len() * crate::ITEM_HEIGHT as usize;
        self.scroll = self.scroll.content_length(content_len);

        let idx = selected_id
            .and_then(|id| self.items.iter().position(|p| p.id == id))
            .or(if self.items.is_empty() { None } else { Some(0) });
        self.select(idx);
    }

    pub fn selected_item(&self) -> Option<&ProcessRecord> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    fn select(&mut self, idx: Option<usize>) {
        self.state.select(idx);
        self.scroll = self
            .scroll
            .position(idx.unwrap_or(0) * crate::ITEM_HEIGHT as usize);
    }

    /// Move selection down by one row, wrapping
    pub fn next_row(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let idx = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.select(Some(idx));
    }

    /// Move selection up by one row, wrapping
    pub fn previous_row(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let idx = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.select(Some(idx));
    }

    pub fn first_row(&mut self) {
        if !self.items.is_empty() {
            self.select(Some(0));
        }
    }

    pub fn last_row(&mut self) {
        if let Some(last) = self.items.len().checked_sub(1) {
            self.select(Some(last));
        }
    }

    pub fn page_down(&mut self) {
        let Some(last) = self.items.len().checked_sub(1) else {
            return;
        };
        let current = self.state.selected().unwrap_or(0);
        self.select(Some((current + self.visible_rows.max(1)).min(last)));
    }

    pub fn page_up(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let current = self.state.selected().unwrap_or(0);
        self.select(Some(current.saturating_sub(self.visible_rows.max(1))));
    }

    /// Render the table and its scrollbar, or `placeholder` when there is nothing to show
    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        colors: &TableColors,
        placeholder: &str,
    ) {
        let block = Block::bordered()
            .border_type(BorderType::Plain)
            .border_style(Style::new().fg(colors.footer_border_color))
            .title(" Processes ");

        if self.items.is_empty() {
            let idle = Paragraph::new(placeholder)
                .centered()
                .style(Style::default().fg(colors.row_fg).bg(colors.buffer_bg))
                .block(block);
            frame.render_widget(idle, area);
            return;
        }

        // border plus header row
        self.visible_rows = area.height.saturating_sub(3) as usize;

        let header = Row::new(
            ["Name", "PID", "Port", "Proto", "Risk", "Status", "Talks To"].map(Cell::from),
        )
        .style(Style::default().fg(colors.header_fg).bg(colors.header_bg))
        .height(crate::ITEM_HEIGHT);

        let rows = self.items.iter().map(|item| {
            let risk_style = Style::default().fg(risk_color(item.risk_level));
            let cells = item.ref_array().into_iter().enumerate().map(|(i, text)| {
                let cell = Cell::from(text);
                match i {
                    0 | 4 => cell.style(risk_style.add_modifier(Modifier::BOLD)),
                    5 => cell.style(Style::default().fg(status_color(item.status))),
                    _ => cell.style(Style::default().fg(colors.row_fg)),
                }
            });
            Row::new(cells).height(crate::ITEM_HEIGHT)
        });

        let table = Table::new(
            rows,
            [
                Constraint::Min(self.column_widths.0),
                Constraint::Length(6),
                Constraint::Length(6),
                Constraint::Length(5),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Min(self.column_widths.1),
            ],
        )
        .header(header)
        .row_highlight_style(
            Style::default()
                .add_modifier(Modifier::REVERSED)
                .fg(colors.selected_row_style_fg),
        )
        .bg(colors.buffer_bg)
        .highlight_spacing(HighlightSpacing::Always)
        .block(block);

        frame.render_stateful_widget(table, area, &mut self.state);

        frame.render_stateful_widget(
            Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.scroll,
        );
    }
}
