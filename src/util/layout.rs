use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Centered rectangle taking `percent_x` by `percent_y` of `area`.
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Splits off a right-hand panel of `percent` width when `show` is set.
pub fn with_side_panel(area: Rect, show: bool, percent: u16) -> (Rect, Option<Rect>) {
    if !show {
        return (area, None);
    }
    let [main, side] = Layout::horizontal([
        Constraint::Percentage(100 - percent.min(100)),
        Constraint::Percentage(percent.min(100)),
    ])
    .areas(area);
    (main, Some(side))
}
