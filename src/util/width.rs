use crate::model::ProcessRecord;
use crate::ui::keybindings_component::Keybinding;
use unicode_width::UnicodeWidthStr;

fn widest<'a>(items: impl Iterator<Item = &'a str>) -> u16 {
    #[allow(clippy::cast_possible_truncation)]
    let w = items.map(UnicodeWidthStr::width).max().unwrap_or(0) as u16;
    w
}

pub fn keybindings_constraint_len_calculator(items: &[Keybinding]) -> (u16, u16) {
    let combo = widest(items.iter().map(Keybinding::combo));
    let description = widest(items.iter().map(Keybinding::description).flat_map(str::lines));
    (combo, description)
}

/// Name and "talks to" column widths, never narrower than their headers.
pub fn process_constraint_len_calculator(items: &[ProcessRecord]) -> (u16, u16) {
    let name = widest(items.iter().map(|p| p.name.as_str())).max("Name".len() as u16);
    let apps: Vec<String> = items.iter().map(|p| p.connected_apps.join(", ")).collect();
    let talks_to = widest(apps.iter().map(String::as_str)).max("Talks To".len() as u16);
    (name, talks_to)
}
