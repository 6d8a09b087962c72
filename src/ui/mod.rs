pub mod action_component;
pub mod analysis_component;
pub mod chat_component;
pub mod footer_component;
pub mod keybindings_component;
pub mod process_table_component;
pub mod snapshots_component;
pub mod stats_component;
pub mod theme;
