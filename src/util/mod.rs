mod layout;
mod width;

pub use layout::popup_area;
pub use layout::with_side_panel;
pub use width::{keybindings_constraint_len_calculator, process_constraint_len_calculator};
