//! User interface rendering.

mod formatters;
mod keymap_bar;
mod plots;
mod status_bar;
mod theme;

use crate::app::App;
use ratatui::Frame;

pub use formatters::{format_bytes, format_intrinsic, format_number, format_size};
pub use theme::ThemeColors;

/// Draw the UI.
pub fn draw(f: &mut Frame<'_>, app: &App) {
    plots::draw_plots(f, app);
}
