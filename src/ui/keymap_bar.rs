//! Keymap help bar UI component.

use crate::ui::ThemeColors;
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};

/// Draw the keymap help bar.
pub(super) fn draw_keymap(f: &mut Frame<'_>, area: Rect, has_plots: bool, colors: &ThemeColors) {
    let keymap_text = if has_plots {
        "q:quit | jk/↑↓:nav | r:render | +/-:zoom 100% | f:fit | x:close | T:theme"
    } else {
        "q:quit | T:theme | waiting for the backend to show a plot"
    };

    let paragraph =
        Paragraph::new(keymap_text).style(Style::default().fg(colors.text).bg(colors.bg));

    f.render_widget(paragraph, area);
}
