//! Status bar UI component.

use crate::ui::ThemeColors;
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};

/// Draw the status bar. An error message takes precedence over the status.
pub(super) fn draw_status(
    f: &mut Frame<'_>,
    area: Rect,
    status: &str,
    error: Option<&str>,
    colors: &ThemeColors,
) {
    let (text, fg) = match error {
        Some(error) => (format!("Error: {error}"), colors.error),
        None => (status.to_string(), colors.status_fg),
    };

    let paragraph = Paragraph::new(text).style(Style::default().fg(fg).bg(colors.status_bg));

    f.render_widget(paragraph, area);
}
