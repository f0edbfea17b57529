//! Plots view rendering.

use super::formatters::{format_intrinsic, format_number, format_size};
use super::keymap_bar::draw_keymap;
use super::status_bar::draw_status;
use super::ThemeColors;
use crate::app::App;
use crate::plot::{PlotClient, RenderState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Draw the plots view.
pub(super) fn draw_plots(f: &mut Frame<'_>, app: &App) {
    let colors = ThemeColors::from_theme(&app.theme);

    // Main layout with status bar and key map bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)])
        .split(f.area());

    if app.registry.is_empty() {
        draw_welcome(f, chunks[0], &colors);
    } else {
        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[0]);

        draw_list(f, app, content[0], &colors);
        draw_details(f, app, content[1], &colors);
    }

    draw_status(
        f,
        chunks[1],
        &app.status,
        app.error_message.as_deref(),
        &colors,
    );
    draw_keymap(f, chunks[2], !app.registry.is_empty(), &colors);
}

fn state_color(state: RenderState, colors: &ThemeColors) -> Color {
    match state {
        RenderState::Rendering => colors.warning,
        RenderState::Rendered => colors.value,
        RenderState::Unrendered | RenderState::Closed => colors.text,
    }
}

fn draw_list(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let items: Vec<ListItem<'_>> = app
        .registry
        .clients()
        .iter()
        .enumerate()
        .map(|(idx, client)| {
            let state = client.render_state();
            let style = if idx == app.selected {
                colors.cursor_style()
            } else {
                Style::default().fg(state_color(state, colors))
            };

            let text = format!("{} [{}]", client.id(), client.zoom_level());
            ListItem::new(Line::from(text)).style(style)
        })
        .collect();

    let title = format!(" Plots: {} ", app.registry.config().session_id);

    let list = List::new(items).block(colors.panel(title));
    f.render_widget(list, area);
}

fn draw_details(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let lines = match app.selected_client() {
        Some(client) => format_client_details(client, colors),
        None => vec![Line::from(Span::styled(
            "Select a plot to view details",
            Style::default().fg(colors.text),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(colors.panel(" Details ".to_string()))
        .style(Style::default().fg(colors.text))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

fn draw_welcome(f: &mut Frame<'_>, area: Rect, colors: &ThemeColors) {
    let lines = vec![
        Line::from(Span::styled("No plots yet", colors.heading_style())),
        Line::from(""),
        Line::from("Plots appear here when the backend shows them."),
        Line::from(""),
        Line::from("Keyboard shortcuts:"),
        Line::from("  j/k or ↓/↑  - Select plot"),
        Line::from("  r           - Render"),
        Line::from("  + / -       - Zoom to 100%"),
        Line::from("  f           - Fit"),
        Line::from("  x           - Close plot"),
        Line::from("  T           - Cycle theme"),
        Line::from("  q           - Quit"),
    ];

    let paragraph = Paragraph::new(lines)
        .block(colors.panel(" plotclient ".to_string()))
        .style(Style::default().fg(colors.text));

    f.render_widget(paragraph, area);
}

fn field(label: &str, value: String, colors: &ThemeColors) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(colors.label)),
        Span::styled(value, Style::default().fg(colors.value)),
    ])
}

fn format_client_details(client: &PlotClient, colors: &ThemeColors) -> Vec<Line<'static>> {
    let metadata = client.metadata();
    let mut lines = vec![
        Line::from(Span::styled(metadata.id.clone(), colors.heading_style())),
        Line::from(""),
        field("Session", metadata.session_id.clone(), colors),
        field("Location", client.location().name().to_string(), colors),
        field(
            "Created",
            metadata.created.format("%Y-%m-%d %H:%M:%S").to_string(),
            colors,
        ),
    ];

    if let Some(parent) = &metadata.parent_id {
        lines.push(field("Parent", parent.clone(), colors));
    }
    if let Some(language) = &metadata.language {
        lines.push(field("Language", language.clone(), colors));
    }
    if !metadata.code.is_empty() {
        lines.push(field("Code", metadata.code.clone(), colors));
    }

    lines.push(field("Zoom", client.zoom_level().to_string(), colors));
    lines.push(field("State", client.render_state().name().to_string(), colors));

    if let Some(plot) = client.last_render_result() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Last render:", colors.heading_style())));
        lines.push(field(
            "  Type",
            format!("{} ({})", plot.mime_type, plot.format().extension()),
            colors,
        ));
        lines.push(field(
            "  Payload",
            format!("{} bytes", format_number(plot.payload_len())),
            colors,
        ));
        if let Some(size) = &plot.request.size {
            lines.push(field("  Size", format_size(size), colors));
        }
        if let Some(size) = &plot.intrinsic_size {
            lines.push(field("  Intrinsic", format_intrinsic(size), colors));
        }
    }

    lines
}
