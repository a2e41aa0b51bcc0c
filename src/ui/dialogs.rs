use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

pub fn render_delete_confirm_dialog(f: &mut Frame, app: &App) {
    let area = f.area();
    let theme = &app.theme;

    // Calculate centered dialog area
    let dialog_width = 50.min(area.width.saturating_sub(4));
    let dialog_height = 9.min(area.height.saturating_sub(4));

    let dialog_area = Rect {
        x: (area.width.saturating_sub(dialog_width)) / 2,
        y: (area.height.saturating_sub(dialog_height)) / 2,
        width: dialog_width,
        height: dialog_height,
    };

    // Clear the area behind the dialog
    f.render_widget(Clear, dialog_area);

    let note_name = app.delete_target.as_deref().unwrap_or("this note");

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Delete note?",
            Style::default().fg(theme.red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            note_name.to_string(),
            Style::default().fg(theme.foreground),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "y: Yes  |  n: No",
            Style::default().fg(theme.white).add_modifier(Modifier::ITALIC),
        )),
    ];

    let dialog = Paragraph::new(content)
        .block(
            Block::default()
                .title(" Confirm Delete ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.red))
                .style(Style::default().bg(theme.background)),
        )
        .alignment(Alignment::Center);

    f.render_widget(dialog, dialog_area);
}

pub fn render_help_dialog(f: &mut Frame, app: &App) {
    let area = f.area();
    let theme = &app.theme;

    // Calculate centered dialog area
    let dialog_width = 56.min(area.width.saturating_sub(4));
    let dialog_height = 29.min(area.height.saturating_sub(2));

    let dialog_area = Rect {
        x: (area.width.saturating_sub(dialog_width)) / 2,
        y: (area.height.saturating_sub(dialog_height)) / 2,
        width: dialog_width,
        height: dialog_height,
    };

    // Clear the area behind the dialog
    f.render_widget(Clear, dialog_area);

    let key_style = Style::default().fg(theme.yellow);
    let desc_style = Style::default().fg(theme.white);
    let header_style = Style::default()
        .fg(theme.bright_blue)
        .add_modifier(Modifier::BOLD);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("  Navigation", header_style)),
        Line::from(vec![
            Span::styled("  Tab      ", key_style),
            Span::styled("Switch focus (Notes/Write/Preview)", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  j/k      ", key_style),
            Span::styled("Select note / scroll focused pane", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  Enter    ", key_style),
            Span::styled("Open selected note", desc_style),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Notes", header_style)),
        Line::from(vec![
            Span::styled("  n        ", key_style),
            Span::styled("New note", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  i        ", key_style),
            Span::styled("Edit title / start writing", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  d        ", key_style),
            Span::styled("Delete selected note", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  r        ", key_style),
            Span::styled("Reload notes from server", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  Ctrl+s   ", key_style),
            Span::styled("Save note", desc_style),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Writing", header_style)),
        Line::from(vec![
            Span::styled("  Esc      ", key_style),
            Span::styled("Back to browsing", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  Tab      ", key_style),
            Span::styled("Insert a tab character", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  Ctrl+←/→ ", key_style),
            Span::styled("Jump by word", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  Ctrl+Home/End ", key_style),
            Span::styled("Jump to start/end", desc_style),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Account", header_style)),
        Line::from(vec![
            Span::styled("  Ctrl+l   ", key_style),
            Span::styled("Sign out", desc_style),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Other", header_style)),
        Line::from(vec![
            Span::styled("  ?        ", key_style),
            Span::styled("Show this help", desc_style),
        ]),
        Line::from(vec![
            Span::styled("  q        ", key_style),
            Span::styled("Quit", desc_style),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or ? to close",
            Style::default().fg(theme.white).add_modifier(Modifier::ITALIC),
        )),
    ];

    let dialog = Paragraph::new(content)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.bright_blue))
                .style(Style::default().bg(theme.background)),
        )
        .alignment(Alignment::Left);

    f.render_widget(dialog, dialog_area);
}
