use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus, Mode};

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let mode_indicator = match app.mode {
        Mode::Browse => match app.focus {
            Focus::Sidebar => "NOTES",
            Focus::Editor => "WRITE",
            Focus::Preview => "PREVIEW",
        },
        Mode::Edit => "EDITING",
        Mode::EditTitle => "TITLE",
    };

    let logo = Span::styled(
        " ◆ Markable ",
        Style::default()
            .fg(theme.black)
            .bg(theme.bright_blue)
            .add_modifier(Modifier::BOLD),
    );

    let mode = Span::styled(
        format!(" {} ", mode_indicator),
        Style::default().fg(theme.black).bg(theme.yellow),
    );

    // Transient messages win over the note title
    let message = if let Some(status) = &app.status {
        status.clone()
    } else if app.state.active_title().is_empty() {
        "New note".to_string()
    } else {
        app.state.active_title().to_string()
    };
    let message = Span::styled(
        format!(" {} ", message),
        Style::default().fg(theme.foreground),
    );

    let unsaved = if app.state.has_unsaved_changes() {
        Span::styled("● ", Style::default().fg(theme.yellow))
    } else {
        Span::raw("")
    };

    let words = Span::styled(
        format!("{} words", app.word_count()),
        Style::default().fg(theme.green),
    );

    let separator = Span::styled(" │ ", Style::default().fg(theme.white));

    let email = app
        .session
        .current()
        .map(|identity| identity.email.clone())
        .unwrap_or_default();
    let user = Span::styled(email, Style::default().fg(theme.cyan));

    let help_key = Span::styled(
        " ? for help ",
        Style::default().fg(theme.white).bg(theme.bright_black),
    );

    let left_content = vec![logo, Span::raw(" "), mode, message];
    let right_content = vec![unsaved, words, separator, user, Span::raw(" "), help_key];

    let left_width: usize = left_content.iter().map(|s| s.content.width()).sum();
    let right_width: usize = right_content.iter().map(|s| s.content.width()).sum();
    let padding = (area.width as usize).saturating_sub(left_width + right_width);

    let mut spans = left_content;
    spans.push(Span::styled(
        " ".repeat(padding),
        Style::default().bg(theme.bright_black),
    ));
    spans.extend(right_content);

    let status_bar =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bright_black));

    f.render_widget(status_bar, area);
}
