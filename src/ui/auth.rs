use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AuthField, AuthMode};

/// Full-screen sign-in / registration form shown until a session exists.
pub fn render_auth(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = f.area();

    let background = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(background, area);

    let dialog_width = 48.min(area.width.saturating_sub(4));
    let dialog_height = 17.min(area.height.saturating_sub(2));
    let dialog_area = Rect {
        x: area.width.saturating_sub(dialog_width) / 2,
        y: area.height.saturating_sub(dialog_height) / 2,
        width: dialog_width,
        height: dialog_height,
    };

    f.render_widget(Clear, dialog_area);

    let form = &app.auth_form;
    let heading = match form.mode {
        AuthMode::Login => "Sign in to your notes",
        AuthMode::Register => "Create your account",
    };

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            heading,
            Style::default()
                .fg(theme.bright_blue)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field_line("Email", &form.email, false, form.field == AuthField::Email, app),
        Line::from(""),
        field_line(
            "Password",
            &form.password,
            true,
            form.field == AuthField::Password,
            app,
        ),
    ];

    if form.mode == AuthMode::Register {
        content.push(Line::from(""));
        content.push(field_line(
            "Confirm",
            &form.confirm,
            true,
            form.field == AuthField::Confirm,
            app,
        ));
    }

    content.push(Line::from(""));
    if let Some(error) = &form.error {
        content.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.red),
        )));
    } else if form.busy {
        content.push(Line::from(Span::styled(
            "Contacting server...",
            Style::default()
                .fg(theme.yellow)
                .add_modifier(Modifier::ITALIC),
        )));
    } else {
        content.push(Line::from(""));
    }

    content.push(Line::from(""));
    let submit_hint = match form.mode {
        AuthMode::Login => "Enter: Sign in  |  Ctrl+T: Create an account",
        AuthMode::Register => "Enter: Register  |  Ctrl+T: Sign in instead",
    };
    content.push(Line::from(Span::styled(
        submit_hint,
        Style::default()
            .fg(theme.white)
            .add_modifier(Modifier::ITALIC),
    )));
    content.push(Line::from(Span::styled(
        "Tab: Next field  |  Esc: Quit",
        Style::default()
            .fg(theme.white)
            .add_modifier(Modifier::ITALIC),
    )));

    let dialog = Paragraph::new(content)
        .block(
            Block::default()
                .title(" Markable ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.bright_blue))
                .style(Style::default().bg(theme.background)),
        )
        .alignment(Alignment::Center);

    f.render_widget(dialog, dialog_area);
}

fn field_line(label: &str, value: &str, masked: bool, active: bool, app: &App) -> Line<'static> {
    let theme = &app.theme;

    let shown = if masked {
        "●".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if active { "█" } else { " " };
    let label_style = if active {
        Style::default()
            .fg(theme.yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.white)
    };

    Line::from(vec![
        Span::styled(format!("{}: ", label), label_style),
        Span::styled(shown, Style::default().fg(theme.foreground)),
        Span::styled(cursor.to_string(), Style::default().fg(theme.yellow)),
    ])
}
