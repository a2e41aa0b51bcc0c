use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, Focus, Mode};
use crate::editor_state::Phase;

pub fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let phase = app.state.phase();

    // The "new note" shortcut row only appears while an existing note is open
    let show_new_note = matches!(phase, Phase::Viewing | Phase::Dirty);
    let constraints = if show_new_note {
        vec![
            Constraint::Length(3), // Title input
            Constraint::Length(3), // Save button
            Constraint::Length(3), // New note button
            Constraint::Min(0),    // Note list
        ]
    } else {
        vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_title_input(f, app, chunks[0]);
    render_save_button(f, app, phase, chunks[1]);

    let list_area = if show_new_note {
        render_new_note_button(f, app, chunks[2]);
        chunks[3]
    } else {
        chunks[2]
    };

    render_note_list(f, app, list_area);
}

fn render_title_input(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let editing = app.mode == Mode::EditTitle;

    let border_color = if editing {
        theme.yellow
    } else if app.focus == Focus::Sidebar && app.mode == Mode::Browse {
        theme.bright_blue
    } else {
        theme.bright_black
    };

    let cursor = if editing { "█" } else { "" };
    let input = Paragraph::new(Line::from(vec![
        Span::styled(
            app.state.active_title().to_string(),
            Style::default().fg(theme.foreground),
        ),
        Span::styled(cursor, Style::default().fg(theme.yellow)),
    ]))
    .block(
        Block::default()
            .title(" Title ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );

    f.render_widget(input, area);
}

fn render_save_button(f: &mut Frame, app: &App, phase: Phase, area: Rect) {
    let theme = &app.theme;

    let label = match phase {
        Phase::Viewing | Phase::Dirty => "Edit Note",
        Phase::Empty | Phase::NewUnsaved => "Save Note",
    };

    let style = match phase {
        // Loaded and unchanged: nothing to save.
        Phase::Viewing => Style::default().fg(theme.bright_black),
        Phase::Dirty => Style::default()
            .fg(theme.black)
            .bg(theme.yellow)
            .add_modifier(Modifier::BOLD),
        Phase::Empty | Phase::NewUnsaved => Style::default()
            .fg(theme.black)
            .bg(theme.green)
            .add_modifier(Modifier::BOLD),
    };

    let button = Paragraph::new(Line::from(Span::styled(
        format!(" {} (Ctrl+S) ", label),
        style,
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.bright_black)),
    );

    f.render_widget(button, area);
}

fn render_new_note_button(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let button = Paragraph::new(Line::from(Span::styled(
        " + New Note (n) ",
        Style::default()
            .fg(theme.magenta)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.bright_black)),
    );

    f.render_widget(button, area);
}

fn render_note_list(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let items: Vec<ListItem> = app
        .state
        .notes()
        .iter()
        .enumerate()
        .map(|(idx, note)| {
            let style = if idx == app.selected_note {
                Style::default()
                    .fg(theme.yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.foreground)
            };
            ListItem::new(Line::from(Span::styled(note.title.clone(), style)))
        })
        .collect();

    let border_style = if app.focus == Focus::Sidebar && app.mode == Mode::Browse {
        Style::default().fg(theme.bright_blue)
    } else {
        Style::default().fg(theme.bright_black)
    };

    let title = if app.loading_notes {
        " Notes (syncing) ".to_string()
    } else {
        format!(" Notes ({}) ", app.state.notes().len())
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(
            Style::default()
                .bg(theme.bright_black)
                .add_modifier(Modifier::BOLD),
        );

    let mut list_state = ListState::default();
    list_state.select(Some(app.selected_note));

    f.render_stateful_widget(list, area, &mut list_state);
}
