use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, Focus, Mode};

pub fn render_editor(f: &mut Frame, app: &mut App, area: Rect) {
    let border_style = if app.mode == Mode::Edit {
        Style::default().fg(app.theme.green)
    } else if app.focus == Focus::Editor && app.mode == Mode::Browse {
        Style::default().fg(app.theme.bright_blue)
    } else {
        Style::default().fg(app.theme.bright_black)
    };

    let title = if app.mode == Mode::Edit {
        " Write (editing) "
    } else {
        " Write "
    };

    let cursor_style = if app.mode == Mode::Edit {
        Style::default().fg(app.theme.cursor_text).bg(app.theme.cursor)
    } else {
        Style::default()
    };

    app.editor.set_block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    app.editor.set_text_style(Style::default().fg(app.theme.foreground));
    app.editor.set_cursor_style(cursor_style);

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    app.editor.set_view_size(inner_width, inner_height);

    f.render_widget(&app.editor, area);
}
