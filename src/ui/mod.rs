mod auth;
mod dialogs;
mod editor;
mod preview;
mod sidebar;
mod status_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::{App, Dialog, Screen};

pub use auth::render_auth;
pub use dialogs::{render_delete_confirm_dialog, render_help_dialog};
pub use editor::render_editor;
pub use preview::render_preview;
pub use sidebar::render_sidebar;
pub use status_bar::render_status_bar;

pub fn render(f: &mut Frame, app: &mut App) {
    match app.screen {
        Screen::Auth => render_auth(f, app),
        Screen::Editor => render_workspace(f, app),
    }

    // Dialogs go on top
    match app.dialog {
        Dialog::Help => render_help_dialog(f, app),
        Dialog::ConfirmDelete => render_delete_confirm_dialog(f, app),
        Dialog::None => {}
    }
}

fn render_workspace(f: &mut Frame, app: &mut App) {
    // Create vertical layout: main area + status bar
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Main area
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    // Create main layout: notes sidebar, editor, live preview
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(22),
            Constraint::Percentage(39),
            Constraint::Percentage(39),
        ])
        .split(vertical_chunks[0]);

    render_sidebar(f, app, chunks[0]);
    render_editor(f, app, chunks[1]);
    render_preview(f, app, chunks[2]);
    render_status_bar(f, app, vertical_chunks[1]);
}
