use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AuthMode, Dialog, Focus, Mode, Screen};
use crate::auth::AuthError;
use crate::editor::CursorMove;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Dialogs swallow input first
    match app.dialog {
        Dialog::Help => {
            handle_help_dialog(app, key);
            return;
        }
        Dialog::ConfirmDelete => {
            handle_delete_confirm_dialog(app, key);
            return;
        }
        Dialog::None => {}
    }

    match app.screen {
        Screen::Auth => handle_auth_key(app, key),
        Screen::Editor => handle_editor_screen_key(app, key),
    }
}

fn handle_help_dialog(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => {
            app.dialog = Dialog::None;
        }
        _ => {}
    }
}

fn handle_delete_confirm_dialog(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.dialog = Dialog::None;
            app.start_delete();
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.dialog = Dialog::None;
            app.delete_target = None;
        }
        _ => {}
    }
}

fn handle_auth_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.auth_form.toggle_mode();
        }
        KeyCode::Tab | KeyCode::Down => app.auth_form.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.auth_form.prev_field(),
        KeyCode::Enter => submit_auth_form(app),
        KeyCode::Backspace => {
            app.auth_form.field_mut().pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.auth_form.error = None;
            app.auth_form.field_mut().push(c);
        }
        _ => {}
    }
}

fn submit_auth_form(app: &mut App) {
    if app.auth_form.busy {
        return;
    }
    match app.auth_form.mode {
        AuthMode::Login => app.start_login(),
        AuthMode::Register => {
            // Mismatched passwords never leave the client
            if app.auth_form.password != app.auth_form.confirm {
                app.auth_form.error = Some(AuthError::PasswordMismatch.to_string());
            } else {
                app.start_register();
            }
        }
    }
}

fn handle_editor_screen_key(app: &mut App, key: KeyEvent) {
    // Shortcuts that work in every mode
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') => {
                app.start_save();
                return;
            }
            KeyCode::Char('l') => {
                app.logout();
                return;
            }
            KeyCode::Char('c') => {
                app.should_quit = true;
                return;
            }
            _ => {}
        }
    }

    match app.mode {
        Mode::Browse => handle_browse_key(app, key),
        Mode::Edit => handle_edit_key(app, key),
        Mode::EditTitle => handle_title_key(app, key),
    }
}

fn handle_browse_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.dialog = Dialog::Help,
        KeyCode::Tab => app.cycle_focus(false),
        KeyCode::BackTab => app.cycle_focus(true),
        KeyCode::Char('n') => app.reset_to_new_note(),
        KeyCode::Char('r') => app.start_list_notes(),
        KeyCode::Char('i') => match app.focus {
            Focus::Sidebar => app.mode = Mode::EditTitle,
            Focus::Editor => app.mode = Mode::Edit,
            Focus::Preview => {}
        },
        KeyCode::Char('d') => {
            if app.focus == Focus::Sidebar {
                app.request_delete_selected();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => match app.focus {
            Focus::Sidebar => app.next_note(),
            Focus::Editor => app.scroll_editor(1),
            Focus::Preview => app.scroll_preview(1),
        },
        KeyCode::Up | KeyCode::Char('k') => match app.focus {
            Focus::Sidebar => app.previous_note(),
            Focus::Editor => app.scroll_editor(-1),
            Focus::Preview => app.scroll_preview(-1),
        },
        KeyCode::PageDown => match app.focus {
            Focus::Editor => app.scroll_editor(app.editor.metrics().view_height as isize),
            Focus::Preview => app.scroll_preview(app.preview_view_height as isize),
            Focus::Sidebar => {}
        },
        KeyCode::PageUp => match app.focus {
            Focus::Editor => app.scroll_editor(-(app.editor.metrics().view_height as isize)),
            Focus::Preview => app.scroll_preview(-(app.preview_view_height as isize)),
            Focus::Sidebar => {}
        },
        KeyCode::Enter => match app.focus {
            Focus::Sidebar => app.open_selected(),
            Focus::Editor => app.mode = Mode::Edit,
            Focus::Preview => {}
        },
        _ => {}
    }
}

fn handle_edit_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.mode = Mode::Browse,
        KeyCode::Left if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.move_cursor(CursorMove::WordBack);
        }
        KeyCode::Right if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.move_cursor(CursorMove::WordForward);
        }
        KeyCode::Home if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.move_cursor(CursorMove::Top);
        }
        KeyCode::End if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.move_cursor(CursorMove::Bottom);
        }
        KeyCode::Left => app.move_cursor(CursorMove::Back),
        KeyCode::Right => app.move_cursor(CursorMove::Forward),
        KeyCode::Up => app.move_cursor(CursorMove::Up),
        KeyCode::Down => app.move_cursor(CursorMove::Down),
        KeyCode::Home => app.move_cursor(CursorMove::Head),
        KeyCode::End => app.move_cursor(CursorMove::End),
        KeyCode::PageUp => app.move_cursor(CursorMove::PageUp),
        KeyCode::PageDown => app.move_cursor(CursorMove::PageDown),
        KeyCode::Enter => app.editor_edit(|editor| editor.insert_newline()),
        KeyCode::Backspace => app.editor_edit(|editor| editor.backspace()),
        KeyCode::Delete => app.editor_edit(|editor| editor.delete_forward()),
        KeyCode::Tab => app.editor_edit(|editor| editor.insert_tab()),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.editor_edit(|editor| editor.insert_char(c));
        }
        _ => {}
    }
}

fn handle_title_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.mode = Mode::Browse,
        KeyCode::Enter | KeyCode::Tab => {
            app.mode = Mode::Edit;
            app.focus = Focus::Editor;
        }
        KeyCode::Backspace => {
            let mut title = app.state.active_title().to_string();
            title.pop();
            app.state.set_title(title);
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut title = app.state.active_title().to_string();
            title.push(c);
            app.state.set_title(title);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::app::AuthField;
    use crate::auth::{AuthProvider, Identity};
    use crate::config::Config;
    use crate::store::memory::MemoryNoteStore;

    struct StubAuth;

    impl AuthProvider for StubAuth {
        fn register(&self, email: &str, _password: &str) -> Result<Identity, AuthError> {
            Ok(Identity::new("Stub-User", email, "stub-token".to_string()))
        }

        fn login(&self, email: &str, _password: &str) -> Result<Identity, AuthError> {
            Ok(Identity::new("Stub-User", email, "stub-token".to_string()))
        }

        fn logout(&self, _identity: &Identity) -> Result<(), AuthError> {
            Ok(())
        }
    }

    fn test_app(dir: &tempfile::TempDir) -> (App, Arc<MemoryNoteStore>) {
        let config = Config {
            session_file: dir
                .path()
                .join("session.toml")
                .to_string_lossy()
                .to_string(),
            ..Config::default()
        };
        let store = Arc::new(MemoryNoteStore::new());
        let app = App::with_collaborators(config, store.clone(), Arc::new(StubAuth));
        (app, store)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_fills_the_active_auth_field() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _store) = test_app(&dir);

        type_text(&mut app, "ada@example.com");
        handle_key(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "hunter2");

        assert_eq!(app.auth_form.email, "ada@example.com");
        assert_eq!(app.auth_form.password, "hunter2");
        assert_eq!(app.auth_form.field, AuthField::Password);
    }

    #[test]
    fn test_password_mismatch_is_caught_before_submit() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _store) = test_app(&dir);

        handle_key(&mut app, ctrl('t'));
        type_text(&mut app, "ada@example.com");
        handle_key(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "hunter2");
        handle_key(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "hunter3");
        handle_key(&mut app, key(KeyCode::Enter));

        assert_eq!(
            app.auth_form.error.as_deref(),
            Some("Passwords do not match.")
        );
        assert!(!app.auth_form.busy);
    }

    #[test]
    fn test_tab_inserts_a_literal_tab_while_editing() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _store) = test_app(&dir);
        app.screen = Screen::Editor;
        app.mode = Mode::Edit;

        handle_key(&mut app, key(KeyCode::Char('a')));
        handle_key(&mut app, key(KeyCode::Tab));
        handle_key(&mut app, key(KeyCode::Char('b')));

        assert_eq!(app.state.buffer(), "a\tb");
    }

    #[test]
    fn test_delete_asks_for_confirmation_first() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _store) = test_app(&dir);
        app.screen = Screen::Editor;
        app.state.replace_notes(vec![crate::store::Note {
            id: "note-1".to_string(),
            title: "Keep me".to_string(),
            content: String::new(),
        }]);

        handle_key(&mut app, key(KeyCode::Char('d')));
        assert_eq!(app.dialog, Dialog::ConfirmDelete);
        assert_eq!(app.delete_target.as_deref(), Some("Keep me"));

        handle_key(&mut app, key(KeyCode::Char('n')));
        assert_eq!(app.dialog, Dialog::None);
        assert!(app.delete_target.is_none());
        assert_eq!(app.state.notes().len(), 1);
    }

    #[test]
    fn test_escape_leaves_edit_mode() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _store) = test_app(&dir);
        app.screen = Screen::Editor;
        app.mode = Mode::Edit;

        handle_key(&mut app, key(KeyCode::Esc));

        assert_eq!(app.mode, Mode::Browse);
    }

    #[test]
    fn test_title_keys_edit_the_draft_title() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _store) = test_app(&dir);
        app.screen = Screen::Editor;
        app.mode = Mode::EditTitle;

        type_text(&mut app, "Plans");
        handle_key(&mut app, key(KeyCode::Backspace));

        assert_eq!(app.state.active_title(), "Plan");

        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.focus, Focus::Editor);
    }

    #[test]
    fn test_help_dialog_swallows_keys_until_closed() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _store) = test_app(&dir);
        app.screen = Screen::Editor;

        handle_key(&mut app, key(KeyCode::Char('?')));
        assert_eq!(app.dialog, Dialog::Help);

        // 'n' would normally start a new note
        handle_key(&mut app, key(KeyCode::Char('n')));
        assert_eq!(app.dialog, Dialog::Help);
        assert!(app.state.notes().is_empty());

        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.dialog, Dialog::None);
    }

    #[test]
    fn test_focus_cycles_through_all_panes() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _store) = test_app(&dir);
        app.screen = Screen::Editor;

        assert_eq!(app.focus, Focus::Sidebar);
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Editor);
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Preview);
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Sidebar);
        handle_key(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.focus, Focus::Preview);
    }
}
