use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use ratatui::text::Line;

use crate::auth::{self, AuthError, AuthProvider, HttpAuthProvider, Identity, SessionWatch};
use crate::config::Config;
use crate::editor::{CursorMove, Editor};
use crate::editor_state::{DeleteRequest, EditorState, SaveRequest};
use crate::highlight::Highlighter;
use crate::preview;
use crate::scroll::{self, PaneMetrics};
use crate::store::{ApiNoteStore, DatasetNoteStore, Note, NoteStore, StoreError};
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Auth,
    Editor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Browse,
    Edit,
    EditTitle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Sidebar,
    Editor,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dialog {
    None,
    Help,
    ConfirmDelete,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthField {
    Email,
    Password,
    Confirm,
}

/// Input state of the sign-in screen.
pub struct AuthForm {
    pub mode: AuthMode,
    pub field: AuthField,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub error: Option<String>,
    pub busy: bool,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            field: AuthField::Email,
            email: String::new(),
            password: String::new(),
            confirm: String::new(),
            error: None,
            busy: false,
        }
    }
}

impl AuthForm {
    pub fn field_mut(&mut self) -> &mut String {
        match self.field {
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
            AuthField::Confirm => &mut self.confirm,
        }
    }

    pub fn next_field(&mut self) {
        self.field = match (self.field, self.mode) {
            (AuthField::Email, _) => AuthField::Password,
            (AuthField::Password, AuthMode::Register) => AuthField::Confirm,
            (AuthField::Password, AuthMode::Login) => AuthField::Email,
            (AuthField::Confirm, _) => AuthField::Email,
        };
    }

    pub fn prev_field(&mut self) {
        self.field = match (self.field, self.mode) {
            (AuthField::Email, AuthMode::Register) => AuthField::Confirm,
            (AuthField::Email, AuthMode::Login) => AuthField::Password,
            (AuthField::Password, _) => AuthField::Email,
            (AuthField::Confirm, _) => AuthField::Password,
        };
    }

    /// Switch between sign-in and registration. Clears the error line so a
    /// stale message from the other form never lingers.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.error = None;
        self.confirm.clear();
        if self.field == AuthField::Confirm {
            self.field = AuthField::Password;
        }
    }
}

/// Completion of one background operation. Workers send exactly one of
/// these per spawn; the event loop applies them in arrival order, so the
/// last completed write wins.
pub enum AppEvent {
    Session(Option<Identity>),
    LoggedIn(Result<Identity, AuthError>),
    Registered(Result<Identity, AuthError>),
    Provisioned(Result<(), StoreError>),
    NotesListed(Result<Vec<Note>, StoreError>),
    ContentFetched {
        title: String,
        result: Result<String, StoreError>,
    },
    Saved {
        request: SaveRequest,
        result: Result<String, StoreError>,
    },
    Deleted {
        request: DeleteRequest,
        result: Result<(), StoreError>,
    },
    HighlighterReady(Highlighter),
}

pub struct App {
    pub config: Config,
    pub theme: Theme,

    pub screen: Screen,
    pub mode: Mode,
    pub focus: Focus,
    pub dialog: Dialog,
    pub should_quit: bool,

    pub auth_form: AuthForm,
    pub session: SessionWatch,

    pub state: EditorState,
    pub editor: Editor,
    pub selected_note: usize,
    pub delete_target: Option<String>,

    pub preview_lines: Vec<Line<'static>>,
    pub preview_scroll: usize,
    pub preview_view_height: usize,

    pub status: Option<String>,
    pub loading_notes: bool,

    pub highlighter: Option<Highlighter>,
    pub highlighter_loading: bool,

    pub store: Arc<dyn NoteStore>,
    pub auth_provider: Arc<dyn AuthProvider>,

    pub events_sender: Sender<AppEvent>,
    pub events_receiver: Receiver<AppEvent>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let store: Arc<dyn NoteStore> = if config.backend == "dataset" {
            Arc::new(DatasetNoteStore::new(config.dataset.clone()))
        } else {
            Arc::new(ApiNoteStore::new(config.api_url.clone()))
        };
        let auth_provider: Arc<dyn AuthProvider> =
            Arc::new(HttpAuthProvider::new(config.api_url.clone()));
        Self::with_collaborators(config, store, auth_provider)
    }

    /// Build the app against explicit collaborators. Screen choice hangs
    /// off the session watch: the subscription registered here is the only
    /// thing that moves the app between the auth and editor screens.
    pub fn with_collaborators(
        config: Config,
        store: Arc<dyn NoteStore>,
        auth_provider: Arc<dyn AuthProvider>,
    ) -> Self {
        let theme = Theme::from_name(&config.theme);
        let (events_sender, events_receiver) = mpsc::channel();

        let mut editor = Editor::default();
        editor.set_tab_width(config.editor.tab_width);

        // Restore any saved session before subscribing, so the immediate
        // notification below carries the signed-in identity and the first
        // poll lands on the right screen.
        let mut session = SessionWatch::new();
        if let Some(identity) = auth::load_session(&config.session_path()) {
            session.set(Some(identity));
        }
        let sender = events_sender.clone();
        session.subscribe(Box::new(move |identity| {
            let _ = sender.send(AppEvent::Session(identity.cloned()));
        }));

        let mut app = Self {
            config,
            theme,
            screen: Screen::Auth,
            mode: Mode::Browse,
            focus: Focus::Sidebar,
            dialog: Dialog::None,
            should_quit: false,
            auth_form: AuthForm::default(),
            session,
            state: EditorState::new(),
            editor,
            selected_note: 0,
            delete_target: None,
            preview_lines: Vec::new(),
            preview_scroll: 0,
            preview_view_height: 0,
            status: None,
            loading_notes: false,
            highlighter: None,
            highlighter_loading: false,
            store,
            auth_provider,
            events_sender,
            events_receiver,
        };

        app.update_preview();
        app
    }

    pub fn identity(&self) -> Option<Identity> {
        self.session.current().cloned()
    }

    // ==================== Completion channel ====================

    /// Drain and apply every completion that has arrived since the last
    /// frame.
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.events_receiver.try_recv() {
            self.apply(event);
        }
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Session(identity) => match identity {
                Some(_) => {
                    self.screen = Screen::Editor;
                    self.start_list_notes();
                }
                None => self.reset_to_auth_screen(),
            },
            AppEvent::LoggedIn(result) => {
                self.auth_form.busy = false;
                match result {
                    Ok(identity) => {
                        let _ = auth::save_session(&self.config.session_path(), &identity);
                        self.auth_form = AuthForm::default();
                        self.session.set(Some(identity));
                    }
                    Err(e) => self.auth_form.error = Some(e.to_string()),
                }
            }
            AppEvent::Registered(result) => {
                self.auth_form.busy = false;
                match result {
                    Ok(identity) => {
                        let _ = auth::save_session(&self.config.session_path(), &identity);
                        self.auth_form = AuthForm::default();
                        self.start_provision(identity.clone());
                        self.session.set(Some(identity));
                    }
                    Err(e) => self.auth_form.error = Some(e.to_string()),
                }
            }
            AppEvent::Provisioned(result) => {
                if let Err(e) = result {
                    self.status = Some(format!("Could not set up your notes space: {}", e));
                }
            }
            AppEvent::NotesListed(result) => {
                self.loading_notes = false;
                match result {
                    Ok(notes) => {
                        self.state.replace_notes(notes);
                        self.clamp_selection();
                    }
                    Err(e) => self.status = Some(format!("Could not load notes: {}", e)),
                }
            }
            AppEvent::ContentFetched { title, result } => match result {
                Ok(content) => {
                    self.state.complete_select(&title, content);
                    self.sync_editor_from_state();
                }
                Err(e) => self.status = Some(format!("Could not open \"{}\": {}", title, e)),
            },
            AppEvent::Saved { request, result } => match result {
                Ok(id) => {
                    let title = request.title().to_string();
                    self.state.complete_save(request, id);
                    self.sync_editor_from_state();
                    self.clamp_selection();
                    self.status = Some(format!("Saved \"{}\"", title));
                }
                Err(e) => self.status = Some(format!("Save failed: {}", e)),
            },
            AppEvent::Deleted { request, result } => match result {
                Ok(()) => {
                    let title = request.title.clone();
                    self.state.complete_delete(request);
                    self.sync_editor_from_state();
                    self.clamp_selection();
                    self.status = Some(format!("Deleted \"{}\"", title));
                }
                Err(e) => self.status = Some(format!("Delete failed: {}", e)),
            },
            AppEvent::HighlighterReady(highlighter) => {
                self.highlighter = Some(highlighter);
                self.highlighter_loading = false;
                self.update_preview();
            }
        }
    }

    fn reset_to_auth_screen(&mut self) {
        self.screen = Screen::Auth;
        self.mode = Mode::Browse;
        self.focus = Focus::Sidebar;
        self.dialog = Dialog::None;
        self.auth_form = AuthForm::default();
        self.state = EditorState::new();
        self.editor.set_text("");
        self.selected_note = 0;
        self.delete_target = None;
        self.preview_scroll = 0;
        self.status = None;
        self.loading_notes = false;
        self.update_preview();
    }

    // ==================== Background operations ====================
    //
    // Each spawn sends exactly one completion. Failures are reported by the
    // completion itself; nothing is retried.

    pub fn start_login(&mut self) {
        if self.auth_form.busy {
            return;
        }
        self.auth_form.busy = true;
        self.auth_form.error = None;
        let provider = Arc::clone(&self.auth_provider);
        let email = self.auth_form.email.clone();
        let password = self.auth_form.password.clone();
        let sender = self.events_sender.clone();
        std::thread::spawn(move || {
            let result = provider.login(&email, &password);
            let _ = sender.send(AppEvent::LoggedIn(result));
        });
    }

    pub fn start_register(&mut self) {
        if self.auth_form.busy {
            return;
        }
        self.auth_form.busy = true;
        self.auth_form.error = None;
        let provider = Arc::clone(&self.auth_provider);
        let email = self.auth_form.email.clone();
        let password = self.auth_form.password.clone();
        let sender = self.events_sender.clone();
        std::thread::spawn(move || {
            let result = provider.register(&email, &password);
            let _ = sender.send(AppEvent::Registered(result));
        });
    }

    pub fn start_provision(&mut self, identity: Identity) {
        let store = Arc::clone(&self.store);
        let sender = self.events_sender.clone();
        std::thread::spawn(move || {
            let result = store.provision(&identity);
            let _ = sender.send(AppEvent::Provisioned(result));
        });
    }

    pub fn start_list_notes(&mut self) {
        let Some(identity) = self.identity() else {
            return;
        };
        self.loading_notes = true;
        let store = Arc::clone(&self.store);
        let sender = self.events_sender.clone();
        std::thread::spawn(move || {
            let result = store.list(&identity);
            let _ = sender.send(AppEvent::NotesListed(result));
        });
    }

    pub fn start_fetch_content(&mut self, title: String) {
        let Some(identity) = self.identity() else {
            return;
        };
        let store = Arc::clone(&self.store);
        let sender = self.events_sender.clone();
        std::thread::spawn(move || {
            let result = store.fetch_content(&identity, &title);
            let _ = sender.send(AppEvent::ContentFetched { title, result });
        });
    }

    pub fn start_save(&mut self) {
        let Some(request) = self.state.begin_save() else {
            return;
        };
        let Some(identity) = self.identity() else {
            return;
        };
        let store = Arc::clone(&self.store);
        let sender = self.events_sender.clone();
        std::thread::spawn(move || {
            let result = match &request {
                SaveRequest::Create { title, content } => store.create(&identity, title, content),
                SaveRequest::Update { id, title, content } => {
                    store.update(&identity, id, title, content).map(|_| id.clone())
                }
            };
            let _ = sender.send(AppEvent::Saved { request, result });
        });
    }

    /// Runs the delete confirmed in the dialog.
    pub fn start_delete(&mut self) {
        let Some(title) = self.delete_target.take() else {
            return;
        };
        let Some(request) = self.state.begin_delete(&title) else {
            return;
        };
        let Some(identity) = self.identity() else {
            return;
        };
        let store = Arc::clone(&self.store);
        let sender = self.events_sender.clone();
        std::thread::spawn(move || {
            let result = store.delete(&identity, &request.id);
            let _ = sender.send(AppEvent::Deleted { request, result });
        });
    }

    /// Sign out locally right away; token revocation is best-effort in the
    /// background and its outcome changes nothing here.
    pub fn logout(&mut self) {
        let Some(identity) = self.identity() else {
            return;
        };
        auth::clear_session(&self.config.session_path());
        self.session.set(None);
        let provider = Arc::clone(&self.auth_provider);
        std::thread::spawn(move || {
            let _ = provider.logout(&identity);
        });
    }

    // Building the syntax set is slow enough to stutter a keystroke, so it
    // happens off-thread, and only once a fence actually shows up.
    pub fn ensure_highlighter(&mut self) {
        if self.highlighter.is_some() || self.highlighter_loading {
            return;
        }
        self.highlighter_loading = true;
        let syntax_theme = self.config.syntax_theme.clone();
        let sender = self.events_sender.clone();
        std::thread::spawn(move || {
            let highlighter = Highlighter::new(&syntax_theme);
            let _ = sender.send(AppEvent::HighlighterReady(highlighter));
        });
    }

    // ==================== Notes and selection ====================

    pub fn next_note(&mut self) {
        let count = self.state.notes().len();
        if count > 0 && self.selected_note + 1 < count {
            self.selected_note += 1;
        }
    }

    pub fn previous_note(&mut self) {
        self.selected_note = self.selected_note.saturating_sub(1);
    }

    pub fn cycle_focus(&mut self, reverse: bool) {
        self.focus = match (self.focus, reverse) {
            (Focus::Sidebar, false) => Focus::Editor,
            (Focus::Editor, false) => Focus::Preview,
            (Focus::Preview, false) => Focus::Sidebar,
            (Focus::Sidebar, true) => Focus::Preview,
            (Focus::Editor, true) => Focus::Sidebar,
            (Focus::Preview, true) => Focus::Editor,
        };
    }

    fn clamp_selection(&mut self) {
        let count = self.state.notes().len();
        self.selected_note = self.selected_note.min(count.saturating_sub(1));
    }

    /// Open the note under the sidebar cursor. Cache-backed stores serve it
    /// from the listing; cache-less ones fetch the content first.
    pub fn open_selected(&mut self) {
        let Some(note) = self.state.note(self.selected_note) else {
            return;
        };
        let title = note.title.clone();
        if self.store.lists_content() {
            if self.state.select_from_cache(&title) {
                self.sync_editor_from_state();
            }
        } else {
            self.start_fetch_content(title);
        }
    }

    /// The unconditional blank-slate reset; drops any unsaved work.
    pub fn reset_to_new_note(&mut self) {
        self.state.new_note();
        self.sync_editor_from_state();
        self.mode = Mode::EditTitle;
        self.focus = Focus::Sidebar;
    }

    pub fn request_delete_selected(&mut self) {
        if let Some(note) = self.state.note(self.selected_note) {
            self.delete_target = Some(note.title.clone());
            self.dialog = Dialog::ConfirmDelete;
        }
    }

    // ==================== Editor and preview ====================

    /// Apply one buffer edit and re-render the preview, keeping the panes
    /// aligned: pinned to the bottom when the edit happened near it,
    /// proportionally mirrored otherwise.
    pub fn editor_edit(&mut self, edit: impl FnOnce(&mut Editor)) {
        let follow = self
            .editor
            .metrics()
            .near_bottom(self.config.editor.follow_threshold);
        edit(&mut self.editor);
        self.state.set_buffer(self.editor.text());
        self.update_preview();
        if follow {
            self.preview_scroll = scroll::bottom(self.preview_metrics());
        } else {
            self.mirror_to_preview();
        }
    }

    pub fn move_cursor(&mut self, movement: CursorMove) {
        self.editor.move_cursor(movement);
        self.mirror_to_preview();
    }

    pub fn scroll_editor(&mut self, delta: isize) {
        self.editor.scroll_by(delta);
        self.mirror_to_preview();
    }

    /// Free preview scrolling; never feeds back into the editor pane.
    pub fn scroll_preview(&mut self, delta: isize) {
        let max = self.preview_metrics().max_scroll() as isize;
        let target = self.preview_scroll as isize + delta;
        self.preview_scroll = target.clamp(0, max) as usize;
    }

    pub fn mirror_to_preview(&mut self) {
        self.preview_scroll = scroll::mirror(self.editor.metrics(), self.preview_metrics());
    }

    pub fn preview_metrics(&self) -> PaneMetrics {
        PaneMetrics::new(
            self.preview_scroll,
            self.preview_lines.len(),
            self.preview_view_height,
        )
    }

    pub fn update_preview(&mut self) {
        if self.state.buffer().contains("```") {
            self.ensure_highlighter();
        }
        self.preview_lines =
            preview::render(self.state.buffer(), &self.theme, self.highlighter.as_ref());
        self.clamp_preview_scroll();
    }

    pub fn clamp_preview_scroll(&mut self) {
        let max = self.preview_metrics().max_scroll();
        if self.preview_scroll > max {
            self.preview_scroll = max;
        }
    }

    /// Pull editor pane and preview back in line with the state machine
    /// after a load, save, delete or reset.
    fn sync_editor_from_state(&mut self) {
        self.editor.set_text(self.state.buffer());
        self.update_preview();
        self.mirror_to_preview();
    }

    pub fn word_count(&self) -> usize {
        self.state.buffer().split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryNoteStore;
    use std::time::Duration;

    struct StubAuth;

    impl AuthProvider for StubAuth {
        fn register(&self, email: &str, _password: &str) -> Result<Identity, AuthError> {
            Ok(Identity::new("Stub-User", email, "stub-token".to_string()))
        }

        fn login(&self, email: &str, _password: &str) -> Result<Identity, AuthError> {
            Ok(Identity::new("Stub-User", email, "stub-token".to_string()))
        }

        fn logout(&self, _session: &Identity) -> Result<(), AuthError> {
            Ok(())
        }
    }

    struct FailingAuth;

    impl AuthProvider for FailingAuth {
        fn register(&self, _email: &str, _password: &str) -> Result<Identity, AuthError> {
            Err(AuthError::EmailTaken)
        }

        fn login(&self, _email: &str, _password: &str) -> Result<Identity, AuthError> {
            Err(AuthError::InvalidCredentials)
        }

        fn logout(&self, _session: &Identity) -> Result<(), AuthError> {
            Ok(())
        }
    }

    fn identity() -> Identity {
        Identity::new("ada", "ada@example.com", "tok".to_string())
    }

    fn test_app_with_auth(
        auth: Arc<dyn AuthProvider>,
    ) -> (App, Arc<MemoryNoteStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            session_file: dir.path().join("session.toml").to_string_lossy().to_string(),
            ..Config::default()
        };
        let store = Arc::new(MemoryNoteStore::new());
        let mut app = App::with_collaborators(config, store.clone(), auth);
        // Settle the subscription's startup notification (signed out).
        app.poll_events();
        (app, store, dir)
    }

    fn test_app() -> (App, Arc<MemoryNoteStore>, tempfile::TempDir) {
        test_app_with_auth(Arc::new(StubAuth))
    }

    fn drain_one(app: &mut App) {
        let event = app
            .events_receiver
            .recv_timeout(Duration::from_secs(2))
            .expect("expected a completion event");
        app.apply(event);
    }

    #[test]
    fn test_starts_on_auth_screen_without_saved_session() {
        let (app, _store, _dir) = test_app();
        assert_eq!(app.screen, Screen::Auth);
        assert!(app.identity().is_none());
    }

    #[test]
    fn test_session_change_flips_screens_through_the_watch() {
        let (mut app, _store, _dir) = test_app();

        app.session.set(Some(identity()));
        drain_one(&mut app); // session change
        drain_one(&mut app); // notes listed
        assert_eq!(app.screen, Screen::Editor);

        app.session.set(None);
        drain_one(&mut app);
        assert_eq!(app.screen, Screen::Auth);
    }

    #[test]
    fn test_signing_in_lists_existing_notes() {
        let (mut app, store, _dir) = test_app();
        store.create(&identity(), "First", "alpha").unwrap();

        app.session.set(Some(identity()));
        drain_one(&mut app); // session change
        drain_one(&mut app); // notes listed

        assert_eq!(app.state.notes().len(), 1);
        assert_eq!(app.state.notes()[0].title, "First");
        assert!(!app.loading_notes);
    }

    #[test]
    fn test_login_persists_session_for_next_run() {
        let (mut app, _store, _dir) = test_app();
        app.auth_form.email = "ada@example.com".to_string();
        app.auth_form.password = "secret".to_string();

        app.start_login();
        drain_one(&mut app); // logged in
        drain_one(&mut app); // session change

        assert_eq!(app.screen, Screen::Editor);
        let saved = auth::load_session(&app.config.session_path()).unwrap();
        assert_eq!(saved.user_id, "stub-user");
    }

    #[test]
    fn test_failed_login_shows_error_and_stays_put() {
        let (mut app, _store, _dir) = test_app_with_auth(Arc::new(FailingAuth));
        app.auth_form.email = "ada@example.com".to_string();

        app.start_login();
        drain_one(&mut app);

        assert_eq!(app.screen, Screen::Auth);
        assert_eq!(
            app.auth_form.error.as_deref(),
            Some("Invalid email or password.")
        );
        assert!(!app.auth_form.busy);
    }

    #[test]
    fn test_registration_provisions_the_store() {
        let (mut app, store, _dir) = test_app();
        app.auth_form.mode = AuthMode::Register;
        app.auth_form.email = "ada@example.com".to_string();

        app.start_register();
        drain_one(&mut app); // registered
        drain_one(&mut app); // session change
        drain_one(&mut app); // provisioned or notes listed
        drain_one(&mut app); // the other one

        assert_eq!(app.screen, Screen::Editor);
        assert_eq!(store.provisioned_users(), vec!["stub-user".to_string()]);
    }

    #[test]
    fn test_save_flow_resets_editor_and_caches_note() {
        let (mut app, store, _dir) = test_app();
        app.session.set(Some(identity()));
        drain_one(&mut app);
        drain_one(&mut app);

        app.state.set_title("Plan".to_string());
        app.editor_edit(|e| {
            for c in "- step one".chars() {
                e.insert_char(c);
            }
        });
        assert!(app.state.save_enabled());

        app.start_save();
        drain_one(&mut app);

        assert_eq!(app.state.notes().len(), 1);
        assert_eq!(app.state.notes()[0].title, "Plan");
        assert_eq!(app.state.buffer(), "");
        assert_eq!(app.editor.text(), "");
        assert_eq!(app.status.as_deref(), Some("Saved \"Plan\""));
        assert_eq!(store.list(&identity()).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_save_keeps_buffer() {
        let (mut app, _store, _dir) = test_app();
        app.session.set(Some(identity()));
        drain_one(&mut app);
        drain_one(&mut app);

        // Cached under an id the store has never heard of, so the update
        // half of the save fails on the wire.
        app.state.replace_notes(vec![Note {
            id: "ghost".to_string(),
            title: "Ghost".to_string(),
            content: "old".to_string(),
        }]);
        app.state.select_from_cache("Ghost");
        app.sync_editor_from_state();
        app.move_cursor(CursorMove::End);
        app.editor_edit(|e| e.insert_char('!'));

        app.start_save();
        drain_one(&mut app);

        assert_eq!(app.state.buffer(), "old!");
        assert_eq!(app.state.active_title(), "Ghost");
        assert!(app.state.has_unsaved_changes());
        assert!(app.status.as_deref().unwrap_or("").starts_with("Save failed"));
    }

    #[test]
    fn test_failed_delete_keeps_cache_and_reports() {
        let (mut app, _store, _dir) = test_app();
        app.session.set(Some(identity()));
        drain_one(&mut app);
        drain_one(&mut app);

        // A note the store has never heard of.
        app.state.replace_notes(vec![Note {
            id: "ghost".to_string(),
            title: "Ghost".to_string(),
            content: String::new(),
        }]);
        app.delete_target = Some("Ghost".to_string());

        app.start_delete();
        drain_one(&mut app);

        assert_eq!(app.state.notes().len(), 1);
        assert!(app.status.as_deref().unwrap_or("").starts_with("Delete failed"));
    }

    #[test]
    fn test_logout_clears_session_file_and_state() {
        let (mut app, _store, _dir) = test_app();
        app.auth_form.email = "ada@example.com".to_string();
        app.start_login();
        drain_one(&mut app); // logged in
        drain_one(&mut app); // session change
        drain_one(&mut app); // notes listed
        assert!(auth::load_session(&app.config.session_path()).is_some());

        app.logout();
        drain_one(&mut app); // session change to None

        assert_eq!(app.screen, Screen::Auth);
        assert!(auth::load_session(&app.config.session_path()).is_none());
        assert!(app.identity().is_none());
    }

    #[test]
    fn test_open_selected_uses_cache_when_store_lists_content() {
        let (mut app, store, _dir) = test_app();
        store.create(&identity(), "Notes", "# heading").unwrap();
        app.session.set(Some(identity()));
        drain_one(&mut app);
        drain_one(&mut app);

        app.open_selected();

        assert_eq!(app.state.buffer(), "# heading");
        assert_eq!(app.editor.text(), "# heading");
        assert_eq!(app.state.active_title(), "Notes");
    }

    #[test]
    fn test_editing_near_bottom_pins_preview() {
        let (mut app, _store, _dir) = test_app();
        let body: String = (0..40).map(|i| format!("line {}\n", i)).collect();
        app.editor.set_view_size(60, 10);
        app.preview_view_height = 10;
        app.editor_edit(|e| {
            for c in body.chars() {
                e.insert_char(c);
            }
        });

        // An empty buffer sits at its own bottom, so the typing counts as a
        // near-bottom edit and the preview stays pinned while lines grow.
        assert_eq!(app.preview_scroll, app.preview_metrics().max_scroll());
    }

    #[test]
    fn test_preview_scroll_is_clamped() {
        let (mut app, _store, _dir) = test_app();
        app.preview_view_height = 10;
        app.editor_edit(|e| e.insert_char('x'));
        app.scroll_preview(50);
        assert_eq!(app.preview_scroll, 0);
    }
}
