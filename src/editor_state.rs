//! Note-editing state machine.
//!
//! Holds the markdown buffer, the title field, the snapshot of the buffer
//! as it was last loaded or saved, and the cached note list. Everything the
//! UI shows about editing is derived from those four fields, and every
//! store-touching operation is split in two: a `begin_*` intent that
//! decides synchronously whether a store call happens and what it carries,
//! and a `complete_*` that applies the store's successful result. Failed
//! calls never reach a `complete_*`, which is what keeps the buffer intact
//! across them.

use crate::store::Note;

/// What the editor is doing right now, derived from the raw fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing loaded, nothing typed.
    Empty,
    /// Text typed but never persisted.
    NewUnsaved,
    /// A persisted note loaded, buffer matches the stored copy.
    Viewing,
    /// A persisted note loaded, buffer has diverged.
    Dirty,
}

/// Store call decided by [`EditorState::begin_save`]. A title matching a
/// cached note updates that note, anything else creates a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Create { title: String, content: String },
    Update { id: String, title: String, content: String },
}

impl SaveRequest {
    pub fn title(&self) -> &str {
        match self {
            SaveRequest::Create { title, .. } => title,
            SaveRequest::Update { title, .. } => title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub id: String,
    pub title: String,
}

/// See the module docs. One caveat inherited from the snapshot encoding:
/// a stored note whose content is genuinely empty loads with an empty
/// snapshot, so it reports the same derived state as no note at all, and a
/// re-save of it goes through the title-match path like any other save.
#[derive(Debug, Default)]
pub struct EditorState {
    buffer: String,
    active_title: String,
    last_persisted: String,
    notes: Vec<Note>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn active_title(&self) -> &str {
        &self.active_title
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    // Derived flags. The three renderable facts of the sidebar: whether the
    // buffer diverged, whether a persisted note is open, and whether the
    // save control does anything.

    pub fn has_unsaved_changes(&self) -> bool {
        self.buffer != self.last_persisted
    }

    pub fn is_editing(&self) -> bool {
        !self.active_title.is_empty() && !self.last_persisted.is_empty()
    }

    /// False exactly when a loaded note has no changes to save.
    pub fn save_enabled(&self) -> bool {
        !(self.is_editing() && !self.has_unsaved_changes())
    }

    pub fn phase(&self) -> Phase {
        match (self.is_editing(), self.has_unsaved_changes()) {
            (false, false) => Phase::Empty,
            (false, true) => Phase::NewUnsaved,
            (true, false) => Phase::Viewing,
            (true, true) => Phase::Dirty,
        }
    }

    // Local edits.

    pub fn set_buffer(&mut self, text: String) {
        self.buffer = text;
    }

    pub fn set_title(&mut self, title: String) {
        self.active_title = title;
    }

    /// Drop the working fields and start over. The note cache stays.
    pub fn new_note(&mut self) {
        self.buffer.clear();
        self.active_title.clear();
        self.last_persisted.clear();
    }

    // Note list.

    /// Completion of a list fetch; replaces the cache wholesale.
    pub fn replace_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
    }

    /// Load a note out of the cache. For stores whose listing carries
    /// content only; returns false when the title is not cached.
    pub fn select_from_cache(&mut self, title: &str) -> bool {
        let Some(note) = self.notes.iter().find(|n| n.title == title) else {
            return false;
        };
        self.active_title = note.title.clone();
        self.buffer = note.content.clone();
        self.last_persisted = note.content.clone();
        true
    }

    /// Completion of a per-note content fetch, for cache-less stores.
    pub fn complete_select(&mut self, title: &str, content: String) {
        self.active_title = title.to_string();
        self.buffer = content.clone();
        self.last_persisted = content;
    }

    // Save.

    /// Decide the save. `None` means no store call happens: either the
    /// title is blank (whitespace-only counts) or the loaded note has no
    /// changes. The title is carried verbatim, not trimmed.
    pub fn begin_save(&self) -> Option<SaveRequest> {
        if self.active_title.trim().is_empty() {
            return None;
        }
        if !self.save_enabled() {
            return None;
        }
        let request = match self.notes.iter().find(|n| n.title == self.active_title) {
            Some(existing) => SaveRequest::Update {
                id: existing.id.clone(),
                title: self.active_title.clone(),
                content: self.buffer.clone(),
            },
            None => SaveRequest::Create {
                title: self.active_title.clone(),
                content: self.buffer.clone(),
            },
        };
        Some(request)
    }

    /// Apply a successful save. `id` is the note's identifier: the
    /// store-assigned one for a create, the request's own for an update.
    /// Updates rewrite the cached note in place, creates append, and the
    /// working fields reset either way.
    pub fn complete_save(&mut self, request: SaveRequest, id: String) {
        match request {
            SaveRequest::Create { title, content } => {
                self.notes.push(Note { id, title, content });
            }
            SaveRequest::Update { title, content, .. } => {
                if let Some(note) = self.notes.iter_mut().find(|n| n.id == id) {
                    note.title = title;
                    note.content = content;
                }
            }
        }
        self.new_note();
    }

    // Delete.

    /// `None` when the title is not in the cache.
    pub fn begin_delete(&self, title: &str) -> Option<DeleteRequest> {
        self.notes
            .iter()
            .find(|n| n.title == title)
            .map(|n| DeleteRequest {
                id: n.id.clone(),
                title: n.title.clone(),
            })
    }

    /// Apply a successful delete: drop the cache entry and reset the
    /// working fields, whether or not the deleted note was the open one.
    pub fn complete_delete(&mut self, request: DeleteRequest) {
        self.notes.retain(|n| n.id != request.id);
        self.new_note();
    }
}
