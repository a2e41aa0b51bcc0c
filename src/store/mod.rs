mod api;
mod dataset;
#[cfg(test)]
pub mod memory;

pub use api::ApiNoteStore;
pub use dataset::DatasetNoteStore;

use thiserror::Error;

use crate::auth::Identity;

/// One persisted note. Ids are opaque, store-assigned strings; titles are
/// unique per owner because a save under an existing title is always an
/// update of that note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("note not found: {0}")]
    NotFound(String),
    #[error("not allowed")]
    Denied,
    #[error("store returned {status}: {message}")]
    Service { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Per-user note persistence. Calls block, so the app runs them on worker
/// threads and applies the results from its completion channel.
///
/// Two shapes of store exist. Cache-backed stores return full notes from
/// `list`, and selection is served from the cached copy. Cache-less stores
/// return titles only, and selection goes through `fetch_content`.
/// `lists_content` tells the two apart.
pub trait NoteStore: Send + Sync {
    /// Every note owned by `owner`, in the order the server returns them.
    fn list(&self, owner: &Identity) -> Result<Vec<Note>, StoreError>;

    /// Persist a new note and return its assigned id.
    fn create(&self, owner: &Identity, title: &str, content: &str) -> Result<String, StoreError>;

    fn update(
        &self,
        owner: &Identity,
        id: &str,
        title: &str,
        content: &str,
    ) -> Result<(), StoreError>;

    fn delete(&self, owner: &Identity, id: &str) -> Result<(), StoreError>;

    /// Full content of one note, addressed by title.
    fn fetch_content(&self, owner: &Identity, title: &str) -> Result<String, StoreError>;

    /// One-time container setup after registration. Stores without a
    /// per-user container have nothing to do.
    fn provision(&self, _owner: &Identity) -> Result<(), StoreError> {
        Ok(())
    }

    /// Whether `list` returns full note contents.
    fn lists_content(&self) -> bool;
}
