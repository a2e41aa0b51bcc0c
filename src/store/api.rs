use serde::{Deserialize, Serialize};

use super::{Note, NoteStore, StoreError};
use crate::auth::Identity;

#[derive(Debug, Deserialize)]
struct NoteDto {
    id: String,
    title: String,
    content: String,
}

impl From<NoteDto> for Note {
    fn from(dto: NoteDto) -> Self {
        Note {
            id: dto.id,
            title: dto.title,
            content: dto.content,
        }
    }
}

#[derive(Debug, Serialize)]
struct NotePayload<'a> {
    title: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedDto {
    id: String,
}

/// JSON note store. Notes live under `{base}/users/{user_id}/notes`, and
/// `list` returns them in full, so selection never goes back to the wire.
pub struct ApiNoteStore {
    base_url: String,
}

impl ApiNoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    fn notes_url(&self, owner: &Identity) -> String {
        format!("{}/users/{}/notes", self.base_url, owner.user_id)
    }

    fn bearer(owner: &Identity) -> String {
        format!("Bearer {}", owner.access_token)
    }
}

impl NoteStore for ApiNoteStore {
    fn list(&self, owner: &Identity) -> Result<Vec<Note>, StoreError> {
        let response = ureq::get(&self.notes_url(owner))
            .set("Authorization", &Self::bearer(owner))
            .call()
            .map_err(map_store_error)?;
        let notes: Vec<NoteDto> = response
            .into_json()
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(notes.into_iter().map(Note::from).collect())
    }

    fn create(&self, owner: &Identity, title: &str, content: &str) -> Result<String, StoreError> {
        let response = ureq::post(&self.notes_url(owner))
            .set("Authorization", &Self::bearer(owner))
            .send_json(NotePayload { title, content })
            .map_err(map_store_error)?;
        let created: CreatedDto = response
            .into_json()
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(created.id)
    }

    fn update(
        &self,
        owner: &Identity,
        id: &str,
        title: &str,
        content: &str,
    ) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.notes_url(owner), id);
        ureq::put(&url)
            .set("Authorization", &Self::bearer(owner))
            .send_json(NotePayload { title, content })
            .map_err(|e| not_found_or(e, title))?;
        Ok(())
    }

    fn delete(&self, owner: &Identity, id: &str) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.notes_url(owner), id);
        ureq::delete(&url)
            .set("Authorization", &Self::bearer(owner))
            .call()
            .map_err(|e| not_found_or(e, id))?;
        Ok(())
    }

    fn fetch_content(&self, owner: &Identity, title: &str) -> Result<String, StoreError> {
        // `list` already carries content, so this only serves the odd
        // caller that asks by title anyway.
        self.list(owner)?
            .into_iter()
            .find(|note| note.title == title)
            .map(|note| note.content)
            .ok_or_else(|| StoreError::NotFound(title.to_string()))
    }

    fn lists_content(&self) -> bool {
        true
    }
}

pub(super) fn map_store_error(err: ureq::Error) -> StoreError {
    match err {
        ureq::Error::Status(401 | 403, _) => StoreError::Denied,
        ureq::Error::Status(status, response) => {
            let message = response.into_string().unwrap_or_default();
            StoreError::Service {
                status,
                message: message.trim().to_string(),
            }
        }
        ureq::Error::Transport(transport) => StoreError::Network(transport.to_string()),
    }
}

pub(super) fn not_found_or(err: ureq::Error, what: &str) -> StoreError {
    match err {
        ureq::Error::Status(404, _) => StoreError::NotFound(what.to_string()),
        other => map_store_error(other),
    }
}
