use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

use super::{Note, NoteStore, StoreError};
use crate::auth::Identity;
use crate::config::DatasetConfig;

/// Escape set for note titles riding in a URL path segment. Alphanumerics
/// and `-_.!~*'()` pass through, everything else is percent-encoded, so a
/// `/` or `?` in a title cannot change which file the request addresses.
const TITLE_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Deserialize)]
struct ProjectDto {
    #[serde(default)]
    files: Vec<FileDto>,
}

#[derive(Debug, Deserialize)]
struct FileDto {
    name: String,
}

/// Dataset-file store. Each user owns one project under a shared
/// organization, and every note is a file in it, addressed by title. The
/// file name doubles as the note id, `list` returns titles only, and
/// content comes in per note through `fetch_content`.
pub struct DatasetNoteStore {
    base_url: String,
    org: String,
    token: String,
}

impl DatasetNoteStore {
    pub fn new(config: DatasetConfig) -> Self {
        let mut base_url = config.api_url;
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            org: config.org,
            token: config.token,
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn project_url(&self, owner: &Identity) -> String {
        format!("{}/projects/{}/{}", self.base_url, self.org, owner.user_id)
    }

    fn upload_url(&self, owner: &Identity, title: &str) -> String {
        format!(
            "{}/uploads/{}/{}/files/{}",
            self.base_url,
            self.org,
            owner.user_id,
            utf8_percent_encode(title, TITLE_SEGMENT)
        )
    }

    fn file_url(&self, owner: &Identity, title: &str) -> String {
        format!(
            "{}/datasets/{}/{}/files/{}",
            self.base_url,
            self.org,
            owner.user_id,
            utf8_percent_encode(title, TITLE_SEGMENT)
        )
    }

    fn download_url(&self, owner: &Identity, title: &str) -> String {
        format!(
            "{}/file_download/{}/{}/{}",
            self.base_url,
            self.org,
            owner.user_id,
            utf8_percent_encode(title, TITLE_SEGMENT)
        )
    }

    fn upload(&self, owner: &Identity, title: &str, content: &str) -> Result<(), StoreError> {
        ureq::put(&self.upload_url(owner, title))
            .set("Authorization", &self.bearer())
            .set("Content-Type", "application/octet-stream")
            .send_string(content)
            .map_err(super::api::map_store_error)?;
        Ok(())
    }
}

impl NoteStore for DatasetNoteStore {
    fn list(&self, owner: &Identity) -> Result<Vec<Note>, StoreError> {
        let response = ureq::get(&self.project_url(owner))
            .set("Authorization", &self.bearer())
            .call()
            .map_err(super::api::map_store_error)?;
        let project: ProjectDto = response
            .into_json()
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(project
            .files
            .into_iter()
            .map(|file| Note {
                id: file.name.clone(),
                title: file.name,
                content: String::new(),
            })
            .collect())
    }

    fn create(&self, owner: &Identity, title: &str, content: &str) -> Result<String, StoreError> {
        self.upload(owner, title, content)?;
        Ok(title.to_string())
    }

    fn update(
        &self,
        owner: &Identity,
        _id: &str,
        title: &str,
        content: &str,
    ) -> Result<(), StoreError> {
        // Files are keyed by name, so an update is a re-upload under the
        // same title.
        self.upload(owner, title, content)
    }

    fn delete(&self, owner: &Identity, id: &str) -> Result<(), StoreError> {
        ureq::delete(&self.file_url(owner, id))
            .set("Authorization", &self.bearer())
            .call()
            .map_err(|e| super::api::not_found_or(e, id))?;
        Ok(())
    }

    fn fetch_content(&self, owner: &Identity, title: &str) -> Result<String, StoreError> {
        let response = ureq::get(&self.download_url(owner, title))
            .set("Authorization", &self.bearer())
            .call()
            .map_err(|e| super::api::not_found_or(e, title))?;
        response
            .into_string()
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }

    fn provision(&self, owner: &Identity) -> Result<(), StoreError> {
        let url = format!("{}/projects/{}", self.base_url, self.org);
        ureq::post(&url)
            .set("Authorization", &self.bearer())
            .send_json(serde_json::json!({
                "title": owner.user_id,
                "visibility": "OPEN",
            }))
            .map_err(super::api::map_store_error)?;
        Ok(())
    }

    fn lists_content(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetConfig;

    fn store() -> DatasetNoteStore {
        DatasetNoteStore::new(DatasetConfig {
            api_url: "https://data.example.com/v0/".to_string(),
            org: "markable-repo".to_string(),
            token: "tok".to_string(),
        })
    }

    fn owner() -> Identity {
        Identity::new("Ada", "ada@example.com", "unused".to_string())
    }

    #[test]
    fn test_urls_are_scoped_to_org_and_user() {
        let store = store();
        let owner = owner();
        assert_eq!(
            store.project_url(&owner),
            "https://data.example.com/v0/projects/markable-repo/ada"
        );
        assert_eq!(
            store.download_url(&owner, "todo.md"),
            "https://data.example.com/v0/file_download/markable-repo/ada/todo.md"
        );
        assert_eq!(
            store.file_url(&owner, "todo.md"),
            "https://data.example.com/v0/datasets/markable-repo/ada/files/todo.md"
        );
    }

    #[test]
    fn test_reserved_title_characters_are_percent_encoded() {
        let store = store();
        let owner = owner();
        assert_eq!(
            store.download_url(&owner, "notes/2024"),
            "https://data.example.com/v0/file_download/markable-repo/ada/notes%2F2024"
        );
        assert_eq!(
            store.file_url(&owner, "done?"),
            "https://data.example.com/v0/datasets/markable-repo/ada/files/done%3F"
        );
        assert_eq!(
            store.upload_url(&owner, "meeting notes"),
            "https://data.example.com/v0/uploads/markable-repo/ada/files/meeting%20notes"
        );
    }

    #[test]
    fn test_listing_parses_file_names_without_content() {
        let project: ProjectDto =
            serde_json::from_str(r#"{"title":"ada","files":[{"name":"a"},{"name":"b"}]}"#).unwrap();
        assert_eq!(project.files.len(), 2);
        assert_eq!(project.files[0].name, "a");
    }

    #[test]
    fn test_listing_tolerates_missing_files_array() {
        let project: ProjectDto = serde_json::from_str(r#"{"title":"ada"}"#).unwrap();
        assert!(project.files.is_empty());
    }
}
