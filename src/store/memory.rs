use std::sync::Mutex;

use super::{Note, NoteStore, StoreError};
use crate::auth::Identity;

/// In-memory store for tests. Assigns sequential ids and keeps notes in
/// insertion order, like the wire stores keep server order.
pub struct MemoryNoteStore {
    inner: Mutex<Inner>,
}

struct Inner {
    notes: Vec<(String, Note)>,
    next_id: usize,
    provisioned: Vec<String>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                notes: Vec::new(),
                next_id: 1,
                provisioned: Vec::new(),
            }),
        }
    }

    pub fn provisioned_users(&self) -> Vec<String> {
        self.inner.lock().unwrap().provisioned.clone()
    }
}

impl Default for MemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStore for MemoryNoteStore {
    fn list(&self, owner: &Identity) -> Result<Vec<Note>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .notes
            .iter()
            .filter(|(user, _)| user == &owner.user_id)
            .map(|(_, note)| note.clone())
            .collect())
    }

    fn create(&self, owner: &Identity, title: &str, content: &str) -> Result<String, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let id = format!("note-{}", inner.next_id);
        inner.next_id += 1;
        inner.notes.push((
            owner.user_id.clone(),
            Note {
                id: id.clone(),
                title: title.to_string(),
                content: content.to_string(),
            },
        ));
        Ok(id)
    }

    fn update(
        &self,
        owner: &Identity,
        id: &str,
        title: &str,
        content: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let note = inner
            .notes
            .iter_mut()
            .find(|(user, note)| user == &owner.user_id && note.id == id)
            .map(|(_, note)| note)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        note.title = title.to_string();
        note.content = content.to_string();
        Ok(())
    }

    fn delete(&self, owner: &Identity, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.notes.len();
        inner
            .notes
            .retain(|(user, note)| !(user == &owner.user_id && note.id == id));
        if inner.notes.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn fetch_content(&self, owner: &Identity, title: &str) -> Result<String, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .notes
            .iter()
            .find(|(user, note)| user == &owner.user_id && note.title == title)
            .map(|(_, note)| note.content.clone())
            .ok_or_else(|| StoreError::NotFound(title.to_string()))
    }

    fn provision(&self, owner: &Identity) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.provisioned.push(owner.user_id.clone());
        Ok(())
    }

    fn lists_content(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(name: &str) -> Identity {
        Identity::new(name, "user@example.com", "tok".to_string())
    }

    #[test]
    fn test_create_assigns_sequential_ids_and_keeps_order() {
        let store = MemoryNoteStore::new();
        let ada = owner("ada");
        let first = store.create(&ada, "one", "1").unwrap();
        let second = store.create(&ada, "two", "2").unwrap();
        assert_ne!(first, second);

        let titles: Vec<String> = store
            .list(&ada)
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["one", "two"]);
    }

    #[test]
    fn test_notes_are_scoped_to_their_owner() {
        let store = MemoryNoteStore::new();
        store.create(&owner("ada"), "hers", "a").unwrap();
        store.create(&owner("bob"), "his", "b").unwrap();
        let titles: Vec<String> = store
            .list(&owner("ada"))
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["hers"]);
    }

    #[test]
    fn test_update_rewrites_in_place() {
        let store = MemoryNoteStore::new();
        let ada = owner("ada");
        let id = store.create(&ada, "draft", "v1").unwrap();
        store.create(&ada, "other", "x").unwrap();
        store.update(&ada, &id, "draft", "v2").unwrap();

        let notes = store.list(&ada).unwrap();
        assert_eq!(notes[0].content, "v2");
        assert_eq!(notes[0].id, id);
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn test_delete_unknown_id_is_not_found() {
        let store = MemoryNoteStore::new();
        assert_eq!(
            store.delete(&owner("ada"), "nope"),
            Err(StoreError::NotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_fetch_content_by_title() {
        let store = MemoryNoteStore::new();
        let ada = owner("ada");
        store.create(&ada, "draft", "hello").unwrap();
        assert_eq!(store.fetch_content(&ada, "draft").unwrap(), "hello");
        assert!(store.fetch_content(&ada, "missing").is_err());
    }

    #[test]
    fn test_provision_records_the_user() {
        let store = MemoryNoteStore::new();
        store.provision(&owner("Ada")).unwrap();
        assert_eq!(store.provisioned_users(), vec!["ada"]);
    }
}
