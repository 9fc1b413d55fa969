//! JSON-file-backed contact store.
//!
//! The whole address book lives in one JSON array; the array order is the
//! store's enumeration order. Saves rewrite the file.

use crate::error::{StoreError, StoreResult};
use crate::models::{Contact, ContactRef};
use crate::store::ContactStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

pub struct JsonFileStore {
    path: PathBuf,
    contacts: Mutex<Vec<ContactRef>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty address book;
    /// a malformed one is an error.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let contacts = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let mut records: Vec<Contact> = serde_json::from_slice(&bytes)?;
                for contact in &mut records {
                    contact.populate_display_name();
                }
                records.into_iter().map(Arc::new).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(StoreError::Io(e)),
        };

        debug!(path = %path.display(), count = contacts.len(), "opened contact store");
        Ok(Self {
            path,
            contacts: Mutex::new(contacts),
        })
    }

    async fn persist(&self, contacts: &[ContactRef]) -> StoreResult<()> {
        let records: Vec<&Contact> = contacts.iter().map(Arc::as_ref).collect();
        let bytes = serde_json::to_vec_pretty(&records)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl ContactStore for JsonFileStore {
    async fn get_all(&self) -> StoreResult<Vec<ContactRef>> {
        Ok(self.contacts.lock().await.clone())
    }

    async fn save(&self, mut contact: Contact) -> StoreResult<ContactRef> {
        if !contact.is_meaningful() {
            return Err(StoreError::InvalidRecord(
                "contact has no name, phone, or email".to_string(),
            ));
        }

        let mut guard = self.contacts.lock().await;
        if contact.id.is_empty() {
            contact.id = format!("c-{}", guard.len() + 1);
        }
        contact.populate_display_name();

        let stored: ContactRef = Arc::new(contact);
        match guard.iter().position(|c| c.id == stored.id) {
            Some(idx) => guard[idx] = stored.clone(),
            None => guard.push(stored.clone()),
        }
        self.persist(&guard).await?;
        Ok(stored)
    }
}
