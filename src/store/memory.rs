//! In-memory contact store.

use crate::error::{StoreError, StoreResult};
use crate::models::{Contact, ContactRef};
use crate::store::ContactStore;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Contact store backed by a `Vec`, enumerating in insertion order.
///
/// Insertion order is the store's enumeration order, which makes
/// client-side selection filtering deterministic.
#[derive(Default)]
pub struct MemoryStore {
    contacts: Mutex<Vec<ContactRef>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `contacts`, in the given order.
    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        let store = Self::new();
        {
            let mut guard = store.contacts.lock().unwrap();
            for mut contact in contacts {
                contact.populate_display_name();
                guard.push(Arc::new(contact));
            }
        }
        store
    }

    /// Number of stored contacts.
    pub fn len(&self) -> usize {
        self.contacts.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn get_all(&self) -> StoreResult<Vec<ContactRef>> {
        Ok(self.contacts.lock().unwrap().clone())
    }

    async fn save(&self, mut contact: Contact) -> StoreResult<ContactRef> {
        if !contact.is_meaningful() {
            return Err(StoreError::InvalidRecord(
                "contact has no name, phone, or email".to_string(),
            ));
        }
        if contact.id.is_empty() {
            let n = self.next_id.fetch_add(1, Ordering::SeqCst);
            contact.id = format!("mem-{}", n);
        }
        contact.populate_display_name();

        let stored: ContactRef = Arc::new(contact);
        let mut guard = self.contacts.lock().unwrap();
        // Same id replaces in place, keeping the enumeration position.
        match guard.iter().position(|c| c.id == stored.id) {
            Some(idx) => guard[idx] = stored.clone(),
            None => guard.push(stored.clone()),
        }
        Ok(stored)
    }
}
