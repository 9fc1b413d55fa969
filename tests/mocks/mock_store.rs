use async_trait::async_trait;
use contacts_exchange::error::{StoreError, StoreResult};
use contacts_exchange::models::{Contact, ContactRef};
use contacts_exchange::store::ContactStore;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock contact store for testing.
///
/// Enumerates in insertion order, tracks call counts, and can be switched
/// into a failing mode to exercise the exporter's store-error path.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockContactStore {
    contacts: Mutex<Vec<ContactRef>>,
    get_all_calls: AtomicUsize,
    save_calls: AtomicUsize,
    fail_get_all: AtomicBool,
}

#[allow(dead_code)]
impl MockContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store with contacts in the given enumeration order.
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

    pub fn get_all_calls(&self) -> usize {
        self.get_all_calls.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    /// Make subsequent `get_all` calls fail.
    pub fn fail_get_all(&self) {
        self.fail_get_all.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContactStore for MockContactStore {
    async fn get_all(&self) -> StoreResult<Vec<ContactRef>> {
        self.get_all_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_get_all.load(Ordering::SeqCst) {
            return Err(StoreError::Other("store unavailable".to_string()));
        }
        Ok(self.contacts.lock().unwrap().clone())
    }

    async fn save(&self, mut contact: Contact) -> StoreResult<ContactRef> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if contact.id.is_empty() {
            let next = self.contacts.lock().unwrap().len() + 1;
            contact.id = format!("mock-{}", next);
        }
        contact.populate_display_name();
        let stored: ContactRef = Arc::new(contact);
        self.contacts.lock().unwrap().push(stored.clone());
        Ok(stored)
    }
}
