//! Contact store trait.

use crate::error::StoreResult;
use crate::models::ContactRef;
use async_trait::async_trait;

/// Abstraction over contact storage.
///
/// `get_all` is deliberately the only query primitive: callers that need a
/// subset (the exporter resolving a selection) filter the full enumeration
/// client-side, and the result order is the store's enumeration order.
/// Implementations must keep that order deterministic.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Retrieve every contact, in the store's enumeration order.
    async fn get_all(&self) -> StoreResult<Vec<ContactRef>>;

    /// Persist a contact, returning the stored record. Used by the import
    /// pipeline; records with an empty id are assigned one by the store.
    async fn save(&self, contact: crate::models::Contact) -> StoreResult<ContactRef>;
}
