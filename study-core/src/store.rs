//! In-memory entity stores.
//!
//! One [`EntityStore`] instance caches one server-owned collection
//! (documents, quizzes, schedules) for the lifetime of the process. The
//! store never talks to the network itself; the fetch-through policy in
//! `studyhall-client` decides when to populate it.
//!
//! Staleness is managed entirely by the caller's explicit refresh flag, not
//! by the store: there is no TTL and no expiry. Once populated, the store is
//! the single source of truth until a caller replaces its contents.

use studyhall_types::{Document, DocumentId, Quiz, QuizId, Schedule, ScheduleId};

/// Access to an entity's identifier field.
///
/// Uniqueness is enforced by this key on [`EntityStore::remove`], but not on
/// insert: adding a duplicate is a caller error the store does not check for.
pub trait Keyed {
    /// The identifier type.
    type Key: PartialEq + Copy;

    /// The identifier of this record.
    fn key(&self) -> Self::Key;
}

impl Keyed for Document {
    type Key = DocumentId;

    fn key(&self) -> DocumentId {
        self.id
    }
}

impl Keyed for Quiz {
    type Key = QuizId;

    fn key(&self) -> QuizId {
        self.id
    }
}

impl Keyed for Schedule {
    type Key = ScheduleId;

    fn key(&self) -> ScheduleId {
        self.id
    }
}

/// An in-memory cache of one server-owned collection.
///
/// Items keep their insertion order (server order for fetched pages, append
/// order for local adds). All mutators are synchronous and atomic with
/// respect to a single store.
#[derive(Debug, Clone)]
pub struct EntityStore<T: Keyed> {
    items: Vec<T>,
    is_loading: bool,
}

impl<T: Keyed> EntityStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
        }
    }

    /// Replace the whole collection, preserving the given order.
    pub fn set_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Append a fetched page after the items already held.
    ///
    /// Used by paginated reads: page 1 replaces via [`set_all`], later pages
    /// grow the collection by concatenation.
    ///
    /// [`set_all`]: EntityStore::set_all
    pub fn append_page(&mut self, items: Vec<T>) {
        self.items.extend(items);
    }

    /// Append a single record. No duplicate check is performed.
    pub fn add(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove the record with the given key.
    ///
    /// Removing a key that is not present is a silent no-op; the return
    /// value reports whether anything was removed. Call sites rely on this
    /// being safe to call unconditionally.
    pub fn remove(&mut self, key: &T::Key) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.key() != *key);
        self.items.len() != before
    }

    /// Find a record by key.
    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.items.iter().find(|item| item.key() == *key)
    }

    /// Find a record by key, mutably.
    pub fn get_mut(&mut self, key: &T::Key) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.key() == *key)
    }

    /// Reset to empty. Used on logout and on dependent-cache invalidation.
    pub fn clear(&mut self) {
        self.items.clear();
        self.is_loading = false;
    }

    /// The cached records, in order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no records.
    ///
    /// An empty store is what makes a fetch-through read go to the network.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Caller-managed loading flag for UI spinners.
    ///
    /// Not derived from in-flight requests; screens set and clear it around
    /// their own fetches.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Set the caller-managed loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }
}

impl<T: Keyed> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
