//! In-memory backend. State lives for the lifetime of the process only.

mod auth;
mod private;
mod public;

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{error, info};

use murmur_types::models::{Message, User};
use murmur_types::{ChatError, Result};

use crate::pair::PairKey;

pub use auth::MemoryAuthRepo;
pub use private::MemoryPrivateRepo;
pub use public::MemoryPublicRepo;

pub type UserTable = HashMap<String, User>;
pub type PublicLog = Vec<Message>;
pub type PrivateChatIndex = HashMap<PairKey, Vec<Message>>;

/// One independently locked table.
///
/// Every read-modify-write goes through a single `apply` call, which holds
/// the write lock from fetch to store.
pub struct Table<T> {
    name: &'static str,
    inner: RwLock<T>,
}

impl<T: Default> Table<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: RwLock::new(T::default()),
        }
    }
}

impl<T> Table<T> {
    /// Run `f` with shared access to the table.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        let guard = self.inner.read().map_err(|_| self.poisoned())?;
        Ok(f(&guard))
    }

    /// Run the mutator `f` with exclusive access to the table.
    pub fn apply<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut guard = self.inner.write().map_err(|_| self.poisoned())?;
        Ok(f(&mut guard))
    }

    /// Replace the whole table.
    pub fn insert(&self, value: T) -> Result<()> {
        self.apply(|table| *table = value)
    }

    fn poisoned(&self) -> ChatError {
        error!(table = self.name, "table lock poisoned");
        ChatError::Internal(format!("{} table lock poisoned", self.name))
    }
}

impl<T: Clone> Table<T> {
    /// Snapshot of the current contents. A never-written table is empty.
    pub fn get(&self) -> Result<T> {
        self.read(T::clone)
    }
}

/// The fixed set of chat tables.
pub struct MemoryStore {
    pub users: Table<UserTable>,
    pub public: Table<PublicLog>,
    pub private: Table<PrivateChatIndex>,
}

impl MemoryStore {
    pub fn new() -> Self {
        info!("In-memory store initialised");
        Self {
            users: Table::new("users"),
            public: Table::new("public_chat"),
            private: Table::new("private_chats"),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_tables_read_empty() {
        let store = MemoryStore::new();
        assert!(store.users.get().unwrap().is_empty());
        assert!(store.public.get().unwrap().is_empty());
        assert!(store.private.get().unwrap().is_empty());
    }

    #[test]
    fn test_insert_replaces_contents() {
        let store = MemoryStore::new();
        store.public.apply(|log| log.push(Message::public("a", "first"))).unwrap();

        store
            .public
            .insert(vec![Message::public("b", "x"), Message::public("b", "y")])
            .unwrap();

        let log = store.public.get().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].content, "x");
    }

    #[test]
    fn test_poisoned_lock_is_internal_error() {
        let store = MemoryStore::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            store
                .public
                .apply(|_log| -> () { panic!("writer died mid-mutation") })
                .unwrap();
        }));

        match store.public.get() {
            Err(ChatError::Internal(msg)) => assert!(msg.contains("public_chat")),
            other => panic!("expected Internal, got {:?}", other),
        }
        // Other tables are unaffected.
        assert!(store.users.get().is_ok());
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let store = MemoryStore::new();
        std::thread::scope(|s| {
            for t in 0..8 {
                let store = &store;
                s.spawn(move || {
                    for i in 0..100 {
                        store
                            .public
                            .apply(|log| log.push(Message::public(format!("t{t}"), i.to_string())))
                            .unwrap();
                    }
                });
            }
        });
        assert_eq!(store.public.get().unwrap().len(), 800);
    }
}
