use std::collections::hash_map::Entry;
use std::sync::Arc;

use murmur_types::models::User;
use murmur_types::{ChatError, Result};

use super::MemoryStore;
use crate::repository::AuthRepository;

pub struct MemoryAuthRepo {
    store: Arc<MemoryStore>,
}

impl MemoryAuthRepo {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

impl AuthRepository for MemoryAuthRepo {
    fn insert_user(&self, username: &str, password: &str) -> Result<()> {
        self.store.users.apply(|users| match users.entry(username.to_string()) {
            Entry::Occupied(_) => Err(ChatError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(User {
                    username: username.to_string(),
                    password: password.to_string(),
                });
                Ok(())
            }
        })?
    }

    fn get_user(&self, username: &str) -> Result<User> {
        self.store
            .users
            .read(|users| users.get(username).cloned())?
            .ok_or(ChatError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> MemoryAuthRepo {
        MemoryAuthRepo::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_insert_then_get() {
        let repo = repo();
        repo.insert_user("tester", "123").unwrap();

        let user = repo.get_user("tester").unwrap();
        assert_eq!(
            user,
            User {
                username: "tester".to_string(),
                password: "123".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_user() {
        assert_eq!(repo().get_user("ghost"), Err(ChatError::NotFound));
    }

    #[test]
    fn test_duplicate_registration() {
        let repo = repo();
        repo.insert_user("tester", "123").unwrap();
        assert_eq!(repo.insert_user("tester", "456"), Err(ChatError::AlreadyExists));
        // The first record survives.
        assert_eq!(repo.get_user("tester").unwrap().password, "123");
    }

    #[test]
    fn test_racing_registrations_admit_exactly_one() {
        let repo = repo();
        let wins = std::sync::atomic::AtomicUsize::new(0);

        std::thread::scope(|s| {
            for i in 0..16 {
                let (repo, wins) = (&repo, &wins);
                s.spawn(move || {
                    if repo.insert_user("contested", &i.to_string()).is_ok() {
                        wins.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(wins.into_inner(), 1);
    }

    #[test]
    fn test_concurrent_distinct_registrations() {
        let store = Arc::new(MemoryStore::new());
        let repo = MemoryAuthRepo::new(store.clone());

        std::thread::scope(|s| {
            for t in 0..8 {
                let repo = &repo;
                s.spawn(move || {
                    for i in 0..50 {
                        repo.insert_user(&format!("user-{t}-{i}"), "pw").unwrap();
                    }
                });
            }
        });

        assert_eq!(store.users.get().unwrap().len(), 400);
    }
}
