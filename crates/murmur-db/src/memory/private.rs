use std::sync::Arc;

use murmur_types::models::Message;
use murmur_types::{ChatError, Result};

use super::MemoryStore;
use crate::pagination::paginate;
use crate::pair::PairKey;
use crate::repository::PrivateRepository;

pub struct MemoryPrivateRepo {
    store: Arc<MemoryStore>,
}

impl MemoryPrivateRepo {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

impl PrivateRepository for MemoryPrivateRepo {
    fn insert_message(&self, message: Message) -> Result<()> {
        // Users are append-only, so releasing this lock before touching the
        // chat index cannot invalidate the check.
        let registered = self
            .store
            .users
            .read(|users| users.contains_key(&message.recipient))?;
        if !registered {
            return Err(ChatError::RecipientNotFound);
        }

        let key = PairKey::new(&message.sender, &message.recipient);
        self.store
            .private
            .apply(|chats| chats.entry(key).or_default().push(message))
    }

    fn get_messages(
        &self,
        sender: &str,
        recipient: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Message>> {
        let key = PairKey::new(sender, recipient);
        self.store.private.read(|chats| {
            let chat = chats.get(&key).ok_or(ChatError::ChatNotFound)?;
            paginate(chat, limit, offset).map(<[Message]>::to_vec)
        })?
    }

    fn get_users(&self, user: &str) -> Result<Vec<String>> {
        let mut users: Vec<String> = self.store.private.read(|chats| {
            chats
                .keys()
                .filter_map(|key| key.other(user))
                .map(str::to_string)
                .collect()
        })?;

        if users.is_empty() {
            return Err(ChatError::NoCorrespondents);
        }

        users.sort();
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryAuthRepo;
    use crate::repository::AuthRepository;

    fn setup(users: &[&str]) -> MemoryPrivateRepo {
        let store = Arc::new(MemoryStore::new());
        let auth = MemoryAuthRepo::new(store.clone());
        for user in users {
            auth.insert_user(user, "pw").unwrap();
        }
        MemoryPrivateRepo::new(store)
    }

    #[test]
    fn test_alice_and_bob() {
        let repo = setup(&["alice", "bob"]);
        repo.insert_message(Message::private("alice", "bob", "hi")).unwrap();

        let expected = vec![Message::private("alice", "bob", "hi")];
        assert_eq!(repo.get_messages("alice", "bob", 10, 0).unwrap(), expected);
        assert_eq!(repo.get_messages("bob", "alice", 10, 0).unwrap(), expected);
        assert_eq!(repo.get_users("alice").unwrap(), vec!["bob"]);
        assert_eq!(repo.get_users("bob").unwrap(), vec!["alice"]);
    }

    #[test]
    fn test_both_directions_share_one_sequence() {
        let repo = setup(&["alice", "bob"]);
        repo.insert_message(Message::private("alice", "bob", "1")).unwrap();
        repo.insert_message(Message::private("bob", "alice", "2")).unwrap();
        repo.insert_message(Message::private("alice", "bob", "3")).unwrap();

        let forward = repo.get_messages("alice", "bob", 10, 0).unwrap();
        let backward = repo.get_messages("bob", "alice", 10, 0).unwrap();
        assert_eq!(forward, backward);
        let contents: Vec<_> = forward.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["1", "2", "3"]);

        assert_eq!(repo.get_messages("bob", "alice", 1, 1).unwrap()[0].content, "2");
    }

    #[test]
    fn test_unregistered_recipient() {
        let repo = setup(&["alice"]);
        assert_eq!(
            repo.insert_message(Message::private("alice", "nobody", "hi")),
            Err(ChatError::RecipientNotFound)
        );
        assert_eq!(repo.get_users("alice"), Err(ChatError::NoCorrespondents));
    }

    #[test]
    fn test_missing_chat_and_offset() {
        let repo = setup(&["alice", "bob", "carol"]);
        assert_eq!(
            repo.get_messages("alice", "carol", 10, 0),
            Err(ChatError::ChatNotFound)
        );

        repo.insert_message(Message::private("alice", "bob", "hi")).unwrap();
        assert_eq!(
            repo.get_messages("alice", "bob", 10, 1),
            Err(ChatError::OutOfRange)
        );
    }

    #[test]
    fn test_correspondents_sorted_and_unique() {
        let repo = setup(&["alice", "bob", "carol", "dave"]);
        repo.insert_message(Message::private("alice", "dave", "a")).unwrap();
        repo.insert_message(Message::private("bob", "alice", "b")).unwrap();
        repo.insert_message(Message::private("alice", "bob", "c")).unwrap();
        repo.insert_message(Message::private("carol", "alice", "d")).unwrap();
        repo.insert_message(Message::private("bob", "carol", "e")).unwrap();

        assert_eq!(repo.get_users("alice").unwrap(), vec!["bob", "carol", "dave"]);
        assert_eq!(repo.get_users("bob").unwrap(), vec!["alice", "carol"]);
        assert_eq!(repo.get_users("dave").unwrap(), vec!["alice"]);
    }

    #[test]
    fn test_self_chat_listed_once() {
        let repo = setup(&["alice"]);
        repo.insert_message(Message::private("alice", "alice", "note to self")).unwrap();
        assert_eq!(repo.get_users("alice").unwrap(), vec!["alice"]);
    }

    #[test]
    fn test_concurrent_sends_from_both_sides() {
        let repo = setup(&["alice", "bob"]);
        std::thread::scope(|s| {
            for (from, to) in [("alice", "bob"), ("bob", "alice")] {
                let repo = &repo;
                s.spawn(move || {
                    for i in 0..200 {
                        repo.insert_message(Message::private(from, to, i.to_string()))
                            .unwrap();
                    }
                });
            }
        });

        assert_eq!(repo.get_messages("alice", "bob", 1000, 0).unwrap().len(), 400);
    }
}
