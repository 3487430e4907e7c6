use std::sync::Arc;

use murmur_types::models::{Message, User};
use murmur_types::{ChatError, Result};

use super::{Database, queries, storage};
use crate::pair::PairKey;
use crate::repository::{AuthRepository, PrivateRepository, PublicRepository};

pub struct SqliteAuthRepo {
    db: Arc<Database>,
}

impl SqliteAuthRepo {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl AuthRepository for SqliteAuthRepo {
    fn insert_user(&self, username: &str, password: &str) -> Result<()> {
        self.db.with_conn(|conn| {
            if queries::user_exists(conn, username).map_err(storage)? {
                return Err(ChatError::AlreadyExists);
            }
            queries::insert_user(conn, username, password).map_err(storage)
        })
    }

    fn get_user(&self, username: &str) -> Result<User> {
        self.db.with_conn(|conn| {
            queries::query_user_by_username(conn, username)
                .map_err(storage)?
                .map(User::from)
                .ok_or(ChatError::NotFound)
        })
    }
}

pub struct SqlitePublicRepo {
    db: Arc<Database>,
}

impl SqlitePublicRepo {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl PublicRepository for SqlitePublicRepo {
    fn insert_message(&self, message: Message) -> Result<()> {
        self.db
            .with_conn(|conn| queries::insert_public_message(conn, &message).map_err(storage))
    }

    fn get_messages(&self, limit: usize, offset: usize) -> Result<Vec<Message>> {
        self.db.with_conn(|conn| {
            let total = queries::count_public_messages(conn).map_err(storage)?;
            let offset = window_start(offset, total)?;

            let rows = queries::query_public_messages(conn, to_sql_int(limit), offset)
                .map_err(storage)?;
            Ok(rows.into_iter().map(Message::from).collect())
        })
    }
}

pub struct SqlitePrivateRepo {
    db: Arc<Database>,
}

impl SqlitePrivateRepo {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl PrivateRepository for SqlitePrivateRepo {
    fn insert_message(&self, message: Message) -> Result<()> {
        let key = PairKey::new(&message.sender, &message.recipient);
        self.db.with_conn(|conn| {
            if !queries::user_exists(conn, &message.recipient).map_err(storage)? {
                return Err(ChatError::RecipientNotFound);
            }
            queries::insert_private_message(conn, &key, &message).map_err(storage)
        })
    }

    fn get_messages(
        &self,
        sender: &str,
        recipient: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Message>> {
        let key = PairKey::new(sender, recipient);
        self.db.with_conn(|conn| {
            let total = queries::count_private_messages(conn, &key).map_err(storage)?;
            if total == 0 {
                return Err(ChatError::ChatNotFound);
            }
            let offset = window_start(offset, total)?;

            let rows = queries::query_private_messages(conn, &key, to_sql_int(limit), offset)
                .map_err(storage)?;
            Ok(rows.into_iter().map(Message::from).collect())
        })
    }

    fn get_users(&self, user: &str) -> Result<Vec<String>> {
        let users = self
            .db
            .with_conn(|conn| queries::query_correspondents(conn, user).map_err(storage))?;

        if users.is_empty() {
            return Err(ChatError::NoCorrespondents);
        }
        Ok(users)
    }
}

/// Same boundary rule as `pagination::paginate`: the offset must point at an
/// existing row.
fn window_start(offset: usize, total: i64) -> Result<i64> {
    let offset = to_sql_int(offset);
    if offset >= total {
        return Err(ChatError::OutOfRange);
    }
    Ok(offset)
}

fn to_sql_int(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repos() -> (SqliteAuthRepo, SqlitePublicRepo, SqlitePrivateRepo) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        (
            SqliteAuthRepo::new(db.clone()),
            SqlitePublicRepo::new(db.clone()),
            SqlitePrivateRepo::new(db),
        )
    }

    #[test]
    fn test_users() {
        let (auth, _, _) = repos();
        auth.insert_user("tester", "123").unwrap();
        assert_eq!(auth.insert_user("tester", "123"), Err(ChatError::AlreadyExists));
        assert_eq!(auth.get_user("tester").unwrap().password, "123");
        assert_eq!(auth.get_user("ghost"), Err(ChatError::NotFound));
    }

    #[test]
    fn test_public_pagination() {
        let (_, public, _) = repos();
        assert_eq!(public.get_messages(10, 0), Err(ChatError::OutOfRange));

        for content in ["one", "two", "three"] {
            public.insert_message(Message::public("tester", content)).unwrap();
        }

        assert_eq!(
            public.get_messages(2, 2).unwrap(),
            vec![Message::public("tester", "three")]
        );
        assert_eq!(public.get_messages(usize::MAX, 0).unwrap().len(), 3);
        assert_eq!(public.get_messages(2, 5), Err(ChatError::OutOfRange));
    }

    #[test]
    fn test_public_message_keeps_recipient() {
        let (_, public, _) = repos();
        let addressed = Message::private("tester", "everyone", "hello");
        public.insert_message(Message::public("tester", "plain")).unwrap();
        public.insert_message(addressed.clone()).unwrap();

        assert_eq!(
            public.get_messages(10, 0).unwrap(),
            vec![Message::public("tester", "plain"), addressed]
        );
    }

    #[test]
    fn test_private_chat_matches_memory_semantics() {
        let (auth, _, private) = repos();
        auth.insert_user("alice", "pw").unwrap();
        auth.insert_user("bob", "pw").unwrap();

        assert_eq!(
            private.insert_message(Message::private("alice", "nobody", "hi")),
            Err(ChatError::RecipientNotFound)
        );
        assert_eq!(
            private.get_messages("alice", "bob", 10, 0),
            Err(ChatError::ChatNotFound)
        );
        assert_eq!(private.get_users("alice"), Err(ChatError::NoCorrespondents));

        private.insert_message(Message::private("alice", "bob", "hi")).unwrap();
        private.insert_message(Message::private("bob", "alice", "hey")).unwrap();

        let forward = private.get_messages("alice", "bob", 10, 0).unwrap();
        assert_eq!(forward, private.get_messages("bob", "alice", 10, 0).unwrap());
        assert_eq!(
            forward,
            vec![
                Message::private("alice", "bob", "hi"),
                Message::private("bob", "alice", "hey"),
            ]
        );
        assert_eq!(
            private.get_messages("bob", "alice", 10, 2),
            Err(ChatError::OutOfRange)
        );

        assert_eq!(private.get_users("alice").unwrap(), vec!["bob"]);
        assert_eq!(private.get_users("bob").unwrap(), vec!["alice"]);
    }

    #[test]
    fn test_correspondents_sorted_and_distinct() {
        let (auth, _, private) = repos();
        for user in ["alice", "bob", "carol", "dave"] {
            auth.insert_user(user, "pw").unwrap();
        }
        private.insert_message(Message::private("alice", "dave", "a")).unwrap();
        private.insert_message(Message::private("bob", "alice", "b")).unwrap();
        private.insert_message(Message::private("alice", "bob", "c")).unwrap();
        private.insert_message(Message::private("carol", "alice", "d")).unwrap();
        private.insert_message(Message::private("alice", "alice", "e")).unwrap();

        assert_eq!(
            private.get_users("alice").unwrap(),
            vec!["alice", "bob", "carol", "dave"]
        );
    }

    #[test]
    fn test_open_error_names_the_path() {
        let path = std::env::temp_dir()
            .join(format!("murmur-missing-{}", std::process::id()))
            .join("chat.db");

        let err = Database::open(&path).err().unwrap();
        assert!(err.to_string().starts_with("opening "));
        assert!(err.to_string().contains("chat.db"));
    }

    #[test]
    fn test_open_on_disk_survives_reopen() {
        let path = std::env::temp_dir().join(format!("murmur-test-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        {
            let db = Arc::new(Database::open(&path).unwrap());
            SqliteAuthRepo::new(db).insert_user("alice", "pw").unwrap();
        }
        {
            let db = Arc::new(Database::open(&path).unwrap());
            assert!(SqliteAuthRepo::new(db).get_user("alice").is_ok());
        }

        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_file(path.with_extension("db-wal"));
        let _ = std::fs::remove_file(path.with_extension("db-shm"));
    }
}
