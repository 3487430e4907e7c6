/// Database row types, mapped onto the shared models at the repository edge.
use murmur_types::models::{Message, User};

pub struct UserRow {
    pub username: String,
    pub password: String,
}

pub struct MessageRow {
    pub sender: String,
    pub recipient: String,
    pub content: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            username: row.username,
            password: row.password,
        }
    }
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            sender: row.sender,
            recipient: row.recipient,
            content: row.content,
        }
    }
}
