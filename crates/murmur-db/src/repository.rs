//! Repository traits (ports). Both backends implement all three; services only
//! ever see `Arc<dyn ...Repository>`.

use murmur_types::Result;
use murmur_types::models::{Message, User};

pub trait AuthRepository: Send + Sync {
    /// Store a new user. `AlreadyExists` if the username is taken.
    fn insert_user(&self, username: &str, password: &str) -> Result<()>;

    /// `NotFound` if no such user.
    fn get_user(&self, username: &str) -> Result<User>;
}

pub trait PublicRepository: Send + Sync {
    /// Append to the public log. No validation or deduplication happens here.
    fn insert_message(&self, message: Message) -> Result<()>;

    /// A page of the public log in insertion order. `OutOfRange` when
    /// `offset` is at or past the end.
    fn get_messages(&self, limit: usize, offset: usize) -> Result<Vec<Message>>;
}

pub trait PrivateRepository: Send + Sync {
    /// Append to the sender/recipient conversation, creating it on first use.
    /// `RecipientNotFound` if the recipient is not registered.
    fn insert_message(&self, message: Message) -> Result<()>;

    /// A page of the conversation between the two users, in either argument
    /// order. `ChatNotFound` if they never exchanged a message.
    fn get_messages(
        &self,
        sender: &str,
        recipient: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Message>>;

    /// Everyone `user` has a conversation with, sorted ascending.
    /// `NoCorrespondents` if there is nobody.
    fn get_users(&self, user: &str) -> Result<Vec<String>>;
}
