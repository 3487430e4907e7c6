use thiserror::Error;

/// Errors shared by the repositories, the identity strategies and the services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("user not found")]
    NotFound,

    #[error("user already exists")]
    AlreadyExists,

    #[error("this user does not exist")]
    RecipientNotFound,

    #[error("no chat with this user")]
    ChatNotFound,

    #[error("no users who have written to you")]
    NoCorrespondents,

    /// Pagination offset past the end of the sequence. Services turn this
    /// into an empty page; it is not meant to reach clients.
    #[error("offset is out of range")]
    OutOfRange,

    #[error("unauthorized")]
    Unauthorized,

    /// The store is in a state its own writers never produce.
    #[error("internal invariant violation: {0}")]
    Internal(String),

    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, ChatError>;
