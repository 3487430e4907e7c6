use serde::{Deserialize, Serialize};

/// A registered account. The password field holds whatever the active
/// password scheme stored: the raw password, or an Argon2 PHC string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
}

/// A chat message. `recipient` is empty for messages on the public log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub recipient: String,
    pub content: String,
}

impl Message {
    pub fn public(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            recipient: String::new(),
            content: content.into(),
        }
    }

    pub fn private(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            content: content.into(),
        }
    }
}

/// The verified identity attached to a request after authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(pub String);

impl Principal {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
