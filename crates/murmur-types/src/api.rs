use serde::{Deserialize, Serialize};

use crate::models::Message;

// -- Token claims --

/// Claims carried by bearer tokens. Signed with HS256.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// `token` is a signed JWT under bearer auth, and the username under basic auth.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub response: String,
    pub token: String,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub sender: String,
    pub recipient: String,
    pub content: String,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            sender: m.sender,
            recipient: m.recipient,
            content: m.content,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub response: String,
    pub messages: Vec<MessageResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub response: String,
    pub users: Vec<String>,
}

/// Plain acknowledgement, e.g. `{"response": "message sent"}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
