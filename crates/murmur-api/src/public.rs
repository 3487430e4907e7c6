use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use murmur_types::api::{MessageResponse, MessagesResponse, SendMessageRequest, StatusResponse};
use murmur_types::models::{Message, Principal};

use crate::auth::AppState;
use crate::error::{ApiError, run_blocking};

pub(crate) const DEFAULT_LIMIT: usize = 20;

pub(crate) const MESSAGE_SENT: &str = "message sent";
pub(crate) const MESSAGES_RECEIVED: &str = "messages received";
pub(crate) const MESSAGES_NOT_FOUND: &str = "no messages found";

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

pub(crate) fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Pages hold at least one message; larger limits are served as asked.
pub(crate) fn checked_limit(limit: usize) -> Result<usize, ApiError> {
    if limit == 0 {
        return Err(ApiError::BadRequest("limit must be at least 1".to_string()));
    }
    Ok(limit)
}

pub(crate) fn content_or_reject(req: SendMessageRequest) -> Result<String, ApiError> {
    if req.content.is_empty() {
        return Err(ApiError::BadRequest("content cannot be empty".to_string()));
    }
    Ok(req.content)
}

pub(crate) fn page_response(messages: Vec<Message>) -> MessagesResponse {
    let response = if messages.is_empty() {
        MESSAGES_NOT_FOUND
    } else {
        MESSAGES_RECEIVED
    };

    MessagesResponse {
        response: response.to_string(),
        messages: messages.into_iter().map(MessageResponse::from).collect(),
    }
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = content_or_reject(req)?;
    let message = Message::public(principal.0, content);

    run_blocking(move || state.public.send_message(message)).await?;

    Ok(Json(StatusResponse {
        response: MESSAGE_SENT.to_string(),
    }))
}

pub async fn get_messages(
    State(state): State<AppState>,
    Extension(_principal): Extension<Principal>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = checked_limit(query.limit)?;
    let offset = query.offset;

    let messages = run_blocking(move || state.public.messages(limit, offset)).await?;

    Ok(Json(page_response(messages)))
}
