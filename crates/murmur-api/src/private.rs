use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use murmur_types::api::{SendMessageRequest, StatusResponse, UsersResponse};
use murmur_types::models::{Message, Principal};

use crate::auth::AppState;
use crate::error::{ApiError, run_blocking};
use crate::public::{MESSAGE_SENT, checked_limit, content_or_reject, default_limit, page_response};

const USERS_RECEIVED: &str = "users received";

#[derive(Debug, Deserialize)]
pub struct PeerQuery {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct PeerPageQuery {
    #[serde(default)]
    pub username: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn peer_or_reject(username: String) -> Result<String, ApiError> {
    if username.is_empty() {
        return Err(ApiError::BadRequest("username query parameter is required".to_string()));
    }
    Ok(username)
}

/// POST /v1/private/messages?username=<recipient>
pub async fn send_message(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(peer): Query<PeerQuery>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recipient = peer_or_reject(peer.username)?;
    let content = content_or_reject(req)?;
    let message = Message::private(principal.0, recipient, content);

    run_blocking(move || state.private.send_message(message)).await?;

    Ok(Json(StatusResponse {
        response: MESSAGE_SENT.to_string(),
    }))
}

/// GET /v1/private/messages?username=<peer>&limit=&offset=
pub async fn get_messages(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<PeerPageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let peer = peer_or_reject(query.username)?;
    let limit = checked_limit(query.limit)?;
    let offset = query.offset;

    let messages =
        run_blocking(move || state.private.messages(principal.as_str(), &peer, limit, offset))
            .await?;

    Ok(Json(page_response(messages)))
}

/// GET /v1/private/users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let users = run_blocking(move || state.private.correspondents(principal.as_str())).await?;

    Ok(Json(UsersResponse {
        response: USERS_RECEIVED.to_string(),
        users,
    }))
}
