use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use murmur_types::api::{RegisterRequest, RegisterResponse};

use crate::error::{ApiError, run_blocking};
use crate::services::{AuthService, PrivateService, PublicService};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub auth: AuthService,
    pub public: PublicService,
    pub private: PrivateService,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "username and password cannot be empty".to_string(),
        ));
    }

    let token = run_blocking(move || state.auth.create_user(&req.username, &req.password)).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            response: "user created".to_string(),
            token,
        }),
    ))
}
