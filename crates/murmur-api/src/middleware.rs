use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

use crate::auth::AppState;
use crate::error::{ApiError, run_blocking};
use crate::identity::{AuthScheme, Credentials};

const MISSING_AUTH: &str = "authorization header is missing";
const INVALID_AUTH: &str = "invalid authorization header";

/// Resolve the caller through the active identity strategy and attach the
/// resulting `Principal` to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::AuthHeader(MISSING_AUTH))?
        .to_str()
        .map_err(|_| ApiError::AuthHeader(INVALID_AUTH))?;

    let credentials = parse_credentials(state.auth.resolver().scheme(), auth_header)?;

    let principal = run_blocking(move || state.auth.user_identity(&credentials)).await?;

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

fn parse_credentials(scheme: AuthScheme, auth_header: &str) -> Result<Credentials, ApiError> {
    match scheme {
        AuthScheme::Basic => {
            let encoded = auth_header
                .strip_prefix("Basic ")
                .filter(|rest| !rest.is_empty())
                .ok_or(ApiError::AuthHeader(INVALID_AUTH))?;

            let decoded = B64
                .decode(encoded.trim())
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
                .ok_or(ApiError::AuthHeader(INVALID_AUTH))?;

            let (username, password) = decoded
                .split_once(':')
                .ok_or(ApiError::AuthHeader(INVALID_AUTH))?;

            if username.is_empty() || password.is_empty() {
                return Err(ApiError::BadRequest(
                    "login and password cannot be empty".to_string(),
                ));
            }

            Ok(Credentials::Password {
                username: username.to_string(),
                password: password.to_string(),
            })
        }
        AuthScheme::Bearer => {
            let token = auth_header
                .strip_prefix("Bearer ")
                .ok_or(ApiError::AuthHeader(INVALID_AUTH))?
                .trim();

            if token.is_empty() {
                return Err(ApiError::BadRequest("token cannot be empty".to_string()));
            }

            Ok(Credentials::Token(token.to_string()))
        }
    }
}
