//! Identity resolution: the two interchangeable ways a request proves who it is.

use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{debug, warn};

use murmur_db::AuthRepository;
use murmur_types::api::Claims;
use murmur_types::models::Principal;
use murmur_types::{ChatError, Result};

const TOKEN_TTL_HOURS: i64 = 12;

/// Raw credentials as lifted from the `Authorization` header.
#[derive(Debug, Clone)]
pub enum Credentials {
    Password { username: String, password: String },
    Token(String),
}

/// `Authorization` header scheme a strategy expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    Basic,
    Bearer,
}

pub trait VerifyIdentity: Send + Sync {
    /// Resolve credentials to a principal, or `Unauthorized`.
    fn verify(&self, credentials: &Credentials) -> Result<Principal>;
}

/// How passwords are stored and compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordScheme {
    /// Stored and compared verbatim.
    #[default]
    Plaintext,
    /// Stored as an Argon2id PHC string.
    Argon2,
}

impl PasswordScheme {
    /// The value to persist for `password`.
    pub fn seal(self, password: &str) -> Result<String> {
        match self {
            Self::Plaintext => Ok(password.to_string()),
            Self::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|e| ChatError::Internal(format!("password hashing failed: {}", e)))
            }
        }
    }

    pub fn matches(self, stored: &str, candidate: &str) -> bool {
        match self {
            Self::Plaintext => stored == candidate,
            Self::Argon2 => match PasswordHash::new(stored) {
                Ok(hash) => Argon2::default()
                    .verify_password(candidate.as_bytes(), &hash)
                    .is_ok(),
                Err(e) => {
                    warn!("stored password is not a valid PHC string: {}", e);
                    false
                }
            },
        }
    }
}

/// Username + password checked against the user table on every request.
pub struct PasswordStrategy {
    repo: Arc<dyn AuthRepository>,
    scheme: PasswordScheme,
}

impl PasswordStrategy {
    pub fn new(repo: Arc<dyn AuthRepository>, scheme: PasswordScheme) -> Self {
        Self { repo, scheme }
    }
}

impl VerifyIdentity for PasswordStrategy {
    fn verify(&self, credentials: &Credentials) -> Result<Principal> {
        let Credentials::Password { username, password } = credentials else {
            return Err(ChatError::Unauthorized);
        };

        let user = self.repo.get_user(username).map_err(|e| match e {
            ChatError::NotFound => {
                debug!(username = %username, "login for unknown user");
                ChatError::Unauthorized
            }
            other => other,
        })?;

        if !self.scheme.matches(&user.password, password) {
            warn!(username = %username, "incorrect password");
            return Err(ChatError::Unauthorized);
        }

        Ok(Principal(user.username))
    }
}

/// Stateless HS256 bearer tokens. Never consults the user table.
pub struct TokenStrategy {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenStrategy {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    pub fn mint(&self, subject: &str) -> Result<String> {
        self.mint_at(subject, Utc::now())
    }

    /// Mint a token as if issued at `issued_at`.
    pub fn mint_at(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ChatError::Internal(format!("token signing failed: {}", e)))
    }
}

impl VerifyIdentity for TokenStrategy {
    fn verify(&self, credentials: &Credentials) -> Result<Principal> {
        let Credentials::Token(token) = credentials else {
            return Err(ChatError::Unauthorized);
        };

        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            warn!("rejected bearer token: {}", e);
            ChatError::Unauthorized
        })?;

        Ok(Principal(data.claims.sub))
    }
}

/// The active strategy, chosen once at startup.
pub enum IdentityResolver {
    Password(PasswordStrategy),
    Token(TokenStrategy),
}

impl IdentityResolver {
    pub fn scheme(&self) -> AuthScheme {
        match self {
            Self::Password(_) => AuthScheme::Basic,
            Self::Token(_) => AuthScheme::Bearer,
        }
    }

    /// The value to persist as a new user's password.
    pub fn seal_password(&self, password: &str) -> Result<String> {
        match self {
            Self::Password(strategy) => strategy.scheme.seal(password),
            // Token mode never checks passwords; keep them as given.
            Self::Token(_) => Ok(password.to_string()),
        }
    }

    /// What a freshly registered user gets back: a token, or their username.
    pub fn issue(&self, username: &str) -> Result<String> {
        match self {
            Self::Password(_) => Ok(username.to_string()),
            Self::Token(strategy) => strategy.mint(username),
        }
    }
}

impl VerifyIdentity for IdentityResolver {
    fn verify(&self, credentials: &Credentials) -> Result<Principal> {
        match self {
            Self::Password(strategy) => strategy.verify(credentials),
            Self::Token(strategy) => strategy.verify(credentials),
        }
    }
}
