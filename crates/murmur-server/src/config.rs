use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use murmur_api::identity::PasswordScheme;

pub const DEFAULT_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Memory,
    Sqlite(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Basic,
    Bearer,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub storage: Storage,
    pub auth: AuthMode,
    pub jwt_secret: String,
    pub password_scheme: PasswordScheme,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Unset keys take their defaults,
    /// unrecognised values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host: IpAddr = var("MURMUR_HOST", "0.0.0.0")
            .parse()
            .context("MURMUR_HOST is not an IP address")?;
        let port: u16 = var("MURMUR_PORT", "8080")
            .parse()
            .context("MURMUR_PORT is not a port number")?;

        let storage = match var("MURMUR_STORAGE", "memory").as_str() {
            "memory" => Storage::Memory,
            "sqlite" => Storage::Sqlite(PathBuf::from(var("MURMUR_DB_PATH", "murmur.db"))),
            other => bail!("MURMUR_STORAGE must be `memory` or `sqlite`, got `{}`", other),
        };

        let auth = match var("MURMUR_AUTH", "basic").as_str() {
            "basic" => AuthMode::Basic,
            "bearer" => AuthMode::Bearer,
            other => bail!("MURMUR_AUTH must be `basic` or `bearer`, got `{}`", other),
        };

        let password_scheme = match var("MURMUR_PASSWORD_HASHING", "plain").as_str() {
            "plain" => PasswordScheme::Plaintext,
            "argon2" => PasswordScheme::Argon2,
            other => bail!(
                "MURMUR_PASSWORD_HASHING must be `plain` or `argon2`, got `{}`",
                other
            ),
        };

        Ok(Self {
            addr: SocketAddr::new(host, port),
            storage,
            auth,
            jwt_secret: var("MURMUR_JWT_SECRET", DEFAULT_JWT_SECRET),
            password_scheme,
        })
    }
}
