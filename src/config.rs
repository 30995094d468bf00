// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and turned
//! into immutable settings structs.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET_KEY` | Standard base64 HMAC-SHA256 secret, padded or unpadded (at least 256 bits) | Required |
//! | `JWT_ACCESS_TOKEN_TTL_SECS` | Access token lifetime in seconds | `1800` |
//! | `JWT_REFRESH_TOKEN_TTL_SECS` | Refresh token lifetime in seconds | `1209600` |
//! | `DATA_DIR` | Root directory of the member store | In-memory store |
//! | `SEED_MEMBER_ID` | Member inserted at startup | None |
//! | `SEED_MEMBER_ROLES` | Comma-separated roles of the seed member | `ROLE_USER` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use base64ct::{Base64, Base64Unpadded, Encoding};

use crate::auth::claims::ROLES_SEPARATOR;
use crate::auth::Role;

/// Environment variable name for the base64 token signing secret.
pub const JWT_SECRET_KEY_ENV: &str = "JWT_SECRET_KEY";

/// Environment variable name for the access token lifetime.
pub const ACCESS_TOKEN_TTL_ENV: &str = "JWT_ACCESS_TOKEN_TTL_SECS";

/// Environment variable name for the refresh token lifetime.
pub const REFRESH_TOKEN_TTL_ENV: &str = "JWT_REFRESH_TOKEN_TTL_SECS";

/// Environment variable name for the member store directory.
///
/// When unset the server keeps members in memory only.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const SEED_MEMBER_ID_ENV: &str = "SEED_MEMBER_ID";
pub const SEED_MEMBER_ROLES_ENV: &str = "SEED_MEMBER_ROLES";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default access token lifetime (30 minutes).
pub const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Default refresh token lifetime (14 days).
pub const DEFAULT_REFRESH_TOKEN_TTL: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// HS256 keys shorter than this are rejected.
pub const MIN_SECRET_BYTES: usize = 32;

/// Configuration errors. All of them abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
    #[error("JWT_SECRET_KEY decodes to {bits} bits; HS256 requires at least 256 bits")]
    WeakSecret { bits: usize },
}

/// Token signing configuration.
#[derive(Clone)]
pub struct AuthSettings {
    secret: Vec<u8>,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl AuthSettings {
    /// Build settings from a base64 secret and the two token lifetimes.
    pub fn new(
        secret_base64: &str,
        access_token_ttl: Duration,
        refresh_token_ttl: Duration,
    ) -> Result<Self, ConfigError> {
        let secret_base64 = secret_base64.trim();
        let secret = Base64::decode_vec(secret_base64)
            .or_else(|_| Base64Unpadded::decode_vec(secret_base64))
            .map_err(|e| ConfigError::Invalid {
                var: JWT_SECRET_KEY_ENV,
                reason: format!("not valid base64: {e}"),
            })?;

        if secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::WeakSecret {
                bits: secret.len() * 8,
            });
        }

        for (var, ttl) in [
            (ACCESS_TOKEN_TTL_ENV, access_token_ttl),
            (REFRESH_TOKEN_TTL_ENV, refresh_token_ttl),
        ] {
            if ttl.is_zero() {
                return Err(ConfigError::Invalid {
                    var,
                    reason: "lifetime must be positive".to_string(),
                });
            }
        }

        Ok(Self {
            secret,
            access_token_ttl,
            refresh_token_ttl,
        })
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = get(JWT_SECRET_KEY_ENV)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing(JWT_SECRET_KEY_ENV))?;

        let access = parse_secs(&get, ACCESS_TOKEN_TTL_ENV)?.unwrap_or(DEFAULT_ACCESS_TOKEN_TTL);
        let refresh =
            parse_secs(&get, REFRESH_TOKEN_TTL_ENV)?.unwrap_or(DEFAULT_REFRESH_TOKEN_TTL);

        Self::new(&secret, access, refresh)
    }

    /// Raw HMAC key bytes.
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Member created at startup, for bootstrapping an empty store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedMember {
    pub member_id: String,
    pub roles: Vec<String>,
}

/// Process-level settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub data_dir: Option<PathBuf>,
    pub log_format: LogFormat,
    pub seed_member: Option<SeedMember>,
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get(HOST_ENV).unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match get(PORT_ENV) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: PORT_ENV,
                reason: format!("{e}"),
            })?,
            None => 8080,
        };

        let log_format = match get(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            None | Some("") | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: LOG_FORMAT_ENV,
                    reason: format!("unknown format '{other}' (expected 'json' or 'pretty')"),
                })
            }
        };

        let seed_member = get(SEED_MEMBER_ID_ENV)
            .filter(|id| !id.trim().is_empty())
            .map(|member_id| {
                let roles = get(SEED_MEMBER_ROLES_ENV)
                    .map(|raw| {
                        raw.split(ROLES_SEPARATOR)
                            .map(str::trim)
                            .filter(|r| !r.is_empty())
                            .map(str::to_string)
                            .collect::<Vec<_>>()
                    })
                    .filter(|roles| !roles.is_empty())
                    .unwrap_or_else(|| vec![Role::default().to_string()]);
                SeedMember {
                    member_id: member_id.trim().to_string(),
                    roles,
                }
            });

        Ok(Self {
            host,
            port,
            data_dir: get(DATA_DIR_ENV)
                .filter(|d| !d.trim().is_empty())
                .map(PathBuf::from),
            log_format,
            seed_member,
        })
    }
}

fn parse_secs(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    get(var)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::Invalid {
                    var,
                    reason: format!("expected whole seconds: {e}"),
                })
        })
        .transpose()
}
