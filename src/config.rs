// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup by [`ServerConfig::from_env`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `DATA_DIR` | Directory holding the document store | `./data` |
//! | `JWT_SECRET` | HS256 signing secret for bearer tokens | Required |
//! | `TOKEN_TTL_SECS` | Bearer token lifetime in seconds | `3600` |
//! | `TLS_CERT_PATH` | PEM certificate chain (enables HTTPS) | Optional |
//! | `TLS_KEY_PATH` | PEM private key (enables HTTPS) | Optional |
//! | `SEED_USER_EMAIL` | Email of an account created at startup | Optional |
//! | `SEED_USER_PASSWORD` | Password of the seeded account | Optional |
//! | `SERVICES_SEED_FILE` | JSON array of services loaded at startup | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the data directory path.
///
/// The redb database file `bic.redb` lives directly under this directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable holding the token signing secret.
///
/// Never compiled into the binary; startup fails when it is absent or empty.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECS";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const SEED_USER_EMAIL_ENV: &str = "SEED_USER_EMAIL";
pub const SEED_USER_PASSWORD_ENV: &str = "SEED_USER_PASSWORD";
pub const SERVICES_SEED_FILE_ENV: &str = "SERVICES_SEED_FILE";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Tokens are valid for one hour unless `TOKEN_TTL_SECS` says otherwise.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Default `RUST_LOG` filter when none is set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Database file name inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "bic.redb";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    IncompleteTls,

    #[error("SEED_USER_EMAIL and SEED_USER_PASSWORD must be set together")]
    IncompleteSeedUser,
}

/// Paths to a PEM certificate chain and private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Account created at startup if it does not exist yet.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SeedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedUser")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Fully resolved server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub tls: Option<TlsPaths>,
    pub seed_user: Option<SeedUser>,
    pub services_seed_file: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("data_dir", &self.data_dir)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("tls", &self.tls)
            .field("seed_user", &self.seed_user)
            .field("services_seed_file", &self.services_seed_file)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables.
    ///
    /// Empty values are treated as unset.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.trim().is_empty())
            .collect();
        let get = |name: &str| vars.get(name).map(String::as_str);

        let host = get(HOST_ENV).unwrap_or(DEFAULT_HOST);
        let port = match get(PORT_ENV) {
            Some(raw) => parse_var(PORT_ENV, raw)?,
            None => DEFAULT_PORT,
        };
        let bind_addr: SocketAddr =
            format!("{host}:{port}")
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    name: HOST_ENV,
                    value: host.to_string(),
                })?;

        let jwt_secret = get(JWT_SECRET_ENV)
            .ok_or(ConfigError::Missing(JWT_SECRET_ENV))?
            .to_string();

        let token_ttl = match get(TOKEN_TTL_ENV) {
            Some(raw) => {
                let secs: u64 = parse_var(TOKEN_TTL_ENV, raw)?;
                if secs == 0 || i64::try_from(secs).is_err() {
                    return Err(ConfigError::Invalid {
                        name: TOKEN_TTL_ENV,
                        value: raw.to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TOKEN_TTL,
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: PathBuf::from(cert),
                key: PathBuf::from(key),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        let seed_user = match (get(SEED_USER_EMAIL_ENV), get(SEED_USER_PASSWORD_ENV)) {
            (Some(email), Some(password)) => Some(SeedUser {
                email: email.to_string(),
                password: password.to_string(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteSeedUser),
        };

        let log_format = match get(LOG_FORMAT_ENV) {
            Some(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(raw) if raw.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            Some(raw) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: raw.to_string(),
                })
            }
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            data_dir: PathBuf::from(get(DATA_DIR_ENV).unwrap_or(DEFAULT_DATA_DIR)),
            jwt_secret,
            token_ttl,
            tls,
            seed_user,
            services_seed_file: get(SERVICES_SEED_FILE_ENV).map(PathBuf::from),
            log_format,
        })
    }

    /// Path to the redb database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![(JWT_SECRET_ENV, "test-secret")]
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = ServerConfig::from_vars(base()).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:5000".parse().unwrap());
        assert_eq!(config.token_ttl, Duration::from_secs(3600));
        assert_eq!(config.database_path(), PathBuf::from("./data/bic.redb"));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.tls.is_none());
        assert!(config.seed_user.is_none());
    }

    #[test]
    fn token_ttl_must_fit_a_timestamp() {
        let mut vars = base();
        vars.push((TOKEN_TTL_ENV, "18446744073709551615"));
        assert_eq!(
            ServerConfig::from_vars(vars).unwrap_err(),
            ConfigError::Invalid {
                name: TOKEN_TTL_ENV,
                value: "18446744073709551615".to_string(),
            }
        );

        let mut vars = base();
        vars.push((TOKEN_TTL_ENV, "0"));
        assert!(ServerConfig::from_vars(vars).is_err());
    }

    #[test]
    fn missing_secret_is_rejected() {
        let result = ServerConfig::from_vars(Vec::<(String, String)>::new());
        assert_eq!(result.unwrap_err(), ConfigError::Missing(JWT_SECRET_ENV));

        let result = ServerConfig::from_vars(vec![(JWT_SECRET_ENV, "   ")]);
        assert_eq!(result.unwrap_err(), ConfigError::Missing(JWT_SECRET_ENV));
    }

    #[test]
    fn overrides_are_parsed() {
        let mut vars = base();
        vars.extend([
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "8443"),
            (TOKEN_TTL_ENV, "600"),
            (DATA_DIR_ENV, "/var/lib/bic"),
            (LOG_FORMAT_ENV, "JSON"),
            (TLS_CERT_PATH_ENV, "/etc/bic/cert.pem"),
            (TLS_KEY_PATH_ENV, "/etc/bic/key.pem"),
        ]);
        let config = ServerConfig::from_vars(vars).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8443".parse().unwrap());
        assert_eq!(config.token_ttl, Duration::from_secs(600));
        assert_eq!(config.database_path(), PathBuf::from("/var/lib/bic/bic.redb"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.tls,
            Some(TlsPaths {
                cert: PathBuf::from("/etc/bic/cert.pem"),
                key: PathBuf::from("/etc/bic/key.pem"),
            })
        );
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let mut vars = base();
        vars.push((PORT_ENV, "not-a-port"));
        assert!(matches!(
            ServerConfig::from_vars(vars),
            Err(ConfigError::Invalid { name: PORT_ENV, .. })
        ));

        let mut vars = base();
        vars.push((TOKEN_TTL_ENV, "0"));
        assert!(matches!(
            ServerConfig::from_vars(vars),
            Err(ConfigError::Invalid { name: TOKEN_TTL_ENV, .. })
        ));
    }

    #[test]
    fn half_configured_pairs_are_rejected() {
        let mut vars = base();
        vars.push((TLS_CERT_PATH_ENV, "/etc/bic/cert.pem"));
        assert_eq!(
            ServerConfig::from_vars(vars).unwrap_err(),
            ConfigError::IncompleteTls
        );

        let mut vars = base();
        vars.push((SEED_USER_EMAIL_ENV, "admin@bic.example"));
        assert_eq!(
            ServerConfig::from_vars(vars).unwrap_err(),
            ConfigError::IncompleteSeedUser
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut vars = base();
        vars.extend([
            (SEED_USER_EMAIL_ENV, "admin@bic.example"),
            (SEED_USER_PASSWORD_ENV, "hunter2!A"),
        ]);
        let config = ServerConfig::from_vars(vars).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("test-secret"));
        assert!(!rendered.contains("hunter2!A"));
        assert!(rendered.contains("admin@bic.example"));
    }
}
