//! HTTP server configuration object and helpers.

use std::io;
use std::net::SocketAddr;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use mongodb::Database;
use tracing::warn;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;
const DEFAULT_SECRET_PATH: &str = "/var/run/secrets/token_secret";

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_secret: Zeroizing<Vec<u8>>,
    pub(crate) token_ttl_secs: u64,
    pub(crate) database: Option<Database>,
}

impl ServerConfig {
    /// Construct a server configuration from explicit settings.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, token_secret: Zeroizing<Vec<u8>>, token_ttl_secs: u64) -> Self {
        Self {
            bind_addr,
            token_secret,
            token_ttl_secs,
            database: None,
        }
    }

    /// Read the configuration from the environment.
    ///
    /// Recognised variables:
    ///
    /// - `BIND_ADDR`: socket address to listen on (default `0.0.0.0:8080`)
    /// - `TOKEN_TTL_SECS`: bearer token lifetime (default one day)
    /// - `TOKEN_SECRET_FILE`: path to the signing secret
    ///   (default `/var/run/secrets/token_secret`)
    ///
    /// When the secret file is unreadable, debug builds (or
    /// `TOKEN_ALLOW_EPHEMERAL=1`) fall back to a process-local random secret
    /// so tokens do not survive a restart.
    ///
    /// # Errors
    /// Returns [`io::Error`] when a variable fails to parse or the secret is
    /// unavailable outside development.
    pub fn from_env() -> io::Result<Self> {
        let bind_addr = parse_bind_addr(std::env::var("BIND_ADDR").ok())?;
        let token_ttl_secs = parse_ttl(std::env::var("TOKEN_TTL_SECS").ok())?;

        let secret_path = std::env::var("TOKEN_SECRET_FILE")
            .unwrap_or_else(|_| DEFAULT_SECRET_PATH.into());
        let token_secret = match std::fs::read(&secret_path) {
            Ok(bytes) => Zeroizing::new(bytes),
            Err(e) => {
                let allow_dev =
                    std::env::var("TOKEN_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
                if cfg!(debug_assertions) || allow_dev {
                    warn!(path = %secret_path, error = %e, "using temporary token secret (dev only)");
                    ephemeral_secret()
                } else {
                    return Err(io::Error::other(format!(
                        "failed to read token secret at {secret_path}: {e}"
                    )));
                }
            }
        };

        Ok(Self::new(bind_addr, token_secret, token_ttl_secs))
    }

    /// Attach a database handle for persistence adapters.
    ///
    /// When provided, the server uses MongoDB-backed repositories; otherwise
    /// it falls back to in-memory stores suitable only for development.
    #[must_use]
    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(
            dead_code,
            reason = "Exercised by integration tests; retained for fixture access"
        )
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

fn parse_bind_addr(raw: Option<String>) -> io::Result<SocketAddr> {
    raw.unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
        .parse()
        .map_err(|e| io::Error::other(format!("invalid BIND_ADDR: {e}")))
}

fn parse_ttl(raw: Option<String>) -> io::Result<u64> {
    match raw {
        None => Ok(DEFAULT_TOKEN_TTL_SECS),
        Some(value) => value
            .parse()
            .map_err(|e| io::Error::other(format!("invalid TOKEN_TTL_SECS: {e}"))),
    }
}

fn ephemeral_secret() -> Zeroizing<Vec<u8>> {
    let mut secret = Zeroizing::new(vec![0u8; 64]);
    OsRng.fill_bytes(&mut secret);
    secret
}
