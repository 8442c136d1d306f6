//! Driver-resilient connection resolution
//!
//! Deployment environments have an unpredictable subset of client
//! capabilities, so the resolver walks a fixed, priority-ordered list of
//! protocol profiles (most capable first, legacy last) and returns the first
//! handle that opens. Transport errors never escape to the caller; every
//! attempt is recorded as a typed outcome and logged, and total failure is a
//! sentinel, not an error.

use std::time::Duration;
use tiberius::{AuthMethod, Config, EncryptionLevel};
use tokio::net::TcpStream;
use tokio_util::compat::TokioAsyncWriteCompatExt;
use spdiff_core::{ConnectionTarget, CredentialMode};

use crate::connection::{MssqlConnection, MssqlConnectionError};

/// Per-attempt budget. An unreachable host fails fast instead of hanging the
/// interactive session; worst case latency is candidates x this timeout.
pub(crate) const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_PORT: u16 = 1433;

/// How much of the TDS stream a candidate encrypts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WireSecurity {
    TlsRequired,
    TlsNegotiated,
    TlsLoginOnly,
    Plaintext,
}

impl WireSecurity {
    fn encryption_level(self) -> EncryptionLevel {
        match self {
            WireSecurity::TlsRequired => EncryptionLevel::Required,
            WireSecurity::TlsNegotiated => EncryptionLevel::On,
            WireSecurity::TlsLoginOnly => EncryptionLevel::Off,
            WireSecurity::Plaintext => EncryptionLevel::NotSupported,
        }
    }
}

/// One probe-able protocol profile.
#[derive(Clone, Copy, Debug)]
pub struct DriverCandidate {
    pub name: &'static str,
    security: WireSecurity,
}

impl DriverCandidate {
    /// Whether this profile is usable in the current build.
    ///
    /// Profiles that encrypt any part of the stream need the TLS backend
    /// compiled in; the plaintext legacy profile is always present.
    pub fn available(&self) -> bool {
        match self.security {
            WireSecurity::Plaintext => true,
            _ => cfg!(feature = "tls"),
        }
    }
}

/// Candidate profiles in probe order, most capable first.
pub const DRIVER_CANDIDATES: &[DriverCandidate] = &[
    DriverCandidate {
        name: "tds-tls-required",
        security: WireSecurity::TlsRequired,
    },
    DriverCandidate {
        name: "tds-tls-negotiated",
        security: WireSecurity::TlsNegotiated,
    },
    DriverCandidate {
        name: "tds-tls-login-only",
        security: WireSecurity::TlsLoginOnly,
    },
    DriverCandidate {
        name: "tds-plaintext",
        security: WireSecurity::Plaintext,
    },
];

/// Outcome of probing one candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    Connected,
    Failed(String),
    /// Candidate not present in this build; skipped without a network attempt
    Unavailable,
}

/// Record of one candidate probe, kept for diagnostics only.
#[derive(Clone, Debug)]
pub struct Attempt {
    pub candidate: &'static str,
    pub outcome: AttemptOutcome,
}

/// Aggregated result of a resolution walk.
///
/// `handle` is `None` when every candidate was unavailable or failed; the
/// attempt log retains the reasons so they can be written to the diagnostic
/// log without leaking into the UI.
#[derive(Debug)]
pub struct Resolution {
    pub handle: Option<MssqlConnection>,
    pub attempts: Vec<Attempt>,
}

impl Resolution {
    pub fn connected(&self) -> bool {
        self.handle.is_some()
    }

    pub fn into_handle(self) -> Option<MssqlConnection> {
        self.handle
    }

    /// Reason of the last failed attempt, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.attempts.iter().rev().find_map(|a| match &a.outcome {
            AttemptOutcome::Failed(reason) => Some(reason.as_str()),
            _ => None,
        })
    }
}

/// Split a `host` or `host,port` target string (SSMS convention).
pub(crate) fn parse_host(host: &str) -> (String, u16) {
    match host.split_once(',') {
        Some((name, port)) => {
            let port = port.trim().parse().unwrap_or(DEFAULT_PORT);
            (name.trim().to_string(), port)
        }
        None => (host.trim().to_string(), DEFAULT_PORT),
    }
}

/// Build a tiberius config for one candidate against one target.
///
/// Certificate trust is always bypassed: the deployment targets internal
/// servers with self-signed or missing certs. Empty credentials select
/// integrated auth as an explicit mode switch, never as an error fallback.
pub(crate) fn build_config(
    candidate: &DriverCandidate,
    target: &ConnectionTarget,
) -> Result<Config, String> {
    let (host, port) = parse_host(&target.host);

    let mut config = Config::new();
    config.host(host);
    config.port(port);
    config.encryption(candidate.security.encryption_level());
    config.trust_cert();

    if let Some(database) = target.database.as_deref() {
        config.database(database);
    }

    match target.credential_mode() {
        CredentialMode::SqlServer { user, pass } => {
            config.authentication(AuthMethod::sql_server(user, pass));
        }
        CredentialMode::Integrated => {
            #[cfg(windows)]
            {
                config.authentication(AuthMethod::Integrated);
            }
            #[cfg(not(windows))]
            {
                return Err("integrated authentication requires a Windows host".to_string());
            }
        }
    }

    Ok(config)
}

async fn try_connect(
    config: Config,
    database: Option<String>,
) -> Result<MssqlConnection, MssqlConnectionError> {
    let connect = async {
        let tcp = TcpStream::connect(config.get_addr())
            .await
            .map_err(|e| MssqlConnectionError::ConnectionFailed(e.to_string()))?;
        tcp.set_nodelay(true)?;

        let client = tiberius::Client::connect(config, tcp.compat_write())
            .await
            .map_err(|e| MssqlConnectionError::ConnectionFailed(e.to_string()))?;

        Ok(MssqlConnection::new(client, database))
    };

    match tokio::time::timeout(CONNECT_TIMEOUT, connect).await {
        Ok(result) => result,
        Err(_) => Err(MssqlConnectionError::Timeout(CONNECT_TIMEOUT.as_secs())),
    }
}

/// Resolve a target into a live connection, or the no-connection sentinel.
///
/// Walks `DRIVER_CANDIDATES` in order, skipping profiles absent from this
/// build, and stops at the first successful open. Never returns an error:
/// underlying failures are logged and kept in the attempt record only.
#[tracing::instrument(skip(target), fields(host = %target.host, database = target.database.as_deref()))]
pub async fn resolve(target: &ConnectionTarget) -> Resolution {
    let mut attempts = Vec::with_capacity(DRIVER_CANDIDATES.len());

    if target.host.trim().is_empty() {
        tracing::warn!("empty host, nothing to resolve");
        return Resolution {
            handle: None,
            attempts,
        };
    }

    for candidate in DRIVER_CANDIDATES {
        if !candidate.available() {
            tracing::debug!(candidate = candidate.name, "candidate unavailable, skipping");
            attempts.push(Attempt {
                candidate: candidate.name,
                outcome: AttemptOutcome::Unavailable,
            });
            continue;
        }

        let config = match build_config(candidate, target) {
            Ok(config) => config,
            Err(reason) => {
                tracing::debug!(candidate = candidate.name, %reason, "candidate rejected");
                attempts.push(Attempt {
                    candidate: candidate.name,
                    outcome: AttemptOutcome::Failed(reason),
                });
                continue;
            }
        };

        match try_connect(config, target.database.clone()).await {
            Ok(handle) => {
                tracing::debug!(candidate = candidate.name, "connected");
                attempts.push(Attempt {
                    candidate: candidate.name,
                    outcome: AttemptOutcome::Connected,
                });
                return Resolution {
                    handle: Some(handle),
                    attempts,
                };
            }
            Err(e) => {
                tracing::debug!(candidate = candidate.name, error = %e, "candidate failed");
                attempts.push(Attempt {
                    candidate: candidate.name,
                    outcome: AttemptOutcome::Failed(e.to_string()),
                });
            }
        }
    }

    let resolution = Resolution {
        handle: None,
        attempts,
    };
    tracing::error!(
        last_error = resolution.last_error(),
        "no candidate produced a connection"
    );
    resolution
}
