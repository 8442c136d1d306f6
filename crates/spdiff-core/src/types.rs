//! Plain data types shared across the spdiff crates

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Everything needed to address one SQL Server instance.
///
/// Ephemeral: one `ConnectionTarget` is built per user action and dropped
/// when the action completes. Nothing here is ever persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    /// Server hostname or address, optionally `host,port`
    pub host: String,
    /// Selected database; `None` connects at instance scope
    pub database: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ConnectionTarget {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            database: None,
            username: None,
            password: None,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Copy of this target addressed at the `master` database.
    ///
    /// Database enumeration always runs against `master`; metadata and
    /// content queries run against the explicitly selected database. The
    /// connection layer never moves a handle between the two scopes.
    pub fn master_scoped(&self) -> Self {
        let mut target = self.clone();
        target.database = Some("master".to_string());
        target
    }

    /// The credential mode this target asks for.
    pub fn credential_mode(&self) -> CredentialMode {
        CredentialMode::from_credentials(self.username.as_deref(), self.password.as_deref())
    }

    /// Stable identity for caches keyed by credential, without the password.
    pub fn credential_identity(&self) -> String {
        match self.credential_mode() {
            CredentialMode::Integrated => "integrated".to_string(),
            CredentialMode::SqlServer { user, .. } => format!("sql:{user}"),
        }
    }
}

impl std::fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionTarget")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// How to authenticate against the server.
///
/// An empty username or password is an explicit request for the ambient
/// identity of the current process, not an error fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialMode {
    /// Trusted/integrated authentication with the OS identity
    Integrated,
    /// SQL Server authentication with an explicit user and password
    SqlServer { user: String, pass: String },
}

impl CredentialMode {
    /// Derive the mode from an optional credential pair.
    ///
    /// Missing or empty values on either side select integrated auth; an
    /// empty string is never embedded into connection parameters.
    pub fn from_credentials(username: Option<&str>, password: Option<&str>) -> Self {
        match (username, password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                CredentialMode::SqlServer {
                    user: user.to_string(),
                    pass: pass.to_string(),
                }
            }
            _ => CredentialMode::Integrated,
        }
    }
}

/// One stored procedure discovered on a server.
///
/// (schema, name) is unique within a database. The label is precomputed for
/// direct display in pick lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureRef {
    pub schema: String,
    pub name: String,
    /// Human-readable pick-list label: `schema.name | YYYY-MM-DD HH:MM`
    pub label: String,
    pub modified: NaiveDateTime,
}

impl ProcedureRef {
    pub fn new(schema: impl Into<String>, name: impl Into<String>, modified: NaiveDateTime) -> Self {
        let schema = schema.into();
        let name = name.into();
        let label = format!("{}.{} | {}", schema, name, modified.format("%Y-%m-%d %H:%M"));
        Self {
            schema,
            name,
            label,
            modified,
        }
    }
}
