//! Command-line argument surface

use clap::Parser;
use spdiff_core::ConnectionTarget;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "spdiff",
    version,
    about = "Compare stored procedure source between two SQL Server instances"
)]
pub struct Cli {
    /// Source server, `host` or `host,port`
    #[arg(long)]
    pub source_host: String,

    /// Source SQL login; omit (or leave empty) for integrated auth
    #[arg(long)]
    pub source_user: Option<String>,

    #[arg(long)]
    pub source_password: Option<String>,

    /// Skip the database prompt on the source side
    #[arg(long)]
    pub source_database: Option<String>,

    /// Preselect the source procedure as `schema.name`
    #[arg(long)]
    pub source_proc: Option<String>,

    /// Target server, `host` or `host,port`
    #[arg(long)]
    pub target_host: String,

    #[arg(long)]
    pub target_user: Option<String>,

    #[arg(long)]
    pub target_password: Option<String>,

    /// Skip the database prompt on the target side
    #[arg(long)]
    pub target_database: Option<String>,

    /// Preselect the target procedure as `schema.name`
    #[arg(long)]
    pub target_proc: Option<String>,

    /// Column width in characters after which code lines soft-wrap
    #[arg(long, default_value_t = 130)]
    pub wrap_width: usize,

    /// Collapse unchanged runs to this many context lines around each change
    #[arg(long)]
    pub context: Option<usize>,

    /// Also write the report as a standalone HTML page
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Print the raw report as JSON instead of the colored view
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn source_target(&self) -> ConnectionTarget {
        ConnectionTarget {
            host: self.source_host.clone(),
            database: None,
            username: self.source_user.clone(),
            password: self.source_password.clone(),
        }
    }

    pub fn target_target(&self) -> ConnectionTarget {
        ConnectionTarget {
            host: self.target_host.clone(),
            database: None,
            username: self.target_user.clone(),
            password: self.target_password.clone(),
        }
    }
}

/// Split a `schema.name` spec at the first dot.
pub fn parse_proc_spec(spec: &str) -> Option<(String, String)> {
    let (schema, name) = spec.split_once('.')?;
    if schema.is_empty() || name.is_empty() {
        return None;
    }
    Some((schema.to_string(), name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_proc_spec() {
        assert_eq!(
            parse_proc_spec("dbo.usp_Report"),
            Some(("dbo".to_string(), "usp_Report".to_string()))
        );
        // Procedure names may themselves contain dots; only the first one
        // separates the schema.
        assert_eq!(
            parse_proc_spec("dbo.usp.v2"),
            Some(("dbo".to_string(), "usp.v2".to_string()))
        );
        assert_eq!(parse_proc_spec("noschema"), None);
        assert_eq!(parse_proc_spec(".name"), None);
        assert_eq!(parse_proc_spec("dbo."), None);
    }
}
