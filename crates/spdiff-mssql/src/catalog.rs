//! Read-only catalog queries
//!
//! The three operations here are total: on any underlying failure they log
//! the cause and yield an empty value. The shell cannot distinguish "query
//! failed" from "nothing there" - a documented limitation of the tool, kept
//! on purpose.

use chrono::NaiveDateTime;
use spdiff_core::ProcedureRef;

use crate::connection::MssqlConnection;

/// Only databases in an online state are listed.
pub(crate) const LIST_DATABASES_SQL: &str =
    "SELECT name FROM sys.databases WHERE state_desc = 'ONLINE' ORDER BY name";

pub(crate) const LIST_PROCEDURES_SQL: &str = "SELECT \
        SCHEMA_NAME(p.schema_id) AS schema_name, \
        p.name, \
        p.modify_date \
     FROM sys.procedures p \
     ORDER BY schema_name, p.name";

/// Schema and object name arrive as bound parameters, never interpolated
/// into the query text.
pub(crate) const PROCEDURE_BODY_SQL: &str = "SELECT m.definition \
     FROM sys.sql_modules m \
     INNER JOIN sys.objects o ON m.object_id = o.object_id \
     INNER JOIN sys.schemas s ON o.schema_id = s.schema_id \
     WHERE s.name = @P1 AND o.name = @P2";

/// Sort procedure refs the way the pick list displays them.
pub(crate) fn sort_by_label(mut refs: Vec<ProcedureRef>) -> Vec<ProcedureRef> {
    refs.sort_by(|a, b| a.label.cmp(&b.label));
    refs
}

impl MssqlConnection {
    /// List online databases, alphabetically. Empty on failure.
    ///
    /// Call this on a master-scoped handle; the connection layer never moves
    /// an existing handle to a different database.
    #[tracing::instrument(skip(self))]
    pub async fn list_databases(&self) -> Vec<String> {
        match self.query_rows(LIST_DATABASES_SQL, &[]).await {
            Ok(rows) => rows
                .iter()
                .filter_map(|row| row.get::<&str, _>(0).map(str::to_string))
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "database listing failed");
                Vec::new()
            }
        }
    }

    /// List stored procedures visible to the current credential, ordered by
    /// display label. Empty on failure.
    #[tracing::instrument(skip(self))]
    pub async fn list_procedures(&self) -> Vec<ProcedureRef> {
        match self.query_rows(LIST_PROCEDURES_SQL, &[]).await {
            Ok(rows) => {
                let refs = rows
                    .iter()
                    .filter_map(|row| {
                        let schema = row.get::<&str, _>(0)?;
                        let name = row.get::<&str, _>(1)?;
                        let modified = row.get::<NaiveDateTime, _>(2)?;
                        Some(ProcedureRef::new(schema, name, modified))
                    })
                    .collect();
                sort_by_label(refs)
            }
            Err(e) => {
                tracing::warn!(error = %e, "procedure listing failed");
                Vec::new()
            }
        }
    }

    /// Fetch one procedure's definition text. Empty string both when the
    /// object has no stored body and when the query fails.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_procedure_body(&self, schema: &str, name: &str) -> String {
        match self.query_rows(PROCEDURE_BODY_SQL, &[&schema, &name]).await {
            Ok(rows) => rows
                .first()
                .and_then(|row| row.get::<&str, _>(0))
                .unwrap_or_default()
                .to_string(),
            Err(e) => {
                tracing::warn!(error = %e, schema, name, "procedure body fetch failed");
                String::new()
            }
        }
    }
}
