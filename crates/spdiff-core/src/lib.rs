//! spdiff core - shared types for the stored-procedure comparison tool
//!
//! This crate holds the plain data types that flow between the interactive
//! shell, the connection layer and the diff engine:
//!
//! - `ConnectionTarget` - where and how to connect
//! - `CredentialMode` - SQL auth vs. trusted/integrated auth
//! - `ProcedureRef` - one stored procedure discovered on a server
//! - `SpdiffError` / `Result` - the common error type

mod error;
mod types;

pub use error::*;
pub use types::*;
