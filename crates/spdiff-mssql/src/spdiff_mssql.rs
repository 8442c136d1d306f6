//! SQL Server access layer for spdiff
//!
//! This crate turns a `ConnectionTarget` into a live tiberius connection by
//! probing an ordered list of protocol profiles, and exposes the three
//! read-only catalog operations the comparison tool needs: list online
//! databases, list stored procedures, fetch one procedure's definition.

mod catalog;
mod connection;
mod resolver;

#[cfg(test)]
mod catalog_tests;
#[cfg(test)]
mod connection_tests;
#[cfg(test)]
mod resolver_tests;

pub use connection::{MssqlConnection, MssqlConnectionError};
pub use resolver::{resolve, Attempt, AttemptOutcome, DriverCandidate, Resolution, DRIVER_CANDIDATES};
