//! Tests for the connection resolver

use crate::resolver::{build_config, parse_host, resolve, AttemptOutcome, DRIVER_CANDIDATES};
use spdiff_core::ConnectionTarget;

#[test]
fn test_candidate_order_most_capable_first() {
    assert_eq!(DRIVER_CANDIDATES[0].name, "tds-tls-required");
    assert_eq!(
        DRIVER_CANDIDATES[DRIVER_CANDIDATES.len() - 1].name,
        "tds-plaintext"
    );
}

#[test]
fn test_plaintext_candidate_always_available() {
    let plaintext = DRIVER_CANDIDATES
        .iter()
        .find(|c| c.name == "tds-plaintext")
        .unwrap();
    assert!(plaintext.available());
}

#[cfg(feature = "tls")]
#[test]
fn test_tls_candidates_available_with_tls_feature() {
    assert!(DRIVER_CANDIDATES.iter().all(|c| c.available()));
}

#[test]
fn test_parse_host_plain() {
    assert_eq!(parse_host("db01"), ("db01".to_string(), 1433));
}

#[test]
fn test_parse_host_with_port() {
    assert_eq!(parse_host("db01,14330"), ("db01".to_string(), 14330));
    assert_eq!(parse_host(" db01 , 14330 "), ("db01".to_string(), 14330));
}

#[test]
fn test_parse_host_bad_port_falls_back() {
    assert_eq!(parse_host("db01,not-a-port"), ("db01".to_string(), 1433));
}

#[test]
fn test_build_config_with_sql_credentials() {
    let target = ConnectionTarget::new("db01,14330").with_credentials("sa", "secret");
    let config = build_config(&DRIVER_CANDIDATES[0], &target).unwrap();
    assert_eq!(config.get_addr(), "db01:14330");
}

#[cfg(not(windows))]
#[test]
fn test_build_config_integrated_rejected_off_windows() {
    // Empty credentials request integrated auth, which only a Windows build
    // can satisfy; the candidate is rejected with a typed reason.
    let target = ConnectionTarget::new("db01");
    let err = build_config(&DRIVER_CANDIDATES[0], &target).unwrap_err();
    assert!(err.contains("integrated authentication"));
}

#[cfg(not(windows))]
#[test]
fn test_build_config_empty_password_means_integrated() {
    let target = ConnectionTarget::new("db01").with_credentials("sa", "");
    assert!(build_config(&DRIVER_CANDIDATES[0], &target).is_err());
}

#[tokio::test]
async fn test_resolve_unreachable_host_returns_sentinel() {
    // Port 1 on loopback refuses immediately; every candidate must fail and
    // the walk must end in the sentinel, not an error.
    let target = ConnectionTarget::new("127.0.0.1,1").with_credentials("sa", "secret");
    let resolution = resolve(&target).await;

    assert!(!resolution.connected());
    assert_eq!(resolution.attempts.len(), DRIVER_CANDIDATES.len());
    assert!(resolution
        .attempts
        .iter()
        .all(|a| a.outcome != AttemptOutcome::Connected));
    assert!(resolution.last_error().is_some());
    assert!(resolution.into_handle().is_none());
}

#[tokio::test]
async fn test_resolve_empty_host_returns_sentinel() {
    let target = ConnectionTarget::new("   ");
    let resolution = resolve(&target).await;
    assert!(!resolution.connected());
    assert!(resolution.attempts.is_empty());
}
