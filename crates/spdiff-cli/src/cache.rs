//! Shell-owned procedure list cache
//!
//! Listing procedures is the only repeated metadata query in an interactive
//! session, so the shell caches it for a bounded window. Keyed explicitly by
//! (host, database, credential identity) - never by an opaque handle - and
//! procedure bodies are never cached: the diff always reflects current state.

use spdiff_core::{ConnectionTarget, ProcedureRef};
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const PROCEDURE_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub host: String,
    pub database: String,
    pub credential: String,
}

/// Cache key for a database-scoped target.
pub fn key_for(target: &ConnectionTarget) -> CacheKey {
    CacheKey {
        host: target.host.clone(),
        database: target.database.clone().unwrap_or_default(),
        credential: target.credential_identity(),
    }
}

struct CacheEntry {
    fetched_at: Instant,
    refs: Vec<ProcedureRef>,
}

pub struct ProcedureCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl ProcedureCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<Vec<ProcedureRef>> {
        match self.entries.get(key) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Some(entry.refs.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&mut self, key: CacheKey, refs: Vec<ProcedureRef>) {
        self.entries.insert(
            key,
            CacheEntry {
                fetched_at: Instant::now(),
                refs,
            },
        );
    }
}
