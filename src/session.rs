// src/session.rs

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::process::Table;
use crate::template::MatchResult;

/// Everything kept about one uploaded file between requests.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub file_id: String,
    pub file_name: String,
    pub template: String,
    pub match_result: MatchResult,
    pub table: Table,
}

impl Session {
    /// New session under a freshly generated file id.
    pub fn new(
        file_name: impl Into<String>,
        template: impl Into<String>,
        match_result: MatchResult,
        table: Table,
    ) -> Self {
        Self {
            file_id: Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            template: template.into(),
            match_result,
            table,
        }
    }
}

/// Keyed storage for sessions. Callers hold a store handle; there is no
/// process-wide instance.
pub trait SessionStore: Send + Sync {
    /// Store `session` under its `file_id`, replacing any previous entry.
    fn put(&self, session: Session) -> Result<Arc<Session>>;
    fn get(&self, file_id: &str) -> Result<Option<Arc<Session>>>;
    /// Remove and return the entry, if present.
    fn remove(&self, file_id: &str) -> Result<Option<Arc<Session>>>;
    fn ids(&self) -> Result<Vec<String>>;
}

/// Process-local store behind a single `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    map: RwLock<HashMap<String, Arc<Session>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("session store lock poisoned")
}

impl SessionStore for InMemoryStore {
    fn put(&self, session: Session) -> Result<Arc<Session>> {
        let session = Arc::new(session);
        let mut map = self.map.write().map_err(poisoned)?;
        if map
            .insert(session.file_id.clone(), Arc::clone(&session))
            .is_some()
        {
            debug!(file_id = %session.file_id, "replaced existing session");
        }
        info!(file_id = %session.file_id, file = %session.file_name, "stored session");
        Ok(session)
    }

    fn get(&self, file_id: &str) -> Result<Option<Arc<Session>>> {
        let map = self.map.read().map_err(poisoned)?;
        Ok(map.get(file_id).cloned())
    }

    fn remove(&self, file_id: &str) -> Result<Option<Arc<Session>>> {
        let mut map = self.map.write().map_err(poisoned)?;
        let removed = map.remove(file_id);
        if removed.is_some() {
            info!(file_id, "removed session");
        }
        Ok(removed)
    }

    fn ids(&self) -> Result<Vec<String>> {
        let map = self.map.read().map_err(poisoned)?;
        let mut ids: Vec<String> = map.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
