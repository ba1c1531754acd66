//! File-backed changelog: the whole document is rewritten on every append.
//! O(n) per append, acceptable at lab scale.

use crate::domain::changelog::models::entry::{
    ChangeEvent, ChangelogStats, EntryFilter, NewChangeEvent, SYSTEM_USER,
};
use crate::domain::changelog::port::ChangelogRepository;
use chrono::{DateTime, Utc};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

const SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize, Deserialize)]
struct Metadata {
    created: DateTime<Utc>,
    version: String,
    total_entries: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChangelogDocument {
    entries: Vec<ChangeEvent>,
    metadata: Metadata,
}

impl ChangelogDocument {
    fn empty() -> Self {
        Self {
            entries: Vec::new(),
            metadata: Metadata {
                created: Utc::now(),
                version: SCHEMA_VERSION.to_string(),
                total_entries: 0,
            },
        }
    }
}

#[derive(Clone)]
pub struct FileChangelog {
    path: PathBuf,
    document: Arc<RwLock<ChangelogDocument>>,
}

impl FileChangelog {
    /// Load the changelog from disk. A missing file initializes a fresh
    /// document; an unparseable one is logged and replaced by an empty
    /// in-memory log (prior history is not recovered).
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let document = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(document) => document,
                Err(e) => {
                    error!("error loading changelog {}: {e}", path.display());
                    ChangelogDocument::empty()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let document = ChangelogDocument::empty();
                persist(&path, &document).await;
                document
            }
            Err(e) => {
                error!("error loading changelog {}: {e}", path.display());
                ChangelogDocument::empty()
            }
        };

        Self {
            path,
            document: Arc::new(RwLock::new(document)),
        }
    }
}

async fn persist(path: &Path, document: &ChangelogDocument) {
    match serde_json::to_vec_pretty(document) {
        Ok(bytes) => {
            if let Err(e) = tokio::fs::write(path, bytes).await {
                error!("error saving changelog {}: {e}", path.display());
            }
        }
        Err(e) => error!("error serializing changelog: {e}"),
    }
}

impl ChangelogRepository for FileChangelog {
    // Id assignment, the in-memory append and persistence share one write
    // lock, so ids stay gap-free across concurrent callers.
    async fn append(&self, event: NewChangeEvent) -> ChangeEvent {
        let mut document = self.document.write().await;
        let entry = ChangeEvent {
            id: document.entries.len() as u64 + 1,
            timestamp: Utc::now(),
            action: event.action,
            container: event.container,
            user: event.user.unwrap_or_else(|| SYSTEM_USER.to_string()),
            level: event.level,
            details: event.details,
        };

        document.entries.push(entry.clone());
        document.metadata.total_entries = document.entries.len() as u64;
        persist(&self.path, &document).await;

        info!(
            "changelog entry added: {} - {}",
            entry.action.label(),
            entry.details
        );
        entry
    }

    async fn entries(&self, filter: EntryFilter) -> Vec<ChangeEvent> {
        let document = self.document.read().await;
        let mut entries: Vec<ChangeEvent> = document
            .entries
            .iter()
            .filter(|e| filter.level.is_none_or(|level| e.level == level))
            .cloned()
            .collect();

        if let Some(limit) = filter.limit
            && entries.len() > limit
        {
            entries.drain(..entries.len() - limit);
        }

        entries
    }

    async fn stats(&self) -> ChangelogStats {
        let document = self.document.read().await;
        let cutoff = Utc::now() - chrono::Duration::hours(24);

        let mut by_level: HashMap<String, u64> = HashMap::new();
        let mut by_action: HashMap<String, u64> = HashMap::new();
        let mut recent_activity = 0;

        for entry in &document.entries {
            *by_level.entry(entry.level.to_string()).or_default() += 1;
            *by_action.entry(entry.action.label().to_string()).or_default() += 1;
            if entry.timestamp > cutoff {
                recent_activity += 1;
            }
        }

        ChangelogStats {
            total_entries: document.entries.len() as u64,
            by_level,
            by_action,
            recent_activity,
        }
    }
}
