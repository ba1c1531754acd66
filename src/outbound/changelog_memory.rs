//! In-memory changelog repository, used where no disk persistence is wanted.

use crate::domain::changelog::models::entry::{
    ChangeEvent, ChangelogStats, EntryFilter, NewChangeEvent, SYSTEM_USER,
};
use crate::domain::changelog::port::ChangelogRepository;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct MemoryChangelog {
    entries: Arc<RwLock<Vec<ChangeEvent>>>,
}

impl ChangelogRepository for MemoryChangelog {
    async fn append(&self, event: NewChangeEvent) -> ChangeEvent {
        let mut entries = self.entries.write().await;
        let entry = ChangeEvent {
            id: entries.len() as u64 + 1,
            timestamp: Utc::now(),
            action: event.action,
            container: event.container,
            user: event.user.unwrap_or_else(|| SYSTEM_USER.to_string()),
            level: event.level,
            details: event.details,
        };
        entries.push(entry.clone());
        entry
    }

    async fn entries(&self, filter: EntryFilter) -> Vec<ChangeEvent> {
        let entries = self.entries.read().await;
        let mut entries: Vec<ChangeEvent> = entries
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
        let entries = self.entries.read().await;
        let cutoff = Utc::now() - chrono::Duration::hours(24);

        let mut by_level: HashMap<String, u64> = HashMap::new();
        let mut by_action: HashMap<String, u64> = HashMap::new();
        let mut recent_activity = 0;

        for entry in entries.iter() {
            *by_level.entry(entry.level.to_string()).or_default() += 1;
            *by_action.entry(entry.action.label().to_string()).or_default() += 1;
            if entry.timestamp > cutoff {
                recent_activity += 1;
            }
        }

        ChangelogStats {
            total_entries: entries.len() as u64,
            by_level,
            by_action,
            recent_activity,
        }
    }
}
