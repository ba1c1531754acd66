use crate::domain::monitor::models::action::ActionVerb;
use crate::domain::monitor::models::container::{ContainerName, ContainerRecord, ContainerState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use ts_rs::TS;

#[derive(TS, Deserialize, Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Success => write!(f, "success"),
        }
    }
}

#[derive(TS, Deserialize, Serialize, Debug, Clone, PartialEq)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    ContainerStarted,
    ContainerStatusChanged {
        from: ContainerState,
        to: ContainerState,
    },
    ContainerStopped,
    ManualAction {
        verb: ActionVerb,
    },
    Generic,
}

impl EventKind {
    /// Stable label used to bucket statistics.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::ContainerStarted => "container_started",
            EventKind::ContainerStatusChanged { .. } => "container_status_changed",
            EventKind::ContainerStopped => "container_stopped",
            EventKind::ManualAction {
                verb: ActionVerb::Start,
            } => "manual_start",
            EventKind::ManualAction {
                verb: ActionVerb::Stop,
            } => "manual_stop",
            EventKind::ManualAction {
                verb: ActionVerb::Restart,
            } => "manual_restart",
            EventKind::Generic => "generic",
        }
    }
}

/// An immutable changelog entry. The id is 1-based, strictly increasing and
/// gap-free within one store's lifetime.
#[derive(TS, Deserialize, Serialize, Debug, Clone)]
#[ts(export)]
pub struct ChangeEvent {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub action: EventKind,
    pub container: Option<ContainerName>,
    pub user: String,
    pub level: Severity,
    pub details: String,
}

pub const SYSTEM_USER: &str = "system";

/// An entry before the store assigned its id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChangeEvent {
    pub action: EventKind,
    pub container: Option<ContainerName>,
    pub user: Option<String>,
    pub level: Severity,
    pub details: String,
}

impl NewChangeEvent {
    pub fn container_started(record: &ContainerRecord) -> Self {
        Self {
            action: EventKind::ContainerStarted,
            container: Some(record.name.clone()),
            user: None,
            level: Severity::Info,
            details: format!(
                "Container '{}' started with status: {}",
                record.name, record.state
            ),
        }
    }

    pub fn status_changed(name: &ContainerName, from: ContainerState, to: ContainerState) -> Self {
        Self {
            action: EventKind::ContainerStatusChanged { from, to },
            container: Some(name.clone()),
            user: None,
            level: Severity::Warning,
            details: format!("Container '{name}' status changed from '{from}' to '{to}'"),
        }
    }

    pub fn container_stopped(name: &ContainerName) -> Self {
        Self {
            action: EventKind::ContainerStopped,
            container: Some(name.clone()),
            user: None,
            level: Severity::Warning,
            details: format!("Container '{name}' stopped"),
        }
    }

    pub fn manual_action(verb: ActionVerb, name: &ContainerName) -> Self {
        Self {
            action: EventKind::ManualAction { verb },
            container: Some(name.clone()),
            user: None,
            level: Severity::Info,
            details: format!("Container '{name}' {} manually", verb.past_tense()),
        }
    }

    pub fn generic(details: impl Into<String>) -> Self {
        Self {
            action: EventKind::Generic,
            container: None,
            user: None,
            level: Severity::Info,
            details: details.into(),
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EntryFilter {
    pub limit: Option<usize>,
    pub level: Option<Severity>,
}

#[derive(TS, Deserialize, Serialize, Debug, Clone)]
#[ts(export)]
pub struct ChangelogStats {
    pub total_entries: u64,
    pub by_level: HashMap<String, u64>,
    pub by_action: HashMap<String, u64>,
    pub recent_activity: u64,
}
