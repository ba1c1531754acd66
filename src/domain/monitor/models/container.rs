use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use ts_rs::TS;

/// The name of a container as reported by the runtime, e.g. "misp-core".
#[derive(TS, Deserialize, Serialize, Debug, Clone, Hash, Eq, PartialEq)]
#[ts(export)]
pub struct ContainerName(pub String);

impl ContainerName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContainerName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(TS, Deserialize, Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Running,
    Stopped,
    Created,
    Unknown,
}

impl ContainerState {
    /// Classify the runtime's free-text status, e.g. "Up 3 days" or
    /// "Exited (0) 2 hours ago".
    pub fn classify(status_text: &str) -> Self {
        if status_text.contains("Up") {
            ContainerState::Running
        } else if status_text.contains("Exited") {
            ContainerState::Stopped
        } else if status_text.contains("Created") {
            ContainerState::Created
        } else {
            ContainerState::Unknown
        }
    }
}

impl Display for ContainerState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerState::Running => write!(f, "running"),
            ContainerState::Stopped => write!(f, "stopped"),
            ContainerState::Created => write!(f, "created"),
            ContainerState::Unknown => write!(f, "unknown"),
        }
    }
}

/// One container as observed by a single runtime listing. Superseded, never
/// mutated, by the next cycle's record of the same name.
#[derive(TS, Deserialize, Serialize, Debug, Clone)]
#[ts(export)]
pub struct ContainerRecord {
    pub name: ContainerName,
    pub state: ContainerState,
    pub status_text: String,
    pub ports: String,
    pub image: String,
    pub size: String,
    pub observed_at: DateTime<Utc>,
}

/// A point-in-time capture of all containers, in runtime output order.
/// Names are unique within a snapshot.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    records: Vec<ContainerRecord>,
}

impl Snapshot {
    /// Adds a record, dropping it if the name is already present.
    pub fn insert(&mut self, record: ContainerRecord) {
        if !self.contains(record.name.as_str()) {
            self.records.push(record);
        }
    }

    pub fn get(&self, name: &str) -> Option<&ContainerRecord> {
        self.records.iter().find(|r| r.name.as_str() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContainerRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl IntoIterator for Snapshot {
    type Item = ContainerRecord;
    type IntoIter = std::vec::IntoIter<ContainerRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl FromIterator<ContainerRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = ContainerRecord>>(iter: I) -> Self {
        let mut snapshot = Snapshot::default();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}
