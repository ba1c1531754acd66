//! Static mapping from tool logical names to candidate container names.

use crate::domain::monitor::models::container::{ContainerName, ContainerRecord, Snapshot};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Per-tool projection of the current snapshot.
#[derive(TS, Deserialize, Serialize, Debug, Clone)]
#[ts(export)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolStatus {
    Present { container: ContainerRecord },
    NotFound,
}

/// Precedence-ordered lookup table: the first candidate present in a
/// snapshot wins. Read-only after construction.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<(String, Vec<ContainerName>)>,
}

impl ToolCatalog {
    pub fn from_entries<I, S, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<C>)>,
        S: Into<String>,
        C: Into<String>,
    {
        let tools = entries
            .into_iter()
            .map(|(tool, candidates)| {
                (
                    tool.into(),
                    candidates.into_iter().map(ContainerName::new).collect(),
                )
            })
            .collect();
        Self { tools }
    }

    pub fn candidates(&self, tool: &str) -> Option<&[ContainerName]> {
        self.tools
            .iter()
            .find(|(name, _)| name == tool)
            .map(|(_, candidates)| candidates.as_slice())
    }

    /// Resolve a tool logical name to the container name to act on. Falls
    /// back to the input unchanged if the tool is unknown or none of its
    /// candidates is present in the snapshot.
    pub fn resolve(&self, tool: &str, snapshot: &Snapshot) -> ContainerName {
        if let Some(candidates) = self.candidates(tool) {
            for candidate in candidates {
                if snapshot.contains(candidate.as_str()) {
                    return candidate.clone();
                }
            }
        }
        ContainerName::new(tool)
    }

    /// Project a snapshot onto tool status, one entry per known tool.
    pub fn project(&self, snapshot: &Snapshot) -> Vec<(String, ToolStatus)> {
        self.tools
            .iter()
            .map(|(tool, candidates)| {
                let status = candidates
                    .iter()
                    .find_map(|candidate| snapshot.get(candidate.as_str()))
                    .map(|record| ToolStatus::Present {
                        container: record.clone(),
                    })
                    .unwrap_or(ToolStatus::NotFound);
                (tool.clone(), status)
            })
            .collect()
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::from_entries([
            ("velociraptor", vec!["velociraptor"]),
            (
                "wazuh",
                vec!["wazuh", "wazuh-dashboard", "cyber-blue-test-wazuh.dashboard-1"],
            ),
            (
                "wazuh-dashboard",
                vec!["wazuh", "wazuh-dashboard", "cyber-blue-test-wazuh.dashboard-1"],
            ),
            ("misp", vec!["misp", "misp-core", "cyber-blue-test-misp-core-1"]),
            ("cyberchef", vec!["cyber-blue-test-cyberchef-1", "cyberchef"]),
            ("thehive", vec!["cyber-blue-test-thehive-1", "thehive"]),
            ("cortex", vec!["cyber-blue-test-cortex-1", "cortex"]),
            ("fleetdm", vec!["fleet-server", "cyber-blue-test-fleet-server-1"]),
            (
                "arkime",
                vec!["arkime-test", "arkime", "cyber-blue-test-arkime-1"],
            ),
            ("caldera", vec!["caldera", "cyber-blue-test-caldera-1"]),
            ("evebox", vec!["evebox", "cyber-blue-test-evebox-1"]),
            ("wireshark", vec!["wireshark", "cyber-blue-test-wireshark-1"]),
            (
                "mitre",
                vec!["mitre-navigator", "cyber-blue-test-mitre-navigator-1"],
            ),
            (
                "mitre-navigator",
                vec!["mitre-navigator", "cyber-blue-test-mitre-navigator-1"],
            ),
            ("portainer", vec!["portainer", "cyber-blue-test-portainer-1"]),
            (
                "shuffle",
                vec!["shuffle-frontend", "cyber-blue-test-shuffle-frontend-1"],
            ),
        ])
    }
}
