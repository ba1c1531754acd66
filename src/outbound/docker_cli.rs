//! Container runtime adapter shelling out to the docker CLI.

use crate::domain::monitor::models::container::{
    ContainerName, ContainerRecord, ContainerState, Snapshot,
};
use crate::domain::monitor::ports::{ContainerRuntime, RuntimeError};
use chrono::Utc;
use log::debug;
use std::time::Duration;
use tokio::process::Command;
use tokio::time;

const LIST_TIMEOUT: Duration = Duration::from_secs(10);
const ACTION_TIMEOUT: Duration = Duration::from_secs(30);

const LIST_FORMAT: &str = "{{.Names}}\t{{.Status}}\t{{.Ports}}\t{{.Image}}\t{{.Size}}";

#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
}

impl DockerCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(&self, args: &[&str], timeout: Duration) -> Result<String, RuntimeError> {
        let command = format!("{} {}", self.binary, args.join(" "));
        debug!("running `{command}`");

        let output = time::timeout(timeout, Command::new(&self.binary).args(args).output())
            .await
            .map_err(|_| RuntimeError::TimedOut {
                command: command.clone(),
                timeout_secs: timeout.as_secs(),
            })??;

        if !output.status.success() {
            return Err(RuntimeError::CommandFailed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse the tab-separated listing into a snapshot. Lines that do not carry
/// all five fields are skipped.
fn parse_snapshot(stdout: &str) -> Snapshot {
    let observed_at = Utc::now();
    let mut snapshot = Snapshot::default();

    for line in stdout.lines() {
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 5 {
            continue;
        }
        let status_text = parts[1].trim().to_string();
        snapshot.insert(ContainerRecord {
            name: ContainerName::new(parts[0].trim()),
            state: ContainerState::classify(&status_text),
            status_text,
            ports: parts[2].trim().to_string(),
            image: parts[3].trim().to_string(),
            size: parts[4].trim().to_string(),
            observed_at,
        });
    }

    snapshot
}

impl ContainerRuntime for DockerCli {
    async fn list_containers(&self) -> Result<Snapshot, RuntimeError> {
        let stdout = self
            .run(&["ps", "-a", "--format", LIST_FORMAT], LIST_TIMEOUT)
            .await?;
        Ok(parse_snapshot(&stdout))
    }

    async fn start_container(&self, name: &ContainerName) -> Result<(), RuntimeError> {
        self.run(&["start", name.as_str()], ACTION_TIMEOUT).await?;
        Ok(())
    }

    async fn stop_container(&self, name: &ContainerName) -> Result<(), RuntimeError> {
        self.run(&["stop", name.as_str()], ACTION_TIMEOUT).await?;
        Ok(())
    }

    async fn restart_container(&self, name: &ContainerName) -> Result<(), RuntimeError> {
        self.run(&["restart", name.as_str()], ACTION_TIMEOUT).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot_listing() {
        let stdout = "misp-core\tUp 3 days\t0.0.0.0:443->443/tcp\tmisp/core:latest\t1.2GB\n\
                      evebox\tExited (0) 2 hours ago\t\tjasonish/evebox:master\t89MB\n";

        let snapshot = parse_snapshot(stdout);

        assert_eq!(snapshot.len(), 2);
        let misp = snapshot.get("misp-core").unwrap();
        assert_eq!(misp.state, ContainerState::Running);
        assert_eq!(misp.ports, "0.0.0.0:443->443/tcp");
        assert_eq!(misp.image, "misp/core:latest");
        assert_eq!(snapshot.get("evebox").unwrap().state, ContainerState::Stopped);
    }

    #[test]
    fn test_parse_snapshot_skips_short_lines() {
        let stdout = "misp-core\tUp 3 days\t\tmisp/core:latest\t1.2GB\n\
                      garbage line without tabs\n\
                      \n";

        let snapshot = parse_snapshot(stdout);

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains("misp-core"));
    }

    #[test]
    fn test_parse_snapshot_empty_output() {
        assert!(parse_snapshot("").is_empty());
    }

    #[tokio::test]
    async fn test_missing_binary_is_an_error_not_a_panic() {
        let docker = DockerCli::new("definitely-not-a-container-runtime");
        let result = docker.list_containers().await;
        assert!(matches!(result, Err(RuntimeError::Spawn(_))));
    }
}
