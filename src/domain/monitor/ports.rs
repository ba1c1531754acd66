use crate::domain::monitor::models::container::{ContainerName, Snapshot};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("container runtime unavailable: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
    #[error("`{command}` timed out after {timeout_secs}s")]
    TimedOut { command: String, timeout_secs: u64 },
}

/// Outbound port to the container runtime. An `Err` from `list_containers`
/// means "could not observe", never "zero containers".
pub trait ContainerRuntime: Send + Sync + 'static + Clone {
    fn list_containers(&self) -> impl Future<Output = Result<Snapshot, RuntimeError>> + Send;
    fn start_container(
        &self,
        name: &ContainerName,
    ) -> impl Future<Output = Result<(), RuntimeError>> + Send;
    fn stop_container(
        &self,
        name: &ContainerName,
    ) -> impl Future<Output = Result<(), RuntimeError>> + Send;
    fn restart_container(
        &self,
        name: &ContainerName,
    ) -> impl Future<Output = Result<(), RuntimeError>> + Send;
}
