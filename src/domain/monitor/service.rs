//! Polling loop that reconciles runtime snapshots into changelog events.

use crate::domain::changelog::models::entry::{ChangeEvent, NewChangeEvent};
use crate::domain::changelog::port::ChangelogService;
use crate::domain::monitor::models::action::{ActionResult, ActionVerb};
use crate::domain::monitor::models::container::Snapshot;
use crate::domain::monitor::ports::{ContainerRuntime, RuntimeError};
use crate::domain::tools::{ToolCatalog, ToolStatus};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_ERROR_BACKOFF: Duration = Duration::from_secs(60);

/// Derive change events from two successive snapshots: one started event per
/// name only in `current`, one status-changed event per name in both with a
/// differing state class, one stopped event per name only in `previous`.
/// Groups are emitted in that order, each in runtime output order.
pub fn diff_snapshots(previous: &Snapshot, current: &Snapshot) -> Vec<NewChangeEvent> {
    let mut events = Vec::new();

    for record in current.iter() {
        if !previous.contains(record.name.as_str()) {
            events.push(NewChangeEvent::container_started(record));
        }
    }

    for record in current.iter() {
        if let Some(before) = previous.get(record.name.as_str())
            && before.state != record.state
        {
            events.push(NewChangeEvent::status_changed(
                &record.name,
                before.state,
                record.state,
            ));
        }
    }

    for record in previous.iter() {
        if !current.contains(record.name.as_str()) {
            events.push(NewChangeEvent::container_stopped(&record.name));
        }
    }

    events
}

struct Worker {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Owns the current/previous snapshot pair and the background polling task.
/// Constructed once and handed to the http layer; no global state.
#[derive(Clone)]
pub struct Monitor<R: ContainerRuntime, C: ChangelogService> {
    runtime: R,
    changelog: C,
    catalog: Arc<ToolCatalog>,
    poll_interval: Duration,
    error_backoff: Duration,
    current: Arc<RwLock<Snapshot>>,
    worker: Arc<Mutex<Option<Worker>>>,
    events_tx: Option<mpsc::Sender<ChangeEvent>>,
}

impl<R: ContainerRuntime, C: ChangelogService> Monitor<R, C> {
    pub fn new(runtime: R, changelog: C, catalog: ToolCatalog) -> Self {
        Self {
            runtime,
            changelog,
            catalog: Arc::new(catalog),
            poll_interval: DEFAULT_POLL_INTERVAL,
            error_backoff: DEFAULT_ERROR_BACKOFF,
            current: Arc::new(RwLock::new(Snapshot::default())),
            worker: Arc::new(Mutex::new(None)),
            events_tx: None,
        }
    }

    pub fn with_intervals(mut self, poll_interval: Duration, error_backoff: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.error_backoff = error_backoff;
        self
    }

    /// Forward every appended change event to a notification channel.
    pub fn with_notifications(mut self, events_tx: mpsc::Sender<ChangeEvent>) -> Self {
        self.events_tx = Some(events_tx);
        self
    }

    /// Start the background polling task. Calling this while already
    /// polling is a no-op.
    pub async fn start(&self) {
        let mut worker = self.worker.lock().await;
        if worker.is_some() {
            info!("container monitoring already running");
            return;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let monitor = self.clone();
        let handle = tokio::spawn(async move { monitor.poll_loop(shutdown_rx).await });
        *worker = Some(Worker {
            shutdown: shutdown_tx,
            handle,
        });
        info!("container monitoring started");
    }

    /// Stop the background polling task, waiting for an in-flight cycle to
    /// finish. No poll writes happen after this returns.
    pub async fn stop(&self) {
        let worker = self.worker.lock().await.take();
        match worker {
            Some(worker) => {
                let _ = worker.shutdown.send(true);
                if let Err(e) = worker.handle.await {
                    error!("monitor task failed to shut down cleanly: {e}");
                }
                info!("container monitoring stopped");
            }
            None => debug!("container monitoring not running"),
        }
    }

    async fn poll_loop(self, mut shutdown: watch::Receiver<bool>) {
        let mut previous = Snapshot::default();
        loop {
            let delay = match self.poll_cycle(&mut previous).await {
                Ok(()) => self.poll_interval,
                Err(e) => {
                    error!("monitor cycle failed: {e}");
                    self.error_backoff
                }
            };

            tokio::select! {
                _ = sleep(delay) => {}
                _ = shutdown.changed() => break,
            }
        }
    }

    /// One observation cycle. A failed inspection leaves `previous` in
    /// place so the next successful cycle diffs against the last real
    /// observation instead of reporting every container as stopped.
    async fn poll_cycle(&self, previous: &mut Snapshot) -> Result<(), RuntimeError> {
        let current = self.runtime.list_containers().await?;
        debug!("observed {} containers", current.len());

        for event in diff_snapshots(previous, &current) {
            let stored = self.changelog.append(event).await;
            if let Some(tx) = &self.events_tx {
                let _ = tx.send(stored).await;
            }
        }

        *previous = current.clone();
        *self.current.write().await = current;
        Ok(())
    }

    pub async fn current_status(&self) -> Snapshot {
        self.current.read().await.clone()
    }

    pub async fn tool_status(&self) -> Vec<(String, ToolStatus)> {
        let snapshot = self.current.read().await;
        self.catalog.project(&snapshot)
    }

    pub async fn start_container(&self, name: &str) -> ActionResult {
        self.run_action(ActionVerb::Start, name).await
    }

    pub async fn stop_container(&self, name: &str) -> ActionResult {
        self.run_action(ActionVerb::Stop, name).await
    }

    pub async fn restart_container(&self, name: &str) -> ActionResult {
        self.run_action(ActionVerb::Restart, name).await
    }

    async fn run_action(&self, verb: ActionVerb, name: &str) -> ActionResult {
        let container = {
            let snapshot = self.current.read().await;
            self.catalog.resolve(name, &snapshot)
        };

        let result = match verb {
            ActionVerb::Start => self.runtime.start_container(&container).await,
            ActionVerb::Stop => self.runtime.stop_container(&container).await,
            ActionVerb::Restart => self.runtime.restart_container(&container).await,
        };

        match result {
            Ok(()) => {
                let stored = self
                    .changelog
                    .append(NewChangeEvent::manual_action(verb, &container))
                    .await;
                if let Some(tx) = &self.events_tx {
                    let _ = tx.send(stored).await;
                }
                ActionResult::ok(format!(
                    "Container {container} {} successfully",
                    verb.past_tense()
                ))
            }
            Err(e) => {
                error!("failed to {verb} container {container}: {e}");
                ActionResult::failed(format!("Failed to {verb} container: {e}"))
            }
        }
    }
}
