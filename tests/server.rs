#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::Utc;
    use std::time::Duration;
    use tower::ServiceExt;
    // for `oneshot` and `ready`

    use socwatch::domain::changelog::models::entry::{ChangeEvent, ChangelogStats, EventKind};
    use socwatch::domain::changelog::service::Service;
    use socwatch::domain::monitor::models::action::{ActionResult, ActionVerb};
    use socwatch::domain::monitor::models::container::{
        ContainerName, ContainerRecord, ContainerState, Snapshot,
    };
    use socwatch::domain::monitor::ports::{ContainerRuntime, RuntimeError};
    use socwatch::domain::monitor::service::Monitor;
    use socwatch::domain::tools::{ToolCatalog, ToolStatus};
    use socwatch::inbound::server::{ApiResponse, AppState, ToolStatusEntry, create_app};
    use socwatch::outbound::changelog_file::FileChangelog;

    fn unique_changelog_path() -> String {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        format!("/tmp/socwatch_test_{}_{}.json", std::process::id(), id)
    }

    #[derive(Clone)]
    struct StubRuntime {
        containers: Vec<(&'static str, &'static str)>,
        action_error: Option<&'static str>,
    }

    impl StubRuntime {
        fn with_containers(containers: Vec<(&'static str, &'static str)>) -> Self {
            Self {
                containers,
                action_error: None,
            }
        }

        fn failing_actions(stderr: &'static str) -> Self {
            Self {
                containers: Vec::new(),
                action_error: Some(stderr),
            }
        }

        fn snapshot(&self) -> Snapshot {
            self.containers
                .iter()
                .map(|(name, status)| ContainerRecord {
                    name: ContainerName::new(*name),
                    state: ContainerState::classify(status),
                    status_text: status.to_string(),
                    ports: String::new(),
                    image: "example:latest".to_string(),
                    size: "0B".to_string(),
                    observed_at: Utc::now(),
                })
                .collect()
        }

        fn action(&self, verb: &str, name: &ContainerName) -> Result<(), RuntimeError> {
            match self.action_error {
                Some(stderr) => Err(RuntimeError::CommandFailed {
                    command: format!("docker {verb} {name}"),
                    stderr: stderr.to_string(),
                }),
                None => Ok(()),
            }
        }
    }

    impl ContainerRuntime for StubRuntime {
        async fn list_containers(&self) -> Result<Snapshot, RuntimeError> {
            Ok(self.snapshot())
        }

        async fn start_container(&self, name: &ContainerName) -> Result<(), RuntimeError> {
            self.action("start", name)
        }

        async fn stop_container(&self, name: &ContainerName) -> Result<(), RuntimeError> {
            self.action("stop", name)
        }

        async fn restart_container(&self, name: &ContainerName) -> Result<(), RuntimeError> {
            self.action("restart", name)
        }
    }

    async fn setup_test_app(
        runtime: StubRuntime,
    ) -> (Router, Monitor<StubRuntime, Service<FileChangelog>>) {
        let changelog = Service::new(FileChangelog::load(unique_changelog_path()).await);
        let monitor = Monitor::new(runtime, changelog.clone(), ToolCatalog::default())
            .with_intervals(Duration::from_secs(1), Duration::from_secs(1));
        let state = AppState {
            monitor: monitor.clone(),
            changelog,
        };
        let app = create_app(state).await;
        (app, monitor)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (app, _monitor) = setup_test_app(StubRuntime::with_containers(vec![])).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_container_status_reflects_runtime_listing() {
        let runtime = StubRuntime::with_containers(vec![
            ("misp-core", "Up 3 days"),
            ("evebox", "Exited (0) 1 hour ago"),
        ]);
        let (app, monitor) = setup_test_app(runtime).await;

        monitor.start().await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/containers/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        monitor.stop().await;

        assert_eq!(response.status(), StatusCode::OK);

        let response: ApiResponse<Vec<ContainerRecord>> = body_json(response).await;
        assert!(response.success);
        let containers = response.data.unwrap();
        assert_eq!(containers.len(), 2);
        assert_eq!(containers[0].name.as_str(), "misp-core");
        assert_eq!(containers[0].state, ContainerState::Running);
        assert_eq!(containers[1].state, ContainerState::Stopped);
    }

    #[tokio::test]
    async fn test_tool_status_marks_missing_tools() {
        let runtime = StubRuntime::with_containers(vec![("misp-core", "Up 3 days")]);
        let (app, monitor) = setup_test_app(runtime).await;

        monitor.start().await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/tools/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        monitor.stop().await;

        assert_eq!(response.status(), StatusCode::OK);

        let response: ApiResponse<Vec<ToolStatusEntry>> = body_json(response).await;
        let tools = response.data.unwrap();

        let misp = tools.iter().find(|entry| entry.tool == "misp").unwrap();
        assert!(
            matches!(&misp.status, ToolStatus::Present { container } if container.name.as_str() == "misp-core")
        );
        let thehive = tools.iter().find(|entry| entry.tool == "thehive").unwrap();
        assert!(matches!(thehive.status, ToolStatus::NotFound));
    }

    #[tokio::test]
    async fn test_manual_action_failure_returns_structured_result() {
        let runtime =
            StubRuntime::failing_actions("Error response from daemon: no such container");
        let (app, _monitor) = setup_test_app(runtime).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/containers/misp/stop")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let result: ActionResult = body_json(response).await;
        assert!(!result.success);
        assert!(result.message.contains("no such container"));

        // a failed action leaves no trace in the changelog
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/changelog")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let response: ApiResponse<Vec<ChangeEvent>> = body_json(response).await;
        assert!(response.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_manual_action_success_appends_manual_event() {
        let (app, _monitor) = setup_test_app(StubRuntime::with_containers(vec![])).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/containers/evebox/restart")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let result: ActionResult = body_json(response).await;
        assert!(result.success);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/changelog")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let response: ApiResponse<Vec<ChangeEvent>> = body_json(response).await;
        let entries = response.data.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].action,
            EventKind::ManualAction {
                verb: ActionVerb::Restart
            }
        );
        assert_eq!(entries[0].container.as_ref().unwrap().as_str(), "evebox");
    }

    #[tokio::test]
    async fn test_changelog_append_query_and_stats_round_trip() {
        let (app, _monitor) = setup_test_app(StubRuntime::with_containers(vec![])).await;

        let payload = serde_json::json!({
            "details": "maintenance window opened",
            "level": "warning",
            "user": "analyst",
        });
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/changelog")
                    .header("Content-Type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let response: ApiResponse<ChangeEvent> = body_json(response).await;
        let entry = response.data.unwrap();
        assert_eq!(entry.id, 1);
        assert_eq!(entry.user, "analyst");

        let payload = serde_json::json!({"details": "all clear"});
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/changelog")
                    .header("Content-Type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/changelog?limit=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let response: ApiResponse<Vec<ChangeEvent>> = body_json(response).await;
        let entries = response.data.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].details, "all clear");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/changelog?level=warning")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let response: ApiResponse<Vec<ChangeEvent>> = body_json(response).await;
        let warnings = response.data.unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].details, "maintenance window opened");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/changelog/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let response: ApiResponse<ChangelogStats> = body_json(response).await;
        let stats = response.data.unwrap();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.by_level.get("warning"), Some(&1));
        assert_eq!(stats.by_action.get("generic"), Some(&2));
    }
}
