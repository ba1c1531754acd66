//! Watch the containers of a SOC tool bundle and serve status over HTTP.

use env_logger::Env;
use log::info;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use socwatch::cli::configure_cli;
use socwatch::config::load_config;
use socwatch::domain::changelog::models::entry::NewChangeEvent;
use socwatch::domain::changelog::port::ChangelogService;
use socwatch::domain::changelog::service::Service;
use socwatch::domain::monitor::service::Monitor;
use socwatch::domain::tools::ToolCatalog;
use socwatch::inbound::server::{AppState, create_app};
use socwatch::notifications::{setup_dispatcher, start_notification_handler};
use socwatch::outbound::changelog_file::FileChangelog;
use socwatch::outbound::docker_cli::DockerCli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = configure_cli();
    let mut config = load_config(&args.config);
    if let Some(interval) = args.interval {
        config.poll_interval = interval;
    }

    info!("Starting socwatch");
    let changelog = Service::new(FileChangelog::load(&config.changelog_path).await);
    let runtime = DockerCli::new(&config.docker_binary);

    let (events_tx, events_rx) = mpsc::channel(32);
    let dispatcher = setup_dispatcher();
    tokio::spawn(async move {
        start_notification_handler(events_rx, dispatcher).await;
    });

    let monitor = Monitor::new(runtime, changelog.clone(), ToolCatalog::default())
        .with_intervals(
            Duration::from_secs(config.poll_interval),
            Duration::from_secs(config.error_backoff),
        )
        .with_notifications(events_tx);

    changelog
        .append(NewChangeEvent::generic("SOC portal started"))
        .await;
    monitor.start().await;

    let state = AppState {
        monitor: monitor.clone(),
        changelog,
    };
    let app = create_app(state).await;
    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!("Server running on http://0.0.0.0:{}", config.port);
    info!("  GET    /health                          - Health check");
    info!("  GET    /api/containers/status           - All observed containers");
    info!("  GET    /api/tools/status                - Status per SOC tool");
    info!("  POST   /api/containers/:name/start      - Start a container");
    info!("  POST   /api/containers/:name/stop       - Stop a container");
    info!("  POST   /api/containers/:name/restart    - Restart a container");
    info!("  GET    /api/changelog                   - Changelog entries");
    info!("  GET    /api/changelog/stats             - Changelog statistics");
    info!("  POST   /api/changelog                   - Record a manual entry");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    monitor.stop().await;
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl-C handler");
    info!("Received shutdown signal, gracefully shutting down...");
}
