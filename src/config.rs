use serde::Deserialize;
use std::path::Path;

use figment2::{
    Figment,
    providers::{Env, Format, Toml},
};

#[derive(Debug, PartialEq, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_changelog_path")]
    pub changelog_path: String,
    #[serde(default = "default_docker_binary")]
    pub docker_binary: String,
    /// Seconds between observation cycles.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
    /// Seconds to wait before retrying after a failed cycle.
    #[serde(default = "default_error_backoff")]
    pub error_backoff: u64,
}

fn default_port() -> u16 {
    5500
}

fn default_changelog_path() -> String {
    "changelog.json".to_string()
}

fn default_docker_binary() -> String {
    "docker".to_string()
}

fn default_poll_interval() -> u64 {
    30
}

fn default_error_backoff() -> u64 {
    60
}

pub fn load_config(config_path: &Path) -> Config {
    let config: Config = Figment::new()
        .merge(Toml::file(config_path))
        .merge(Env::prefixed("SOCWATCH_"))
        .extract()
        .expect("Failed to load config");
    config
}

#[test]
fn test_load_config() {
    use figment2::Jail;
    Jail::expect_with(|jail: &mut Jail| {
        jail.create_file(
            "config-test.toml",
            r#"
            port=8080
            changelog_path="/var/lib/socwatch/changelog.json"
            poll_interval=10
            "#,
        )?;

        jail.set_env("SOCWATCH_PORT", "9090");
        jail.set_env("SOCWATCH_DOCKER_BINARY", "podman");

        let config = load_config("config-test.toml".as_ref());

        assert_eq!(config.port, 9090);
        assert_eq!(config.docker_binary, "podman");
        assert_eq!(config.changelog_path, "/var/lib/socwatch/changelog.json");
        assert_eq!(config.poll_interval, 10);
        assert_eq!(config.error_backoff, 60);

        Ok(())
    });
}

#[test]
fn test_defaults_without_file_or_env() {
    use figment2::Jail;
    Jail::expect_with(|_jail: &mut Jail| {
        let config = load_config("does-not-exist.toml".as_ref());

        assert_eq!(config.port, 5500);
        assert_eq!(config.changelog_path, "changelog.json");
        assert_eq!(config.docker_binary, "docker");
        assert_eq!(config.poll_interval, 30);

        Ok(())
    });
}
