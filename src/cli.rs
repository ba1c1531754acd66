use clap::{Arg, ArgMatches, Command};
use std::env;
use std::path::PathBuf;

pub struct CliArgs {
    pub config: PathBuf,
    pub interval: Option<u64>,
}

impl From<ArgMatches> for CliArgs {
    fn from(matches: ArgMatches) -> Self {
        CliArgs {
            config: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .expect("config has a default value"),
            interval: matches.get_one::<u64>("watch").copied(),
        }
    }
}

pub fn configure_cli() -> CliArgs {
    let default_watch_interval = env::var("WATCH_INTERVAL").unwrap_or_else(|_| "30".to_string());
    let matches = Command::new("socwatch")
        .version("0.3.0")
        .about("watch the containers of a SOC tool bundle and record every change")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to the configuration file")
                .value_name("FILE")
                .default_value("socwatch.toml"),
        )
        .arg(
            Arg::new("watch")
                .short('w')
                .long("watch")
                .help(format!(
                    "Poll the container runtime every N seconds (default: {default_watch_interval})"
                ))
                .value_name("SECONDS")
                .num_args(0..=1)
                .default_missing_value(default_watch_interval)
                .value_parser(clap::value_parser!(u64)),
        )
        .get_matches();
    matches.into()
}
