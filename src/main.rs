use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use jinkies::config::Config;
use jinkies::jenkins_client::JenkinsClient;
use jinkies::trigger::{self, ViewAction};
use jinkies::types::JinkiesError;
use jinkies::watch::{TokioSleeper, WatchSession};

#[derive(Parser)]
#[command(name = "jinkies", version, about = "Command line Jenkins build watcher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the Jenkins instance
    #[arg(long, env = "JENKINS_URL", global = true)]
    url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Trigger a build and stream its console output
    Build {
        /// Name of the Jenkins job
        job: String,
    },

    /// Attach to a job's queued or running build, or replay the last one
    View {
        /// Name of the Jenkins job
        job: String,
    },

    /// Show the resolved configuration
    Config,
}

const URL_HELP: &str = "Please set JENKINS_URL to the url of your jenkins instance.

If your jenkins is behind a login, you can first go to:
    https://jenkins/user/<yourname>/configure

and get a token by clicking \"Show API Token\", then use a URL like:
    https://<yourname>:<yourtoken>@jenkins/";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // An interrupt during any wait exits cleanly, without a backtrace.
    tokio::select! {
        code = run(cli) => code,
        _ = tokio::signal::ctrl_c() => ExitCode::SUCCESS,
    }
}

async fn run(cli: Cli) -> ExitCode {
    let config = match cli.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => Config::new(url),
        None => {
            eprintln!("{URL_HELP}");
            return ExitCode::FAILURE;
        }
    };

    if let Commands::Config = cli.command {
        println!("URL: {}", config.base_url);
        return ExitCode::SUCCESS;
    }

    match dispatch(&cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(command: &Commands, config: &Config) -> Result<(), JinkiesError> {
    let client = JenkinsClient::new(config)?;
    let sleeper = TokioSleeper;
    let mut stdout = io::stdout();

    match command {
        Commands::Build { job } => {
            let build = trigger::trigger_build(&client, job).await?;
            WatchSession::new(&client, &sleeper, config, &mut stdout)
                .run(&build)
                .await?;
        }
        Commands::View { job } => match trigger::resolve_view(&client, job).await? {
            ViewAction::Watch(build) => {
                WatchSession::new(&client, &sleeper, config, &mut stdout)
                    .run(&build)
                    .await?;
            }
            ViewAction::Replay(build) => {
                trigger::replay_console(&client, config, &build, &mut stdout).await?;
            }
        },
        Commands::Config => unreachable!("handled before dispatch"),
    }
    Ok(())
}
