//! Command line Jenkins build watcher: trigger or attach to a build, stream
//! its console output with the server's markup rendered as terminal color,
//! and report the final result.

pub mod colorize;
pub mod config;
pub mod jenkins_client;
pub mod trigger;
pub mod types;
pub mod watch;
