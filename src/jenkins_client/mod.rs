mod api_types;
mod client;
mod console;

#[cfg(test)]
pub(crate) mod scripted;

pub use api_types::{BuildStatus, BuildSummary, JobStatus};
pub use client::{JenkinsApi, JenkinsClient};
pub use console::fetch_console;
