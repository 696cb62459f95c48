//! Build triggering and the read-only "view a job" entry point. Both only
//! decide which build number the watch loop should follow; the polling
//! itself lives in [`crate::watch`].

use std::io::Write;

use tracing::info;

use crate::config::Config;
use crate::jenkins_client::{fetch_console, JenkinsApi};
use crate::types::{BuildRef, JinkiesError};

/// Resolves the next build number for `job`, asks the server to start a
/// build, and returns the reference to watch.
///
/// The predicted number is racy: another trigger can claim it before ours
/// starts. Jenkins offers no atomic trigger-and-return, so this mirrors what
/// the web UI does; it is an accepted limitation.
pub async fn trigger_build(api: &dyn JenkinsApi, job: &str) -> Result<BuildRef, JinkiesError> {
    // Fetching the job first validates it exists and yields the predicted
    // build number.
    let status = api.job_status(job).await?;
    let build = BuildRef::new(job, status.next_build_number);
    api.start_build(job).await?;
    info!(build = %build, "build requested");
    Ok(build)
}

/// What `view <job>` should do, decided from current job status alone.
#[derive(Debug, PartialEq, Eq)]
pub enum ViewAction {
    /// A build is queued or running; attach the watch loop to it.
    Watch(BuildRef),
    /// Nothing new since the last completed build; replay its console once.
    Replay(BuildRef),
}

pub async fn resolve_view(api: &dyn JenkinsApi, job: &str) -> Result<ViewAction, JinkiesError> {
    let status = api.job_status(job).await?;

    // A queued build does not have a number yet; watch the predicted one.
    if status.in_queue {
        return Ok(ViewAction::Watch(BuildRef::new(
            job,
            status.next_build_number,
        )));
    }

    let Some(last) = status.last_build else {
        return Err(JinkiesError::NoBuilds {
            job: job.to_string(),
        });
    };
    let completed = status.last_completed_build.map(|b| b.number);

    if completed == Some(last.number) {
        Ok(ViewAction::Replay(BuildRef::new(job, last.number)))
    } else {
        Ok(ViewAction::Watch(BuildRef::new(job, last.number)))
    }
}

/// Prints the stored console of a finished build in full, once, with no
/// polling loop.
pub async fn replay_console<W: Write>(
    api: &dyn JenkinsApi,
    config: &Config,
    build: &BuildRef,
    mut out: W,
) -> Result<(), JinkiesError> {
    writeln!(out, "Showing previous build {}", build.number)?;
    let lines = fetch_console(api, &build.job, build.number).await;
    writeln!(out, "{}", lines.join("\n"))?;
    writeln!(out)?;
    writeln!(out, "Showed previous build:")?;
    writeln!(out, "{}/job/{}/{}", config.base_url, build.job, build.number)?;
    Ok(())
}
