use tracing::debug;

use crate::colorize::colorize;

use super::client::JenkinsApi;

/// Fetches the full console captured so far for a build, colorized and split
/// into display lines.
///
/// A failed request means "no new output yet", not an error; the caller's
/// retry loop absorbs it. Each call returns the complete console, so callers
/// must diff against their own cursor.
pub async fn fetch_console(api: &dyn JenkinsApi, job: &str, build: u32) -> Vec<String> {
    match api.console_html(job, build).await {
        Ok(body) => colorize(&body)
            .split('\n')
            .map(|line| line.trim_start().to_string())
            .collect(),
        Err(err) => {
            debug!(%job, build, error = %err, "console fetch failed");
            Vec::new()
        }
    }
}
