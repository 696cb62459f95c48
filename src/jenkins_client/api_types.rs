use serde::Deserialize;

/// Job-level status from `job/<name>/api/json`.
#[derive(Debug, Deserialize, Clone)]
pub struct JobStatus {
    #[serde(rename = "inQueue", default)]
    pub in_queue: bool,
    #[serde(rename = "nextBuildNumber", default)]
    pub next_build_number: u32,
    #[serde(rename = "lastBuild", default)]
    pub last_build: Option<BuildSummary>,
    #[serde(rename = "lastCompletedBuild", default)]
    pub last_completed_build: Option<BuildSummary>,
}

/// Reference to a build as embedded in job status responses.
#[derive(Debug, Deserialize, Clone)]
pub struct BuildSummary {
    pub number: u32,
}

/// Build-level status from `job/<name>/<number>/api/json`. Fetched fresh on
/// every poll; `result` stays null while the build is running.
#[derive(Debug, Deserialize, Clone)]
pub struct BuildStatus {
    #[serde(default)]
    pub building: bool,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(rename = "estimatedDuration", default)]
    pub estimated_duration_millis: Option<i64>,
}

impl BuildStatus {
    /// Server estimate in seconds, zero when the server has none.
    pub fn estimated_secs(&self) -> f64 {
        self.estimated_duration_millis.unwrap_or(0) as f64 / 1000.0
    }
}
