//! Scripted stand-in for the Jenkins API used by the unit tests. Each
//! endpoint pops the next scripted step; running past the script panics so a
//! test fails loudly if the code under test polls more than expected.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::types::JinkiesError;

use super::api_types::{BuildStatus, BuildSummary, JobStatus};
use super::client::JenkinsApi;

enum Step<T> {
    Respond(T),
    Fail,
}

pub(crate) struct ScriptedApi {
    jobs: Mutex<VecDeque<Step<JobStatus>>>,
    builds: Mutex<VecDeque<Step<BuildStatus>>>,
    consoles: Mutex<VecDeque<Step<String>>>,
    start_fails: bool,
    pub(crate) started: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub(crate) fn new() -> Self {
        Self {
            jobs: Mutex::new(VecDeque::new()),
            builds: Mutex::new(VecDeque::new()),
            consoles: Mutex::new(VecDeque::new()),
            start_fails: false,
            started: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn job(self, status: JobStatus) -> Self {
        self.jobs.lock().unwrap().push_back(Step::Respond(status));
        self
    }

    pub(crate) fn job_fail(self) -> Self {
        self.jobs.lock().unwrap().push_back(Step::Fail);
        self
    }

    pub(crate) fn build(self, status: BuildStatus) -> Self {
        self.builds.lock().unwrap().push_back(Step::Respond(status));
        self
    }

    pub(crate) fn build_fail(self) -> Self {
        self.builds.lock().unwrap().push_back(Step::Fail);
        self
    }

    pub(crate) fn console(self, html: &str) -> Self {
        self.consoles
            .lock()
            .unwrap()
            .push_back(Step::Respond(html.to_string()));
        self
    }

    pub(crate) fn console_fail(self) -> Self {
        self.consoles.lock().unwrap().push_back(Step::Fail);
        self
    }

    pub(crate) fn failing_start(mut self) -> Self {
        self.start_fails = true;
        self
    }

    fn rejected(path: &str) -> JinkiesError {
        JinkiesError::Api {
            path: path.to_string(),
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        }
    }
}

/// Shorthand constructors for scripted statuses.
pub(crate) fn job_status(
    in_queue: bool,
    next_build_number: u32,
    last: Option<u32>,
    last_completed: Option<u32>,
) -> JobStatus {
    JobStatus {
        in_queue,
        next_build_number,
        last_build: last.map(|number| BuildSummary { number }),
        last_completed_build: last_completed.map(|number| BuildSummary { number }),
    }
}

pub(crate) fn running(estimated_millis: i64) -> BuildStatus {
    BuildStatus {
        building: true,
        result: None,
        estimated_duration_millis: Some(estimated_millis),
    }
}

pub(crate) fn finished(result: &str) -> BuildStatus {
    BuildStatus {
        building: false,
        result: Some(result.to_string()),
        estimated_duration_millis: Some(0),
    }
}

#[async_trait]
impl JenkinsApi for ScriptedApi {
    async fn job_status(&self, job: &str) -> Result<JobStatus, JinkiesError> {
        match self
            .jobs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected job status request for {job}"))
        {
            Step::Respond(status) => Ok(status),
            Step::Fail => Err(Self::rejected(&format!("job/{job}/api/json"))),
        }
    }

    async fn build_status(&self, job: &str, build: u32) -> Result<BuildStatus, JinkiesError> {
        match self
            .builds
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected build status request for {job} #{build}"))
        {
            Step::Respond(status) => Ok(status),
            Step::Fail => Err(Self::rejected(&format!("job/{job}/{build}/api/json"))),
        }
    }

    async fn console_html(&self, job: &str, build: u32) -> Result<String, JinkiesError> {
        match self
            .consoles
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected console request for {job} #{build}"))
        {
            Step::Respond(body) => Ok(body),
            Step::Fail => Err(Self::rejected(&format!(
                "job/{job}/{build}/logText/progressiveHtml"
            ))),
        }
    }

    async fn start_build(&self, job: &str) -> Result<(), JinkiesError> {
        if self.start_fails {
            return Err(Self::rejected(&format!("job/{job}/build?delay=0sec")));
        }
        self.started.lock().unwrap().push(job.to_string());
        Ok(())
    }
}
