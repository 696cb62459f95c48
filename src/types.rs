use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JinkiesError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{path} returned {status}: {body}")]
    Api {
        path: String,
        status: StatusCode,
        body: String,
    },

    #[error("failure loading job {job}: {detail}")]
    JobLoad { job: String, detail: String },

    #[error("job {job} has no builds yet and none are queued")]
    NoBuilds { job: String },
}

/// One numbered execution of a job. The number is assigned by the server
/// and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRef {
    pub job: String,
    pub number: u32,
}

impl BuildRef {
    pub fn new(job: impl Into<String>, number: u32) -> Self {
        Self {
            job: job.into(),
            number,
        }
    }
}

impl fmt::Display for BuildRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.job, self.number)
    }
}
