use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::types::JinkiesError;

use super::api_types::{BuildStatus, JobStatus};

/// The slice of the Jenkins HTTP API the watch core depends on. Kept as a
/// trait so the poll loop can be driven by a scripted fake in tests.
#[async_trait]
pub trait JenkinsApi: Send + Sync {
    async fn job_status(&self, job: &str) -> Result<JobStatus, JinkiesError>;
    async fn build_status(&self, job: &str, build: u32) -> Result<BuildStatus, JinkiesError>;
    /// Raw progressive console HTML for a build.
    async fn console_html(&self, job: &str, build: u32) -> Result<String, JinkiesError>;
    /// Fire-and-forget build start request.
    async fn start_build(&self, job: &str) -> Result<(), JinkiesError>;
}

pub struct JenkinsClient {
    http: Client,
    base_url: String,
}

impl JenkinsClient {
    pub fn new(config: &Config) -> Result<Self, JinkiesError> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(JinkiesError::Http)?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, JinkiesError>
    where
        T: DeserializeOwned,
    {
        let response = self.http.get(self.endpoint(path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%path, %status, "api request rejected");
            return Err(JinkiesError::Api {
                path: path.to_string(),
                status,
                body,
            });
        }
        response.json::<T>().await.map_err(JinkiesError::Http)
    }

    async fn get_text(&self, path: &str) -> Result<String, JinkiesError> {
        let response = self.http.get(self.endpoint(path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JinkiesError::Api {
                path: path.to_string(),
                status,
                body,
            });
        }
        response.text().await.map_err(JinkiesError::Http)
    }
}

#[async_trait]
impl JenkinsApi for JenkinsClient {
    async fn job_status(&self, job: &str) -> Result<JobStatus, JinkiesError> {
        self.get_json(&format!("job/{job}/api/json")).await
    }

    async fn build_status(&self, job: &str, build: u32) -> Result<BuildStatus, JinkiesError> {
        self.get_json(&format!("job/{job}/{build}/api/json")).await
    }

    async fn console_html(&self, job: &str, build: u32) -> Result<String, JinkiesError> {
        self.get_text(&format!("job/{job}/{build}/logText/progressiveHtml"))
            .await
    }

    async fn start_build(&self, job: &str) -> Result<(), JinkiesError> {
        let path = format!("job/{job}/build?delay=0sec");
        let response = self.http.post(self.endpoint(&path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JinkiesError::Api {
                path,
                status,
                body,
            });
        }
        Ok(())
    }
}
