use std::time::Duration;

/// Runtime settings for talking to a Jenkins instance.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Jenkins server, without a trailing slash.
    pub base_url: String,
    pub http_timeout: Duration,
    /// Delay between polls while the job is still waiting in queue.
    pub queue_poll_interval: Duration,
    /// Delay between polls while console output is streaming.
    pub stream_poll_interval: Duration,
}

impl Config {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_timeout: default_http_timeout(),
            queue_poll_interval: default_queue_poll_interval(),
            stream_poll_interval: default_stream_poll_interval(),
        }
    }
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_queue_poll_interval() -> Duration {
    Duration::from_millis(2500)
}

fn default_stream_poll_interval() -> Duration {
    Duration::from_millis(1500)
}
