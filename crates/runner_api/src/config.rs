use std::collections::BTreeMap;
use std::time::Duration;

use crate::url::DEFAULT_RUNNER_BASE_URL;

/// Transport configuration for runner service requests.
#[derive(Debug, Clone)]
pub struct RunnerApiConfig {
    /// Base URL for the runner endpoints.
    pub base_url: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Additional headers merged into request headers.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional timeout for start/input requests. Never applied to the
    /// event stream: a silent channel is not an error condition.
    pub request_timeout: Option<Duration>,
}

impl Default for RunnerApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RUNNER_BASE_URL.to_string(),
            user_agent: None,
            extra_headers: BTreeMap::new(),
            request_timeout: None,
        }
    }
}

impl RunnerApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.extra_headers.extend(headers);
        self
    }
}
