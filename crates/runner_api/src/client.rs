use std::future::Future;
use std::sync::{atomic::AtomicBool, atomic::Ordering, Arc};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};

use crate::config::RunnerApiConfig;
use crate::error::{parse_error_message, RunnerApiError};
use crate::payload::{ExecutionId, InputRequest, StartRequest, StartResponse};
use crate::sse::SseStreamParser;
use crate::url::{input_url, start_url, stream_url};

/// Optional cancellation signal shared across request and stream loops.
pub type CancellationSignal = Arc<AtomicBool>;

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

const ACCEPT_JSON: &str = "application/json";
const ACCEPT_EVENT_STREAM: &str = "text/event-stream";

#[derive(Debug)]
pub struct RunnerApiClient {
    http: Client,
    config: RunnerApiConfig,
}

impl RunnerApiClient {
    pub fn new(config: RunnerApiConfig) -> Result<Self, RunnerApiError> {
        let http = Client::builder().build().map_err(RunnerApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &RunnerApiConfig {
        &self.config
    }

    pub fn start_endpoint(&self) -> String {
        start_url(&self.config.base_url)
    }

    pub fn input_endpoint(&self) -> String {
        input_url(&self.config.base_url)
    }

    pub fn stream_endpoint(&self, execution_id: &str) -> String {
        stream_url(&self.config.base_url, execution_id)
    }

    fn build_headers(&self, accept: &'static str) -> Result<HeaderMap, RunnerApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(accept));

        if let Some(user_agent) = self
            .config
            .user_agent
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            headers.insert(
                USER_AGENT,
                HeaderValue::from_str(user_agent)
                    .map_err(|_| RunnerApiError::InvalidHeader(USER_AGENT.to_string()))?,
            );
        }

        for (key, value) in &self.config.extra_headers {
            headers.insert(
                HeaderName::from_bytes(key.as_bytes())
                    .map_err(|_| RunnerApiError::InvalidHeader(key.clone()))?,
                HeaderValue::from_str(value)
                    .map_err(|_| RunnerApiError::InvalidHeader(key.clone()))?,
            );
        }

        Ok(headers)
    }

    pub fn build_start_request(&self, code: &str) -> Result<RequestBuilder, RunnerApiError> {
        let mut request = self
            .http
            .post(self.start_endpoint())
            .headers(self.build_headers(ACCEPT_JSON)?)
            .json(&StartRequest::new(code));
        if let Some(timeout) = self.config.request_timeout {
            request = request.timeout(timeout);
        }

        Ok(request)
    }

    pub fn build_input_request(
        &self,
        execution_id: &str,
        text: &str,
    ) -> Result<RequestBuilder, RunnerApiError> {
        let mut request = self
            .http
            .post(self.input_endpoint())
            .headers(self.build_headers(ACCEPT_JSON)?)
            .json(&InputRequest::new(execution_id, text));
        if let Some(timeout) = self.config.request_timeout {
            request = request.timeout(timeout);
        }

        Ok(request)
    }

    // No request timeout on the stream: the channel stays open for as long
    // as the remote execution keeps producing output.
    pub fn build_stream_request(
        &self,
        execution_id: &str,
    ) -> Result<RequestBuilder, RunnerApiError> {
        Ok(self
            .http
            .get(self.stream_endpoint(execution_id))
            .headers(self.build_headers(ACCEPT_EVENT_STREAM)?))
    }

    /// Begin a remote execution for the given source text.
    pub async fn start(
        &self,
        code: &str,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<ExecutionId, RunnerApiError> {
        let response = self
            .send_checked(self.build_start_request(code)?, cancellation)
            .await?;
        let body = await_or_cancel(response.text(), cancellation)
            .await?
            .map_err(RunnerApiError::from)?;

        let parsed: StartResponse = serde_json::from_str(&body)?;
        if parsed.id.trim().is_empty() {
            return Err(RunnerApiError::MissingExecutionId);
        }

        Ok(parsed.id)
    }

    /// Forward one chunk of interactive input to a running execution.
    pub async fn send_input(
        &self,
        execution_id: &str,
        text: &str,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<(), RunnerApiError> {
        self.send_checked(self.build_input_request(execution_id, text)?, cancellation)
            .await?;
        Ok(())
    }

    /// Consume the event stream for one execution, invoking `on_line` for
    /// each decoded output line in arrival order.
    ///
    /// Returns `Ok(())` when the remote side closes the channel, and an
    /// error for transport failures or cancellation. Either way the
    /// underlying channel handle is released exactly once on return.
    pub async fn stream_lines<F>(
        &self,
        execution_id: &str,
        cancellation: Option<&CancellationSignal>,
        mut on_line: F,
    ) -> Result<(), RunnerApiError>
    where
        F: FnMut(String),
    {
        let response = self
            .send_checked(self.build_stream_request(execution_id)?, cancellation)
            .await?;
        let mut bytes = response.bytes_stream();
        let mut parser = SseStreamParser::default();

        loop {
            let Some(chunk) = await_or_cancel(bytes.next(), cancellation).await? else {
                break;
            };
            if is_cancelled(cancellation) {
                return Err(RunnerApiError::Cancelled);
            }
            let chunk = chunk.map_err(RunnerApiError::from)?;
            for line in parser.feed(&chunk) {
                on_line(line);
            }
        }

        if is_cancelled(cancellation) {
            return Err(RunnerApiError::Cancelled);
        }

        Ok(())
    }

    async fn send_checked(
        &self,
        request: RequestBuilder,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<Response, RunnerApiError> {
        let response = await_or_cancel(request.send(), cancellation)
            .await?
            .map_err(RunnerApiError::from)?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = await_or_cancel(response.text(), cancellation)
            .await?
            .unwrap_or_else(|_| fallback_reason(status));

        Err(RunnerApiError::Status(
            status,
            parse_error_message(status, &body),
        ))
    }
}

fn fallback_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

fn is_cancelled(cancel: Option<&CancellationSignal>) -> bool {
    cancel.is_some_and(|token| token.load(Ordering::Acquire))
}

async fn await_or_cancel<F>(
    future: F,
    cancellation: Option<&CancellationSignal>,
) -> Result<F::Output, RunnerApiError>
where
    F: Future,
{
    if cancellation.is_none() {
        return Ok(future.await);
    }

    let mut future = Box::pin(future);

    loop {
        if is_cancelled(cancellation) {
            return Err(RunnerApiError::Cancelled);
        }

        if let Ok(output) = tokio::time::timeout(CANCEL_POLL_INTERVAL, &mut future).await {
            if is_cancelled(cancellation) {
                return Err(RunnerApiError::Cancelled);
            }
            return Ok(output);
        }
    }
}
