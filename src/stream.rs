use std::future::Future;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use runner_api::{CancellationSignal, ExecutionId, RunnerApiClient, RunnerApiError};
use tracing::{debug, info, warn};

use crate::session::SessionController;

/// Blocking transport interface to the remote runner service.
///
/// The session controller and input forwarder depend on this seam rather
/// than the HTTP client directly, so tests can script a fake runner.
pub trait RunnerTransport: Send + Sync + 'static {
    /// Begins a remote execution and returns its opaque id.
    fn start(&self, code: &str) -> Result<ExecutionId, RunnerApiError>;

    /// Forwards one chunk of interactive input to a running execution.
    fn send_input(&self, execution_id: &str, text: &str) -> Result<(), RunnerApiError>;

    /// Delivers decoded output lines in arrival order until the channel
    /// reaches a terminal condition or `cancel` is raised.
    fn stream_lines(
        &self,
        execution_id: &str,
        cancel: &CancellationSignal,
        on_line: &mut dyn FnMut(String),
    ) -> Result<(), RunnerApiError>;
}

/// Transport backed by the async HTTP client, bridged onto blocking calls
/// with a current-thread runtime per request.
#[derive(Debug)]
pub struct HttpRunnerTransport {
    client: RunnerApiClient,
}

impl HttpRunnerTransport {
    #[must_use]
    pub fn new(client: RunnerApiClient) -> Self {
        Self { client }
    }

    fn block_on<F, T>(&self, future: F) -> Result<T, RunnerApiError>
    where
        F: Future<Output = Result<T, RunnerApiError>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| {
                RunnerApiError::Unknown(format!("failed to initialize tokio runtime: {error}"))
            })?;

        runtime.block_on(future)
    }
}

impl RunnerTransport for HttpRunnerTransport {
    fn start(&self, code: &str) -> Result<ExecutionId, RunnerApiError> {
        self.block_on(self.client.start(code, None))
    }

    fn send_input(&self, execution_id: &str, text: &str) -> Result<(), RunnerApiError> {
        self.block_on(self.client.send_input(execution_id, text, None))
    }

    fn stream_lines(
        &self,
        execution_id: &str,
        cancel: &CancellationSignal,
        on_line: &mut dyn FnMut(String),
    ) -> Result<(), RunnerApiError> {
        self.block_on(
            self.client
                .stream_lines(execution_id, Some(cancel), |line| on_line(line)),
        )
    }
}

/// Spawns the stream-consumer thread for one execution.
///
/// The consumer feeds decoded lines into the aggregator and notifies the
/// controller exactly once when the channel reaches a terminal condition
/// (remote close, transport error, or channel construction failure). A
/// cancelled consumer stays silent: the superseding start already owns the
/// session state.
pub(crate) fn spawn_stream_consumer(
    controller: Arc<SessionController>,
    execution_id: ExecutionId,
    cancel: CancellationSignal,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("stream-consumer-{execution_id}"))
        .spawn(move || {
            let transport = controller.transport();
            let output = controller.output();
            let result = transport.stream_lines(&execution_id, &cancel, &mut |line| {
                output.push(line);
            });

            match result {
                Ok(()) => {
                    info!(%execution_id, "stream closed by remote");
                    controller.stop_on_stream_end(&execution_id);
                }
                Err(RunnerApiError::Cancelled) => {
                    debug!(%execution_id, "stream superseded");
                }
                Err(error) => {
                    warn!(%execution_id, %error, "stream failed");
                    controller.stop_on_stream_end(&execution_id);
                }
            }
        })
}
