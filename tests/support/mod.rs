use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use runner_api::{CancellationSignal, ExecutionId, RunnerApiError};
use runner_console::output::OutputAggregator;
use runner_console::session::SessionController;
use runner_console::stream::RunnerTransport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    StartRequested,
    StreamOpened(ExecutionId),
    StreamClosed(ExecutionId),
    InputSent {
        execution_id: ExecutionId,
        text: String,
    },
}

/// How a scripted stream behaves after emitting its lines.
pub enum StreamEnd {
    /// Remote closes the channel normally.
    Close,
    /// Channel fails with a transport error.
    Error,
    /// Stay open until the consumer is cancelled.
    Block,
}

pub struct StreamScript {
    lines: Vec<String>,
    end: StreamEnd,
}

/// Scripted runner transport recording every call it receives.
#[derive(Default)]
pub struct FakeTransport {
    start_results: Mutex<VecDeque<Result<ExecutionId, RunnerApiError>>>,
    input_results: Mutex<VecDeque<Result<(), RunnerApiError>>>,
    streams: Mutex<HashMap<ExecutionId, StreamScript>>,
    events: Mutex<Vec<TransportEvent>>,
    live_streams: AtomicUsize,
    max_live_streams: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script_start_ok(&self, execution_id: &str) {
        lock_unpoisoned(&self.start_results).push_back(Ok(execution_id.to_string()));
    }

    pub fn script_start_error(&self, message: &str) {
        lock_unpoisoned(&self.start_results)
            .push_back(Err(RunnerApiError::Unknown(message.to_string())));
    }

    pub fn script_input_error(&self, message: &str) {
        lock_unpoisoned(&self.input_results)
            .push_back(Err(RunnerApiError::Unknown(message.to_string())));
    }

    pub fn script_stream(&self, execution_id: &str, lines: &[&str], end: StreamEnd) {
        lock_unpoisoned(&self.streams).insert(
            execution_id.to_string(),
            StreamScript {
                lines: lines.iter().map(ToString::to_string).collect(),
                end,
            },
        );
    }

    pub fn events(&self) -> Vec<TransportEvent> {
        lock_unpoisoned(&self.events).clone()
    }

    pub fn max_live_streams(&self) -> usize {
        self.max_live_streams.load(Ordering::SeqCst)
    }

    fn record(&self, event: TransportEvent) {
        lock_unpoisoned(&self.events).push(event);
    }
}

impl RunnerTransport for FakeTransport {
    fn start(&self, _code: &str) -> Result<ExecutionId, RunnerApiError> {
        self.record(TransportEvent::StartRequested);
        lock_unpoisoned(&self.start_results)
            .pop_front()
            .expect("start call should be scripted")
    }

    fn send_input(&self, execution_id: &str, text: &str) -> Result<(), RunnerApiError> {
        self.record(TransportEvent::InputSent {
            execution_id: execution_id.to_string(),
            text: text.to_string(),
        });
        lock_unpoisoned(&self.input_results)
            .pop_front()
            .unwrap_or(Ok(()))
    }

    fn stream_lines(
        &self,
        execution_id: &str,
        cancel: &CancellationSignal,
        on_line: &mut dyn FnMut(String),
    ) -> Result<(), RunnerApiError> {
        let script = lock_unpoisoned(&self.streams)
            .remove(execution_id)
            .expect("stream open should be scripted");

        self.record(TransportEvent::StreamOpened(execution_id.to_string()));
        let live = self.live_streams.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_live_streams.fetch_max(live, Ordering::SeqCst);

        let mut result = Ok(());
        for line in script.lines {
            if cancel.load(Ordering::Acquire) {
                result = Err(RunnerApiError::Cancelled);
                break;
            }
            on_line(line);
        }

        if result.is_ok() {
            result = match script.end {
                StreamEnd::Close => Ok(()),
                StreamEnd::Error => {
                    Err(RunnerApiError::Unknown("stream transport failure".to_string()))
                }
                StreamEnd::Block => {
                    while !cancel.load(Ordering::Acquire) {
                        thread::sleep(Duration::from_millis(2));
                    }
                    Err(RunnerApiError::Cancelled)
                }
            };
        }

        self.live_streams.fetch_sub(1, Ordering::SeqCst);
        self.record(TransportEvent::StreamClosed(execution_id.to_string()));
        result
    }
}

pub fn harness(transport: &Arc<FakeTransport>) -> (Arc<SessionController>, Arc<OutputAggregator>) {
    let output = Arc::new(OutputAggregator::new());
    let controller = SessionController::new(
        Arc::clone(transport) as Arc<dyn RunnerTransport>,
        Arc::clone(&output),
    );

    (controller, output)
}

/// Polls `predicate` until it holds or a two-second deadline passes.
pub fn wait_until(description: &str, mut predicate: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if predicate() {
            return;
        }
        thread::sleep(Duration::from_millis(2));
    }

    panic!("timed out waiting for {description}");
}

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
