use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

use runner_api::{CancellationSignal, ExecutionId, RunnerApiError};
use thiserror::Error;
use tracing::info;

use crate::output::OutputAggregator;
use crate::stream::{spawn_stream_consumer, RunnerTransport};

/// Lifecycle state of the execution session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No session has been started yet.
    #[default]
    Idle,
    /// A start request is in flight.
    Starting,
    /// Output is being consumed and input forwarding is enabled.
    Streaming,
    /// The previous session reached a terminal condition (closed normally
    /// or on error). Equivalent to idle for every affordance.
    Ended,
}

/// One remote execution attempt as seen by this client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    /// Opaque token assigned by the remote side; `None` when no session is
    /// active.
    pub id: Option<ExecutionId>,
    pub status: SessionStatus,
}

impl Session {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.id.is_some() && self.status == SessionStatus::Streaming
    }
}

#[derive(Debug, Error)]
pub enum StartError {
    #[error("source text is empty")]
    EmptySource,
    #[error("failed to start execution: {0}")]
    Transport(#[from] RunnerApiError),
    #[error("failed to spawn stream consumer: {0}")]
    Spawn(#[from] std::io::Error),
}

struct ActiveStream {
    execution_id: ExecutionId,
    cancel: CancellationSignal,
    join_handle: Option<JoinHandle<()>>,
}

/// Owns the lifecycle of one remote execution at a time: issues the start
/// request, tracks the session id, opens and closes the stream consumer,
/// and flips the input-forwarding affordance.
///
/// Invariant: at most one live stream subscription at any time. Starting a
/// new session closes the previous subscription before opening the next.
pub struct SessionController {
    session: Mutex<Session>,
    active_stream: Mutex<Option<ActiveStream>>,
    transport: Arc<dyn RunnerTransport>,
    output: Arc<OutputAggregator>,
}

impl SessionController {
    pub fn new(transport: Arc<dyn RunnerTransport>, output: Arc<OutputAggregator>) -> Arc<Self> {
        Arc::new(Self {
            session: Mutex::new(Session::default()),
            active_stream: Mutex::new(None),
            transport,
            output,
        })
    }

    pub(crate) fn transport(&self) -> Arc<dyn RunnerTransport> {
        Arc::clone(&self.transport)
    }

    pub(crate) fn output(&self) -> Arc<OutputAggregator> {
        Arc::clone(&self.output)
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.lock_session().clone()
    }

    /// Id of the session currently accepting input, if any.
    #[must_use]
    pub fn active_execution_id(&self) -> Option<ExecutionId> {
        let session = self.lock_session();
        if session.status == SessionStatus::Streaming {
            session.id.clone()
        } else {
            None
        }
    }

    /// Whether interactive input forwarding is currently enabled.
    #[must_use]
    pub fn input_enabled(&self) -> bool {
        self.active_execution_id().is_some()
    }

    /// Starts a new remote execution for `source`.
    ///
    /// Empty or whitespace-only source is rejected before any network call.
    /// Any previously open stream is closed and joined first so two
    /// consumers never deliver into the same aggregator, and the transcript
    /// is reset so no output from the previous run survives. On transport
    /// or parse failure no session is created.
    pub fn start(self: &Arc<Self>, source: &str) -> Result<ExecutionId, StartError> {
        if source.trim().is_empty() {
            return Err(StartError::EmptySource);
        }

        self.close_active_stream();
        self.output.reset();
        *self.lock_session() = Session {
            id: None,
            status: SessionStatus::Starting,
        };

        let execution_id = match self.transport.start(source) {
            Ok(execution_id) => execution_id,
            Err(error) => {
                *self.lock_session() = Session::default();
                return Err(StartError::Transport(error));
            }
        };

        *self.lock_session() = Session {
            id: Some(execution_id.clone()),
            status: SessionStatus::Streaming,
        };

        // The consumer registers under the active-stream lock so a terminal
        // notification racing this start always finds the entry it must
        // clear.
        let cancel: CancellationSignal = Arc::new(AtomicBool::new(false));
        let mut active_stream = self.lock_active_stream();
        let join_handle = match spawn_stream_consumer(
            Arc::clone(self),
            execution_id.clone(),
            Arc::clone(&cancel),
        ) {
            Ok(join_handle) => join_handle,
            Err(error) => {
                drop(active_stream);
                *self.lock_session() = Session {
                    id: None,
                    status: SessionStatus::Ended,
                };
                return Err(StartError::Spawn(error));
            }
        };
        *active_stream = Some(ActiveStream {
            execution_id: execution_id.clone(),
            cancel,
            join_handle: Some(join_handle),
        });
        drop(active_stream);

        info!(%execution_id, "execution started");
        Ok(execution_id)
    }

    /// Invoked by the stream consumer when the channel reports a terminal
    /// condition. Clears the session id, disables input forwarding, and
    /// re-enables the start affordance.
    ///
    /// Idempotent and stale-guarded: a notification for anything but the
    /// current session is a no-op.
    pub fn stop_on_stream_end(&self, execution_id: &str) {
        {
            let mut session = self.lock_session();
            if session.id.as_deref() != Some(execution_id) {
                return;
            }
            *session = Session {
                id: None,
                status: SessionStatus::Ended,
            };
        }

        // The consumer delivers this notification about itself, so its
        // handle is dropped rather than joined.
        {
            let mut active_stream = self.lock_active_stream();
            let matches = active_stream
                .as_ref()
                .map(|active| active.execution_id.as_str())
                == Some(execution_id);
            if matches {
                *active_stream = None;
            }
        }

        info!(execution_id, "session ended");
    }

    /// Cancels and joins the active stream consumer, if any. Safe to call
    /// when no stream was ever opened.
    ///
    /// The handle is taken out of the lock before cancel and join so a
    /// consumer concurrently reporting a terminal condition can never
    /// deadlock against this call.
    pub fn close_active_stream(&self) {
        let taken = self.lock_active_stream().take();
        let Some(mut active) = taken else {
            return;
        };

        active.cancel.store(true, Ordering::Release);
        if let Some(join_handle) = active.join_handle.take() {
            let _ = join_handle.join();
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, Session> {
        lock_unpoisoned(&self.session)
    }

    fn lock_active_stream(&self) -> MutexGuard<'_, Option<ActiveStream>> {
        lock_unpoisoned(&self.active_stream)
    }
}

pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
