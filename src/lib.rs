//! Console client for a remote code-runner service.
//!
//! The runner service exposes three endpoints (start an execution, stream
//! its output as server-sent events, forward interactive input) and this
//! crate owns the client-side protocol around them:
//!
//! - [`session::SessionController`] drives the session lifecycle: one
//!   remote execution at a time, superseded cleanly when a new run starts.
//! - [`output::OutputAggregator`] buffers arriving output lines and flushes
//!   them into a bounded transcript on a fixed cadence, so render cost is
//!   decoupled from arrival rate.
//! - [`input::InputForwarder`] sends typed text to the active execution,
//!   best-effort.
//! - [`console::Console`] is the line-oriented front-end over stdin/stdout.
//!
//! Transport lives in the `runner_api` crate behind the
//! [`stream::RunnerTransport`] seam; preferences persistence lives in
//! `prefs_store`.

pub mod app;
pub mod commands;
pub mod config;
pub mod console;
pub mod input;
pub mod output;
pub mod session;
pub mod stream;

pub use app::{App, Theme};
pub use console::Console;
pub use input::{InputForwarder, SendOutcome, INPUT_FORWARD_FAILED_LINE};
pub use output::{OutputAggregator, FLUSH_INTERVAL, OUTPUT_BUFFER_CAPACITY};
pub use session::{Session, SessionController, SessionStatus, StartError};
pub use stream::{HttpRunnerTransport, RunnerTransport};
