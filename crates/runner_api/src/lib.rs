//! Transport-only runner service client primitives.
//!
//! This crate owns request/response building/parsing behavior for the remote
//! runner endpoints only: starting an execution, consuming its output event
//! stream, and forwarding interactive input. It intentionally contains no
//! session lifecycle state and no console/UI coupling.
//!
//! Stream normalization decodes each event payload as one JSON-encoded
//! output line and substitutes [`sse::MALFORMED_PAYLOAD_LINE`] for payloads
//! that cannot be decoded, so a single bad event never ends the channel.

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod sse;
pub mod url;

pub use client::{CancellationSignal, RunnerApiClient};
pub use config::RunnerApiConfig;
pub use error::{parse_error_message, RunnerApiError};
pub use payload::{ExecutionId, InputRequest, StartRequest, StartResponse};
pub use sse::{decode_payload_line, SseStreamParser, MALFORMED_PAYLOAD_LINE};
pub use url::{normalize_base_url, DEFAULT_RUNNER_BASE_URL};
