use std::sync::Arc;

use tracing::warn;

use crate::session::SessionController;

/// Fixed line appended to the transcript when forwarding input fails.
pub const INPUT_FORWARD_FAILED_LINE: &str = "input could not be delivered";

/// Result of one forwarding attempt. Front-ends clear their input field on
/// `Sent` and leave it untouched on `Failed` so the user can retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank text or no active session: nothing was sent, nothing changed.
    Ignored,
    Sent,
    /// Transport failure; a diagnostic line was queued for the transcript.
    Failed,
}

/// Forwards interactively typed text to the active session, best-effort.
pub struct InputForwarder {
    controller: Arc<SessionController>,
}

impl InputForwarder {
    #[must_use]
    pub fn new(controller: Arc<SessionController>) -> Self {
        Self { controller }
    }

    /// Sends `text` to the active session.
    ///
    /// A no-op when the trimmed text is empty or no session is active,
    /// not an error. A transport failure degrades to a transcript
    /// diagnostic; it never touches the session status or the output
    /// channel.
    pub fn send(&self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Ignored;
        }
        let Some(execution_id) = self.controller.active_execution_id() else {
            return SendOutcome::Ignored;
        };

        match self.controller.transport().send_input(&execution_id, text) {
            Ok(()) => SendOutcome::Sent,
            Err(error) => {
                warn!(%execution_id, %error, "input forwarding failed");
                self.controller.output().push(INPUT_FORWARD_FAILED_LINE);
                SendOutcome::Failed
            }
        }
    }
}
