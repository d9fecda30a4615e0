//! Lifecycle state machine and the observable store that holds it.
//!
//! [`LifecycleState`] is what the UI renders.  [`AnalysisStore`] owns the
//! single `watch::Sender` for it; any number of readers hold a
//! [`StateReceiver`] and see each transition as one whole-snapshot
//! replacement, never a partially updated value.
//!
//! Every accepted analysis is stamped with a request id.  A completion only
//! lands if its id is still the newest one, so a slow reply to an old
//! request cannot overwrite the state of a newer one.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::analysis::AnalysisResult;
use crate::llm::LlmError;

/// Shown when a transport error has no text of its own.
const GENERIC_FAILURE: &str = "Failed to analyze chat";

/// Shown for replies that could not be parsed.  The raw reply is kept in
/// [`ErrorDetail::raw_response`] for logs, never in the message.
const INVALID_RESPONSE: &str = "Invalid response format";

// ---------------------------------------------------------------------------
// ErrorDetail
// ---------------------------------------------------------------------------

/// Which stage of an accepted request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The remote call itself failed (network, auth, rate limit, timeout).
    Transport,
    /// The reply arrived but was not usable analysis JSON.
    MalformedResponse,
}

/// Failure payload carried by [`LifecycleState::Failure`].
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetail {
    pub kind: FailureKind,
    /// User-facing message.
    pub message: String,
    /// The unparseable reply, for diagnostics only.
    pub raw_response: Option<String>,
}

impl ErrorDetail {
    pub fn transport(err: &LlmError) -> Self {
        let message = if err.has_detail() {
            err.to_string()
        } else {
            GENERIC_FAILURE.to_string()
        };
        Self {
            kind: FailureKind::Transport,
            message,
            raw_response: None,
        }
    }

    pub fn malformed(raw_response: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::MalformedResponse,
            message: INVALID_RESPONSE.to_string(),
            raw_response: Some(raw_response.into()),
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ---------------------------------------------------------------------------
// LifecycleState
// ---------------------------------------------------------------------------

/// States of the analysis lifecycle.
///
/// ```text
/// Idle ──analyze──▶ Loading ──reply parsed──▶ Success
///                           ──call/parse fails──▶ Failure
/// Success / Failure ──analyze──▶ Loading
/// ```
///
/// A rejected transcript never leaves the current state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Loading,
    Success(Arc<AnalysisResult>),
    Failure(ErrorDetail),
}

impl LifecycleState {
    /// `true` while a request is in flight.
    ///
    /// ```
    /// use chat_vibes::pipeline::LifecycleState;
    ///
    /// assert!(!LifecycleState::Idle.is_busy());
    /// assert!(LifecycleState::Loading.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, LifecycleState::Loading)
    }

    /// A short label for the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            LifecycleState::Idle => "Idle",
            LifecycleState::Loading => "Analyzing",
            LifecycleState::Success(_) => "Done",
            LifecycleState::Failure(_) => "Error",
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            LifecycleState::Success(result) => Some(result.as_ref()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorDetail> {
        match self {
            LifecycleState::Failure(detail) => Some(detail),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot / AnalysisStore
// ---------------------------------------------------------------------------

/// What readers observe: the current state and the request that produced it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// `0` until the first accepted request.
    pub request_id: u64,
    pub state: LifecycleState,
}

/// Read side of the store.  Cheap to clone; hold one per consumer.
pub type StateReceiver = watch::Receiver<Snapshot>;

/// Owner of the lifecycle state.  Starts as `Idle`.
#[derive(Debug)]
pub struct AnalysisStore {
    tx: watch::Sender<Snapshot>,
}

impl AnalysisStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Snapshot::default());
        Self { tx }
    }

    /// A new reader positioned at the current snapshot.
    pub fn subscribe(&self) -> StateReceiver {
        self.tx.subscribe()
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    pub fn state(&self) -> LifecycleState {
        self.tx.borrow().state.clone()
    }

    /// Allocate the next request id and enter `Loading`, replacing whatever
    /// result or error was there.
    pub(crate) fn begin(&self) -> u64 {
        let mut id = 0;
        self.tx.send_modify(|snapshot| {
            snapshot.request_id += 1;
            snapshot.state = LifecycleState::Loading;
            id = snapshot.request_id;
        });
        id
    }

    /// Apply the outcome of request `request_id`.
    ///
    /// Returns `false`, leaving the state untouched, when a newer request
    /// has started since.
    pub(crate) fn complete(&self, request_id: u64, outcome: LifecycleState) -> bool {
        let mut outcome = Some(outcome);
        self.tx.send_if_modified(|snapshot| {
            if snapshot.request_id != request_id || !snapshot.state.is_busy() {
                return false;
            }
            if let Some(state) = outcome.take() {
                snapshot.state = state;
            }
            true
        })
    }
}

impl Default for AnalysisStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
