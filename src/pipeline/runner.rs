//! Analysis orchestrator: drives validate → prompt → remote call → parse.
//!
//! [`AnalysisOrchestrator`] owns the [`AnalysisStore`] and is the only
//! writer of the lifecycle state.
//!
//! # Request flow
//!
//! ```text
//! analyze(text) / submit(text)
//!   ├─ blank text         → Err(EmptyTranscript)   state unchanged
//!   ├─ validate == false  → Err(FormatRejected)    state unchanged
//!   └─ accepted           → Loading (new request id)
//!         └─ backend.generate(prompt).await          (only suspension point)
//!               ├─ Err(e)  → Failure(Transport)
//!               └─ Ok(raw) → parse_reply(raw)
//!                     ├─ Err → Failure(MalformedResponse), raw logged
//!                     └─ Ok  → Success(result)
//! ```
//!
//! `submit` does everything up to `Loading` on the caller's thread, then
//! spawns the remote half on a tokio runtime and returns immediately, which
//! keeps the egui update loop from ever blocking.

use std::sync::Arc;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::analysis::parse_reply;
use crate::llm::{AnalysisBackend, PromptBuilder};
use crate::validate::FormatValidator;

use super::state::{AnalysisStore, ErrorDetail, LifecycleState, StateReceiver};

// ---------------------------------------------------------------------------
// AnalyzeError
// ---------------------------------------------------------------------------

/// Why a transcript was turned away before any request was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnalyzeError {
    /// Nothing but whitespace was submitted.
    #[error("paste a chat transcript first")]
    EmptyTranscript,

    /// The text does not look like a WhatsApp export.
    #[error("this doesn't look like a WhatsApp chat export")]
    FormatRejected,
}

// ---------------------------------------------------------------------------
// AnalysisOrchestrator
// ---------------------------------------------------------------------------

/// An accepted request that has entered `Loading` but not yet been sent.
struct PendingRequest {
    id: u64,
    prompt: String,
}

/// Drives analysis requests and publishes their lifecycle.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use chat_vibes::config::AppConfig;
/// use chat_vibes::llm::backend_from_config;
/// use chat_vibes::pipeline::AnalysisOrchestrator;
/// use chat_vibes::validate::FormatValidator;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let orchestrator = AnalysisOrchestrator::new(
///     backend_from_config(&config.llm),
///     FormatValidator::with_window(config.validation.prefix_lines),
/// );
/// let mut state = orchestrator.subscribe();
///
/// orchestrator
///     .analyze("[17/01/25, 10:12:01 PM] A: hi")
///     .await
///     .expect("accepted");
/// println!("{}", state.borrow_and_update().state.label());
/// # }
/// ```
pub struct AnalysisOrchestrator {
    store: AnalysisStore,
    backend: Arc<dyn AnalysisBackend>,
    validator: FormatValidator,
    prompt_builder: PromptBuilder,
}

impl AnalysisOrchestrator {
    /// Create an orchestrator in the `Idle` state.
    pub fn new(backend: Arc<dyn AnalysisBackend>, validator: FormatValidator) -> Self {
        Self {
            store: AnalysisStore::new(),
            backend,
            validator,
            prompt_builder: PromptBuilder::new(),
        }
    }

    /// A reader for the lifecycle state.
    pub fn subscribe(&self) -> StateReceiver {
        self.store.subscribe()
    }

    /// Copy of the current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.store.state()
    }

    /// Analyse `text`, returning once the state has left `Loading`.
    ///
    /// `Err` only reports an up-front rejection; failures of the remote call
    /// or of the reply are published as [`LifecycleState::Failure`].
    pub async fn analyze(&self, text: &str) -> Result<(), AnalyzeError> {
        let pending = self.begin(text)?;
        self.finish(pending).await;
        Ok(())
    }

    /// Non-blocking [`analyze`](Self::analyze): the state is `Loading` when
    /// this returns and the remote call continues on `runtime`.
    ///
    /// The returned handle may be dropped; the task runs to completion
    /// regardless.
    pub fn submit(
        self: &Arc<Self>,
        runtime: &Handle,
        text: &str,
    ) -> Result<JoinHandle<()>, AnalyzeError> {
        let pending = self.begin(text)?;
        let this = Arc::clone(self);
        Ok(runtime.spawn(async move { this.finish(pending).await }))
    }

    // -----------------------------------------------------------------------
    // Stages
    // -----------------------------------------------------------------------

    /// Gate on the transcript, then enter `Loading`.
    fn begin(&self, text: &str) -> Result<PendingRequest, AnalyzeError> {
        if text.trim().is_empty() {
            return Err(AnalyzeError::EmptyTranscript);
        }
        if !self.validator.validate(text) {
            log::info!("analysis: transcript rejected, no export timestamp in prefix");
            return Err(AnalyzeError::FormatRejected);
        }

        let prompt = self.prompt_builder.build(text);
        let id = self.store.begin();
        log::info!(
            "analysis #{id}: started (transcript {} bytes, {} lines)",
            text.len(),
            text.lines().count()
        );

        Ok(PendingRequest { id, prompt })
    }

    /// Run the remote call and publish its outcome.
    async fn finish(&self, pending: PendingRequest) {
        let PendingRequest { id, prompt } = pending;

        let outcome = match self.backend.generate(&prompt).await {
            Ok(reply) => Self::interpret(id, reply),
            Err(err) => {
                log::warn!("analysis #{id}: request failed: {err}");
                LifecycleState::Failure(ErrorDetail::transport(&err))
            }
        };

        if self.store.complete(id, outcome) {
            log::info!("analysis #{id}: {}", self.store.state().label());
        } else {
            log::debug!("analysis #{id}: superseded by a newer request, result dropped");
        }
    }

    fn interpret(id: u64, reply: String) -> LifecycleState {
        match parse_reply(&reply) {
            Ok(result) => LifecycleState::Success(Arc::new(result)),
            Err(err) => {
                log::warn!("analysis #{id}: unusable reply ({err}); raw reply: {reply}");
                LifecycleState::Failure(ErrorDetail::malformed(reply))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
