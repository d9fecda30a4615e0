//! Analysis request lifecycle.
//!
//! This module wires transcript validation, the remote model call and reply
//! parsing together, and exposes the observable state the UI renders.
//!
//! # Architecture
//!
//! ```text
//! ChatVibesApp (egui thread)
//!        │ submit(text)
//!        ▼
//! AnalysisOrchestrator ── validate ──▶ reject (state untouched)
//!        │ Loading
//!        └─ tokio task: AnalysisBackend::generate → parse_reply
//!                       │
//!                       ▼
//!              AnalysisStore (watch::Sender<Snapshot>)
//!                       │
//!                       ▼
//! StateReceiver ←─── read by egui update() each frame
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{AnalysisOrchestrator, AnalyzeError};
pub use state::{
    AnalysisStore, ErrorDetail, FailureKind, LifecycleState, Snapshot, StateReceiver,
};
