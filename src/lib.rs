//! Chat Vibes: paste a WhatsApp export, get a relationship dashboard.
//!
//! * [`validate`]: export-format check that gates every request.
//! * [`pipeline`]: the analysis lifecycle (orchestrator + observable state).
//! * [`analysis`]: typed result model and reply parsing.
//! * [`llm`]: remote model backends and the analysis prompt.
//! * [`input`]: clipboard and file helpers for getting a transcript in.
//! * [`config`]: `settings.toml` persistence.
//! * [`app`]: the eframe window.

pub mod analysis;
pub mod app;
pub mod config;
pub mod input;
pub mod llm;
pub mod pipeline;
pub mod validate;
