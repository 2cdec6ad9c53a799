//! Video Analysis & Clip Generation Engine.
//!
//! Ties together acquisition, transcription, analysis, selection, and
//! encoding (the other `vclip-*` crates) into a single process-wide
//! `Engine` that accepts analysis requests and runs them one at a time,
//! per §2/§4/§5 of the specification.

pub mod acquisition;
pub mod clip_encoder;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod retention;
pub mod worker;

pub use config::{EngineConfig, ProcessingConfig};
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use logging::{init_tracing, JobLogger};
