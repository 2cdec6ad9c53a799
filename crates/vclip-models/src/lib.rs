//! Shared data models for the video analysis & clip generation engine.
//!
//! This crate provides serde-serializable types for:
//! - The immutable analysis request (`VideoAnalysisInput`) and its options
//! - The mutable process-local `Job` record and its state machine
//! - The transcript/segment/clip pipeline of data that flows through the engine
//! - The external status/clip poll views (§6 of the specification)
//! - The machine-readable error taxonomy

pub mod analysis;
pub mod clip;
pub mod error_code;
pub mod job;
pub mod source;
pub mod status;
pub mod transcript;
pub mod weights;

pub use analysis::{AnalyzedSegment, ModalityScores};
pub use clip::{ClipDefinition, ClipVideoInfo, GeneratedClip};
pub use error_code::ErrorCode;
pub use job::{Job, JobId, JobMetadata, JobState};
pub use source::{Orientation, VideoAnalysisInput, VideoAnalysisOptions, VideoSource};
pub use status::{ClipView, JobStatusView};
pub use transcript::{TranscriptResult, TranscriptSegment};
pub use weights::AnalyzerWeights;
