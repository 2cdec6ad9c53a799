//! Multi-modal segment scoring and clip selection: the text, audio, and
//! visual analyzers (§4.D–§4.F), the combiner (§4.G), and the clip
//! selector (§4.H).

pub mod audio;
pub mod error;
pub mod scorer;
pub mod selector;
pub mod text;
pub mod visual;

pub use audio::score_segments_audio;
pub use error::{AnalysisError, AnalysisResult};
pub use scorer::score_segments;
pub use selector::select_clips;
pub use text::{score_text, TextAnalyzerConfig};
pub use visual::score_segments_visual;
