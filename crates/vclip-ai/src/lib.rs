//! Optional AI co-processor: rate-limited batched text-completion and
//! single-image vision calls, per §4.K. Supplies the emotion score to
//! the audio analyzer and the face score to the visual analyzer; all
//! failures here are caught by those callers and replaced with a
//! neutral or heuristic value — they never reach the Engine.

pub mod error;
pub mod gemini;
pub mod parsing;

pub use error::{AiError, AiResult};
pub use gemini::{AiConfig, GeminiAiClient};
pub use parsing::parse_score_batch;

use async_trait::async_trait;

/// A chat-style text/vision model reached over HTTP.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Request a JSON array of `expected_len` per-segment scores in
    /// `[0, 1]`. Implementations should apply the full response-parsing
    /// fallback chain before giving up.
    async fn text_batch(
        &self,
        system_prompt: &str,
        prompt: &str,
        expected_len: usize,
    ) -> AiResult<Vec<f64>>;

    /// Ask a vision model a free-form question about a single image,
    /// given as a data URL or a fetchable URL.
    async fn vision(&self, prompt: &str, image_url: &str) -> AiResult<String>;
}
