//! Engine process entry point.

use std::sync::Arc;

use tracing::{error, info};

use vclip_ai::{AiClient, GeminiAiClient};
use vclip_engine::{init_tracing, Engine, EngineConfig};
use vclip_transcribe::{Transcriber, WhisperCliTranscriber};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    info!("starting vclip-engine");

    let config = match EngineConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let transcriber: Arc<dyn Transcriber> = match WhisperCliTranscriber::new(None) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            error!("failed to resolve transcriber binary: {e}");
            std::process::exit(1);
        }
    };

    let ai_client: Option<Arc<dyn AiClient>> = if config.ai_enabled {
        Some(Arc::new(GeminiAiClient::new(config.ai.clone())))
    } else {
        None
    };

    let engine = Engine::start(config, transcriber, ai_client);

    tokio::signal::ctrl_c().await.ok();
    info!("received shutdown signal");
    engine.shutdown();

    info!("vclip-engine shutdown complete");
}
