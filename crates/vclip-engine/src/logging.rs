//! Structured job logging and process-wide tracing setup.

use tracing::{error, info, warn, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vclip_models::JobId;

/// Install the process-wide tracing subscriber: JSON-formatted output
/// filtered by `RUST_LOG`, defaulting this crate's tree to `info`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(EnvFilter::from_default_env().add_directive("vclip=info".parse().unwrap()))
        .init();
}

/// Structured per-job logger: every line it emits carries `job_id` and
/// `stage` fields so a log aggregator can reconstruct one job's timeline.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    stage: String,
}

impl JobLogger {
    pub fn new(job_id: &JobId, stage: &str) -> Self {
        Self {
            job_id: job_id.to_string(),
            stage: stage.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(job_id = %self.job_id, stage = %self.stage, "stage started: {}", message);
    }

    pub fn log_progress(&self, message: &str) {
        info!(job_id = %self.job_id, stage = %self.stage, "stage progress: {}", message);
    }

    pub fn log_warning(&self, message: &str) {
        warn!(job_id = %self.job_id, stage = %self.stage, "stage warning: {}", message);
    }

    pub fn log_error(&self, message: &str) {
        error!(job_id = %self.job_id, stage = %self.stage, "stage error: {}", message);
    }

    pub fn log_completion(&self, message: &str) {
        info!(job_id = %self.job_id, stage = %self.stage, "stage completed: {}", message);
    }

    pub fn create_span(&self) -> Span {
        tracing::info_span!("job_stage", job_id = %self.job_id, stage = %self.stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_carries_job_id_and_stage() {
        let job_id = JobId::new();
        let logger = JobLogger::new(&job_id, "downloading");
        assert_eq!(logger.job_id, job_id.to_string());
        assert_eq!(logger.stage, "downloading");
    }
}
