//! The Engine Orchestrator: process-wide singleton owning the job map,
//! the single FIFO worker, the retention sweep, and graceful shutdown,
//! per §4.J and §9 ("process-wide state... is a singleton owned by the
//! Engine Orchestrator, created at init, destroyed at shutdown").

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::info;
use validator::Validate;

use vclip_ai::AiClient;
use vclip_models::{ClipView, Job, JobId, JobState, JobStatusView, VideoAnalysisInput};
use vclip_transcribe::Transcriber;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::retention::{delete_job_files, expired_job_ids, log_sweep_result};
use crate::worker::run_job;

type JobMap = Mutex<HashMap<JobId, Job>>;

struct EngineInner {
    jobs: Arc<JobMap>,
    config: Arc<EngineConfig>,
    submit_tx: mpsc::UnboundedSender<JobId>,
    shutdown_tx: watch::Sender<bool>,
}

/// Handle to the running engine. Cheap to clone; all state lives behind
/// `Arc`s, matching the singleton contract in §9.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Engine {
    /// Start the engine: spawns the single worker loop and the periodic
    /// retention sweep. Both tasks run until `shutdown` is called.
    pub fn start(
        config: EngineConfig,
        transcriber: Arc<dyn Transcriber>,
        ai_client: Option<Arc<dyn AiClient>>,
    ) -> Self {
        let jobs: Arc<JobMap> = Arc::new(Mutex::new(HashMap::new()));
        let config = Arc::new(config);
        let (submit_tx, submit_rx) = mpsc::unbounded_channel::<JobId>();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        spawn_worker_loop(
            Arc::clone(&jobs),
            Arc::clone(&config),
            transcriber,
            ai_client,
            submit_rx,
            shutdown_rx.clone(),
        );
        spawn_retention_loop(Arc::clone(&jobs), Arc::clone(&config), shutdown_rx);

        Self {
            inner: Arc::new(EngineInner {
                jobs,
                config,
                submit_tx,
                shutdown_tx,
            }),
        }
    }

    /// Validate and enqueue a new job. Returns immediately with
    /// `pending/0`; the worker picks it up in FIFO order.
    pub async fn submit(&self, input: VideoAnalysisInput) -> EngineResult<JobId> {
        input
            .validate()
            .map_err(|e| EngineError::InvalidInput(e.to_string()))?;

        if let vclip_models::VideoSource::Upload { path } = &input.source {
            if !std::path::Path::new(path).exists() {
                return Err(EngineError::InvalidInput(format!(
                    "upload path does not exist: {path}"
                )));
            }
        }

        let job = Job::new(input);
        let job_id = job.id.clone();

        {
            let mut jobs = self.inner.jobs.lock().await;
            jobs.insert(job_id.clone(), job);
        }

        self.inner
            .submit_tx
            .send(job_id.clone())
            .map_err(|_| EngineError::InvalidInput("engine is shutting down".to_string()))?;

        info!(job_id = %job_id, "job submitted");
        Ok(job_id)
    }

    pub async fn status(&self, job_id: &JobId) -> EngineResult<JobStatusView> {
        let jobs = self.inner.jobs.lock().await;
        let job = jobs
            .get(job_id)
            .ok_or_else(|| EngineError::JobNotFound(job_id.to_string()))?;
        Ok(JobStatusView::from(job))
    }

    /// List generated clips for a completed job, attaching a download
    /// reference for each. The HTTP surface that resolves this
    /// reference into a byte stream is out of scope (§1).
    pub async fn clips(&self, job_id: &JobId) -> EngineResult<Vec<ClipView>> {
        let jobs = self.inner.jobs.lock().await;
        let job = jobs
            .get(job_id)
            .ok_or_else(|| EngineError::JobNotFound(job_id.to_string()))?;
        Ok(job
            .clips
            .iter()
            .map(|clip| ClipView::from_generated(clip, clip.file_path.clone()))
            .collect())
    }

    /// Delete a job and its clip files.
    ///
    /// A job that hasn't started yet (`Pending`, still sitting behind
    /// other work in the FIFO queue) or has already reached a terminal
    /// state is removed immediately — per §8 scenario 6, a queued job
    /// deleted before the worker reaches it must vanish "without having
    /// run." A job that IS currently executing is tombstoned instead:
    /// the worker drops its outputs on its next terminal transition
    /// rather than deleting files out from under an in-flight encode.
    /// See DESIGN.md for the resolved §9 "deletion races" open question.
    pub async fn delete_job(&self, job_id: &JobId) -> EngineResult<(usize, u64)> {
        let mut jobs = self.inner.jobs.lock().await;
        let job = jobs
            .get_mut(job_id)
            .ok_or_else(|| EngineError::JobNotFound(job_id.to_string()))?;

        if job.status == JobState::Pending || job.status.is_terminal() {
            let job = jobs.remove(job_id).expect("checked above");
            drop(jobs);
            let (deleted, freed) = delete_job_files(&job).await;
            return Ok((deleted, freed));
        }

        job.tombstoned = true;
        Ok((0, 0))
    }

    /// Run one retention sweep pass immediately (also invoked on the
    /// periodic timer started by `start`). Never raises.
    pub async fn run_retention_sweep(&self) -> usize {
        let ids = {
            let jobs = self.inner.jobs.lock().await;
            let refs: Vec<&Job> = jobs.values().collect();
            expired_job_ids(&refs, Utc::now(), self.inner.config.retention_days)
        };

        let mut freed_total = 0u64;
        for id in &ids {
            let mut jobs = self.inner.jobs.lock().await;
            if let Some(job) = jobs.remove(id) {
                drop(jobs);
                let (_, freed) = delete_job_files(&job).await;
                freed_total += freed;
            }
        }

        log_sweep_result(ids.len(), freed_total);
        ids.len()
    }

    /// Refuse new enqueues and signal the worker/sweep loops to stop
    /// after their current iteration, per §5's shutdown contract.
    pub fn shutdown(&self) {
        let _ = self.inner.shutdown_tx.send(true);
    }
}

fn spawn_worker_loop(
    jobs: Arc<JobMap>,
    config: Arc<EngineConfig>,
    transcriber: Arc<dyn Transcriber>,
    ai_client: Option<Arc<dyn AiClient>>,
    mut submit_rx: mpsc::UnboundedReceiver<JobId>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("worker loop shutting down");
                        break;
                    }
                }
                maybe_job_id = submit_rx.recv() => {
                    match maybe_job_id {
                        Some(job_id) => {
                            run_job(
                                job_id,
                                Arc::clone(&jobs),
                                Arc::clone(&config),
                                Arc::clone(&transcriber),
                                ai_client.clone(),
                            )
                            .await;
                        }
                        None => break,
                    }
                }
            }
        }
    });
}

fn spawn_retention_loop(jobs: Arc<JobMap>, config: Arc<EngineConfig>, mut shutdown_rx: watch::Receiver<bool>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(config.retention_sweep_interval);
        interval.tick().await; // first tick fires immediately; skip it
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("retention loop shutting down");
                        break;
                    }
                }
                _ = interval.tick() => {
                    let ids = {
                        let map = jobs.lock().await;
                        let refs: Vec<&Job> = map.values().collect();
                        expired_job_ids(&refs, Utc::now(), config.retention_days)
                    };
                    let mut freed_total = 0u64;
                    for id in &ids {
                        let mut map = jobs.lock().await;
                        if let Some(job) = map.remove(id) {
                            drop(map);
                            let (_, freed) = delete_job_files(&job).await;
                            freed_total += freed;
                        }
                    }
                    if !ids.is_empty() {
                        log_sweep_result(ids.len(), freed_total);
                    }
                }
            }
        }
    });
}
