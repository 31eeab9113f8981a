use ragent_types::RunState;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Unknown, or already joined
    #[error("Run not found: {0}")]
    NotFound(String),

    #[error("Run {0} timed out")]
    TimedOut(String),

    #[error("Run {run_id} failed: {message}")]
    Failed { run_id: String, message: String },
}

struct RunSlot {
    handle: JoinHandle<anyhow::Result<RunState>>,
    finished_at: Arc<OnceLock<Instant>>,
}

/// Background runs keyed by run id
///
/// Each result is delivered at most once: `join` removes the run before
/// waiting on it. Finished runs that are never joined are swept after
/// `result_ttl`, checked whenever a new run starts.
pub struct RunManager {
    runs: Mutex<HashMap<String, RunSlot>>,
    result_ttl: Duration,
}

impl RunManager {
    pub fn new(result_ttl: Duration) -> Self {
        Self {
            runs: Mutex::new(HashMap::new()),
            result_ttl,
        }
    }

    fn runs(&self) -> MutexGuard<'_, HashMap<String, RunSlot>> {
        self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Schedule `run` in the background under `run_id`
    pub fn start<F>(&self, run_id: impl Into<String>, run: F)
    where
        F: Future<Output = anyhow::Result<RunState>> + Send + 'static,
    {
        let run_id = run_id.into();
        let finished_at = Arc::new(OnceLock::new());
        let finished = Arc::clone(&finished_at);

        let task_run_id = run_id.clone();
        let handle = tokio::spawn(async move {
            let result = run.await;
            if let Err(e) = &result {
                tracing::error!(run_id = %task_run_id, "Run failed: {:#}", e);
            }
            let _ = finished.set(Instant::now());
            result
        });

        let mut runs = self.runs();
        self.sweep(&mut runs);
        runs.insert(run_id.clone(), RunSlot { handle, finished_at });
        tracing::info!(run_id = %run_id, active = runs.len(), "Run scheduled");
    }

    /// Wait for a run and take its result
    ///
    /// On timeout the task is aborted; the abort is cooperative and an
    /// in-flight upstream call may still complete.
    pub async fn join(&self, run_id: &str, timeout: Duration) -> Result<RunState, RunError> {
        let slot = self
            .runs()
            .remove(run_id)
            .ok_or_else(|| RunError::NotFound(run_id.to_string()))?;
        let mut handle = slot.handle;

        match tokio::time::timeout(timeout, &mut handle).await {
            Err(_) => {
                handle.abort();
                tracing::warn!(run_id = %run_id, "Run timed out, aborted");
                Err(RunError::TimedOut(run_id.to_string()))
            }
            Ok(Err(join_error)) => Err(RunError::Failed {
                run_id: run_id.to_string(),
                message: join_error.to_string(),
            }),
            Ok(Ok(Err(e))) => Err(RunError::Failed {
                run_id: run_id.to_string(),
                message: format!("{:#}", e),
            }),
            Ok(Ok(Ok(state))) => Ok(state),
        }
    }

    /// Runs scheduled and not yet joined or swept
    pub fn len(&self) -> usize {
        self.runs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep(&self, runs: &mut HashMap<String, RunSlot>) {
        let ttl = self.result_ttl;
        let before = runs.len();
        runs.retain(|_, slot| match slot.finished_at.get() {
            Some(finished) => finished.elapsed() < ttl,
            None => true,
        });

        let dropped = before - runs.len();
        if dropped > 0 {
            tracing::info!(dropped, "Dropped abandoned run results");
        }
    }
}
