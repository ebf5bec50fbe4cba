use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use askbox_types::{
    detail_lines, Mode, Phase, Snapshot, SubmitRequest, TaskStatus, TaskStatusResponse,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::jobs::JobSystem;
use crate::markdown;
use crate::settings::{ClientSettings, Messages};

/// `elapsed` in seconds, rounded to two decimals and never below 0.01.
pub fn elapsed_seconds(elapsed: Duration) -> f64 {
    let rounded = (elapsed.as_secs_f64() * 100.0).round() / 100.0;
    rounded.max(0.01)
}

struct TrackerState {
    snapshot: Snapshot,
    /// Bumped by every submission, cancellation and supersession. A flow
    /// may only touch the state while its generation is still current.
    generation: u64,
    submitted_at: Option<Instant>,
    destroyed: bool,
}

impl TrackerState {
    fn stamp_elapsed(&mut self) {
        if let Some(started) = self.submitted_at.take() {
            self.snapshot.elapsed_seconds = Some(elapsed_seconds(started.elapsed()));
        }
    }

    fn fail(&mut self, message: &str) {
        self.snapshot.phase = Phase::Error;
        self.snapshot.message = message.to_string();
        self.snapshot.detail_lines.clear();
        self.stamp_elapsed();
    }
}

struct Inner {
    jobs: Arc<dyn JobSystem>,
    poll_interval: Duration,
    messages: Messages,
    state: Mutex<TrackerState>,
    snapshots: watch::Sender<Snapshot>,
    teardown: watch::Sender<bool>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, state: &TrackerState) {
        self.snapshots.send_replace(state.snapshot.clone());
    }

    fn is_current(&self, generation: u64) -> bool {
        let state = self.lock();
        !state.destroyed && state.generation == generation
    }

    /// Applies `update` if `generation` is still the tracked one and
    /// publishes the result. Returns false when the update was discarded.
    fn apply<F>(&self, generation: u64, update: F) -> bool
    where
        F: FnOnce(&mut TrackerState),
    {
        let mut state = self.lock();
        if state.destroyed || state.generation != generation {
            return false;
        }
        update(&mut state);
        self.publish(&state);
        true
    }

    async fn run(self: Arc<Self>, generation: u64, request: SubmitRequest) {
        let task_id = match self.jobs.submit(&request).await {
            Ok(created) => created.task_id,
            Err(e) => {
                error!("Failed to submit query: {}", e);
                self.apply(generation, |state| state.fail(&self.messages.submit_failed));
                return;
            }
        };

        let tracked = self.apply(generation, |state| {
            state.snapshot.task_id = Some(task_id.clone());
        });
        if !tracked {
            debug!("Task {} was superseded before tracking started", task_id);
            return;
        }

        info!("Tracking task {}", task_id);
        self.poll(generation, &task_id).await;
    }

    async fn poll(&self, generation: u64, task_id: &str) {
        loop {
            if !self.is_current(generation) {
                debug!("Stopped tracking task {}", task_id);
                return;
            }

            match self.jobs.status(task_id).await {
                Ok(response) if response.status == TaskStatus::Succeeded => {
                    self.succeed(generation, response);
                    return;
                }
                Ok(response) if response.status.is_failure() => {
                    warn!(
                        "Task {} ended with status {}: {}",
                        task_id,
                        response.status,
                        response.error.as_deref().unwrap_or("no error reported")
                    );
                    self.apply(generation, |state| {
                        state.snapshot.task_status = Some(response.status);
                        state.fail(&self.messages.job_failed);
                    });
                    return;
                }
                Ok(response) => {
                    debug!("Task {} is {}", task_id, response.status);
                    self.apply(generation, |state| {
                        state.snapshot.task_status = Some(response.status);
                    });
                }
                Err(e) => {
                    if e.is_not_found() {
                        warn!("Task {} is unknown to the job system: {}", task_id, e);
                    } else if e.is_network() || e.is_timeout() {
                        error!("Job system unreachable while polling task {}: {}", task_id, e);
                    } else {
                        error!("Failed to fetch status of task {}: {}", task_id, e);
                    }
                    self.apply(generation, |state| state.fail(&self.messages.status_failed));
                    return;
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn succeed(&self, generation: u64, response: TaskStatusResponse) {
        let result_text = response
            .result
            .filter(|result| !result.trim().is_empty())
            .unwrap_or_else(|| self.messages.no_answer.clone());
        let result_html = markdown::render(&result_text);
        let details = response.details.unwrap_or_default();
        let lines = detail_lines(details.thoughts.as_deref());

        let applied = self.apply(generation, |state| {
            state.snapshot.phase = Phase::Success;
            state.snapshot.message = self.messages.result_ready.clone();
            state.snapshot.task_status = Some(TaskStatus::Succeeded);
            state.snapshot.resolved_mode = details.mode;
            state.snapshot.result_text = Some(result_text);
            state.snapshot.result_html = Some(result_html);
            state.snapshot.detail_lines = lines;
            state.stamp_elapsed();
        });
        if applied {
            info!("Task {} succeeded", response.task_id);
        }
    }
}

/// Client side lifecycle of one answering task at a time.
///
/// `submit` hands a query to the [`JobSystem`] and polls the resulting task
/// until it succeeds, fails or stops being the tracked one. Progress is
/// published as [`Snapshot`]s. Only the most recent submission is ever
/// tracked: responses belonging to a superseded, cancelled or torn down task
/// are dropped on arrival.
///
/// Submitting spawns onto the current Tokio runtime. Dropping the tracker
/// tears it down.
pub struct TaskTracker {
    inner: Arc<Inner>,
}

impl TaskTracker {
    pub fn new(jobs: Arc<dyn JobSystem>, poll_interval: Duration, messages: Messages) -> Self {
        let (snapshots, _) = watch::channel(Snapshot::default());
        let (teardown, _) = watch::channel(false);
        let inner = Inner {
            jobs,
            poll_interval,
            messages,
            state: Mutex::new(TrackerState {
                snapshot: Snapshot::default(),
                generation: 0,
                submitted_at: None,
                destroyed: false,
            }),
            snapshots,
            teardown,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn from_settings(jobs: Arc<dyn JobSystem>, settings: &ClientSettings) -> Self {
        Self::new(jobs, settings.poll_interval(), settings.messages.clone())
    }

    /// Starts tracking `query`.
    ///
    /// Returns `None` without touching the state when the query is blank,
    /// a submission is already in flight or the tracker was torn down.
    /// Otherwise the phase is `loading` by the time this returns, and the
    /// handle resolves once the task reached a terminal phase or stopped
    /// being tracked.
    pub fn submit(&self, query: &str, mode: Mode) -> Option<JoinHandle<()>> {
        self.start(query, mode, false)
    }

    /// Like [`submit`](Self::submit), but replaces a task that is still in
    /// flight instead of being ignored.
    pub fn supersede(&self, query: &str, mode: Mode) -> Option<JoinHandle<()>> {
        self.start(query, mode, true)
    }

    fn start(&self, query: &str, mode: Mode, replace_in_flight: bool) -> Option<JoinHandle<()>> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring empty query");
            return None;
        }

        let generation = {
            let mut state = self.inner.lock();
            if state.destroyed {
                return None;
            }
            if state.snapshot.phase == Phase::Loading && !replace_in_flight {
                debug!("Ignoring query, a submission is already in flight");
                return None;
            }

            state.generation += 1;
            state.submitted_at = Some(Instant::now());
            state.snapshot = Snapshot {
                phase: Phase::Loading,
                message: self.inner.messages.working.clone(),
                ..Default::default()
            };
            self.inner.publish(&state);
            state.generation
        };

        let inner = Arc::clone(&self.inner);
        let request = SubmitRequest::new(query, mode);
        Some(tokio::spawn(inner.run(generation, request)))
    }

    /// Stops tracking the current task and returns to `idle`. The job
    /// itself keeps running on the server.
    pub fn cancel(&self) {
        let mut state = self.inner.lock();
        if state.destroyed {
            return;
        }
        state.generation += 1;
        state.submitted_at = None;
        state.snapshot = Snapshot::default();
        self.inner.publish(&state);
    }

    /// Tears the tracker down. Nothing changes the state afterwards.
    pub fn dispose(&self) {
        let mut state = self.inner.lock();
        if !state.destroyed {
            debug!("Tearing down task tracker");
            state.destroyed = true;
            self.inner.teardown.send_replace(true);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.lock().destroyed
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.snapshots.subscribe()
    }

    /// Waits for a snapshot in a terminal phase, the current one included.
    /// Resolves to `None` if the tracker is torn down first.
    pub async fn wait_for_terminal(&self) -> Option<Snapshot> {
        let mut snapshots = self.subscribe();
        let mut teardown = self.inner.teardown.subscribe();

        tokio::select! {
            terminal = snapshots.wait_for(|snapshot| snapshot.phase.is_terminal()) => {
                terminal.ok().map(|snapshot| snapshot.clone())
            }
            _ = teardown.wait_for(|destroyed| *destroyed) => None,
        }
    }
}

impl Drop for TaskTracker {
    fn drop(&mut self) {
        self.dispose();
    }
}
