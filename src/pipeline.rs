//! Batch generation pipeline.
//!
//! # State Machine
//!
//! ```text
//! Idle ──► Initializing ──► Ready ──► Running ──┬──────────────► Completed ──► Ready
//!                                               └─► Cancelling ─► Cancelled ──► Ready
//! ```
//!
//! One [`BatchPipeline`] runs at most one job at a time; a second
//! [`run`](BatchPipeline::run) while a job is active fails with
//! [`Error::Busy`] and leaves the active job untouched.
//!
//! # Scheduling
//!
//! Runs are cooperative. The pipeline renders icons back to back and only
//! suspends at fixed points: every `yield_every` icons and at each category
//! boundary, right after reporting [`Progress`]. Cancellation is polled at the
//! head of the category loop, at the head of the icon loop and once more
//! before the archive is finalized, so an icon that has started rendering
//! always finishes first.

use parking_lot::Mutex;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::archive::{ArchiveBuilder, file_name, folder_name};
use crate::category::SymbolCategory;
use crate::config::{GeneratorConfig, PipelineSettings};
use crate::download::Downloader;
use crate::engine::{EngineFactory, EngineHandle};
use crate::error::{ConfigurationError, Error, Result};
use crate::generator::IconGenerator;
use crate::request::GenerationRequest;

// ============================================================================
// State
// ============================================================================

/// Lifecycle state of a [`BatchPipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineState {
    Idle,
    Initializing,
    Ready,
    Running,
    Cancelling,
    Cancelled,
    Completed,
}

impl PipelineState {
    /// True while a job owns the pipeline.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Running | Self::Cancelling)
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Progress event emitted at yield points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Label of the category being processed.
    pub category_label: String,
    /// Icons produced so far in this run.
    pub produced: usize,
    /// Icons the run produces if it completes.
    pub total: usize,
}

/// Receives [`Progress`] events.
pub trait ProgressSink {
    fn report(&mut self, progress: &Progress);
}

impl<F: FnMut(&Progress)> ProgressSink for F {
    fn report(&mut self, progress: &Progress) {
        self(progress)
    }
}

// ============================================================================
// RunOutcome
// ============================================================================

/// Terminal result of a run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every icon was produced and the archive was handed to the downloader.
    Completed {
        produced: usize,
        archive_name: String,
        archive_bytes: usize,
    },
    /// The run was cancelled; no archive was delivered.
    Cancelled { produced: usize },
}

impl RunOutcome {
    pub fn produced(&self) -> usize {
        match self {
            Self::Completed { produced, .. } | Self::Cancelled { produced } => *produced,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Human readable terminal message.
    pub fn message(&self) -> String {
        match self {
            Self::Completed {
                produced,
                archive_name,
                ..
            } => format!("Generated {produced} icons into {archive_name}"),
            Self::Cancelled { produced } => {
                format!("Generation cancelled after {produced} icons; no archive was produced")
            }
        }
    }
}

// ============================================================================
// Job bookkeeping
// ============================================================================

struct Inner {
    state: PipelineState,
    job: Option<CancellationToken>,
}

/// Clears the job slot and returns the pipeline to `Ready` when dropped.
///
/// Covers every exit from a run, including the run future being dropped.
struct JobGuard<'a> {
    inner: &'a Mutex<Inner>,
    token: CancellationToken,
}

impl JobGuard<'_> {
    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    fn set_state(&self, state: PipelineState) {
        self.inner.lock().state = state;
    }

    /// Moves to `Running` unless a cancellation already landed.
    fn mark_running(&self) {
        let mut inner = self.inner.lock();
        if !self.token.is_cancelled() {
            inner.state = PipelineState::Running;
        }
    }
}

impl Drop for JobGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        inner.job = None;
        inner.state = PipelineState::Ready;
    }
}

// ============================================================================
// BatchPipeline
// ============================================================================

/// Drives N-per-category generation into an archive.
pub struct BatchPipeline<D> {
    engines: EngineFactory,
    generator: IconGenerator,
    downloader: D,
    settings: PipelineSettings,
    inner: Mutex<Inner>,
}

impl<D: Downloader> BatchPipeline<D> {
    pub fn new(
        engines: EngineFactory,
        generator: IconGenerator,
        downloader: D,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            engines,
            generator,
            downloader,
            settings,
            inner: Mutex::new(Inner {
                state: PipelineState::Idle,
                job: None,
            }),
        }
    }

    /// Builds a pipeline over the built-in catalog.
    pub fn from_config(config: &GeneratorConfig, downloader: D) -> Result<Self, ConfigurationError> {
        Ok(Self::new(
            EngineFactory::new(config.engine.clone()),
            IconGenerator::builtin(config.transform)?,
            downloader,
            config.pipeline.clone(),
        ))
    }

    pub fn state(&self) -> PipelineState {
        self.inner.lock().state
    }

    pub fn generator(&self) -> &IconGenerator {
        &self.generator
    }

    pub fn downloader(&self) -> &D {
        &self.downloader
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Initializes the rendering engine ahead of the first run.
    ///
    /// Idempotent: later calls return the memoized engine.
    pub async fn initialize(&self) -> Result<EngineHandle> {
        let first_use = !self.engines.is_resolved();
        if first_use {
            self.transition_idle(PipelineState::Initializing);
        }

        let result = self.engines.acquire().await;

        if first_use {
            // Even a failed initialization leaves the pipeline able to accept
            // (and reject) the next request.
            let mut inner = self.inner.lock();
            if inner.state == PipelineState::Initializing {
                inner.state = PipelineState::Ready;
            }
        }
        Ok(result?)
    }

    /// Requests cancellation of the active run.
    ///
    /// Returns false when no run is active.
    pub fn cancel(&self) -> bool {
        let mut inner = self.inner.lock();
        let Some(token) = inner.job.clone() else {
            return false;
        };
        token.cancel();
        inner.state = PipelineState::Cancelling;
        tracing::info!("cancellation requested");
        true
    }

    /// Generates `request.count_per_category()` icons for every selected
    /// category and delivers the archive.
    ///
    /// Categories are processed in registry order. Each gets one folder in
    /// `archive`. On completion the archive is finalized and handed to the
    /// downloader; on cancellation it is dropped.
    ///
    /// # Errors
    ///
    /// - [`Error::Input`] if the selection names an unknown category. Nothing
    ///   is started.
    /// - [`Error::Busy`] if another run is active. The active run continues.
    /// - [`Error::Engine`] / [`Error::Archive`] abort this run; the pipeline
    ///   returns to `Ready`.
    pub async fn run<A, P>(
        &self,
        request: &GenerationRequest,
        mut archive: A,
        mut progress: P,
    ) -> Result<RunOutcome>
    where
        A: ArchiveBuilder,
        P: ProgressSink,
    {
        request.validate(self.generator.registry())?;
        let job = self.begin_job()?;

        let engine = self.initialize().await?;
        job.mark_running();

        let categories: Vec<&SymbolCategory> = self
            .generator
            .registry()
            .iter()
            .filter(|c| request.is_selected(c.id))
            .collect();
        let count = request.count_per_category() as usize;
        let size = request.pixel_size();
        let total = request.total();
        let yield_every = self.settings.yield_interval();
        let mut rng = self.settings.rng();
        let mut produced = 0usize;

        tracing::info!(
            categories = categories.len(),
            count,
            size,
            total,
            "generation started"
        );

        for category in &categories {
            if job.is_cancelled() {
                return Ok(self.cancelled(&job, produced));
            }

            archive.folder(&folder_name(category.id + 1, &category.key))?;

            for index in 0..count {
                if job.is_cancelled() {
                    return Ok(self.cancelled(&job, produced));
                }

                let icon = self.generator.generate(&engine, category.id, size, &mut rng)?;
                archive.file(&file_name(index + 1), icon.bytes())?;
                produced += 1;

                if produced % yield_every == 0 && index + 1 < count {
                    progress.report(&Progress {
                        category_label: category.label.clone(),
                        produced,
                        total,
                    });
                    tokio::task::yield_now().await;
                }
            }

            tracing::debug!(category = %category.key, produced, "category finished");
            progress.report(&Progress {
                category_label: category.label.clone(),
                produced,
                total,
            });
            tokio::task::yield_now().await;
        }

        // The last boundary yield is a suspension point too.
        if job.is_cancelled() {
            return Ok(self.cancelled(&job, produced));
        }

        let container = archive.finalize().await?;
        let outcome = RunOutcome::Completed {
            produced,
            archive_name: self.settings.archive_name.clone(),
            archive_bytes: container.len(),
        };
        self.downloader.trigger(container, &self.settings.archive_name);

        job.set_state(PipelineState::Completed);
        tracing::info!("{}", outcome.message());
        Ok(outcome)
    }

    fn begin_job(&self) -> Result<JobGuard<'_>> {
        let mut inner = self.inner.lock();
        if inner.job.is_some() {
            tracing::warn!(state = ?inner.state, "run rejected, pipeline busy");
            return Err(Error::Busy);
        }
        let token = CancellationToken::new();
        inner.job = Some(token.clone());
        Ok(JobGuard {
            inner: &self.inner,
            token,
        })
    }

    fn cancelled(&self, job: &JobGuard<'_>, produced: usize) -> RunOutcome {
        job.set_state(PipelineState::Cancelled);
        let outcome = RunOutcome::Cancelled { produced };
        tracing::info!("{}", outcome.message());
        outcome
    }

    fn transition_idle(&self, to: PipelineState) {
        let mut inner = self.inner.lock();
        if inner.state == PipelineState::Idle {
            inner.state = to;
        }
    }
}
