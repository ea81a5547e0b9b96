//! Viewport capture of SKU turntables
//!
//! The host renders frames asynchronously and writes them to disk. This
//! module decides which files a capture should produce, asks a
//! [`FrameCapturer`] to start each frame and then polls the output
//! directory until every file exists, the time budget runs out or the
//! caller cancels. Files already written are never removed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use stagehand_core::Document;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::CaptureConfig;
use crate::constants::capture;
use crate::error::{Result, StageError};
use crate::stage::isolate;

/// How often and for how long to wait for output files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollPolicy {
    /// A policy polling every `interval`; a zero interval is rejected
    pub fn new(interval: Duration, timeout: Duration) -> Result<Self> {
        let policy = Self { interval, timeout };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(StageError::Config(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(capture::DEFAULT_POLL_INTERVAL_MS),
            timeout: Duration::from_secs(capture::DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Frames to capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRange {
    /// Inclusive range
    Sequence { start: i32, end: i32 },
    Single(i32),
}

impl FrameRange {
    pub fn frames(&self) -> Vec<i32> {
        match *self {
            FrameRange::Sequence { start, end } => (start..=end).collect(),
            FrameRange::Single(frame) => vec![frame],
        }
    }
}

/// Everything needed to capture one SKU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturePlan {
    /// Scope name of the SKU, also used as the file name stem
    pub sku: String,
    pub output_dir: PathBuf,
    pub frames: FrameRange,
    pub extension: String,
    pub resolution: (u32, u32),
}

impl CapturePlan {
    /// Plan a full sequence using the configured frame range and format
    pub fn from_config(
        sku: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        config: &CaptureConfig,
    ) -> Result<Self> {
        let sku = sku.into();
        if sku.is_empty() {
            return Err(StageError::InvalidArgument("sku must not be empty".to_string()));
        }
        if config.start_frame > config.end_frame {
            return Err(StageError::Config(format!(
                "start frame {} is after end frame {}",
                config.start_frame, config.end_frame
            )));
        }

        Ok(Self {
            sku,
            output_dir: output_dir.into(),
            frames: FrameRange::Sequence {
                start: config.start_frame,
                end: config.end_frame,
            },
            extension: config.extension.clone(),
            resolution: config.dimensions()?,
        })
    }

    /// Capture only `frame`
    pub fn single_frame(mut self, frame: i32) -> Self {
        self.frames = FrameRange::Single(frame);
        self
    }

    /// `<sku>_<frame>.<ext>`
    pub fn file_name(&self, frame: i32) -> String {
        format!("{}_{}.{}", self.sku, frame, self.extension)
    }

    pub fn output_path(&self, frame: i32) -> PathBuf {
        self.output_dir.join(self.file_name(frame))
    }

    pub fn expected_files(&self) -> Vec<PathBuf> {
        self.frames
            .frames()
            .into_iter()
            .map(|frame| self.output_path(frame))
            .collect()
    }

    pub fn missing_files(&self) -> Vec<PathBuf> {
        self.expected_files()
            .into_iter()
            .filter(|path| !path.is_file())
            .collect()
    }
}

/// Result of waiting for a capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Completed,
    TimedOut { missing: Vec<PathBuf> },
    Cancelled,
}

impl CaptureOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, CaptureOutcome::Completed)
    }
}

/// Poll until every expected file of `plan` exists
pub async fn wait_for_outputs(
    plan: &CapturePlan,
    policy: PollPolicy,
    cancel: &CancellationToken,
) -> Result<CaptureOutcome> {
    policy.validate()?;
    let deadline = Instant::now() + policy.timeout;
    let mut interval = tokio::time::interval(policy.interval);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(sku = %plan.sku, "Capture wait cancelled");
                return Ok(CaptureOutcome::Cancelled);
            }
            _ = interval.tick() => {}
        }

        let missing = plan.missing_files();
        if missing.is_empty() {
            debug!(sku = %plan.sku, "All frames written");
            return Ok(CaptureOutcome::Completed);
        }

        if Instant::now() >= deadline {
            warn!(sku = %plan.sku, missing = missing.len(), "Timed out waiting for frames");
            return Ok(CaptureOutcome::TimedOut { missing });
        }
    }
}

/// Starts rendering a frame to a file
///
/// Implementations return once the capture has been requested; the file
/// may appear later.
pub trait FrameCapturer {
    fn request_frame(&mut self, plan: &CapturePlan, frame: i32, output: &Path) -> Result<()>;
}

/// Outcome of one queued SKU
#[derive(Debug)]
pub struct QueueResult {
    pub sku: String,
    pub outcome: Result<CaptureOutcome>,
}

/// Captures a list of SKUs one after another
#[derive(Debug, Clone)]
pub struct RenderQueue {
    plans: Vec<CapturePlan>,
    keep_scopes: Vec<String>,
    policy: PollPolicy,
}

impl RenderQueue {
    pub fn new(keep_scopes: Vec<String>, policy: PollPolicy) -> Self {
        Self {
            plans: Vec::new(),
            keep_scopes,
            policy,
        }
    }

    pub fn push(&mut self, plan: CapturePlan) {
        self.plans.push(plan);
    }

    pub fn plans(&self) -> &[CapturePlan] {
        &self.plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Isolate each SKU, request its frames and wait for them.
    ///
    /// A failing SKU is recorded and the queue moves on. Once cancelled, the
    /// remaining SKUs are reported as cancelled without being started.
    pub async fn run<C: FrameCapturer>(
        &self,
        document: &mut Document,
        capturer: &mut C,
        cancel: &CancellationToken,
    ) -> Vec<QueueResult> {
        let mut results = Vec::with_capacity(self.plans.len());

        for plan in &self.plans {
            if cancel.is_cancelled() {
                results.push(QueueResult {
                    sku: plan.sku.clone(),
                    outcome: Ok(CaptureOutcome::Cancelled),
                });
                continue;
            }

            info!(sku = %plan.sku, frames = ?plan.frames, "Capturing");
            let outcome = self.capture_one(document, capturer, plan, cancel).await;
            if let Err(e) = &outcome {
                warn!(sku = %plan.sku, error = %e, "Capture failed");
            }
            results.push(QueueResult {
                sku: plan.sku.clone(),
                outcome,
            });
        }

        results
    }

    async fn capture_one<C: FrameCapturer>(
        &self,
        document: &mut Document,
        capturer: &mut C,
        plan: &CapturePlan,
        cancel: &CancellationToken,
    ) -> Result<CaptureOutcome> {
        isolate(document, &plan.sku, &self.keep_scopes)?;
        std::fs::create_dir_all(&plan.output_dir)?;

        for frame in plan.frames.frames() {
            capturer.request_frame(plan, frame, &plan.output_path(frame))?;
        }

        wait_for_outputs(plan, self.policy, cancel).await
    }
}
