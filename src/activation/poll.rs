use std::fmt::Display;
use std::io::Write;
use std::time::Duration;

use chrono::{Local, TimeZone};
use tokio_util::sync::CancellationToken;

use super::{
    filter_new_activations, ActivationPresenter, ActivationRecord, CycleContext, SeenSet,
};
use crate::error::LogsError;
use crate::openwhisk::{ActivationSource, ListOptions};

pub const DEFAULT_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_LIMIT: u32 = 100;
/// Largest page the activation list API serves
pub const MAX_LIMIT: u32 = 200;

/// Options of one tail run, fixed once the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOptions {
    /// Deployed action name activations are matched against
    pub action_name: String,
    pub interval: Duration,
    pub follow: bool,
    pub limit: u32,
    pub namespace: String,
}

impl PollOptions {
    pub fn new(action_name: impl Into<String>) -> Self {
        Self {
            action_name: action_name.into(),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            follow: false,
            limit: DEFAULT_LIMIT,
            namespace: ListOptions::default().namespace,
        }
    }

    pub fn validate(&self) -> Result<(), LogsError> {
        if self.action_name.is_empty() {
            return Err(LogsError::configuration("Function name must not be empty"));
        }
        if self.interval.is_zero() {
            return Err(LogsError::configuration(
                "Poll interval must be greater than zero",
            ));
        }
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(LogsError::configuration(format!(
                "Activation limit must be between 1 and {}, got {}",
                MAX_LIMIT, self.limit
            )));
        }
        Ok(())
    }

    fn list_options(&self) -> ListOptions {
        ListOptions {
            docs: true,
            limit: self.limit,
            namespace: self.namespace.clone(),
        }
    }
}

/// States of the poll loop. Failures leave the loop through `Err`.
#[derive(Debug)]
pub enum PollPhase {
    Init,
    Fetching,
    Presenting(Vec<ActivationRecord>),
    Scheduled,
    Done,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Completed fetch/present cycles
    pub cycles: usize,
    /// Activations written across all cycles
    pub rendered: usize,
}

/// Drives fetch, filter and present cycles strictly one after another.
pub struct PollLoop<S, W, Tz: TimeZone = Local> {
    source: S,
    presenter: ActivationPresenter<W, Tz>,
    options: PollOptions,
    seen: SeenSet,
    cancel: CancellationToken,
    summary: PollSummary,
}

impl<S, W, Tz> PollLoop<S, W, Tz>
where
    S: ActivationSource,
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub fn new(source: S, presenter: ActivationPresenter<W, Tz>, options: PollOptions) -> Self {
        Self {
            source,
            presenter,
            options,
            seen: SeenSet::new(),
            cancel: CancellationToken::new(),
            summary: PollSummary::default(),
        }
    }

    /// Stop the loop at its next scheduling boundary once `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run until done: after one cycle without follow, or on cancellation.
    pub async fn run(&mut self) -> Result<PollSummary, LogsError> {
        let mut phase = PollPhase::Init;
        loop {
            phase = match phase {
                PollPhase::Done => {
                    tracing::debug!(
                        cycles = self.summary.cycles,
                        rendered = self.summary.rendered,
                        seen = self.seen.len(),
                        "Poll loop done"
                    );
                    return Ok(self.summary);
                }
                phase => self.step(phase).await?,
            };
        }
    }

    async fn step(&mut self, phase: PollPhase) -> Result<PollPhase, LogsError> {
        match phase {
            PollPhase::Init => {
                self.options.validate()?;
                Ok(PollPhase::Fetching)
            }
            PollPhase::Fetching => {
                if self.cancel.is_cancelled() {
                    return Ok(PollPhase::Done);
                }
                let batch = self
                    .source
                    .list_activations(self.options.list_options())
                    .await
                    .map_err(|e| {
                        tracing::debug!(error = %e, "Activation fetch failed");
                        LogsError::Transport(e)
                    })?;
                tracing::trace!(fetched = batch.len(), "Fetched activations");
                Ok(PollPhase::Presenting(batch))
            }
            PollPhase::Presenting(batch) => {
                let fresh = filter_new_activations(&batch, &self.options.action_name, &self.seen);
                let cycle = CycleContext {
                    follow: self.options.follow,
                    follow_up: self.summary.cycles > 0,
                };
                let outcome = self.presenter.present(&fresh, &mut self.seen, cycle)?;

                self.summary.cycles += 1;
                self.summary.rendered += outcome.rendered_count();
                tracing::debug!(
                    cycle = self.summary.cycles,
                    fetched = batch.len(),
                    new = fresh.len(),
                    rendered = outcome.rendered_count(),
                    "Presented activations"
                );

                if self.options.follow {
                    Ok(PollPhase::Scheduled)
                } else {
                    Ok(PollPhase::Done)
                }
            }
            PollPhase::Scheduled => {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        tracing::debug!("Poll loop cancelled");
                        Ok(PollPhase::Done)
                    }
                    _ = tokio::time::sleep(self.options.interval) => Ok(PollPhase::Fetching),
                }
            }
            PollPhase::Done => Ok(PollPhase::Done),
        }
    }
}
