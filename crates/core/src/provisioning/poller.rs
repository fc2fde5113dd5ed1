//! Bounded exponential backoff for long-running provisioning operations.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

/// What a single check observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    Pending,
    Active,
    NotFound,
}

/// Lifecycle of a provisioning task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningState {
    Creating,
    Active,
    Failed,
    TimedOut,
}

impl ProvisioningState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ProvisioningState::Creating)
    }
}

/// Backoff parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub initial_delay: Duration,
    pub max_total_delay: Duration,
    /// Consecutive `NotFound` observations tolerated before giving up.
    pub not_found_tolerance: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(1_000),
            max_total_delay: Duration::from_millis(30_000),
            not_found_tolerance: 5,
        }
    }
}

/// The delay that follows `current`: doubled, never zero.
pub fn next_delay(current: Duration) -> Duration {
    current.saturating_mul(2).max(Duration::from_millis(1))
}

/// True when sleeping `delay` more would take the total wait past `max_total`.
pub fn exceeds_budget(waited: Duration, delay: Duration, max_total: Duration) -> bool {
    waited.saturating_add(delay) > max_total
}

/// Time source for the poll loop.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// An in-flight create or alter, tracked until it reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningTask {
    pub resource: String,
    pub state: ProvisioningState,
    pub attempts: u32,
    pub waited: Duration,
}

impl ProvisioningTask {
    fn new(resource: &str) -> Self {
        Self {
            resource: resource.to_string(),
            state: ProvisioningState::Creating,
            attempts: 0,
            waited: Duration::ZERO,
        }
    }

    fn finish(mut self, state: ProvisioningState) -> Self {
        self.state = state;
        self
    }

    pub fn is_active(&self) -> bool {
        self.state == ProvisioningState::Active
    }
}

/// Drives a check until the resource is active, the budget is spent, or it
/// keeps reporting not found.
#[derive(Debug, Clone)]
pub struct Poller<S> {
    settings: PollSettings,
    sleeper: S,
}

impl Poller<TokioSleeper> {
    pub fn with_settings(settings: PollSettings) -> Self {
        Self::new(settings, TokioSleeper)
    }
}

impl<S: Sleeper> Poller<S> {
    pub fn new(settings: PollSettings, sleeper: S) -> Self {
        Self { settings, sleeper }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Polls until a terminal state. Check errors propagate unchanged.
    pub async fn run<F, Fut, E>(&self, resource: &str, mut check: F) -> Result<ProvisioningTask, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<PollStatus, E>>,
    {
        let mut task = ProvisioningTask::new(resource);
        let mut delay = self.settings.initial_delay;
        let mut not_found = 0u32;

        loop {
            task.attempts += 1;
            match check().await? {
                PollStatus::Active => {
                    tracing::debug!(resource, attempts = task.attempts, "resource is active");
                    return Ok(task.finish(ProvisioningState::Active));
                }
                PollStatus::NotFound => {
                    not_found += 1;
                    if not_found > self.settings.not_found_tolerance {
                        tracing::warn!(resource, not_found, "resource never appeared");
                        return Ok(task.finish(ProvisioningState::Failed));
                    }
                }
                PollStatus::Pending => not_found = 0,
            }

            if exceeds_budget(task.waited, delay, self.settings.max_total_delay) {
                tracing::warn!(
                    resource,
                    waited_ms = task.waited.as_millis() as u64,
                    "gave up waiting for resource"
                );
                return Ok(task.finish(ProvisioningState::TimedOut));
            }

            tracing::debug!(
                resource,
                attempt = task.attempts,
                delay_ms = delay.as_millis() as u64,
                "resource not active yet"
            );
            self.sleeper.sleep(delay).await;
            task.waited += delay;
            delay = next_delay(delay);
        }
    }

    /// Like [`Poller::run`], reduced to whether the resource became active.
    pub async fn await_active<F, Fut, E>(&self, resource: &str, check: F) -> Result<bool, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<PollStatus, E>>,
    {
        Ok(self.run(resource, check).await?.is_active())
    }
}

/// Waits on the tokio timer for `check` to report active.
pub async fn await_active<F, Fut, E>(
    check: F,
    initial_delay: Duration,
    max_total_delay: Duration,
) -> Result<bool, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollStatus, E>>,
{
    let settings = PollSettings {
        initial_delay,
        max_total_delay,
        ..PollSettings::default()
    };
    Poller::with_settings(settings)
        .await_active("resource", check)
        .await
}
