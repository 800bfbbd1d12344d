use crate::element::UiElement;
use crate::errors::AutomationError;
use crate::finder::Finder;
use crate::Driver;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of a single condition check.
///
/// `Unsatisfied` is the only signal [`Poller::poll_for`] retries on; it is
/// internal to the polling loop and never reaches callers. A checker that
/// hits a genuine error returns `Err` instead, which propagates immediately.
pub enum Verdict<R> {
    Satisfied(R),
    Unsatisfied,
}

/// A named one-shot predicate consumed by the [`Poller`].
pub trait ConditionChecker<R>: Send + Sync {
    fn check(&self, driver: &Driver, finder: &dyn Finder) -> Result<Verdict<R>, AutomationError>;

    /// Completes the phrase `waiting for element <finder> ...`,
    /// e.g. `"to appear"`.
    fn description(&self) -> &str;
}

/// Satisfied when the finder resolves; yields the found element.
pub struct Exists;

impl ConditionChecker<UiElement> for Exists {
    fn check(
        &self,
        driver: &Driver,
        finder: &dyn Finder,
    ) -> Result<Verdict<UiElement>, AutomationError> {
        match driver.find(finder) {
            Ok(element) => Ok(Verdict::Satisfied(element)),
            Err(e) if e.is_not_found() => Ok(Verdict::Unsatisfied),
            Err(e) => Err(e),
        }
    }

    fn description(&self) -> &str {
        "to appear"
    }
}

/// Satisfied only when the finder no longer resolves.
pub struct Gone;

impl ConditionChecker<()> for Gone {
    fn check(&self, driver: &Driver, finder: &dyn Finder) -> Result<Verdict<()>, AutomationError> {
        if driver.has(finder)? {
            Ok(Verdict::Unsatisfied)
        } else {
            Ok(Verdict::Satisfied(()))
        }
    }

    fn description(&self) -> &str {
        "to disappear"
    }
}

/// Bounded-time retry engine around a [`ConditionChecker`].
///
/// The poller is the sole timeout/retry authority: it blocks the calling
/// thread between attempts and stops only when the checker is satisfied or
/// the deadline elapses. It keeps no state across invocations beyond its
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poller {
    interval: Duration,
    default_timeout: Duration,
}

impl Default for Poller {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            default_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

impl Poller {
    /// `interval` is the spacing between attempts; `default_timeout` is the
    /// ceiling used when a call supplies no explicit budget.
    pub fn new(interval: Duration, default_timeout: Duration) -> Self {
        Self {
            interval,
            default_timeout,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Repeatedly invoke `checker` until it is satisfied or the budget
    /// elapses.
    ///
    /// The checker runs at least once regardless of the budget. Only
    /// [`Verdict::Unsatisfied`] is retried; checker errors propagate
    /// unmasked. On deadline this fails with [`AutomationError::Timeout`]
    /// carrying the condition description, the elapsed time and the budget.
    pub fn poll_for<R>(
        &self,
        driver: &Driver,
        finder: &dyn Finder,
        checker: &dyn ConditionChecker<R>,
        timeout: Option<Duration>,
    ) -> Result<R, AutomationError> {
        let budget = timeout.unwrap_or(self.default_timeout);
        let start = Instant::now();
        let deadline = start + budget;
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match checker.check(driver, finder)? {
                Verdict::Satisfied(result) => {
                    debug!(
                        attempt,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Condition satisfied"
                    );
                    return Ok(result);
                }
                Verdict::Unsatisfied => {
                    if Instant::now() > deadline {
                        return Err(AutomationError::Timeout {
                            condition: format!("{} {}", finder, checker.description()),
                            elapsed_ms: start.elapsed().as_millis() as u64,
                            timeout_ms: budget.as_millis() as u64,
                        });
                    }
                    debug!(attempt, interval_ms = self.interval.as_millis() as u64, "Condition not yet satisfied, retrying");
                    thread::sleep(self.interval);
                }
            }
        }
    }
}
