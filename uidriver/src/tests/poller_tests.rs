//! Tests for the poller's retry/timeout state machine

use super::fixtures::{FakeEngine, TestNode};
use super::init_tracing;
use crate::finder::{Finder, MatchFinder};
use crate::matcher::By;
use crate::poller::{ConditionChecker, Poller, Verdict};
use crate::{AutomationError, Driver};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

fn driver() -> Driver {
    Driver::new(FakeEngine::new(TestNode::branch("root", vec![])))
}

fn finder() -> MatchFinder {
    MatchFinder::new(By::text("anything"))
}

/// Satisfied once it has been invoked `needed` times.
struct SucceedsOnAttempt {
    needed: usize,
    attempts: AtomicUsize,
}

impl SucceedsOnAttempt {
    fn new(needed: usize) -> Self {
        Self {
            needed,
            attempts: AtomicUsize::new(0),
        }
    }

    fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl ConditionChecker<usize> for SucceedsOnAttempt {
    fn check(
        &self,
        _driver: &Driver,
        _finder: &dyn Finder,
    ) -> Result<Verdict<usize>, AutomationError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt >= self.needed {
            Ok(Verdict::Satisfied(attempt))
        } else {
            Ok(Verdict::Unsatisfied)
        }
    }

    fn description(&self) -> &str {
        "to be ready"
    }
}

/// Never satisfied, counting invocations.
struct NeverSatisfied {
    attempts: AtomicUsize,
}

impl ConditionChecker<()> for NeverSatisfied {
    fn check(
        &self,
        _driver: &Driver,
        _finder: &dyn Finder,
    ) -> Result<Verdict<()>, AutomationError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Ok(Verdict::Unsatisfied)
    }

    fn description(&self) -> &str {
        "to settle"
    }
}

/// Fails with a genuine error, counting invocations.
struct BrokenChecker {
    attempts: AtomicUsize,
}

impl ConditionChecker<()> for BrokenChecker {
    fn check(
        &self,
        _driver: &Driver,
        _finder: &dyn Finder,
    ) -> Result<Verdict<()>, AutomationError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AutomationError::PlatformError("Backend went away".to_string()))
    }

    fn description(&self) -> &str {
        "to settle"
    }
}

#[test]
fn returns_the_result_once_the_condition_is_satisfied() {
    init_tracing();
    let poller = Poller::new(Duration::from_millis(50), Duration::from_secs(2));
    let checker = SucceedsOnAttempt::new(3);

    let start = Instant::now();
    let result = poller
        .poll_for(&driver(), &finder(), &checker, None)
        .unwrap();

    assert_eq!(result, 3);
    assert_eq!(checker.attempts(), 3);
    // Two inter-attempt sleeps, nowhere near the 2s budget.
    assert!(start.elapsed() >= Duration::from_millis(100));
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn times_out_with_elapsed_and_budget() {
    init_tracing();
    let interval = Duration::from_millis(100);
    let budget = Duration::from_millis(400);
    let poller = Poller::new(interval, Duration::from_secs(30));
    let checker = NeverSatisfied {
        attempts: AtomicUsize::new(0),
    };

    let start = Instant::now();
    let err = poller
        .poll_for(&driver(), &finder(), &checker, Some(budget))
        .unwrap_err();
    let elapsed = start.elapsed();

    // Elapsed lands in [budget, budget + one interval) plus scheduling slack.
    assert!(elapsed >= budget, "finished early: {elapsed:?}");
    assert!(
        elapsed < budget + interval + Duration::from_millis(50),
        "overshot: {elapsed:?}"
    );
    match err {
        AutomationError::Timeout {
            condition,
            elapsed_ms,
            timeout_ms,
        } => {
            assert_eq!(condition, r#"text="anything" to settle"#);
            assert_eq!(timeout_ms, 400);
            assert!(elapsed_ms >= timeout_ms);
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[test]
fn checker_runs_at_least_once_with_a_zero_budget() {
    init_tracing();
    let poller = Poller::new(Duration::from_millis(10), Duration::from_secs(1));
    let checker = SucceedsOnAttempt::new(1);

    let result = poller
        .poll_for(&driver(), &finder(), &checker, Some(Duration::ZERO))
        .unwrap();
    assert_eq!(result, 1);
}

#[test]
fn genuine_checker_errors_are_not_retried() {
    init_tracing();
    let poller = Poller::new(Duration::from_millis(10), Duration::from_secs(5));
    let checker = BrokenChecker {
        attempts: AtomicUsize::new(0),
    };

    let start = Instant::now();
    let err = poller
        .poll_for(&driver(), &finder(), &checker, None)
        .unwrap_err();

    assert!(matches!(err, AutomationError::PlatformError(_)));
    assert_eq!(checker.attempts.load(Ordering::SeqCst), 1);
    // Propagated immediately, not after the 5s budget.
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn default_timeout_applies_when_no_budget_is_given() {
    init_tracing();
    let poller = Poller::new(Duration::from_millis(20), Duration::from_millis(100));
    let checker = NeverSatisfied {
        attempts: AtomicUsize::new(0),
    };

    let err = poller
        .poll_for(&driver(), &finder(), &checker, None)
        .unwrap_err();
    match err {
        AutomationError::Timeout { timeout_ms, .. } => assert_eq!(timeout_ms, 100),
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[test]
fn poller_keeps_no_state_across_invocations() {
    init_tracing();
    let poller = Poller::new(Duration::from_millis(10), Duration::from_millis(50));
    let d = driver();
    let f = finder();

    for _ in 0..2 {
        let checker = SucceedsOnAttempt::new(2);
        assert_eq!(poller.poll_for(&d, &f, &checker, None).unwrap(), 2);
        assert_eq!(checker.attempts(), 2);
    }
}
