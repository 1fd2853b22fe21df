use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Filters, Language, Platform};

/// Time source for the poll loop. Injected so tests can simulate elapsed
/// time, and so a long-lived host can make the sleep interruptible.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub initial_backoff: Duration,
    pub timeout: Duration,
}

impl Schedule {
    pub const INITIAL_BACKOFF: Duration = Duration::from_millis(25);

    pub fn new(timeout: Duration) -> Self {
        Self {
            initial_backoff: Self::INITIAL_BACKOFF,
            timeout,
        }
    }
}

/// Result of one status check.
#[derive(Debug, Clone, PartialEq)]
pub enum Poll<T> {
    /// Queued or still being judged.
    Pending,
    Ready(T),
}

/// The two remote calls a judge needs: hand over code, then ask how it went.
pub trait Judge {
    type Handle: fmt::Display;
    type Outcome;

    fn platform(&self) -> Platform;

    fn submit(&self, filters: &Filters, language: Language, code: &str) -> Result<Self::Handle>;

    fn check(&self, handle: &Self::Handle) -> Result<Poll<Self::Outcome>>;
}

/// One submit call. Failures coming back from the platform are reported as
/// `SubmitRejected`; local errors (missing filters, unknown language) pass
/// through untouched.
pub fn submit<J: Judge + ?Sized>(
    judge: &J,
    filters: &Filters,
    language: Language,
    code: &str,
) -> Result<J::Handle> {
    let handle = judge
        .submit(filters, language, code)
        .map_err(|e| match e {
            Error::Transport(_) | Error::Json(_) => Error::SubmitRejected {
                platform: judge.platform().to_string(),
                reason: e.to_string(),
            },
            other => other,
        })?;
    info!(platform = %judge.platform(), submission = %handle, "submitted solution");
    Ok(handle)
}

/// Poll until the judge reports a terminal state.
///
/// Sleeps `initial_backoff` after the first pending poll and doubles the
/// delay after each further one. Gives up with `PollTimeout` as soon as the
/// next sleep would take the total past `timeout`. A failed poll ends the
/// loop immediately.
pub fn await_completion<J, C>(
    judge: &J,
    handle: &J::Handle,
    schedule: &Schedule,
    clock: &C,
) -> Result<J::Outcome>
where
    J: Judge + ?Sized,
    C: Clock + ?Sized,
{
    let start = clock.now();
    let mut backoff = schedule.initial_backoff;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        debug!(submission = %handle, attempt, "checking verdict");

        if let Poll::Ready(outcome) = judge.check(handle)? {
            info!(submission = %handle, attempt, "verdict ready");
            return Ok(outcome);
        }

        let elapsed = clock.now().saturating_duration_since(start);
        if elapsed + backoff > schedule.timeout {
            break;
        }
        clock.sleep(backoff);
        backoff *= 2;
    }

    Err(Error::PollTimeout {
        timeout: schedule.timeout,
    })
}

pub fn submit_and_wait<J, C>(
    judge: &J,
    filters: &Filters,
    language: Language,
    code: &str,
    schedule: &Schedule,
    clock: &C,
) -> Result<J::Outcome>
where
    J: Judge + ?Sized,
    C: Clock + ?Sized,
{
    let handle = submit(judge, filters, language, code)?;
    await_completion(judge, &handle, schedule, clock)
}
