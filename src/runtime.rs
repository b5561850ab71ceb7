//! Driving virtual-clock sessions from tokio time
//!
//! Sessions never read the wall clock. They expose their next deadline and
//! move forward when told to; the helpers here sleep on tokio's timer in
//! between. Under `tokio::time::pause` the whole thing is deterministic.

use std::future;
use std::time::Duration;

use tokio::time::sleep;

/// Anything that owns timers on a virtual clock
pub trait Clocked {
    /// Virtual time elapsed since construction
    fn now(&self) -> Duration;

    /// Absolute virtual time of the earliest pending timer
    fn next_deadline(&self) -> Option<Duration>;

    /// Moves the clock forward, firing every timer that comes due on the way
    fn advance(&mut self, by: Duration);

    /// Relative wait until the next timer, `None` when idle
    fn time_to_next(&self) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_sub(self.now()))
    }
}

/// Sleeps for `wait`, or forever when there is nothing to wait for.
///
/// Takes the wait by value so a `tokio::select!` branch can hold it while
/// another branch mutates the session.
pub async fn sleep_for(wait: Option<Duration>) {
    match wait {
        Some(wait) => sleep(wait).await,
        None => future::pending::<()>().await,
    }
}

/// Waits until the next deadline of `clocked` without advancing it
pub async fn sleep_until_next<C: Clocked + ?Sized>(clocked: &C) {
    sleep_for(clocked.time_to_next()).await
}

/// Sleeps and advances until no timers remain; returns the time spent
pub async fn run_until_idle<C: Clocked + ?Sized>(clocked: &mut C) -> Duration {
    let mut elapsed = Duration::ZERO;
    while let Some(wait) = clocked.time_to_next() {
        sleep(wait).await;
        clocked.advance(wait);
        elapsed += wait;
    }
    elapsed
}
