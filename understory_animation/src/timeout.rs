// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// A cancellable one-shot deadline.
///
/// Each logical timeout (a watchdog, a multi-tap window, a scroll-end delay)
/// owns one `Timeout`. Scheduling again cancels any pending deadline and
/// replaces it.
///
/// A deadline that has passed but has not been polled yet is not *running*:
/// input that arrives late, before the host ticks, must not extend it.
///
/// ```rust
/// use understory_animation::Timeout;
///
/// let mut t = Timeout::new();
/// t.schedule(0, 100);
/// t.schedule(80, 100); // supersedes the first deadline
/// assert!(!t.poll(150));
/// assert!(t.poll(180));
/// assert!(!t.poll(500)); // fires once
///
/// t.schedule(1_000, 100);
/// assert!(t.is_running(1_050));
/// assert!(!t.is_running(1_100)); // due, even though not polled yet
/// assert!(t.is_pending());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timeout {
    deadline: Option<u64>,
}

impl Timeout {
    /// Creates a timeout with nothing scheduled.
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Schedules the deadline at `now + delay`, cancelling any pending one.
    pub fn schedule(&mut self, now: u64, delay: u64) {
        self.deadline = Some(now.saturating_add(delay));
    }

    /// Cancels the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` while a deadline is pending, due or not.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` if a deadline is pending and still in the future at `now`.
    #[must_use]
    pub fn is_running(&self, now: u64) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }

    /// The pending deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Returns `true` exactly once when `now` has reached the pending deadline.
    pub fn poll(&mut self, now: u64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Timeout;

    #[test]
    fn fresh_timeout_never_fires() {
        let mut t = Timeout::new();
        assert!(!t.is_pending());
        assert!(!t.poll(u64::MAX));
    }

    #[test]
    fn reschedule_replaces_the_deadline() {
        let mut t = Timeout::new();
        t.schedule(10, 50);
        t.schedule(20, 50);
        assert_eq!(t.deadline(), Some(70));
        assert!(!t.poll(60));
        assert!(t.poll(70));
        assert!(!t.is_pending());
    }

    #[test]
    fn cancel_prevents_firing() {
        let mut t = Timeout::new();
        t.schedule(0, 10);
        t.cancel();
        assert!(!t.poll(100));
        assert!(!t.is_running(5));
    }

    #[test]
    fn due_deadline_stops_running_before_it_is_polled() {
        let mut t = Timeout::new();
        t.schedule(0, 300);
        assert!(t.is_running(299));
        assert!(!t.is_running(300));
        assert!(t.is_pending());
        assert!(t.poll(1_000));
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let mut t = Timeout::new();
        t.schedule(u64::MAX - 1, 10);
        assert_eq!(t.deadline(), Some(u64::MAX));
    }
}
