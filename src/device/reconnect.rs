//! Reconnect-with-backoff state machine for device links.
//!
//! Every device panel used to carry its own ad hoc reconnect loop; this
//! module centralizes the behavior in one explicit state machine:
//!
//! ```text
//! Disconnected -> Connecting -> Connected
//!       ^              |            |
//!       |          (error/close)    |
//!       +--------- RetryWait <------+
//! ```
//!
//! The machine owns no transport. Callers feed it events (`on_open`,
//! `on_error`, heartbeat acks) and a clock (`tick`), and read back what to
//! do (`LinkAction`). That keeps it synchronous, deterministic, and
//! testable without sockets; the TUI drives it from its poll loop the same
//! way it polls background build state.

use std::time::{Duration, Instant};

/// Connection state of a device link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No connection and no retry pending (initial state, or after teardown).
    Disconnected,
    /// A connection attempt is in flight.
    Connecting,
    /// Connected and exchanging heartbeats.
    Connected,
    /// Connection lost; waiting out the backoff delay before retrying.
    RetryWait,
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkState::Disconnected => write!(f, "Disconnected"),
            LinkState::Connecting => write!(f, "Connecting..."),
            LinkState::Connected => write!(f, "Connected"),
            LinkState::RetryWait => write!(f, "Retrying"),
        }
    }
}

/// What the caller should do after feeding the machine an event or a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    /// Nothing to do right now.
    None,
    /// Open a new transport connection and report back via
    /// `on_open`/`on_error`.
    Dial,
    /// Send a heartbeat ping on the open connection.
    SendHeartbeat,
}

/// Backoff tuning for reconnect attempts.
///
/// Pure exponential backoff with a cap; no jitter, so retry timing is exact
/// and reproducible in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Multiplier applied per failed attempt.
    pub multiplier: u32,
    /// Upper bound on the delay.
    pub max_delay: Duration,
    /// Give up after this many consecutive failures. `None` retries forever.
    pub max_attempts: Option<u32>,
    /// Heartbeat interval while connected.
    pub heartbeat_interval: Duration,
    /// Declare the connection dead if a heartbeat ack takes longer than this.
    pub heartbeat_timeout: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(500),
            multiplier: 2,
            max_delay: Duration::from_secs(30),
            max_attempts: None,
            heartbeat_interval: Duration::from_secs(5),
            heartbeat_timeout: Duration::from_secs(15),
        }
    }
}

impl ReconnectPolicy {
    /// Backoff delay before retry number `attempt` (1-based).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let mut delay = self.base_delay;
        for _ in 1..attempt {
            delay = delay.saturating_mul(self.multiplier);
            if delay >= self.max_delay {
                return self.max_delay;
            }
        }
        delay.min(self.max_delay)
    }
}

/// State machine driving one device connection.
#[derive(Debug)]
pub struct DeviceLink {
    policy: ReconnectPolicy,
    state: LinkState,
    /// Consecutive failed attempts since the last successful open.
    failed_attempts: u32,
    /// When the current RetryWait ends.
    retry_at: Option<Instant>,
    /// When the next heartbeat ping is due.
    heartbeat_at: Option<Instant>,
    /// Deadline for the outstanding heartbeat ack, if one is in flight.
    ack_deadline: Option<Instant>,
    /// Set once `shutdown` is called; the machine stays down for good.
    shut_down: bool,
}

impl DeviceLink {
    /// Creates a new link in the `Disconnected` state.
    #[must_use]
    pub const fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            state: LinkState::Disconnected,
            failed_attempts: 0,
            retry_at: None,
            heartbeat_at: None,
            ack_deadline: None,
            shut_down: false,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> LinkState {
        self.state
    }

    /// Consecutive failed attempts since the last successful connection.
    #[must_use]
    pub const fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// True once `shutdown` has been called.
    #[must_use]
    pub const fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Time remaining until the next retry, if the link is waiting.
    #[must_use]
    pub fn retry_in(&self, now: Instant) -> Option<Duration> {
        self.retry_at
            .map(|at| at.saturating_duration_since(now))
            .filter(|_| self.state == LinkState::RetryWait)
    }

    /// Starts the link: requests the first dial.
    ///
    /// Does nothing unless the link is `Disconnected` (and not shut down).
    pub fn connect(&mut self) -> LinkAction {
        if self.shut_down || self.state != LinkState::Disconnected {
            return LinkAction::None;
        }
        self.state = LinkState::Connecting;
        LinkAction::Dial
    }

    /// The transport reports a successful open.
    pub fn on_open(&mut self, now: Instant) {
        if self.shut_down || self.state != LinkState::Connecting {
            return;
        }
        self.state = LinkState::Connected;
        self.failed_attempts = 0;
        self.retry_at = None;
        self.heartbeat_at = Some(now + self.policy.heartbeat_interval);
        self.ack_deadline = None;
    }

    /// The transport reports an error or close. Schedules a retry unless
    /// the attempt cap is exhausted.
    pub fn on_error(&mut self, now: Instant) {
        if self.shut_down {
            return;
        }
        match self.state {
            LinkState::Connecting | LinkState::Connected => {
                self.failed_attempts += 1;
                self.heartbeat_at = None;
                self.ack_deadline = None;
                if self
                    .policy
                    .max_attempts
                    .is_some_and(|cap| self.failed_attempts >= cap)
                {
                    self.state = LinkState::Disconnected;
                    self.retry_at = None;
                } else {
                    self.state = LinkState::RetryWait;
                    self.retry_at =
                        Some(now + self.policy.delay_for_attempt(self.failed_attempts));
                }
            }
            LinkState::Disconnected | LinkState::RetryWait => {}
        }
    }

    /// The device answered the last heartbeat ping.
    pub fn on_heartbeat_ack(&mut self, now: Instant) {
        if self.state == LinkState::Connected {
            self.ack_deadline = None;
            self.heartbeat_at = Some(now + self.policy.heartbeat_interval);
        }
    }

    /// Advances the machine to `now` and returns what to do.
    ///
    /// In `RetryWait` this fires the next dial once the backoff elapses. In
    /// `Connected` it requests heartbeats and declares the connection dead
    /// when an ack misses its deadline.
    pub fn tick(&mut self, now: Instant) -> LinkAction {
        if self.shut_down {
            return LinkAction::None;
        }
        match self.state {
            LinkState::RetryWait => {
                if self.retry_at.is_some_and(|at| now >= at) {
                    self.retry_at = None;
                    self.state = LinkState::Connecting;
                    return LinkAction::Dial;
                }
                LinkAction::None
            }
            LinkState::Connected => {
                if self.ack_deadline.is_some_and(|deadline| now >= deadline) {
                    // Missed heartbeat: treat like a transport error.
                    self.on_error(now);
                    return LinkAction::None;
                }
                if self.heartbeat_at.is_some_and(|at| now >= at) {
                    self.heartbeat_at = None;
                    self.ack_deadline = Some(now + self.policy.heartbeat_timeout);
                    return LinkAction::SendHeartbeat;
                }
                LinkAction::None
            }
            LinkState::Disconnected | LinkState::Connecting => LinkAction::None,
        }
    }

    /// Tears the link down for good. Immediate and final from any state.
    pub fn shutdown(&mut self) {
        self.shut_down = true;
        self.state = LinkState::Disconnected;
        self.retry_at = None;
        self.heartbeat_at = None;
        self.ack_deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ReconnectPolicy {
        ReconnectPolicy {
            base_delay: Duration::from_millis(100),
            multiplier: 2,
            max_delay: Duration::from_millis(800),
            max_attempts: None,
            heartbeat_interval: Duration::from_secs(1),
            heartbeat_timeout: Duration::from_secs(3),
        }
    }

    #[test]
    fn test_initial_state() {
        let link = DeviceLink::new(policy());
        assert_eq!(link.state(), LinkState::Disconnected);
        assert_eq!(link.failed_attempts(), 0);
    }

    #[test]
    fn test_connect_dials_once() {
        let mut link = DeviceLink::new(policy());
        assert_eq!(link.connect(), LinkAction::Dial);
        assert_eq!(link.state(), LinkState::Connecting);
        // A second connect while already connecting is a no-op.
        assert_eq!(link.connect(), LinkAction::None);
    }

    #[test]
    fn test_open_resets_attempts() {
        let now = Instant::now();
        let mut link = DeviceLink::new(policy());
        link.connect();
        link.on_error(now);
        assert_eq!(link.failed_attempts(), 1);

        link.tick(now + Duration::from_millis(100));
        link.on_open(now + Duration::from_millis(101));
        assert_eq!(link.state(), LinkState::Connected);
        assert_eq!(link.failed_attempts(), 0);
    }

    #[test]
    fn test_backoff_doubles_up_to_cap() {
        let p = policy();
        assert_eq!(p.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(p.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(p.delay_for_attempt(3), Duration::from_millis(400));
        assert_eq!(p.delay_for_attempt(4), Duration::from_millis(800));
        // Capped from here on.
        assert_eq!(p.delay_for_attempt(5), Duration::from_millis(800));
        assert_eq!(p.delay_for_attempt(10), Duration::from_millis(800));
    }

    #[test]
    fn test_retry_fires_after_backoff() {
        let now = Instant::now();
        let mut link = DeviceLink::new(policy());
        link.connect();
        link.on_error(now);
        assert_eq!(link.state(), LinkState::RetryWait);

        // Too early: still waiting.
        assert_eq!(link.tick(now + Duration::from_millis(50)), LinkAction::None);
        assert!(link.retry_in(now + Duration::from_millis(50)).is_some());

        // Backoff elapsed: dial again.
        assert_eq!(
            link.tick(now + Duration::from_millis(100)),
            LinkAction::Dial
        );
        assert_eq!(link.state(), LinkState::Connecting);
    }

    #[test]
    fn test_attempt_cap_gives_up() {
        let mut p = policy();
        p.max_attempts = Some(2);
        let now = Instant::now();
        let mut link = DeviceLink::new(p);

        link.connect();
        link.on_error(now);
        assert_eq!(link.state(), LinkState::RetryWait);

        link.tick(now + Duration::from_millis(100));
        link.on_error(now + Duration::from_millis(100));
        // Second failure hits the cap: no more retries.
        assert_eq!(link.state(), LinkState::Disconnected);
        assert_eq!(
            link.tick(now + Duration::from_secs(60)),
            LinkAction::None
        );
    }

    #[test]
    fn test_heartbeat_cycle() {
        let now = Instant::now();
        let mut link = DeviceLink::new(policy());
        link.connect();
        link.on_open(now);

        // Not due yet.
        assert_eq!(link.tick(now + Duration::from_millis(500)), LinkAction::None);
        // Due at one second.
        assert_eq!(
            link.tick(now + Duration::from_secs(1)),
            LinkAction::SendHeartbeat
        );
        // Ack in time keeps the connection up and reschedules.
        link.on_heartbeat_ack(now + Duration::from_millis(1100));
        assert_eq!(link.state(), LinkState::Connected);
        assert_eq!(
            link.tick(now + Duration::from_millis(2100)),
            LinkAction::SendHeartbeat
        );
    }

    #[test]
    fn test_missed_heartbeat_is_an_error() {
        let now = Instant::now();
        let mut link = DeviceLink::new(policy());
        link.connect();
        link.on_open(now);

        assert_eq!(
            link.tick(now + Duration::from_secs(1)),
            LinkAction::SendHeartbeat
        );
        // No ack within the 3s timeout: link drops to RetryWait.
        assert_eq!(link.tick(now + Duration::from_secs(5)), LinkAction::None);
        assert_eq!(link.state(), LinkState::RetryWait);
        assert_eq!(link.failed_attempts(), 1);
    }

    #[test]
    fn test_shutdown_is_final() {
        let now = Instant::now();
        let mut link = DeviceLink::new(policy());
        link.connect();
        link.on_open(now);

        link.shutdown();
        assert_eq!(link.state(), LinkState::Disconnected);
        assert!(link.is_shut_down());
        // Nothing revives a shut-down link.
        assert_eq!(link.connect(), LinkAction::None);
        assert_eq!(link.tick(now + Duration::from_secs(60)), LinkAction::None);
        link.on_open(now);
        assert_eq!(link.state(), LinkState::Disconnected);
    }

    #[test]
    fn test_shutdown_from_retry_wait() {
        let now = Instant::now();
        let mut link = DeviceLink::new(policy());
        link.connect();
        link.on_error(now);
        assert_eq!(link.state(), LinkState::RetryWait);

        link.shutdown();
        assert_eq!(link.retry_in(now), None);
        assert_eq!(link.tick(now + Duration::from_secs(60)), LinkAction::None);
    }
}
