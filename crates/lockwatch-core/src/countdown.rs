//! Countdown state machine and per-viewer presenter.

use crate::service::LockerService;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Reopen window granted on load and after every confirmed update.
const REOPEN_WINDOW_HOURS: i64 = 48;

fn reopen_window() -> Duration {
    Duration::hours(REOPEN_WINDOW_HOURS)
}

/// Remaining time, floored per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeLeft {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeLeft {
    fn from_remaining(remaining: Duration) -> Self {
        let total = remaining.num_seconds();
        Self {
            hours: total / 3600,
            minutes: total % 3600 / 60,
            seconds: total % 60,
        }
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// One observed countdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownSnapshot {
    Running(TimeLeft),
    Expired,
}

/// Deadline state machine.
///
/// Expiry is terminal: once the deadline passes, the state stays `Expired`
/// even if the clock steps backwards, until an explicit reset.
#[derive(Debug, Clone)]
pub struct Countdown {
    deadline: DateTime<Utc>,
    expired: bool,
}

impl Countdown {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            deadline: now + reopen_window(),
            expired: false,
        }
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Observe the state at `now`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> CountdownSnapshot {
        if self.expired {
            return CountdownSnapshot::Expired;
        }

        let remaining = self.deadline - now;
        if remaining <= Duration::zero() {
            self.expired = true;
            CountdownSnapshot::Expired
        } else {
            CountdownSnapshot::Running(TimeLeft::from_remaining(remaining))
        }
    }

    /// Restart the window from `now`.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.deadline = now + reopen_window();
        self.expired = false;
    }
}

/// Per-viewer countdown driver.
///
/// Owns the 1-second tick timer and its own locker subscription; both are
/// released on [`shutdown`](Self::shutdown) or drop, after which no further
/// snapshots are produced. Every pushed locker update restarts the window.
pub struct CountdownPresenter {
    snapshots: watch::Receiver<CountdownSnapshot>,
    task: JoinHandle<()>,
}

impl CountdownPresenter {
    pub fn spawn(service: &LockerService) -> Self {
        Self::spawn_with_window(service, reopen_window())
    }

    fn spawn_with_window(service: &LockerService, window: Duration) -> Self {
        let mut subscription = service.subscribe();
        let now = Utc::now();
        let mut countdown = Countdown {
            deadline: now + window,
            expired: false,
        };
        let (tx, snapshots) = watch::channel(countdown.tick(now));

        let task = tokio::spawn(async move {
            let mut interval = time::interval(std::time::Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately and would duplicate the
            // snapshot published at spawn.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if tx.send(countdown.tick(Utc::now())).is_err() {
                            break;
                        }
                    }
                    update = subscription.recv() => match update {
                        Some(_) => {
                            let now = Utc::now();
                            countdown.reset(now);
                            if tx.send(countdown.tick(now)).is_err() {
                                break;
                            }
                        }
                        None => break,
                    },
                }
            }
        });

        Self { snapshots, task }
    }

    /// Latest observed state.
    pub fn snapshot(&self) -> CountdownSnapshot {
        *self.snapshots.borrow()
    }

    /// Wait for the next state change. `None` after shutdown.
    pub async fn changed(&mut self) -> Option<CountdownSnapshot> {
        self.snapshots.changed().await.ok()?;
        Some(*self.snapshots.borrow_and_update())
    }

    /// Stop ticking. Safe to call any number of times.
    pub fn shutdown(&self) {
        self.task.abort();
    }
}

impl Drop for CountdownPresenter {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::LockerNumber;
    use lockwatch_storage::Storage;
    use std::sync::Arc;
    use tempfile::{TempDir, tempdir};

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_time_left_derivation() {
        let time_left = TimeLeft::from_remaining(Duration::milliseconds(3_661_000));
        assert_eq!(
            time_left,
            TimeLeft {
                hours: 1,
                minutes: 1,
                seconds: 1
            }
        );
    }

    #[test]
    fn test_display_zero_pads() {
        let time_left = TimeLeft::from_remaining(Duration::milliseconds(3_661_000));
        assert_eq!(time_left.to_string(), "01:01:01");

        let fresh = TimeLeft::from_remaining(reopen_window());
        assert_eq!(fresh.to_string(), "48:00:00");
    }

    #[test]
    fn test_tick_counts_down() {
        let mut countdown = Countdown::new(t0());

        match countdown.tick(t0()) {
            CountdownSnapshot::Running(time_left) => {
                assert_eq!(
                    time_left,
                    TimeLeft {
                        hours: 48,
                        minutes: 0,
                        seconds: 0
                    }
                );
            }
            CountdownSnapshot::Expired => panic!("fresh countdown must be running"),
        }

        match countdown.tick(t0() + Duration::seconds(1)) {
            CountdownSnapshot::Running(time_left) => {
                assert_eq!(
                    time_left,
                    TimeLeft {
                        hours: 47,
                        minutes: 59,
                        seconds: 59
                    }
                );
            }
            CountdownSnapshot::Expired => panic!("countdown expired too early"),
        }
    }

    #[test]
    fn test_expiry_is_terminal() {
        let mut countdown = Countdown::new(t0());

        let at_deadline = t0() + reopen_window();
        assert_eq!(countdown.tick(at_deadline), CountdownSnapshot::Expired);

        // Even a clock stepping backwards does not revive it.
        assert_eq!(countdown.tick(t0()), CountdownSnapshot::Expired);
    }

    #[test]
    fn test_reset_restores_running() {
        let mut countdown = Countdown::new(t0());
        countdown.tick(t0() + reopen_window());

        let later = t0() + Duration::hours(100);
        countdown.reset(later);
        assert_eq!(
            countdown.tick(later),
            CountdownSnapshot::Running(TimeLeft {
                hours: 48,
                minutes: 0,
                seconds: 0
            })
        );
        assert_eq!(countdown.deadline(), later + reopen_window());
    }

    fn setup_service() -> (LockerService, TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let storage = Arc::new(Storage::new(db_path.to_str().unwrap()).unwrap());
        (LockerService::new(storage), temp_dir)
    }

    #[tokio::test]
    async fn test_presenter_initial_snapshot_is_running() {
        let (service, _temp_dir) = setup_service();

        let presenter = CountdownPresenter::spawn(&service);
        match presenter.snapshot() {
            CountdownSnapshot::Running(time_left) => assert!(time_left.hours >= 47),
            CountdownSnapshot::Expired => panic!("fresh presenter must be running"),
        }
    }

    #[tokio::test]
    async fn test_presenter_resets_on_update() {
        let (service, _temp_dir) = setup_service();

        // A window shorter than the first real tick: the presenter expires on
        // its own, then a write must revive it.
        let mut presenter =
            CountdownPresenter::spawn_with_window(&service, Duration::milliseconds(50));

        loop {
            match presenter.changed().await {
                Some(CountdownSnapshot::Expired) => break,
                Some(CountdownSnapshot::Running(_)) => continue,
                None => panic!("presenter ended before expiring"),
            }
        }

        assert!(service.write(&LockerNumber::parse("8080").unwrap()));

        // A stray tick may still report Expired before the update is seen.
        let mut revived = false;
        for _ in 0..5 {
            match presenter.changed().await {
                Some(CountdownSnapshot::Running(time_left)) => {
                    assert!(time_left.hours >= 47);
                    revived = true;
                    break;
                }
                Some(CountdownSnapshot::Expired) => continue,
                None => panic!("presenter ended before the reset arrived"),
            }
        }
        assert!(revived);
    }

    #[tokio::test]
    async fn test_presenter_shutdown_is_idempotent() {
        let (service, _temp_dir) = setup_service();

        let mut presenter = CountdownPresenter::spawn(&service);
        presenter.shutdown();
        presenter.shutdown();

        // Any in-flight snapshot may still be observed, but the stream ends.
        while presenter.changed().await.is_some() {}
    }
}
