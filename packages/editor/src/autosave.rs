//! Debounced autosave policy.
//!
//! A pure state machine over [`Instant`]s: it decides *when* a save should
//! start and never performs one itself. At most one save is in flight; a
//! save requested while another runs is deferred until it finishes.

use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_WINDOW: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    /// Fired by the debounce timer.
    Auto,
    /// Requested by the user; always includes the theme.
    Manual,
}

impl SaveKind {
    fn merge(self, other: SaveKind) -> SaveKind {
        if self == SaveKind::Manual || other == SaveKind::Manual {
            SaveKind::Manual
        } else {
            SaveKind::Auto
        }
    }
}

#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    window: Duration,
    deadline: Option<Instant>,
    in_flight: bool,
    deferred: Option<SaveKind>,
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl AutosaveScheduler {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
            in_flight: false,
            deferred: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// A mutation happened: restart the quiet period.
    pub fn on_change(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn has_deferred(&self) -> bool {
        self.deferred.is_some()
    }

    /// Returns `Some` when the timer has elapsed and a save should start now.
    pub fn poll(&mut self, now: Instant) -> Option<SaveKind> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.start(SaveKind::Auto)
            }
            _ => None,
        }
    }

    /// Manual save: skips the timer. Returns `Some` if it may start now.
    pub fn manual(&mut self) -> Option<SaveKind> {
        self.deadline = None;
        self.start(SaveKind::Manual)
    }

    /// The running save finished. Returns the deferred save to start next.
    pub fn on_save_finished(&mut self) -> Option<SaveKind> {
        self.in_flight = false;
        let next = self.deferred.take()?;
        self.in_flight = true;
        Some(next)
    }

    /// Drops any pending timer and deferred save, e.g. when another project
    /// is opened. A save already in flight is left to finish.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.deferred = None;
    }

    fn start(&mut self, kind: SaveKind) -> Option<SaveKind> {
        if self.in_flight {
            self.deferred = Some(match self.deferred {
                Some(pending) => pending.merge(kind),
                None => kind,
            });
            None
        } else {
            self.in_flight = true;
            Some(kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_debounce_resets_on_change() {
        let start = Instant::now();
        let mut scheduler = AutosaveScheduler::new(ms(2000));

        scheduler.on_change(start);
        scheduler.on_change(start + ms(1500));

        assert_eq!(scheduler.poll(start + ms(2000)), None);
        assert_eq!(scheduler.poll(start + ms(3500)), Some(SaveKind::Auto));
        assert!(scheduler.is_in_flight());
        assert_eq!(scheduler.deadline(), None);
    }

    #[test]
    fn test_nothing_pending_never_fires() {
        let mut scheduler = AutosaveScheduler::default();
        assert_eq!(scheduler.poll(Instant::now() + ms(60_000)), None);
    }

    #[test]
    fn test_single_flight_defers() {
        let start = Instant::now();
        let mut scheduler = AutosaveScheduler::new(ms(100));

        scheduler.on_change(start);
        assert_eq!(scheduler.poll(start + ms(100)), Some(SaveKind::Auto));

        // another change elapses while the first save is running
        scheduler.on_change(start + ms(150));
        assert_eq!(scheduler.poll(start + ms(250)), None);
        assert!(scheduler.has_deferred());

        assert_eq!(scheduler.on_save_finished(), Some(SaveKind::Auto));
        assert!(scheduler.is_in_flight());
        assert_eq!(scheduler.on_save_finished(), None);
        assert!(!scheduler.is_in_flight());
    }

    #[test]
    fn test_manual_bypasses_timer() {
        let start = Instant::now();
        let mut scheduler = AutosaveScheduler::new(ms(2000));

        scheduler.on_change(start);
        assert_eq!(scheduler.manual(), Some(SaveKind::Manual));
        assert_eq!(scheduler.deadline(), None);
    }

    #[test]
    fn test_deferred_manual_wins_over_auto() {
        let start = Instant::now();
        let mut scheduler = AutosaveScheduler::new(ms(10));

        assert_eq!(scheduler.manual(), Some(SaveKind::Manual));
        scheduler.on_change(start);
        assert_eq!(scheduler.poll(start + ms(10)), None);
        assert_eq!(scheduler.manual(), None);

        assert_eq!(scheduler.on_save_finished(), Some(SaveKind::Manual));
    }

    #[test]
    fn test_cancel_drops_pending_work() {
        let start = Instant::now();
        let mut scheduler = AutosaveScheduler::new(ms(10));

        assert_eq!(scheduler.manual(), Some(SaveKind::Manual));
        assert_eq!(scheduler.manual(), None);
        scheduler.on_change(start);
        scheduler.cancel();

        assert_eq!(scheduler.deadline(), None);
        assert_eq!(scheduler.on_save_finished(), None);
    }
}
