//! Cancellable timers
//!
//! The round machine never touches a real clock. It asks a `Scheduler` for
//! timers and gets back a `TimerId`; when a timer fires, the host hands the id
//! and event back to `RoundMachine::on_timer`. Ids the machine no longer holds
//! are stale and get ignored, so a cancel that races a firing is harmless.

/// Handle of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// What a timer means to the round machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Spin animation has finished
    SpinComplete,
    /// Next spin tick sound is due
    SpinTick,
    /// One countdown second has passed
    CountdownTick,
}

/// Timer source driving the round machine
pub trait Scheduler {
    /// Fire `event` once after `delay_ms`
    fn set_timeout(&mut self, delay_ms: u32, event: TimerEvent) -> TimerId;
    /// Fire `event` every `period_ms` until cancelled
    fn set_interval(&mut self, period_ms: u32, event: TimerEvent) -> TimerId;
    /// Cancel a timer; unknown or already fired ids are ignored
    fn cancel(&mut self, id: TimerId);
    /// Milliseconds on a monotonic clock
    fn now_ms(&self) -> f64;
}

#[derive(Debug, Clone)]
struct PendingTimer {
    id: TimerId,
    due_ms: u64,
    period_ms: Option<u64>,
    event: TimerEvent,
}

/// Fake clock scheduler, advanced by hand.
///
/// Used by tests and the native demo. Timers fire in due order, ties in the
/// order they were scheduled.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_id: u64,
    pending: Vec<PendingTimer>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current fake time
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Number of outstanding timers
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Outstanding timers in scheduling order
    pub fn pending_timers(&self) -> Vec<(TimerId, TimerEvent)> {
        self.pending.iter().map(|t| (t.id, t.event)).collect()
    }

    /// Pop the next timer due at or before `until_ms`, moving the clock to its
    /// due time. Repeating timers are re-armed.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, TimerEvent)> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i)?;

        let PendingTimer {
            id,
            due_ms,
            period_ms,
            event,
        } = self.pending[index].clone();
        self.now_ms = self.now_ms.max(due_ms);

        match period_ms {
            Some(period) => self.pending[index].due_ms = due_ms + period,
            None => {
                self.pending.remove(index);
            }
        }

        Some((id, event))
    }

    /// Move the clock forward without firing anything
    pub fn advance_clock_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    fn push(&mut self, delay_ms: u32, period_ms: Option<u64>, event: TimerEvent) -> TimerId {
        self.next_id += 1;
        let id = TimerId::new(self.next_id);
        self.pending.push(PendingTimer {
            id,
            due_ms: self.now_ms + delay_ms as u64,
            period_ms,
            event,
        });
        id
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&mut self, delay_ms: u32, event: TimerEvent) -> TimerId {
        self.push(delay_ms, None, event)
    }

    fn set_interval(&mut self, period_ms: u32, event: TimerEvent) -> TimerId {
        // A zero period would fire forever within one advance
        let period = period_ms.max(1);
        self.push(period, Some(period as u64), event)
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|t| t.id != id);
    }

    fn now_ms(&self) -> f64 {
        self.now_ms as f64
    }
}
