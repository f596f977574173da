//! Round phases and the ephemeral data each phase owns

use super::clock::RoundMinutes;
use super::scheduler::TimerId;
use super::wheel::{SPIN_EASING, letter_at};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Waiting for a round to be started
    Idle,
    /// Wheel is turning toward the drawn letter
    Spinning,
    /// Letter drawn, clock running
    CountingDown,
    /// Clock ran out, banner showing
    Ended,
}

/// Status messages the machine can show (text comes from the lookup)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    Ready,
    Spinning,
    RoundRunning,
    TimeUp,
    RoundEnded,
    DrawCanceled,
    Validation,
}

impl MessageKey {
    /// Catalog key
    pub fn as_key(&self) -> &'static str {
        match self {
            MessageKey::Ready => "messageReady",
            MessageKey::Spinning => "messageSpinning",
            MessageKey::RoundRunning => "messageRoundRunning",
            MessageKey::TimeUp => "messageTimeUp",
            MessageKey::RoundEnded => "messageRoundEnded",
            MessageKey::DrawCanceled => "messageDrawCanceled",
            MessageKey::Validation => "messageValidation",
        }
    }
}

/// Catalog key of the end-of-round banner
pub const END_BANNER_KEY: &str = "endRoundBanner";

/// An in-flight spin
#[derive(Debug, Clone, PartialEq)]
pub struct SpinSession {
    /// Sector that will land under the pointer
    pub target_index: usize,
    /// Full revolutions in this spin
    pub extra_spins: u32,
    /// Rotation when the spin started
    pub start_rotation: f64,
    /// Absolute rotation the wheel animates to
    pub target_rotation: f64,
    /// Scheduler time the spin started
    pub started_at_ms: f64,
    pub duration_ms: u32,
    /// Round length to count down once the letter is drawn
    pub minutes: RoundMinutes,
    /// Pending spin-complete timer
    pub completion: TimerId,
    /// Pending spin tick, `None` once ticking has stopped
    pub tick: Option<TimerId>,
}

impl SpinSession {
    pub fn letter(&self) -> char {
        letter_at(self.target_index)
    }

    /// Linear progress in [0, 1]
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        ((now_ms - self.started_at_ms) / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    /// Where the animated wheel should be at `now_ms` (absolute degrees)
    pub fn rotation_at(&self, now_ms: f64) -> f64 {
        let eased = SPIN_EASING.ease(self.progress(now_ms));
        self.start_rotation + (self.target_rotation - self.start_rotation) * eased
    }
}

/// A running countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTimer {
    /// Seconds the round started with
    pub total_seconds: u32,
    /// Repeating tick timer
    pub ticker: TimerId,
}

/// Phase plus the data only that phase owns
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RoundStage {
    Idle,
    Spinning(SpinSession),
    CountingDown(RoundTimer),
    Ended,
}

impl RoundStage {
    pub(crate) fn phase(&self) -> RoundPhase {
        match self {
            RoundStage::Idle => RoundPhase::Idle,
            RoundStage::Spinning(_) => RoundPhase::Spinning,
            RoundStage::CountingDown(_) => RoundPhase::CountingDown,
            RoundStage::Ended => RoundPhase::Ended,
        }
    }
}
