//! Deterministic round engine
//!
//! Everything that decides what happens in a round lives here. This module must
//! stay free of browser dependencies:
//! - Time only through the `Scheduler` trait
//! - Randomness only through the injected unit source
//! - Side effects only through `RoundEffects`

pub mod clock;
pub mod machine;
pub mod scheduler;
pub mod state;
pub mod wheel;

pub use clock::{
    MinutesInput, RoundMinutes, SpinTickStep, format_time, is_final_countdown, spin_tick_step,
};
pub use machine::{RoundEffects, RoundMachine, TextLookup, UnitRng};
pub use scheduler::{ManualScheduler, Scheduler, TimerEvent, TimerId};
pub use state::{END_BANNER_KEY, MessageKey, RoundPhase, RoundTimer, SpinSession};
pub use wheel::{
    CubicBezier, LetterPlacement, SPIN_EASING, SpinRequest, compute_letter_radius,
    compute_letter_radius_with_min, compute_spin_target_rotation, letter_at, letter_layout,
    parse_css_rotation, random_index,
};
