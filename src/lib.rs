//! Tier Ding Name - A letter wheel party word game
//!
//! Core modules:
//! - `round`: Deterministic round engine (wheel geometry, countdown, state machine)
//! - `sound`: Sound cue recipes (pure data, rendered by `audio` on the web)
//! - `i18n`: German/English text catalog
//! - `settings`: Persisted player preferences
//! - `error`: Round input errors

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod i18n;
pub mod round;
pub mod settings;
pub mod sound;

pub use error::RoundError;
pub use i18n::Language;
pub use round::{RoundMachine, RoundPhase};
pub use settings::Settings;
pub use sound::SoundCue;

/// Game configuration constants
pub mod consts {
    /// Wheel letters in display order, one per sector
    pub const LETTERS: [char; 26] = [
        'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
        'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
    ];
    /// Number of wheel sectors
    pub const SECTOR_COUNT: usize = LETTERS.len();
    /// Angular width of one sector (degrees)
    pub const SECTOR_ANGLE: f64 = 360.0 / SECTOR_COUNT as f64;

    /// Wheel spin animation length
    pub const SPIN_DURATION_MS: u32 = 3600;
    /// Full revolutions added to every spin (inclusive range)
    pub const EXTRA_SPINS_MIN: u32 = 6;
    pub const EXTRA_SPINS_MAX: u32 = 9;

    /// Letter ring radius as a fraction of the wheel diameter
    pub const LETTER_RING_FACTOR: f64 = 0.43;
    /// Letters never sit closer to the hub than this (px)
    pub const MIN_LETTER_RADIUS: u32 = 118;

    /// Allowed round length (minutes, inclusive)
    pub const MIN_ROUND_MINUTES: u32 = 1;
    pub const MAX_ROUND_MINUTES: u32 = 30;

    /// Countdown tick cadence
    pub const COUNTDOWN_TICK_MS: u32 = 1000;
    /// Last seconds of a round that get the warning treatment
    pub const FINAL_COUNTDOWN_SECS: i64 = 10;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let normalized = angle % 360.0;
    if normalized < 0.0 {
        // -1e-20 % 360 + 360 rounds to exactly 360.0
        let wrapped = normalized + 360.0;
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    } else {
        normalized
    }
}

/// Angle (degrees) of a sector's center, measured clockwise from the top
#[inline]
pub fn center_angle_for_index(index: usize) -> f64 {
    index as f64 * consts::SECTOR_ANGLE
}
