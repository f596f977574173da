//! Round timing: countdown display, round length input, spin tick cadence

use crate::consts::*;
use crate::error::RoundError;

/// Format seconds as `MM:SS`
pub fn format_time(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// True during the last seconds of a round (never at zero)
#[inline]
pub fn is_final_countdown(seconds_left: i64) -> bool {
    seconds_left > 0 && seconds_left <= FINAL_COUNTDOWN_SECS
}

/// Validated round length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundMinutes(u32);

impl RoundMinutes {
    pub fn new(minutes: i64) -> Result<Self, RoundError> {
        if minutes < MIN_ROUND_MINUTES as i64 || minutes > MAX_ROUND_MINUTES as i64 {
            return Err(RoundError::OutOfRange { minutes });
        }
        Ok(Self(minutes as u32))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Round length in countdown seconds
    pub fn seconds(self) -> u32 {
        self.0 * 60
    }
}

/// Raw round length as typed by the player or passed programmatically
#[derive(Debug, Clone, PartialEq)]
pub enum MinutesInput {
    Text(String),
    Number(f64),
}

impl MinutesInput {
    /// Validate into a round length.
    ///
    /// Text is read like a form field: leading whitespace and a sign are
    /// allowed, then the leading digits count and anything after them is
    /// ignored (`"5 min"` is 5). Numbers must be whole.
    pub fn parse(&self) -> Result<RoundMinutes, RoundError> {
        match self {
            MinutesInput::Text(text) => {
                let minutes = leading_integer(text).ok_or_else(|| RoundError::NotANumber {
                    input: text.clone(),
                })?;
                RoundMinutes::new(minutes)
            }
            MinutesInput::Number(value) => {
                if !value.is_finite() {
                    return Err(RoundError::NotANumber {
                        input: value.to_string(),
                    });
                }
                if value.fract() != 0.0 {
                    return Err(RoundError::NotWhole { value: *value });
                }
                RoundMinutes::new(value.clamp(i64::MIN as f64, i64::MAX as f64) as i64)
            }
        }
    }
}

/// Leading base-10 integer of a string, saturating on overflow
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        value = value.saturating_mul(10).saturating_add((b - b'0') as i64);
    }

    seen.then(|| if negative { -value } else { value })
}

impl From<&str> for MinutesInput {
    fn from(text: &str) -> Self {
        MinutesInput::Text(text.to_string())
    }
}

impl From<String> for MinutesInput {
    fn from(text: String) -> Self {
        MinutesInput::Text(text)
    }
}

impl From<f64> for MinutesInput {
    fn from(value: f64) -> Self {
        MinutesInput::Number(value)
    }
}

impl From<u32> for MinutesInput {
    fn from(value: u32) -> Self {
        MinutesInput::Number(value as f64)
    }
}

impl From<i32> for MinutesInput {
    fn from(value: i32) -> Self {
        MinutesInput::Number(value as f64)
    }
}

/// One step of the spin tick sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinTickStep {
    /// Spin progress in [0, 1]
    pub progress: f64,
    /// Delay before the next tick
    pub wait_ms: u32,
    /// Tick pitch
    pub frequency_hz: f64,
}

/// Tick cadence for a spin that started `elapsed_ms` ago.
///
/// Ticks start fast and high and slow down and drop in pitch as the wheel
/// settles, mirroring the deceleration.
pub fn spin_tick_step(elapsed_ms: f64) -> SpinTickStep {
    let progress = (elapsed_ms / SPIN_DURATION_MS as f64).clamp(0.0, 1.0);
    SpinTickStep {
        progress,
        wait_ms: (45.0 + progress * 150.0).round() as u32,
        frequency_hz: 920.0 - progress * 260.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(7), "00:07");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(600), "10:00");
        assert_eq!(format_time(6000), "100:00");
    }

    #[test]
    fn test_final_countdown_window() {
        assert!(!is_final_countdown(11));
        assert!(is_final_countdown(10));
        assert!(is_final_countdown(1));
        assert!(!is_final_countdown(0));
        assert!(!is_final_countdown(-1));
    }

    #[test]
    fn test_text_minutes() {
        assert_eq!(MinutesInput::from("5").parse(), Ok(RoundMinutes(5)));
        assert_eq!(MinutesInput::from("  12").parse(), Ok(RoundMinutes(12)));
        assert_eq!(MinutesInput::from("3 min").parse(), Ok(RoundMinutes(3)));
        assert_eq!(MinutesInput::from("+30").parse(), Ok(RoundMinutes(30)));
    }

    #[test]
    fn test_text_minutes_rejected() {
        assert_eq!(
            MinutesInput::from("abc").parse(),
            Err(RoundError::NotANumber {
                input: "abc".to_string()
            })
        );
        assert_eq!(
            MinutesInput::from("").parse(),
            Err(RoundError::NotANumber {
                input: String::new()
            })
        );
        assert_eq!(
            MinutesInput::from("-2").parse(),
            Err(RoundError::OutOfRange { minutes: -2 })
        );
        assert_eq!(
            MinutesInput::from("99999999999999999999999").parse(),
            Err(RoundError::OutOfRange { minutes: i64::MAX })
        );
    }

    #[test]
    fn test_number_minutes() {
        assert_eq!(MinutesInput::from(1u32).parse(), Ok(RoundMinutes(1)));
        assert_eq!(MinutesInput::from(30.0).parse(), Ok(RoundMinutes(30)));
        assert_eq!(
            MinutesInput::from(0u32).parse(),
            Err(RoundError::OutOfRange { minutes: 0 })
        );
        assert_eq!(
            MinutesInput::from(31).parse(),
            Err(RoundError::OutOfRange { minutes: 31 })
        );
        assert_eq!(
            MinutesInput::from(2.5).parse(),
            Err(RoundError::NotWhole { value: 2.5 })
        );
        assert!(matches!(
            MinutesInput::from(f64::NAN).parse(),
            Err(RoundError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_round_minutes_seconds() {
        assert_eq!(RoundMinutes::new(5).map(RoundMinutes::seconds), Ok(300));
        assert_eq!(RoundMinutes::new(30).map(RoundMinutes::get), Ok(30));
    }

    #[test]
    fn test_spin_tick_cadence() {
        let start = spin_tick_step(0.0);
        assert_eq!(start.progress, 0.0);
        assert_eq!(start.wait_ms, 45);
        assert_eq!(start.frequency_hz, 920.0);

        let end = spin_tick_step(SPIN_DURATION_MS as f64 * 2.0);
        assert_eq!(end.progress, 1.0);
        assert_eq!(end.wait_ms, 195);
        assert_eq!(end.frequency_hz, 660.0);

        let half = spin_tick_step(1800.0);
        assert_eq!(half.wait_ms, 120);
    }

    proptest! {
        #[test]
        fn format_time_round_trips(seconds in 0u32..6000) {
            let text = format_time(seconds);
            let (mm, ss) = text.split_once(':').unwrap();
            prop_assert_eq!(ss.len(), 2);
            prop_assert!(mm.len() >= 2);
            let back = mm.parse::<u32>().unwrap() * 60 + ss.parse::<u32>().unwrap();
            prop_assert_eq!(back, seconds);
        }

        #[test]
        fn spin_tick_slows_down(a in 0.0f64..4000.0, b in 0.0f64..4000.0) {
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(spin_tick_step(early).wait_ms <= spin_tick_step(late).wait_ms);
            prop_assert!(spin_tick_step(early).frequency_hz >= spin_tick_step(late).frequency_hz);
        }
    }
}
