//! Sound cues and their tone recipes
//!
//! Procedurally generated - no audio files. Recipes are plain data so they can
//! be checked without a browser; `audio::AudioManager` plays them on the web.

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A single enveloped tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f64,
    pub duration_ms: f64,
    pub waveform: Waveform,
    /// Peak gain before master volume
    pub gain: f64,
    pub attack_ms: f64,
    pub release_ms: f64,
    /// Offset from the moment the cue is played
    pub delay_ms: f64,
}

impl Default for Tone {
    fn default() -> Self {
        Self {
            frequency_hz: 440.0,
            duration_ms: 100.0,
            waveform: Waveform::Sine,
            gain: 0.035,
            attack_ms: 8.0,
            release_ms: 60.0,
            delay_ms: 0.0,
        }
    }
}

impl Tone {
    /// When the release ramp starts, relative to the tone start
    pub fn release_start_ms(&self) -> f64 {
        self.attack_ms.max(self.duration_ms - self.release_ms)
    }
}

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundCue {
    /// Wheel passing a sector while spinning
    SpinTick { frequency_hz: f64 },
    /// Letter drawn
    Win,
    /// One of the last ten seconds
    CountdownTick,
    /// Round over
    TimeUpAlarm,
}

impl SoundCue {
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::SpinTick { .. } => "spin-tick",
            SoundCue::Win => "win",
            SoundCue::CountdownTick => "countdown-tick",
            SoundCue::TimeUpAlarm => "time-up-alarm",
        }
    }

    /// Tones making up this cue
    pub fn tones(&self) -> Vec<Tone> {
        match *self {
            SoundCue::SpinTick { frequency_hz } => vec![Tone {
                frequency_hz,
                duration_ms: 38.0,
                waveform: Waveform::Triangle,
                gain: 0.022,
                attack_ms: 4.0,
                release_ms: 24.0,
                ..Default::default()
            }],
            // Two-note ding, second note a fourth up
            SoundCue::Win => vec![
                Tone {
                    frequency_hz: 740.0,
                    duration_ms: 140.0,
                    gain: 0.042,
                    attack_ms: 8.0,
                    release_ms: 85.0,
                    ..Default::default()
                },
                Tone {
                    frequency_hz: 988.0,
                    duration_ms: 180.0,
                    gain: 0.05,
                    attack_ms: 10.0,
                    release_ms: 100.0,
                    delay_ms: 100.0,
                    ..Default::default()
                },
            ],
            SoundCue::CountdownTick => vec![Tone {
                frequency_hz: 1200.0,
                duration_ms: 65.0,
                waveform: Waveform::Square,
                gain: 0.045,
                attack_ms: 3.0,
                release_ms: 35.0,
                ..Default::default()
            }],
            SoundCue::TimeUpAlarm => vec![
                Tone {
                    frequency_hz: 520.0,
                    duration_ms: 220.0,
                    waveform: Waveform::Sawtooth,
                    gain: 0.06,
                    attack_ms: 10.0,
                    release_ms: 110.0,
                    ..Default::default()
                },
                Tone {
                    frequency_hz: 390.0,
                    duration_ms: 340.0,
                    waveform: Waveform::Sawtooth,
                    gain: 0.07,
                    attack_ms: 10.0,
                    release_ms: 140.0,
                    delay_ms: 110.0,
                },
            ],
        }
    }
}
