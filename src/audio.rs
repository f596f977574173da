//! Audio system using Web Audio API
//!
//! Renders `SoundCue` tone recipes with oscillators - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sound::{SoundCue, Tone, Waveform};

/// Floor for exponential ramps (Web Audio rejects 0)
const SILENCE: f32 = 0.0001;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Context creation failed once, don't retry every tick
    unavailable: bool,
    master_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    /// The context is created lazily on the first cue, since browsers only
    /// allow audio after a user gesture.
    pub fn new() -> Self {
        Self {
            ctx: None,
            unavailable: false,
            master_volume: 0.8,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Create or resume the context
    fn ensure_context(&mut self) -> Option<&AudioContext> {
        if self.ctx.is_none() && !self.unavailable {
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(_) => {
                    log::warn!("Failed to create AudioContext - audio disabled");
                    self.unavailable = true;
                }
            }
        }

        let ctx = self.ctx.as_ref()?;
        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    /// Play a sound cue
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = self.ensure_context() else {
            return;
        };

        for tone in cue.tones() {
            play_tone(ctx, &tone, vol);
        }
    }
}

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    }
}

/// Create an oscillator routed through a gain node
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    osc_type: OscillatorType,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}

/// Attack, hold, exponential release
fn play_tone(ctx: &AudioContext, tone: &Tone, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, tone.frequency_hz as f32, oscillator_type(tone.waveform))
    else {
        return;
    };

    let start = ctx.current_time() + tone.delay_ms / 1000.0;
    let end = start + tone.duration_ms / 1000.0;
    let attack_end = start + tone.attack_ms / 1000.0;
    let release_start = start + tone.release_start_ms() / 1000.0;
    let peak = (tone.gain as f32 * vol).max(SILENCE);

    osc.frequency()
        .set_value_at_time(tone.frequency_hz as f32, start)
        .ok();
    gain.gain().set_value_at_time(SILENCE, start).ok();
    gain.gain().linear_ramp_to_value_at_time(peak, attack_end).ok();
    gain.gain().set_value_at_time(peak, release_start).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(SILENCE, end)
        .ok();

    osc.start_with_when(start).ok();
    osc.stop_with_when(end).ok();
}
