//! Round state machine
//!
//! Idle → Spinning → CountingDown → Ended, with reset back to Idle from
//! anywhere. All side effects go through `RoundEffects`, all waiting goes
//! through the `Scheduler`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::clock::{MinutesInput, RoundMinutes, format_time, is_final_countdown, spin_tick_step};
use super::scheduler::{ManualScheduler, Scheduler, TimerEvent, TimerId};
use super::state::{
    END_BANNER_KEY, MessageKey, RoundPhase, RoundStage, RoundTimer, SpinSession,
};
use super::wheel::{SpinRequest, compute_spin_target_rotation, random_index};
use crate::consts::*;
use crate::error::RoundError;
use crate::normalize_angle;
use crate::sound::SoundCue;

/// Key → display text
pub type TextLookup = Box<dyn Fn(&str) -> String>;

/// Uniform source in [0, 1)
pub type UnitRng = Box<dyn FnMut() -> f64>;

/// Effect sink the machine drives (DOM, audio, test recorder)
pub trait RoundEffects {
    /// Show the drawn letter, `None` for the placeholder
    fn set_letter(&mut self, letter: Option<char>);
    /// Show the remaining time (`MM:SS`)
    fn set_time(&mut self, text: &str);
    /// Toggle the final countdown warning visual
    fn set_warning(&mut self, warning: bool);
    /// Show the end banner with the given text, or hide it
    fn set_end_banner(&mut self, banner: Option<&str>);
    /// Lock/unlock the round length input
    fn set_controls_locked(&mut self, locked: bool);
    /// Show a status message
    fn set_message(&mut self, text: &str);
    /// Play a sound cue (fire and forget)
    fn play(&mut self, cue: SoundCue);
    /// Turn the wheel to an absolute rotation; 0 ms snaps without animating
    fn rotate_wheel(&mut self, rotation: f64, duration_ms: u32);
    /// Rotation the wheel is actually showing right now, if it can be read
    fn rendered_rotation(&self) -> Option<f64> {
        None
    }
}

/// One game instance
pub struct RoundMachine<S: Scheduler, E: RoundEffects> {
    scheduler: S,
    effects: E,
    text: TextLookup,
    rng: UnitRng,
    stage: RoundStage,
    /// Wheel rotation carried between spins
    rotation: f64,
    letter: Option<char>,
    time_left: u32,
    message: MessageKey,
    banner_visible: bool,
}

impl<S: Scheduler, E: RoundEffects> RoundMachine<S, E> {
    /// Create a machine with a seeded RNG and an identity text lookup
    pub fn new(scheduler: S, effects: E, seed: u64) -> Self {
        let mut pcg = Pcg32::seed_from_u64(seed);
        Self::with_rng(scheduler, effects, move || pcg.random::<f64>())
    }

    /// Create a machine with a custom uniform source
    pub fn with_rng(scheduler: S, effects: E, rng: impl FnMut() -> f64 + 'static) -> Self {
        Self {
            scheduler,
            effects,
            text: Box::new(|key| key.to_string()),
            rng: Box::new(rng),
            stage: RoundStage::Idle,
            rotation: 0.0,
            letter: None,
            time_left: 0,
            message: MessageKey::Ready,
            banner_visible: false,
        }
    }

    /// Replace the text lookup without re-rendering
    pub fn with_text_lookup(mut self, lookup: impl Fn(&str) -> String + 'static) -> Self {
        self.text = Box::new(lookup);
        self
    }

    /// Initial render
    pub fn mount(&mut self) {
        self.effects.set_letter(self.letter);
        self.effects.set_time(&format_time(self.time_left));
        self.effects.set_warning(false);
        self.set_banner(false);
        self.effects.set_controls_locked(false);
        self.effects.rotate_wheel(self.rotation, 0);
        self.show_message(self.message);
    }

    pub fn phase(&self) -> RoundPhase {
        self.stage.phase()
    }

    /// Wheel rotation carried between spins (degrees)
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Seconds left on the countdown
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Letter of the current or last round
    pub fn letter(&self) -> Option<char> {
        self.letter
    }

    pub fn current_message(&self) -> MessageKey {
        self.message
    }

    pub fn is_banner_visible(&self) -> bool {
        self.banner_visible
    }

    /// The in-flight spin, if any
    pub fn spin_session(&self) -> Option<&SpinSession> {
        match &self.stage {
            RoundStage::Spinning(session) => Some(session),
            _ => None,
        }
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut E {
        &mut self.effects
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Validate the round length and spin the wheel.
    ///
    /// Invalid input shows the validation message and leaves the current
    /// phase untouched. A valid request tears down whatever round is running
    /// before the new spin is scheduled.
    pub fn start_round(&mut self, input: impl Into<MinutesInput>) -> Result<(), RoundError> {
        let minutes = match input.into().parse() {
            Ok(minutes) => minutes,
            Err(err) => {
                log::warn!("Rejected round length: {}", err);
                self.show_message(MessageKey::Validation);
                return Err(err);
            }
        };

        if self.phase() != RoundPhase::Idle {
            self.reset_current_round();
        }

        self.spin_wheel(minutes);
        Ok(())
    }

    /// Cancel everything outstanding and return to Idle
    pub fn reset_current_round(&mut self) {
        match std::mem::replace(&mut self.stage, RoundStage::Idle) {
            RoundStage::Spinning(session) => {
                self.scheduler.cancel(session.completion);
                if let Some(tick) = session.tick {
                    self.scheduler.cancel(tick);
                }

                // Freeze the wheel wherever the animation got to
                let reached = self
                    .effects
                    .rendered_rotation()
                    .unwrap_or_else(|| session.rotation_at(self.scheduler.now_ms()));
                self.rotation = normalize_angle(reached);
                self.effects.rotate_wheel(self.rotation, 0);

                log::info!("Draw canceled at {:.1}°", self.rotation);
                self.show_message(MessageKey::DrawCanceled);
            }
            RoundStage::CountingDown(timer) => {
                self.scheduler.cancel(timer.ticker);
                log::info!(
                    "Round canceled with {} of {} seconds left",
                    self.time_left,
                    timer.total_seconds
                );
                self.show_message(MessageKey::RoundEnded);
            }
            RoundStage::Idle | RoundStage::Ended => {}
        }

        self.effects.set_warning(false);
        self.set_banner(false);
        self.effects.set_controls_locked(false);
    }

    /// Install a new text lookup and re-render visible text
    pub fn refresh_language(&mut self, lookup: impl Fn(&str) -> String + 'static) {
        self.text = Box::new(lookup);
        self.show_message(self.message);
        if self.banner_visible {
            self.set_banner(true);
        }
    }

    /// Scheduler callback entry point. Stale ids are ignored.
    pub fn on_timer(&mut self, id: TimerId, event: TimerEvent) {
        let live = match (&self.stage, event) {
            (RoundStage::Spinning(session), TimerEvent::SpinComplete) => session.completion == id,
            (RoundStage::Spinning(session), TimerEvent::SpinTick) => session.tick == Some(id),
            (RoundStage::CountingDown(timer), TimerEvent::CountdownTick) => timer.ticker == id,
            _ => false,
        };
        if !live {
            log::debug!("Ignoring stale {:?} timer {}", event, id.raw());
            return;
        }

        match event {
            TimerEvent::SpinComplete => self.finish_spin(),
            TimerEvent::SpinTick => self.spin_tick(),
            TimerEvent::CountdownTick => self.countdown_tick(),
        }
    }

    fn spin_wheel(&mut self, minutes: RoundMinutes) {
        let target_index = random_index(SECTOR_COUNT, &mut self.rng);
        let spin_choices = (EXTRA_SPINS_MAX - EXTRA_SPINS_MIN + 1) as usize;
        let extra_spins = EXTRA_SPINS_MIN + random_index(spin_choices, &mut self.rng) as u32;
        let target_rotation = compute_spin_target_rotation(SpinRequest {
            current_rotation: self.rotation,
            target_index,
            extra_spins,
        });

        self.effects.set_controls_locked(true);
        self.show_message(MessageKey::Spinning);
        self.letter = None;
        self.effects.set_letter(None);
        self.effects.rotate_wheel(target_rotation, SPIN_DURATION_MS);

        let completion = self
            .scheduler
            .set_timeout(SPIN_DURATION_MS, TimerEvent::SpinComplete);
        self.stage = RoundStage::Spinning(SpinSession {
            target_index,
            extra_spins,
            start_rotation: self.rotation,
            target_rotation,
            started_at_ms: self.scheduler.now_ms(),
            duration_ms: SPIN_DURATION_MS,
            minutes,
            completion,
            tick: None,
        });

        log::info!(
            "Round started: {} min, spinning {} turns to sector {}",
            minutes.get(),
            extra_spins,
            target_index
        );

        self.spin_tick();
    }

    /// Play a spin tick and schedule the next one until the spin settles
    fn spin_tick(&mut self) {
        let now = self.scheduler.now_ms();
        let RoundStage::Spinning(session) = &mut self.stage else {
            return;
        };

        let step = spin_tick_step(now - session.started_at_ms);
        self.effects.play(SoundCue::SpinTick {
            frequency_hz: step.frequency_hz,
        });

        session.tick = if step.progress < 1.0 {
            Some(self.scheduler.set_timeout(step.wait_ms, TimerEvent::SpinTick))
        } else {
            None
        };
    }

    fn finish_spin(&mut self) {
        let RoundStage::Spinning(session) = std::mem::replace(&mut self.stage, RoundStage::Idle)
        else {
            return;
        };
        if let Some(tick) = session.tick {
            self.scheduler.cancel(tick);
        }

        self.rotation = normalize_angle(session.target_rotation);
        self.effects.rotate_wheel(self.rotation, 0);

        let letter = session.letter();
        self.letter = Some(letter);
        self.effects.set_letter(Some(letter));
        self.effects.play(SoundCue::Win);
        log::info!("Letter drawn: {}", letter);

        self.start_timer(session.minutes);
    }

    fn start_timer(&mut self, minutes: RoundMinutes) {
        self.time_left = minutes.seconds();
        self.effects.set_time(&format_time(self.time_left));
        self.effects.set_warning(false);
        self.set_banner(false);
        self.effects.set_controls_locked(true);
        self.show_message(MessageKey::RoundRunning);

        let ticker = self
            .scheduler
            .set_interval(COUNTDOWN_TICK_MS, TimerEvent::CountdownTick);
        self.stage = RoundStage::CountingDown(RoundTimer {
            total_seconds: self.time_left,
            ticker,
        });
    }

    fn countdown_tick(&mut self) {
        self.time_left = self.time_left.saturating_sub(1);
        self.effects.set_time(&format_time(self.time_left));

        if is_final_countdown(self.time_left as i64) {
            self.effects.set_warning(true);
            self.effects.play(SoundCue::CountdownTick);
        } else {
            self.effects.set_warning(false);
        }

        if self.time_left == 0 {
            if let RoundStage::CountingDown(timer) =
                std::mem::replace(&mut self.stage, RoundStage::Ended)
            {
                self.scheduler.cancel(timer.ticker);
            }
            self.effects.set_warning(false);
            self.set_banner(true);
            self.effects.play(SoundCue::TimeUpAlarm);
            self.effects.set_controls_locked(false);
            self.show_message(MessageKey::TimeUp);
            log::info!("Time is up");
        }
    }

    fn show_message(&mut self, key: MessageKey) {
        self.message = key;
        let text = (self.text)(key.as_key());
        self.effects.set_message(&text);
    }

    fn set_banner(&mut self, visible: bool) {
        self.banner_visible = visible;
        if visible {
            let text = (self.text)(END_BANNER_KEY);
            self.effects.set_end_banner(Some(&text));
        } else {
            self.effects.set_end_banner(None);
        }
    }
}

impl<E: RoundEffects> RoundMachine<ManualScheduler, E> {
    /// Advance the fake clock, firing due timers in order
    pub fn advance(&mut self, ms: u64) {
        let until = self.scheduler.now() + ms;
        while let Some((id, event)) = self.scheduler.pop_due(until) {
            self.on_timer(id, event);
        }
        self.scheduler.advance_clock_to(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::center_angle_for_index;
    use crate::i18n::Language;

    /// Effect sink that records what the page would show
    #[derive(Debug, Default)]
    struct RecordingEffects {
        letter: Option<char>,
        time: String,
        warning: bool,
        banner: Option<String>,
        locked: bool,
        message: String,
        sounds: Vec<SoundCue>,
        wheel: Vec<(f64, u32)>,
        readback: Option<f64>,
    }

    impl RoundEffects for RecordingEffects {
        fn set_letter(&mut self, letter: Option<char>) {
            self.letter = letter;
        }
        fn set_time(&mut self, text: &str) {
            self.time = text.to_string();
        }
        fn set_warning(&mut self, warning: bool) {
            self.warning = warning;
        }
        fn set_end_banner(&mut self, banner: Option<&str>) {
            self.banner = banner.map(str::to_string);
        }
        fn set_controls_locked(&mut self, locked: bool) {
            self.locked = locked;
        }
        fn set_message(&mut self, text: &str) {
            self.message = text.to_string();
        }
        fn play(&mut self, cue: SoundCue) {
            self.sounds.push(cue);
        }
        fn rotate_wheel(&mut self, rotation: f64, duration_ms: u32) {
            self.wheel.push((rotation, duration_ms));
        }
        fn rendered_rotation(&self) -> Option<f64> {
            self.readback
        }
    }

    type TestMachine = RoundMachine<ManualScheduler, RecordingEffects>;

    /// Machine whose RNG always returns `unit`
    fn machine(unit: f64) -> TestMachine {
        let mut m = RoundMachine::with_rng(ManualScheduler::new(), RecordingEffects::default(), move || unit);
        m.mount();
        m
    }

    fn count(m: &TestMachine, cue: SoundCue) -> usize {
        m.effects().sounds.iter().filter(|s| **s == cue).count()
    }

    fn spin_ticks(m: &TestMachine) -> Vec<f64> {
        m.effects()
            .sounds
            .iter()
            .filter_map(|s| match s {
                SoundCue::SpinTick { frequency_hz } => Some(*frequency_hz),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_mount_renders_ready_state() {
        let m = machine(0.0);
        assert_eq!(m.phase(), RoundPhase::Idle);
        assert_eq!(m.effects().time, "00:00");
        assert_eq!(m.effects().message, "messageReady");
        assert_eq!(m.effects().banner, None);
        assert!(!m.effects().locked);
    }

    #[test]
    fn test_full_round() {
        let mut m = machine(0.0);
        assert_eq!(m.start_round("5"), Ok(()));
        assert_eq!(m.phase(), RoundPhase::Spinning);
        assert_eq!(m.effects().message, "messageSpinning");
        assert_eq!(m.effects().letter, None);
        assert!(m.effects().locked);
        // Index 0 with 6 extra turns from rest
        assert_eq!(m.effects().wheel.last(), Some(&(2160.0, SPIN_DURATION_MS)));

        m.advance(SPIN_DURATION_MS as u64 - 1);
        assert_eq!(m.phase(), RoundPhase::Spinning);

        m.advance(1);
        assert_eq!(m.phase(), RoundPhase::CountingDown);
        assert_eq!(m.time_left(), 300);
        assert_eq!(m.letter(), Some('A'));
        assert_eq!(m.effects().letter, Some('A'));
        assert_eq!(m.effects().time, "05:00");
        assert_eq!(m.effects().message, "messageRoundRunning");
        assert_eq!(m.rotation(), 0.0);
        assert_eq!(count(&m, SoundCue::Win), 1);

        m.advance(299_000);
        assert_eq!(m.phase(), RoundPhase::CountingDown);
        assert_eq!(m.time_left(), 1);

        m.advance(1000);
        assert_eq!(m.phase(), RoundPhase::Ended);
        assert_eq!(m.time_left(), 0);
        assert_eq!(m.effects().time, "00:00");
        assert!(m.is_banner_visible());
        assert_eq!(m.effects().banner.as_deref(), Some("endRoundBanner"));
        assert!(!m.effects().warning);
        assert!(!m.effects().locked);
        assert_eq!(m.effects().message, "messageTimeUp");
        assert_eq!(m.effects().sounds.last(), Some(&SoundCue::TimeUpAlarm));
        assert_eq!(count(&m, SoundCue::CountdownTick), 10);
        assert_eq!(m.scheduler().pending(), 0);

        // Nothing else happens once the round is over
        m.advance(60_000);
        assert_eq!(m.phase(), RoundPhase::Ended);
        assert_eq!(count(&m, SoundCue::TimeUpAlarm), 1);
    }

    #[test]
    fn test_final_countdown_warning() {
        let mut m = machine(0.0);
        m.start_round(1u32).unwrap();
        m.advance(SPIN_DURATION_MS as u64);

        m.advance(49_000);
        assert_eq!(m.time_left(), 11);
        assert!(!m.effects().warning);
        assert_eq!(count(&m, SoundCue::CountdownTick), 0);

        m.advance(1000);
        assert_eq!(m.time_left(), 10);
        assert!(m.effects().warning);
        assert_eq!(count(&m, SoundCue::CountdownTick), 1);
        assert_eq!(m.effects().time, "00:10");
    }

    #[test]
    fn test_spin_ticks_slow_down_and_stop() {
        let mut m = machine(0.0);
        m.start_round(3u32).unwrap();
        assert_eq!(spin_ticks(&m), vec![920.0]);

        m.advance(45);
        assert_eq!(spin_ticks(&m).len(), 2);

        m.advance(SPIN_DURATION_MS as u64);
        let ticks = spin_ticks(&m);
        assert!(ticks.len() > 10);
        assert!(ticks.windows(2).all(|w| w[1] <= w[0]));

        // Only the countdown interval is left
        assert_eq!(
            m.scheduler()
                .pending_timers()
                .iter()
                .map(|(_, e)| *e)
                .collect::<Vec<_>>(),
            vec![TimerEvent::CountdownTick]
        );

        m.advance(5000);
        assert_eq!(spin_ticks(&m).len(), ticks.len());
    }

    #[test]
    fn test_reset_while_spinning_snapshots_readback() {
        let mut m = machine(0.0);
        m.start_round("5").unwrap();
        m.advance(1000);

        let completion = m.spin_session().map(|s| s.completion).unwrap();
        m.effects_mut().readback = Some(483.0);
        m.reset_current_round();

        assert_eq!(m.phase(), RoundPhase::Idle);
        assert_eq!(m.rotation(), 123.0);
        assert_eq!(m.effects().wheel.last(), Some(&(123.0, 0)));
        assert_eq!(m.effects().message, "messageDrawCanceled");
        assert!(!m.effects().locked);
        assert_eq!(m.scheduler().pending(), 0);

        // A completion that slipped through anyway changes nothing
        m.on_timer(completion, TimerEvent::SpinComplete);
        m.advance(10_000);
        assert_eq!(m.phase(), RoundPhase::Idle);
        assert_eq!(m.letter(), None);
        assert_eq!(m.rotation(), 123.0);
        assert_eq!(count(&m, SoundCue::Win), 0);
    }

    #[test]
    fn test_reset_while_spinning_estimates_without_readback() {
        let mut m = machine(0.0);
        m.start_round("5").unwrap();
        m.advance(1800);
        m.reset_current_round();

        let expected = normalize_angle(2160.0 * crate::round::SPIN_EASING.ease(0.5));
        assert!((m.rotation() - expected).abs() < 1e-9);
        assert!((0.0..360.0).contains(&m.rotation()));
    }

    #[test]
    fn test_reset_while_counting_down() {
        let mut m = machine(0.0);
        m.start_round(2u32).unwrap();
        m.advance(SPIN_DURATION_MS as u64 + 5000);
        assert_eq!(m.time_left(), 115);

        m.reset_current_round();
        assert_eq!(m.phase(), RoundPhase::Idle);
        assert_eq!(m.effects().message, "messageRoundEnded");
        assert_eq!(m.scheduler().pending(), 0);
        // Wheel is stationary, rotation untouched
        assert_eq!(m.rotation(), 0.0);

        m.advance(10_000);
        assert_eq!(m.time_left(), 115);
        assert_eq!(m.effects().time, "01:55");
    }

    #[test]
    fn test_invalid_input_stays_idle() {
        let mut m = machine(0.0);
        assert!(m.start_round(0u32).is_err());
        assert!(m.start_round(31u32).is_err());
        assert_eq!(
            m.start_round("abc"),
            Err(RoundError::NotANumber {
                input: "abc".to_string()
            })
        );
        assert_eq!(m.phase(), RoundPhase::Idle);
        assert_eq!(m.effects().message, "messageValidation");
        assert_eq!(m.current_message(), MessageKey::Validation);
        assert_eq!(m.scheduler().pending(), 0);
    }

    #[test]
    fn test_invalid_input_keeps_running_round() {
        let mut m = machine(0.0);
        m.start_round("3").unwrap();
        m.advance(SPIN_DURATION_MS as u64);

        assert!(m.start_round("0").is_err());
        assert_eq!(m.phase(), RoundPhase::CountingDown);
        assert_eq!(m.effects().message, "messageValidation");

        m.advance(1000);
        assert_eq!(m.time_left(), 179);
    }

    #[test]
    fn test_new_round_mid_countdown_keeps_single_tick() {
        let mut m = machine(0.0);
        m.start_round("3").unwrap();
        m.advance(SPIN_DURATION_MS as u64 + 2000);
        let old_ticker = m
            .scheduler()
            .pending_timers()
            .iter()
            .find(|(_, e)| *e == TimerEvent::CountdownTick)
            .map(|(id, _)| *id)
            .unwrap();

        m.start_round("2").unwrap();
        assert_eq!(m.phase(), RoundPhase::Spinning);
        let events: Vec<_> = m.scheduler().pending_timers().iter().map(|(_, e)| *e).collect();
        assert_eq!(events, vec![TimerEvent::SpinComplete, TimerEvent::SpinTick]);

        // Old ticker firing late must not count down the new round
        m.on_timer(old_ticker, TimerEvent::CountdownTick);
        m.advance(SPIN_DURATION_MS as u64);
        assert_eq!(m.phase(), RoundPhase::CountingDown);
        assert_eq!(m.time_left(), 120);

        m.advance(1000);
        assert_eq!(m.time_left(), 119);
        let ticks = m
            .scheduler()
            .pending_timers()
            .iter()
            .filter(|(_, e)| *e == TimerEvent::CountdownTick)
            .count();
        assert_eq!(ticks, 1);
    }

    #[test]
    fn test_new_round_mid_spin_restarts_spin() {
        let mut m = machine(0.0);
        m.start_round("3").unwrap();
        m.advance(500);
        m.start_round("4").unwrap();

        assert_eq!(m.phase(), RoundPhase::Spinning);
        assert_eq!(m.effects().message, "messageSpinning");
        assert_eq!(m.scheduler().pending(), 2);

        m.advance(SPIN_DURATION_MS as u64);
        assert_eq!(m.time_left(), 240);
        assert_eq!(count(&m, SoundCue::Win), 1);
    }

    #[test]
    fn test_ended_round_restarts_into_spinning() {
        let mut m = machine(0.0);
        m.start_round(1u32).unwrap();
        m.advance(SPIN_DURATION_MS as u64 + 60_000);
        assert_eq!(m.phase(), RoundPhase::Ended);

        m.start_round(1u32).unwrap();
        assert_eq!(m.phase(), RoundPhase::Spinning);
        assert!(!m.is_banner_visible());
        assert_eq!(m.effects().banner, None);
    }

    #[test]
    fn test_reset_from_ended_hides_banner() {
        let mut m = machine(0.0);
        m.start_round(1u32).unwrap();
        m.advance(SPIN_DURATION_MS as u64 + 60_000);
        m.reset_current_round();
        assert_eq!(m.phase(), RoundPhase::Idle);
        assert_eq!(m.effects().banner, None);
    }

    #[test]
    fn test_rotation_accumulates_across_spins() {
        // 0.5 picks sector 13 and 8 extra turns every time
        let mut m = machine(0.5);
        m.start_round(1u32).unwrap();
        let first = m.spin_session().map(|s| s.target_rotation).unwrap();
        m.advance(SPIN_DURATION_MS as u64);
        assert_eq!(m.letter(), Some('N'));

        let settled = m.rotation();
        let expected = normalize_angle(360.0 - center_angle_for_index(13));
        assert!((settled - expected).abs() < 1e-9);
        assert!((first - (8.0 * 360.0 + expected)).abs() < 1e-9);

        m.start_round(1u32).unwrap();
        let second = m.spin_session().map(|s| s.target_rotation).unwrap();
        // Same sector again: exactly eight more turns from where it stopped
        assert!((second - (settled + 8.0 * 360.0)).abs() < 1e-9);
        assert!(second > settled);
    }

    #[test]
    fn test_refresh_language_rerenders_text() {
        let mut m = machine(0.0).with_text_lookup(|key| Language::De.text(key));
        m.mount();
        assert_eq!(m.effects().message, "Waehle eine Zeit und starte eine Runde.");

        m.start_round(1u32).unwrap();
        m.advance(SPIN_DURATION_MS as u64 + 60_000);
        assert_eq!(m.effects().banner.as_deref(), Some("Runde vorbei!"));

        m.refresh_language(|key| Language::En.text(key));
        assert_eq!(m.phase(), RoundPhase::Ended);
        assert_eq!(m.effects().message, "Time is up. Round over!");
        assert_eq!(m.effects().banner.as_deref(), Some("Round over!"));
    }

    #[test]
    fn test_refresh_language_keeps_hidden_banner_hidden() {
        let mut m = machine(0.0);
        m.refresh_language(|key| Language::En.text(key));
        assert_eq!(m.effects().banner, None);
        assert_eq!(m.effects().message, "Choose a time and start a round.");
    }

    #[test]
    fn test_seeded_machines_draw_the_same_letters() {
        let mut a = RoundMachine::new(ManualScheduler::new(), RecordingEffects::default(), 42);
        let mut b = RoundMachine::new(ManualScheduler::new(), RecordingEffects::default(), 42);

        for _ in 0..5 {
            a.start_round(1u32).unwrap();
            b.start_round(1u32).unwrap();
            a.advance(SPIN_DURATION_MS as u64);
            b.advance(SPIN_DURATION_MS as u64);
            assert_eq!(a.letter(), b.letter());
            assert_eq!(a.rotation(), b.rotation());
        }
    }
}
