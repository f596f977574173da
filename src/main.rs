//! Tier Ding Name entry point
//!
//! Binds the round machine to the page on the web; natively it plays one
//! headless round on a fake clock.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::{Rc, Weak};

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement};

    use tier_ding_name::audio::AudioManager;
    use tier_ding_name::round::{
        RoundEffects, RoundMachine, SPIN_EASING, Scheduler, TimerEvent, TimerId, letter_layout,
        parse_css_rotation,
    };
    use tier_ding_name::{Language, Settings, SoundCue};

    type Game = RoundMachine<BrowserScheduler, DomEffects>;

    /// Live browser timeout handle per timer id
    type TimeoutHandles = Rc<RefCell<HashMap<TimerId, i32>>>;

    /// `setTimeout`-backed scheduler that dispatches back into the game
    struct BrowserScheduler {
        game: Weak<RefCell<Game>>,
        handles: TimeoutHandles,
        next_id: u64,
    }

    impl BrowserScheduler {
        fn new(game: Weak<RefCell<Game>>) -> Self {
            Self {
                game,
                handles: Rc::new(RefCell::new(HashMap::new())),
                next_id: 0,
            }
        }

        fn schedule(&mut self, delay_ms: u32, period_ms: Option<u32>, event: TimerEvent) -> TimerId {
            self.next_id += 1;
            let id = TimerId::new(self.next_id);
            arm(self.game.clone(), self.handles.clone(), id, delay_ms, period_ms, event);
            id
        }
    }

    /// Arm one browser timeout for `id`. Repeating timers re-arm themselves
    /// before dispatching, so a cancel from inside the handler wins.
    fn arm(
        game: Weak<RefCell<Game>>,
        handles: TimeoutHandles,
        id: TimerId,
        delay_ms: u32,
        period_ms: Option<u32>,
        event: TimerEvent,
    ) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let callback_game = game.clone();
        let callback_handles = handles.clone();
        let callback = Closure::once_into_js(move || {
            // Cancelled timers are no longer in the map
            let live = match period_ms {
                Some(_) => callback_handles.borrow().contains_key(&id),
                None => callback_handles.borrow_mut().remove(&id).is_some(),
            };
            if !live {
                return;
            }
            if let Some(period) = period_ms {
                arm(
                    callback_game.clone(),
                    callback_handles.clone(),
                    id,
                    period,
                    Some(period),
                    event,
                );
            }
            if let Some(game) = callback_game.upgrade() {
                game.borrow_mut().on_timer(id, event);
            }
        });

        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms as i32,
        ) {
            Ok(handle) => {
                handles.borrow_mut().insert(id, handle);
            }
            Err(_) => log::warn!("setTimeout failed for {:?}", event),
        }
    }

    impl Scheduler for BrowserScheduler {
        fn set_timeout(&mut self, delay_ms: u32, event: TimerEvent) -> TimerId {
            self.schedule(delay_ms, None, event)
        }

        fn set_interval(&mut self, period_ms: u32, event: TimerEvent) -> TimerId {
            self.schedule(period_ms, Some(period_ms), event)
        }

        fn cancel(&mut self, id: TimerId) {
            let handle = self.handles.borrow_mut().remove(&id);
            if let (Some(handle), Some(window)) = (handle, web_sys::window()) {
                window.clear_timeout_with_handle(handle);
            }
        }

        fn now_ms(&self) -> f64 {
            web_sys::window()
                .and_then(|w| w.performance())
                .map(|p| p.now())
                .unwrap_or_else(js_sys::Date::now)
        }
    }

    /// Page elements the round writes to
    struct DomEffects {
        wheel: HtmlElement,
        letter: Element,
        timer: Element,
        timer_card: Element,
        banner: HtmlElement,
        message: Element,
        minutes_input: HtmlInputElement,
        audio: AudioManager,
    }

    fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, String> {
        document
            .get_element_by_id(id)
            .ok_or_else(|| format!("missing #{}", id))?
            .dyn_into::<T>()
            .map_err(|_| format!("#{} has an unexpected element type", id))
    }

    impl DomEffects {
        fn from_document(document: &Document, settings: &Settings) -> Result<Self, String> {
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_muted(!settings.sound_enabled);

            Ok(Self {
                wheel: element(document, "wheel")?,
                letter: element(document, "letter")?,
                timer: element(document, "timer")?,
                timer_card: element(document, "timer-card")?,
                banner: element(document, "round-end-banner")?,
                message: element(document, "message")?,
                minutes_input: element(document, "minutes")?,
                audio,
            })
        }

        fn set_wheel_style(&self, property: &str, value: &str) {
            if self.wheel.style().set_property(property, value).is_err() {
                log::warn!("Could not set wheel {}", property);
            }
        }
    }

    impl RoundEffects for DomEffects {
        fn set_letter(&mut self, letter: Option<char>) {
            let text = letter.map_or_else(|| "?".to_string(), |c| c.to_string());
            self.letter.set_text_content(Some(&text));
        }

        fn set_time(&mut self, text: &str) {
            self.timer.set_text_content(Some(text));
        }

        fn set_warning(&mut self, warning: bool) {
            let _ = self
                .timer_card
                .class_list()
                .toggle_with_force("timer-warning", warning);
        }

        fn set_end_banner(&mut self, banner: Option<&str>) {
            match banner {
                Some(text) => {
                    self.banner.set_text_content(Some(text));
                    self.banner.set_hidden(false);
                }
                None => self.banner.set_hidden(true),
            }
        }

        fn set_controls_locked(&mut self, locked: bool) {
            self.minutes_input.set_disabled(locked);
        }

        fn set_message(&mut self, text: &str) {
            self.message.set_text_content(Some(text));
        }

        fn play(&mut self, cue: SoundCue) {
            self.audio.play(cue);
        }

        fn rotate_wheel(&mut self, rotation: f64, duration_ms: u32) {
            let transform = format!("rotate({}deg)", rotation);
            if duration_ms == 0 {
                self.set_wheel_style("transition", "none");
                self.set_wheel_style("transform", &transform);
                // Force a reflow so the snap isn't animated
                let _ = self.wheel.offset_height();
                self.set_wheel_style("transition", "");
            } else {
                let transition = format!("transform {}ms {}", duration_ms, SPIN_EASING.css());
                self.set_wheel_style("transition", &transition);
                self.set_wheel_style("transform", &transform);
            }
        }

        fn rendered_rotation(&self) -> Option<f64> {
            let style = web_sys::window()?
                .get_computed_style(&self.wheel)
                .ok()
                .flatten()?;
            let transform = style.get_property_value("transform").ok()?;
            parse_css_rotation(&transform)
        }
    }

    /// Lay the 26 letters out around the wheel
    fn draw_wheel_letters(document: &Document) {
        let (Ok(wheel), Ok(container)) = (
            element::<HtmlElement>(document, "wheel"),
            element::<Element>(document, "wheel-letters"),
        ) else {
            log::warn!("Wheel elements missing, letters not drawn");
            return;
        };

        container.set_inner_html("");
        for placement in letter_layout(wheel.client_width() as f64) {
            let Ok(node) = document.create_element("span") else {
                continue;
            };
            node.set_class_name("wheel-letter");
            node.set_text_content(Some(&placement.letter.to_string()));
            let _ = node.set_attribute(
                "style",
                &format!("transform: {}", placement.css_transform()),
            );
            let _ = container.append_child(&node);
        }
    }

    /// Translate every `[data-i18n]` node and the page metadata
    fn apply_language(document: &Document, language: Language) {
        if let Ok(nodes) = document.query_selector_all("[data-i18n]") {
            for i in 0..nodes.length() {
                let Some(node) = nodes.item(i) else { continue };
                let Ok(el) = node.dyn_into::<Element>() else {
                    continue;
                };
                if let Some(key) = el.get_attribute("data-i18n") {
                    el.set_text_content(Some(&language.text(&key)));
                }
            }
        }

        if let Some(root) = document.document_element() {
            let _ = root.set_attribute("lang", language.code());
        }
        document.set_title(&language.text("pageTitle"));
        if let Ok(select) = element::<Element>(document, "language-select") {
            let _ = select.set_attribute("aria-label", &language.text("languageSelectAria"));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tier Ding Name starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let settings = Rc::new(RefCell::new(Settings::load()));
        let language = settings.borrow().language;

        let effects = match DomEffects::from_document(&document, &settings.borrow()) {
            Ok(effects) => effects,
            Err(err) => {
                log::error!("Cannot start game: {}", err);
                return;
            }
        };
        effects
            .minutes_input
            .set_value(&settings.borrow().default_minutes.to_string());

        let seed = js_sys::Date::now() as u64;
        let game: Rc<RefCell<Game>> = Rc::new_cyclic(|weak| {
            RefCell::new(
                RoundMachine::new(BrowserScheduler::new(weak.clone()), effects, seed)
                    .with_text_lookup(language.text_lookup()),
            )
        });
        log::info!("Game initialized with seed: {}", seed);

        apply_language(&document, language);
        draw_wheel_letters(&document);
        game.borrow_mut().mount();

        setup_new_round_button(&document, game.clone(), settings.clone());
        setup_language_select(&document, game, settings);
        setup_resize(&window);

        log::info!("Tier Ding Name running!");
    }

    fn setup_new_round_button(
        document: &Document,
        game: Rc<RefCell<Game>>,
        settings: Rc<RefCell<Settings>>,
    ) {
        let (Ok(button), Ok(input)) = (
            element::<Element>(document, "new-round-btn"),
            element::<HtmlInputElement>(document, "minutes"),
        ) else {
            log::warn!("New round controls missing");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let value = input.value();
            let mut g = game.borrow_mut();
            if g.start_round(value.as_str()).is_err() {
                return;
            }

            // Remember the last valid length for next time
            if let Some(minutes) = g.spin_session().map(|s| s.minutes.get()) {
                let mut s = settings.borrow_mut();
                if s.default_minutes != minutes {
                    s.default_minutes = minutes;
                    s.save();
                }
            }
        });
        let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_language_select(
        document: &Document,
        game: Rc<RefCell<Game>>,
        settings: Rc<RefCell<Settings>>,
    ) {
        let Ok(select) = element::<HtmlSelectElement>(document, "language-select") else {
            log::warn!("Language picker missing");
            return;
        };
        select.set_value(settings.borrow().language.code());

        let picker = select.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let language = Language::from_code_or_default(&picker.value());
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                apply_language(&document, language);
            }
            game.borrow_mut().refresh_language(language.text_lookup());

            let mut s = settings.borrow_mut();
            s.language = language;
            s.save();
            log::info!("Language switched to {}", language.code());
        });
        let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(window: &web_sys::Window) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                draw_wheel_letters(&document);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use tier_ding_name::round::{RoundEffects, format_time};
    use tier_ding_name::SoundCue;

    /// Prints what the page would show
    #[derive(Debug, Default)]
    pub struct ConsoleEffects {
        last_minute: Option<String>,
    }

    impl RoundEffects for ConsoleEffects {
        fn set_letter(&mut self, letter: Option<char>) {
            if let Some(letter) = letter {
                println!("Letter: {}", letter);
            }
        }

        fn set_time(&mut self, text: &str) {
            // One line per minute, then every second of the final countdown
            let minute = text.split(':').next().map(str::to_string);
            if minute != self.last_minute || text <= format_time(10).as_str() {
                println!("  {}", text);
                self.last_minute = minute;
            }
        }

        fn set_warning(&mut self, _warning: bool) {}

        fn set_end_banner(&mut self, banner: Option<&str>) {
            if let Some(text) = banner {
                println!("*** {} ***", text);
            }
        }

        fn set_controls_locked(&mut self, _locked: bool) {}

        fn set_message(&mut self, text: &str) {
            println!("{}", text);
        }

        fn play(&mut self, cue: SoundCue) {
            log::debug!("sound: {}", cue.name());
        }

        fn rotate_wheel(&mut self, rotation: f64, duration_ms: u32) {
            log::debug!("wheel -> {:.1}° over {} ms", rotation, duration_ms);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tier_ding_name::consts::{COUNTDOWN_TICK_MS, SPIN_DURATION_MS};
    use tier_ding_name::round::ManualScheduler;
    use tier_ding_name::{RoundMachine, RoundPhase, Settings};

    env_logger::init();
    log::info!("Tier Ding Name (native) starting...");
    log::info!("The game itself runs in the browser - run with `trunk serve` for the web version");

    let settings = Settings::load();
    let minutes = std::env::args()
        .nth(1)
        .unwrap_or_else(|| settings.default_minutes.to_string());
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let mut game = RoundMachine::new(ManualScheduler::new(), headless::ConsoleEffects::default(), seed)
        .with_text_lookup(settings.language.text_lookup());
    game.mount();

    if let Err(err) = game.start_round(minutes.as_str()) {
        eprintln!("{}", err);
        std::process::exit(2);
    }

    game.advance(SPIN_DURATION_MS as u64);
    while game.phase() == RoundPhase::CountingDown {
        game.advance(COUNTDOWN_TICK_MS as u64);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
