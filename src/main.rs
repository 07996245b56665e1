//! Lane Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop. All
//! gameplay decisions live in `sim`; this shell only translates browser
//! input into intents, drives the tick from requestAnimationFrame, and
//! mirrors state into the DOM HUD.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, TouchEvent};

    use lane_rush::consts::MAX_TICK_DT;
    use lane_rush::highscores::HighScoreEntry;
    use lane_rush::sim::{GameEvent, GameMode, GameState, GameStatus, TickInput, tick};
    use lane_rush::{HighScores, Settings};

    const SAVE_KEY: &str = "lane_rush_save";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        highscores: HighScores,
        input: TickInput,
        last_time: f64,
        /// Status snapshot from the previous frame, for transition detection
        last_status: GameStatus,
        /// Where the active touch started, for swipe detection
        touch_start: Option<(f32, f32)>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed),
                settings: Settings::load(),
                highscores: HighScores::load(),
                input: TickInput::default(),
                last_time: 0.0,
                last_status: GameStatus::Menu,
                touch_start: None,
            }
        }

        /// Run one frame of simulation
        fn update(&mut self, time_ms: f64) {
            let dt = if self.last_time > 0.0 {
                (((time_ms - self.last_time) / 1000.0) as f32).clamp(0.0, MAX_TICK_DT)
            } else {
                0.0
            };
            self.last_time = time_ms;

            let input = self.input;
            tick(&mut self.state, &input, dt);

            // Clear one-shot intents after processing
            self.input = TickInput::default();

            self.handle_transitions(time_ms);
            self.emit_effects();
        }

        /// React to status changes since the previous frame
        fn handle_transitions(&mut self, time_ms: f64) {
            let status = self.state.status;
            if status == self.last_status {
                return;
            }
            match status {
                GameStatus::Shop => self.save_run(),
                GameStatus::GameOver | GameStatus::Victory => {
                    let entry = HighScoreEntry {
                        score: self.state.score,
                        level: self.state.level,
                        distance: self.state.distance,
                        mode: self.state.mode,
                        timestamp: time_ms,
                    };
                    if let Some(rank) = self.highscores.add_run(entry) {
                        log::info!("run placed #{rank} on the leaderboard");
                        self.highscores.save();
                    }
                    clear_saved_run();
                }
                _ => {}
            }
            self.last_status = status;
        }

        /// Forward simulation signals to the presentation layer
        fn emit_effects(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::PlayerHit { .. } => {
                        if self.settings.effective_screen_shake() {
                            pulse_class("game-area", "shake");
                        }
                    }
                    GameEvent::Burst { pos, color } => {
                        if self.settings.particles {
                            log::debug!("burst at ({:.1},{:.1},{:.1}) #{color:06x}", pos.x, pos.y, pos.z);
                        }
                    }
                }
            }
        }

        /// Mirror state into the DOM HUD
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            set_text(&document, "#hud-score .hud-value", &self.state.score.to_string());
            set_text(&document, "#hud-gems .hud-value", &self.state.gems.to_string());
            set_text(&document, "#hud-lives .hud-value", &self.state.lives.to_string());
            set_text(&document, "#hud-level .hud-value", &self.state.level.to_string());
            set_text(
                &document,
                "#hud-distance .hud-value",
                &format!("{:.0}", self.state.distance),
            );

            // Letter progress: collected letters bright, the rest dim
            let word = self.state.level_word();
            let progress: String = word
                .chars()
                .enumerate()
                .map(|(i, c)| if self.state.collected[i] { c } else { '·' })
                .collect();
            set_text(&document, "#hud-word", &progress);

            show_overlay(&document, "menu", self.state.status == GameStatus::Menu);
            show_overlay(&document, "shop", self.state.status == GameStatus::Shop);
            show_overlay(&document, "game-over", self.state.status == GameStatus::GameOver);
            show_overlay(&document, "victory", self.state.status == GameStatus::Victory);

            if self.state.status == GameStatus::GameOver {
                set_text(&document, "#final-score", &self.state.score.to_string());
                set_text(&document, "#final-distance", &format!("{:.0}", self.state.distance));
            }
        }

        /// Save the run snapshot to LocalStorage
        fn save_run(&self) {
            if let Ok(json) = serde_json::to_string(&self.state) {
                if let Some(storage) = local_storage() {
                    let _ = storage.set_item(SAVE_KEY, &json);
                    log::info!("run saved (level {})", self.state.level);
                }
            }
        }

        fn restart(&mut self, mode: GameMode) {
            self.state.start_run(mode);
            self.input = TickInput::default();
            self.last_status = self.state.status;
        }
    }

    fn local_storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
    }

    /// Load a saved run from LocalStorage
    fn load_saved_run() -> Option<GameState> {
        let json = local_storage()?.get_item(SAVE_KEY).ok()??;
        let mut state: GameState = serde_json::from_str(&json).ok()?;
        state.after_load();
        Some(state)
    }

    fn clear_saved_run() {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(SAVE_KEY);
        }
    }

    fn set_text(document: &web_sys::Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn show_overlay(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "overlay" } else { "overlay hidden" });
        }
    }

    /// Briefly re-apply a CSS class to retrigger its animation
    fn pulse_class(id: &str, class: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            let list = el.class_list();
            let _ = list.remove_1(class);
            let _ = list.add_1(class);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Lane Rush starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // Offer to continue a saved run
        if let Some(save) = load_saved_run() {
            if let Some(el) = document.get_element_by_id("continue-prompt") {
                let _ = el.set_attribute("class", "");
            }
            set_text(&document, "#continue-level", &save.level.to_string());
            set_text(&document, "#continue-score", &save.score.to_string());
            log::info!("Found saved run at level {}", save.level);

            let game_c = game.clone();
            setup_button(&document, "btn-continue", move || {
                if let Some(save) = load_saved_run() {
                    let mut g = game_c.borrow_mut();
                    g.state = save;
                    g.state.leave_shop();
                    g.last_status = g.state.status;
                }
            });
        }

        setup_input_handlers(&document, game.clone());
        setup_menu_buttons(&document, game.clone());
        setup_shop_buttons(&document, game.clone());

        request_animation_frame_loop(game);

        log::info!("Lane Rush running!");
    }

    fn setup_input_handlers(document: &Document, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" | "KeyA" => g.input.steer = -1,
                    "ArrowRight" | "KeyD" => g.input.steer = 1,
                    "ArrowUp" | "KeyW" | "Space" => g.input.jump = true,
                    "KeyI" => g.input.immortality = true,
                    _ => return,
                }
                event.prevent_default();
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: swipe left/right to change lanes, swipe up (or tap) to jump
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().item(0) {
                    game.borrow_mut().touch_start =
                        Some((touch.client_x() as f32, touch.client_y() as f32));
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                let Some((x0, y0)) = g.touch_start.take() else {
                    return;
                };
                let Some(touch) = event.changed_touches().item(0) else {
                    return;
                };
                let dx = touch.client_x() as f32 - x0;
                let dy = touch.client_y() as f32 - y0;
                let threshold = g.settings.swipe_threshold;
                if dx.abs() >= threshold && dx.abs() > dy.abs() {
                    g.input.steer = if dx > 0.0 { 1 } else { -1 };
                } else {
                    // Upward swipe or plain tap
                    g.input.jump = true;
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Reset the frame clock when the tab becomes visible again so the
        // first frame back does not see a giant delta
        {
            let game = game.clone();
            let document_c = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_c.visibility_state() == web_sys::VisibilityState::Visible {
                    game.borrow_mut().last_time = 0.0;
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn setup_button(document: &Document, id: &str, mut action: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                action();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        let g = game.clone();
        setup_button(document, "btn-story", move || {
            g.borrow_mut().restart(GameMode::Story);
        });
        let g = game.clone();
        setup_button(document, "btn-endless", move || {
            g.borrow_mut().restart(GameMode::Endless);
        });
        let g = game.clone();
        setup_button(document, "btn-restart", move || {
            g.borrow_mut().restart(GameMode::Story);
        });
        let g = game.clone();
        setup_button(document, "btn-continue-endless", move || {
            g.borrow_mut().state.continue_endless();
        });
    }

    fn setup_shop_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        let purchases: [(&str, fn(&mut GameState) -> bool); 5] = [
            ("shop-heal", GameState::buy_heal),
            ("shop-max-life", GameState::buy_max_life),
            ("shop-double-jump", GameState::buy_double_jump),
            ("shop-immortality", GameState::buy_immortality),
            ("shop-lane", GameState::buy_lane),
        ];
        for (id, buy) in purchases {
            let g = game.clone();
            setup_button(document, id, move || {
                let mut game = g.borrow_mut();
                if !buy(&mut game.state) {
                    log::debug!("purchase declined");
                }
            });
        }
        let g = game.clone();
        setup_button(document, "shop-leave", move || {
            g.borrow_mut().state.leave_shop();
        });
    }

    /// Drive update + HUD from requestAnimationFrame
    fn request_animation_frame_loop(game: Rc<RefCell<Game>>) {
        let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut(f64)>>));
        let callback_c = callback.clone();

        *callback.borrow_mut() = Some(Closure::new(move |time_ms: f64| {
            {
                let mut g = game.borrow_mut();
                g.update(time_ms);
                g.update_hud();
            }
            if let Some(window) = web_sys::window() {
                if let Some(cb) = callback_c.borrow().as_ref() {
                    let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
                }
            }
        }));

        if let Some(window) = web_sys::window() {
            if let Some(cb) = callback.borrow().as_ref() {
                let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lane_rush::sim::{GameMode, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Lane Rush (native) starting...");
    log::info!("The full game targets wasm32 - run with `trunk serve` for the web version");

    // Headless demo: autoplay a short run and report the outcome
    let mut state = GameState::new(0xC0FFEE);
    state.start_run(GameMode::Story);
    let input = TickInput::default();
    for _ in 0..3600 {
        tick(&mut state, &input, 1.0 / 60.0);
        state.drain_events();
    }
    println!(
        "demo run: status {:?}, score {}, gems {}, distance {:.0}",
        state.status, state.score, state.gems, state.distance
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
