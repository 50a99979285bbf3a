//! Skyhop entry point
//!
//! Browser: drives the game from an interval timer and the DOM.
//! Native: headless autopilot runner, `skyhop [sessions] [seed] [tuning.json]`.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, KeyboardEvent};

    use skyhop::persistence::{KeyValueStore, LocalStorage, MemoryStore};
    use skyhop::sim::PlayAreaMetrics;
    use skyhop::{Game, GameEvent, Snapshot, Tuning};

    /// Game instance plus host-side timing
    struct Host {
        game: Game<Box<dyn KeyValueStore>>,
        last_time: f64,
    }

    impl Host {
        /// Run one interval callback: advance, render, report game over
        fn frame(&mut self, document: &Document) {
            if let Some(metrics) = read_metrics(document) {
                self.game.set_metrics(metrics);
            }

            let now = js_sys::Date::now();
            self.game.advance(now - self.last_time);
            self.last_time = now;

            let events = self.game.drain_events();
            render(document, &self.game.snapshot());

            for event in events {
                if let Some(message) = event.message() {
                    if let Some(window) = web_sys::window() {
                        // Blocks until acknowledged; the run has already restarted
                        let _ = window.alert_with_message(&message);
                    }
                    // Time spent in the dialog is not simulated
                    self.last_time = js_sys::Date::now();
                } else if let GameEvent::Passed { score, .. } = event {
                    log::debug!("Score: {}", score);
                }
            }
        }
    }

    /// Current size of the game area element
    fn read_metrics(document: &Document) -> Option<PlayAreaMetrics> {
        let area: HtmlElement = document.get_element_by_id("gameArea")?.dyn_into().ok()?;
        Some(PlayAreaMetrics::new(
            area.offset_width() as f32,
            area.offset_height() as f32,
        ))
    }

    fn set_px(element: &HtmlElement, property: &str, value: f32) {
        let _ = element.style().set_property(property, &format!("{}px", value));
    }

    /// Mirror the snapshot into the DOM
    fn render(document: &Document, snapshot: &Snapshot) {
        if let Some(bird) = document
            .get_element_by_id("bird")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            set_px(&bird, "top", snapshot.avatar.top());
        }

        // Pipes are rebuilt from the snapshot every frame
        if let Ok(old) = document.query_selector_all(".pipe") {
            for i in 0..old.length() {
                if let Some(el) = old.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    el.remove();
                }
            }
        }
        if let Some(area) = document.get_element_by_id("gameArea") {
            for segment in &snapshot.segments {
                let Ok(el) = document.create_element("div") else {
                    continue;
                };
                el.set_class_name("pipe");
                if let Ok(pipe) = el.dyn_into::<HtmlElement>() {
                    set_px(&pipe, "left", segment.left());
                    set_px(&pipe, "top", segment.top());
                    set_px(&pipe, "width", segment.size.x);
                    set_px(&pipe, "height", segment.size.y);
                    let _ = area.append_child(&pipe);
                }
            }
        }

        if let Some(el) = document.get_element_by_id("score") {
            el.set_text_content(Some(&format!("Score: {}", snapshot.score)));
        }
        if let Some(el) = document.get_element_by_id("highScore") {
            el.set_text_content(Some(&format!("High Score: {}", snapshot.high_score)));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Skyhop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let tuning = Tuning::load();
        let interval_ms = tuning.sim_interval_ms.round() as i32;

        let store: Box<dyn KeyValueStore> = match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("LocalStorage unavailable ({}), high score won't persist", e);
                Box::new(MemoryStore::new())
            }
        };

        let seed = js_sys::Date::now() as u64;
        let mut game = match Game::new(tuning, store, seed) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Invalid tuning: {}", e);
                return;
            }
        };
        if let Some(metrics) = read_metrics(&document) {
            game.set_metrics(metrics);
        }
        game.start();

        let host = Rc::new(RefCell::new(Host {
            game,
            last_time: js_sys::Date::now(),
        }));

        setup_input_handlers(host.clone());
        start_interval(host, document, interval_ms);

        log::info!("Skyhop running!");
    }

    fn setup_input_handlers(host: Rc<RefCell<Host>>) {
        let window = web_sys::window().unwrap();
        // Any key jumps; the game ignores it while no run is listening
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: KeyboardEvent| {
            host.borrow_mut().game.jump();
        });
        let _ = window
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn start_interval(host: Rc<RefCell<Host>>, document: Document, interval_ms: i32) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut()>::new(move || {
            host.borrow_mut().frame(&document);
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            interval_ms,
        );
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use skyhop::persistence::{FileStore, KeyValueStore, MemoryStore};
    use skyhop::sim::autopilot;
    use skyhop::{Game, GameEvent, Tuning};

    env_logger::init();
    log::info!("Skyhop (native) starting in autopilot mode...");

    let args: Vec<String> = std::env::args().collect();
    let sessions: u32 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(3);
    let seed: u64 = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| skyhop::platform::now_ms() as u64);
    let tuning = match args.get(3) {
        Some(path) => match Tuning::load_file(std::path::Path::new(path)) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Bad tuning file {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let store: Box<dyn KeyValueStore> = match FileStore::in_data_dir() {
        Ok(store) => {
            log::info!("High score file: {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            log::warn!("No data dir ({}), high score won't persist", e);
            Box::new(MemoryStore::new())
        }
    };

    let frame_ms = tuning.sim_interval_ms;
    // Ten simulated minutes per run before giving up on the bot
    let max_frames = (sessions.max(1) as f64 * 600_000.0 / frame_ms) as u64;

    let mut game = match Game::new(tuning, store, seed) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            std::process::exit(1);
        }
    };
    game.start();

    let mut finished = 0;
    let mut frames = 0u64;
    while finished < sessions {
        if frames >= max_frames {
            log::warn!("Stopping after {} frames", frames);
            break;
        }
        frames += 1;

        if autopilot::wants_jump(game.session(), &game.metrics()) {
            game.jump();
        }
        game.advance(frame_ms);

        for event in game.drain_events() {
            match event {
                GameEvent::GameOver { .. } => {
                    finished += 1;
                    if let Some(message) = event.message() {
                        println!("[{}/{}] {}", finished, sessions, message);
                    }
                }
                GameEvent::Passed { score, .. } => log::debug!("Score: {}", score),
                GameEvent::Spawned { id } => log::trace!("Obstacle {} spawned", id),
                GameEvent::Started { .. } => {}
            }
        }
    }

    println!("Best score: {}", game.high_score());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
