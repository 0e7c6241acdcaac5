//! Blastroids entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use blastroids::platform::web::{self, CanvasSurface, DomAudio};
    use blastroids::platform::{load_config, resolve_seed};
    use blastroids::{Blastroids, GameConfig};

    /// Game instance holding all state
    struct Game {
        director: Blastroids,
        surface: CanvasSurface,
        audio: DomAudio,
        canvas: HtmlCanvasElement,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            self.director
                .frame(time, &mut self.surface, &mut self.audio);
        }

        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let viewport = web::window_viewport(&window);
            web::fit_canvas(&self.canvas, viewport);
            self.director.resize(viewport);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Logger level comes from the config, so warnings about the config
        // itself are emitted after init
        let json = web::config_json(&document);
        let level = json
            .as_deref()
            .and_then(|j| GameConfig::from_json(j).ok())
            .unwrap_or_default()
            .log_level();
        if console_log::init_with_level(level).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        let config = load_config(json.as_deref());

        log::info!("Blastroids starting...");

        let canvas = web::canvas_by_id(&document, "canvas").inspect_err(|e| {
            log::error!("Cannot start: {:?}", e);
        })?;
        let viewport = web::window_viewport(&window);
        web::fit_canvas(&canvas, viewport);

        let surface = CanvasSurface::new(&canvas, &document).inspect_err(|e| {
            log::error!("Cannot start: {:?}", e);
        })?;
        let audio = DomAudio::new(document.clone(), &config);

        let seed = resolve_seed(&config);
        let mut director = Blastroids::new(config, viewport, seed);
        director.start();
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            director,
            surface,
            audio,
            canvas,
        }));

        setup_input_handlers(&document, game.clone())?;
        setup_resize_handler(&window, game.clone())?;

        request_animation_frame(game);

        log::info!("Blastroids running!");
        Ok(())
    }

    fn setup_input_handlers(
        document: &web_sys::Document,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let body = document.body().ok_or("no body")?;

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().director.input_mut().key_down(&event.key());
            });
            body.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().director.input_mut().key_up(&event.key());
            });
            body.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let touches = web::touch_points(&event.changed_touches());
                let mut g = game.borrow_mut();
                let viewport = g.director.viewport();
                g.director.input_mut().touch_start(&touches, viewport);
            });
            body.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let touches = web::touch_points(&event.changed_touches());
                let mut g = game.borrow_mut();
                let viewport = g.director.viewport();
                g.director.input_mut().touch_move(&touches, viewport);
            });
            body.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch end / cancel
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let touches = web::touch_points(&event.changed_touches());
                game.borrow_mut().director.input_mut().touch_end(&touches);
            });
            body.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let touches = web::touch_points(&event.changed_touches());
                game.borrow_mut().director.input_mut().touch_cancel(&touches);
            });
            body.add_event_listener_with_callback(
                "touchcancel",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_resize_handler(
        window: &web_sys::Window,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use blastroids::audio::SilentAudio;
    use blastroids::platform::{load_config, resolve_seed};
    use blastroids::render::HeadlessSurface;
    use blastroids::{Blastroids, Viewport};

    env_logger::init();
    log::info!("Blastroids (native) starting...");
    log::info!("Native mode runs headless - build for wasm32 to play in the browser");

    let json = std::env::var("BLASTROIDS_CONFIG").ok();
    let config = load_config(json.as_deref());
    let seed = resolve_seed(&config);
    let viewport = Viewport::new(1280.0, 720.0);
    let mut surface = HeadlessSurface {
        width: viewport.width,
        height: viewport.height,
    };
    let mut audio = SilentAudio;

    let mut game = Blastroids::new(config, viewport, seed);
    game.start();

    // Ten seconds of 60 Hz frames with the trigger held
    game.input_mut().key_down(" ");
    for frame in 0..600 {
        game.frame(f64::from(frame) * 1000.0 / 60.0, &mut surface, &mut audio);
    }

    log::info!(
        "Seed {}: level {}, {} asteroids left, score {}",
        seed,
        game.level(),
        game.asteroid_count(),
        game.player().score
    );
}
