//! Sky Strike entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, HtmlImageElement,
        KeyboardEvent, TouchEvent,
    };

    use sky_strike::SimError;
    use sky_strike::consts::{
        ARENA_MAX_HEIGHT, ARENA_WIDTH, GAME_OVER_ELEMENT_IDS, PLAY_AGAIN_ELEMENT_ID,
        PORTRAIT_WARNING_ELEMENT_ID, SCORE_ELEMENT_ID,
    };
    use sky_strike::input::{InputMode, Joystick, KeyboardInput, TickInput, TouchInput};
    use sky_strike::render::{self, ImageId, Scene};
    use sky_strike::sim::{Arena, Session};
    use sky_strike::tuning::Tuning;

    const JOYSTICK_RADIUS: f32 = 50.0;

    /// Game instance holding all state
    struct Game {
        session: Session,
        keyboard: KeyboardInput,
        touch: TouchInput,
        ctx: CanvasRenderingContext2d,
        images: HashMap<ImageId, HtmlImageElement>,
        last_time: f64,
        // Last values pushed to the DOM
        shown_score: Option<u64>,
        shown_over: bool,
    }

    impl Game {
        fn sample_input(&self) -> TickInput {
            match self.session.input_mode() {
                InputMode::Digital => TickInput::sample(&self.keyboard, InputMode::Digital),
                InputMode::Analog => TickInput::sample(&self.touch, InputMode::Analog),
            }
        }

        /// Step and paint one frame. An error here is fatal for the loop.
        fn frame(&mut self, time: f64) -> Result<(), SimError> {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            if self.session.is_idle() {
                return Ok(());
            }

            let input = self.sample_input();
            self.session.step(&input, dt);
            self.draw(&self.session.scene())?;
            self.update_hud();
            Ok(())
        }

        fn draw(&self, scene: &Scene) -> Result<(), SimError> {
            let terrain = render::resolve(&self.images, scene.background)?;
            if let Ok(Some(pattern)) = self
                .ctx
                .create_pattern_with_html_image_element(terrain, "repeat")
            {
                self.ctx.set_fill_style_canvas_pattern(&pattern);
            }
            self.ctx.fill_rect(
                0.0,
                0.0,
                scene.arena_size.x as f64,
                scene.arena_size.y as f64,
            );

            for cmd in &scene.commands {
                let image = render::resolve(&self.images, cmd.image)?;
                let src = cmd.src;
                let _ = self
                    .ctx
                    .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                        image,
                        src.x as f64,
                        src.y as f64,
                        src.w as f64,
                        src.h as f64,
                        cmd.pos.x.round() as f64,
                        cmd.pos.y.round() as f64,
                        src.w as f64,
                        src.h as f64,
                    );
            }
            Ok(())
        }

        /// Update score text and game-over overlay in the DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let score = self.session.score();
            if self.shown_score != Some(score) {
                if let Some(el) = document.get_element_by_id(SCORE_ELEMENT_ID) {
                    el.set_text_content(Some(&score.to_string()));
                }
                self.shown_score = Some(score);
            }

            let over = self.session.is_over();
            if over != self.shown_over {
                let display = if over { "block" } else { "none" };
                for id in GAME_OVER_ELEMENT_IDS {
                    set_display(&document, id, display);
                }
                self.shown_over = over;
            }
        }

        /// Restart from the play-again button
        fn restart(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.session.restart(seed);
            self.keyboard.clear();
            self.touch.clear();
            log::info!("Game restarted with seed: {}", self.session.seed());
        }
    }

    fn set_display(document: &web_sys::Document, id: &str, display: &str) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property("display", display);
        }
    }

    fn is_portrait(window: &web_sys::Window) -> bool {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        h > w
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sky Strike starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .expect("create canvas")
            .dyn_into()
            .expect("not a canvas");
        let viewport_h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(ARENA_MAX_HEIGHT as f64) as f32;
        let arena = Arena::for_viewport(viewport_h);
        canvas.set_width(ARENA_WIDTH as u32);
        canvas.set_height(arena.height as u32);
        document
            .body()
            .expect("no body")
            .append_child(&canvas)
            .expect("append canvas");

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("get_context failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        // Touch devices steer with the joystick; everything else with keys
        let has_touch = js_sys::Reflect::has(&window, &JsValue::from_str("ontouchstart"))
            .unwrap_or(false);
        let input_mode = if has_touch {
            InputMode::Analog
        } else {
            InputMode::Digital
        };

        let seed = js_sys::Date::now() as u64;
        let session = match Session::new(arena, Tuning::default(), input_mode, seed) {
            Ok(session) => session,
            Err(err) => {
                log::error!("Failed to start session: {}", err);
                return;
            }
        };

        let joystick_center = Vec2::new(
            JOYSTICK_RADIUS + 20.0,
            viewport_h - JOYSTICK_RADIUS - 20.0,
        );

        // Load every image before the first frame
        let pending = Rc::new(Cell::new(ImageId::ALL.len()));
        let mut images = HashMap::new();
        let game: Rc<RefCell<Option<Game>>> = Rc::new(RefCell::new(None));

        for id in ImageId::ALL {
            let img = HtmlImageElement::new().expect("create image");
            let pending = pending.clone();
            let game = game.clone();
            let onload = Closure::<dyn FnMut()>::new(move || {
                pending.set(pending.get() - 1);
                if pending.get() == 0 {
                    log::info!("Assets loaded");
                    start(game.clone());
                }
            });
            img.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();
            img.set_src(id.path());
            images.insert(id, img);
        }

        *game.borrow_mut() = Some(Game {
            session,
            keyboard: KeyboardInput::new(),
            touch: TouchInput::new(Joystick::new(joystick_center, JOYSTICK_RADIUS)),
            ctx,
            images,
            last_time: 0.0,
            shown_score: None,
            shown_over: false,
        });

        setup_keyboard(game.clone());
        setup_touch(&canvas, game.clone());
        setup_restart_button(game.clone());
        setup_orientation(game);
    }

    fn start(game: Rc<RefCell<Option<Game>>>) {
        {
            let mut slot = game.borrow_mut();
            let Some(g) = slot.as_mut() else {
                return;
            };
            if let Some(window) = web_sys::window() {
                if is_portrait(&window) {
                    g.session.suspend();
                    set_display_by_id(PORTRAIT_WARNING_ELEMENT_ID, "block");
                }
            }
        }
        request_animation_frame(game);
        log::info!("Sky Strike running!");
    }

    fn set_display_by_id(id: &str, display: &str) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            set_display(&document, id, display);
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Option<Game>>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Option<Game>>>, time: f64) {
        {
            let mut slot = game.borrow_mut();
            let Some(g) = slot.as_mut() else {
                return;
            };
            if let Err(err) = g.frame(time) {
                log::error!("Frame failed, stopping loop: {}", err);
                return;
            }
        }

        request_animation_frame(game);
    }

    fn setup_keyboard(game: Rc<RefCell<Option<Game>>>) {
        let window = web_sys::window().unwrap();

        for (event, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(g) = game.borrow_mut().as_mut() {
                    if g.keyboard.set_key(&event.key(), pressed) {
                        event.prevent_default();
                    }
                }
            });
            let _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key-up events never arrive once focus is gone
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            if let Some(g) = game.borrow_mut().as_mut() {
                g.keyboard.clear();
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_touch(canvas: &HtmlCanvasElement, game: Rc<RefCell<Option<Game>>>) {
        let target = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
            .map(|b| b.unchecked_into::<web_sys::EventTarget>())
            .unwrap_or_else(|| canvas.clone().unchecked_into());

        // Fingers are tracked by identifier: left half steers, right half fires
        for event in ["touchstart", "touchmove", "touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |ev: TouchEvent| {
                ev.prevent_default();
                let width = web_sys::window()
                    .and_then(|w| w.inner_width().ok())
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0) as f32;
                let mut slot = game.borrow_mut();
                let Some(g) = slot.as_mut() else {
                    return;
                };
                let touches = ev.changed_touches();
                for i in 0..touches.length() {
                    let Some(touch) = touches.get(i) else {
                        continue;
                    };
                    let id = touch.identifier();
                    let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    match event {
                        "touchstart" => g.touch.touch_start(id, pos, width),
                        "touchmove" => g.touch.touch_move(id, pos),
                        _ => g.touch.touch_end(id),
                    }
                }
            });
            let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Option<Game>>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id(PLAY_AGAIN_ELEMENT_ID) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                if let Some(g) = game.borrow_mut().as_mut() {
                    g.restart();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Portrait orientation suspends the session; turning back starts over
    fn setup_orientation(game: Rc<RefCell<Option<Game>>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let portrait = is_portrait(&window);
            let mut slot = game.borrow_mut();
            let Some(g) = slot.as_mut() else {
                return;
            };
            if portrait && !g.session.is_idle() {
                g.session.suspend();
                set_display_by_id(PORTRAIT_WARNING_ELEMENT_ID, "block");
            } else if !portrait && g.session.is_idle() {
                g.session.resume();
                g.last_time = 0.0;
                set_display_by_id(PORTRAIT_WARNING_ELEMENT_ID, "none");
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
fn main() {
    env_logger::init();
    log::info!("Sky Strike (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    soak_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless session at 60 Hz with a scripted pilot, to exercise the
/// simulation outside the browser
#[cfg(not(target_arch = "wasm32"))]
fn soak_run() {
    use sky_strike::input::{Direction, InputMode, InputSource, KeyboardInput, TickInput};
    use sky_strike::sim::{Arena, Session};
    use sky_strike::tuning::Tuning;

    const DT: f32 = 1.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 120;

    let mut session = match Session::new(Arena::default(), Tuning::default(), InputMode::Digital, 7)
    {
        Ok(session) => session,
        Err(err) => {
            log::error!("Failed to start session: {}", err);
            std::process::exit(1);
        }
    };

    let mut keys = KeyboardInput::new();
    keys.set_key(" ", true);

    let mut frames = 0;
    while frames < MAX_FRAMES && !session.is_over() {
        // Sweep up and down every two seconds
        let going_up = (frames / 120) % 2 == 0;
        keys.set_key("ArrowUp", going_up);
        keys.set_key("ArrowDown", !going_up);
        debug_assert_eq!(keys.is_direction_active(Direction::Up), going_up);

        let input = TickInput::sample(&keys, session.input_mode());
        session.step(&input, DT);
        frames += 1;
    }

    let scene = session.scene();
    log::info!(
        "Soak run finished after {:.1}s: score {}, game over {}, {} sprites on screen",
        session.state.game_time,
        session.score(),
        session.is_over(),
        scene.commands.len()
    );
    println!(
        "score={} time={:.1}s over={}",
        session.score(),
        session.state.game_time,
        session.is_over()
    );
}
