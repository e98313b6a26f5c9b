//! Portfolio FX entry point
//!
//! In the browser this wires page events into the overlay director and runs
//! the animation-frame loop while an overlay is mounted. Natively it runs a
//! short scripted session against the headless audio backend.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_host {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::convert::FromWasmAbi;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent};

    use portfolio_fx::audio::web::WebAudio;
    use portfolio_fx::consts::{FRAME_DT, MAX_FRAME_DT};
    use portfolio_fx::renderer::{RenderState, present};
    use portfolio_fx::{OverlayDirector, Settings, Viewport};

    /// Host state shared by every event handler
    struct App {
        director: OverlayDirector,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        document: Document,
        last_time: f64,
        /// An animation frame is pending
        running: bool,
    }

    impl App {
        /// Advance one animation frame and draw it
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (((time - self.last_time) / 1000.0) as f32).min(MAX_FRAME_DT)
            } else {
                FRAME_DT
            };
            self.last_time = time;

            if self.director.frame(dt).is_some() {
                self.render();
            }
        }

        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let result = match self.director.scene() {
                Some(scene) => render_state.render(&present(scene, self.director.viewport())),
                None => render_state.clear(),
            };
            match result {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => render_state.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Mirror director state onto the page
        fn sync_dom(&self) {
            let caption = self.director.caption();
            if let Some(el) = self.document.get_element_by_id("fx-caption") {
                el.set_text_content(caption.as_deref());
                let _ = el.set_attribute("class", if caption.is_some() { "" } else { "hidden" });
            }

            let shake = self.director.page_shake();
            if let Some(page) = html_element(&self.document, "page") {
                let transform = if shake == Vec2::ZERO {
                    String::new()
                } else {
                    format!("translate({:.1}px, {:.1}px)", shake.x, shake.y)
                };
                let _ = page.style().set_property("transform", &transform);
            }

            if let Some(body) = self.document.body() {
                let overflow = if self.director.scroll_locked() { "hidden" } else { "" };
                let _ = body.style().set_property("overflow", overflow);
                match self.director.scene() {
                    Some(scene) => {
                        let _ = body.set_attribute("data-overlay", scene.name());
                    }
                    None => {
                        let _ = body.remove_attribute("data-overlay");
                    }
                }
            }

            let active = !self.director.active().is_none();
            let _ = self
                .canvas
                .set_attribute("class", if active { "fx-active" } else { "" });
        }

        /// Match the canvas backing store to its CSS size
        fn fit_canvas(&mut self) -> Viewport {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let client_w = self.canvas.client_width().max(1);
            let client_h = self.canvas.client_height().max(1);
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);

            let viewport = Viewport::new(client_w as f32, client_h as f32);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height, viewport);
            }
            viewport
        }
    }

    fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn prefers_reduced_motion() -> bool {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
            .is_some_and(|mq| mq.matches())
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Portfolio FX starting...");

        let Some(window) = web_sys::window() else {
            log::error!("no window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("no document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("fx-canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("no #fx-canvas element");
            return;
        };

        let mut settings = Settings::load();
        if prefers_reduced_motion() {
            settings.reduced_motion = true;
        }

        let seed = js_sys::Date::now() as u64;
        let director = OverlayDirector::new(
            settings,
            Viewport::default(),
            Box::new(WebAudio::new()),
            seed,
        );
        let mut app = App {
            director,
            render_state: None,
            canvas: canvas.clone(),
            document: document.clone(),
            last_time: 0.0,
            running: false,
        };
        let viewport = app.fit_canvas();
        app.director.resize(viewport);
        log::info!("Director initialized with seed: {}", seed);

        app.render_state = init_gpu(&canvas, viewport).await;
        let app = Rc::new(RefCell::new(app));

        setup_input_handlers(&window, &document, &canvas, &app);
        app.borrow().sync_dom();

        log::info!("Portfolio FX ready");
    }

    /// A missing GPU only disables drawing; triggers and audio keep working
    async fn init_gpu(canvas: &HtmlCanvasElement, viewport: Viewport) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::warn!("Failed to create surface: {e}");
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::warn!("Failed to get adapter: {e}");
                return None;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, canvas.width(), canvas.height(), viewport).await {
            Ok(state) => Some(state),
            Err(e) => {
                log::warn!("Failed to create device: {e}");
                None
            }
        }
    }

    /// Register `handler` for `kind` events on `target`
    fn listen<E>(target: &EventTarget, kind: &str, handler: impl FnMut(E) + 'static)
    where
        E: FromWasmAbi + 'static,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Run `f` against the director, then refresh the page and the frame loop
    fn dispatch(app: &Rc<RefCell<App>>, f: impl FnOnce(&mut OverlayDirector)) {
        {
            let mut a = app.borrow_mut();
            f(&mut a.director);
            a.sync_dom();
        }
        ensure_running(app);
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        document: &Document,
        canvas: &HtmlCanvasElement,
        app: &Rc<RefCell<App>>,
    ) {
        // Keyboard
        {
            let app = app.clone();
            listen(window, "keydown", move |event: web_sys::KeyboardEvent| {
                let key = event.key();
                dispatch(&app, |d| {
                    if let Some(trigger) = d.key_down(&key) {
                        log::info!("Trigger matched: {trigger:?}");
                    }
                });
            });
        }

        // Pointer
        {
            let app = app.clone();
            listen(window, "mousemove", move |event: MouseEvent| {
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                let now = event.time_stamp() / 1000.0;
                app.borrow_mut().director.pointer_move(pos, now);
            });
        }
        {
            let app = app.clone();
            listen(window, "touchmove", move |event: web_sys::TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    let now = event.time_stamp() / 1000.0;
                    app.borrow_mut().director.pointer_move(pos, now);
                }
            });
        }

        // Click on the overlay itself
        {
            let app = app.clone();
            listen(canvas, "click", move |_event: MouseEvent| {
                dispatch(&app, OverlayDirector::click);
            });
        }

        if let Some(btn) = document.get_element_by_id("dice-btn") {
            let app = app.clone();
            listen(&btn, "click", move |_event: MouseEvent| {
                dispatch(&app, OverlayDirector::roll_dice);
            });
        }

        if let Some(title) = document.get_element_by_id("skills-title") {
            let app = app.clone();
            listen(&title, "click", move |_event: MouseEvent| {
                dispatch(&app, OverlayDirector::skills_title_click);
            });
        }

        if let Some(btn) = document.get_element_by_id("fx-mute") {
            let app = app.clone();
            listen(&btn, "click", move |_event: MouseEvent| {
                dispatch(&app, |d| {
                    let mut settings = d.settings().clone();
                    settings.muted = !settings.muted;
                    settings.save();
                    log::info!("Muted: {}", settings.muted);
                    d.set_settings(settings);
                });
            });
        }

        for el in query_all(document, "[data-effect]") {
            let Some(id) = el.get_attribute("data-effect") else {
                continue;
            };
            let app = app.clone();
            listen(&el, "click", move |_event: MouseEvent| {
                dispatch(&app, |d| d.trigger_effect(&id));
            });
        }

        for el in query_all(document, ".fx-close") {
            let app = app.clone();
            listen(&el, "click", move |event: MouseEvent| {
                event.stop_propagation();
                dispatch(&app, OverlayDirector::close_button);
            });
        }

        // Resize
        {
            let app = app.clone();
            listen(window, "resize", move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                let viewport = a.fit_canvas();
                a.director.resize(viewport);
            });
        }
    }

    fn query_all(document: &Document, selector: &str) -> Vec<Element> {
        let Ok(nodes) = document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    /// Start the frame loop if an overlay wants frames and none is pending
    fn ensure_running(app: &Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            if a.running || !a.director.wants_frames() {
                return;
            }
            a.running = true;
            a.last_time = 0.0;
        }
        request_animation_frame(app.clone());
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        let keep_going = {
            let mut a = app.borrow_mut();
            a.frame(time);
            let keep_going = a.director.wants_frames();
            if !keep_going {
                // Overlay closed itself; blank the canvas and stop
                a.running = false;
                a.render();
            }
            a.sync_dom();
            keep_going
        };

        if keep_going {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_host::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Portfolio FX (native) starting...");
    log::info!("The browser build is the real target; running a headless session");

    headless_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive a few overlays without a page, logging what the visitor would see
#[cfg(not(target_arch = "wasm32"))]
fn headless_session() {
    use portfolio_fx::audio::HeadlessAudio;
    use portfolio_fx::consts::FRAME_DT;
    use portfolio_fx::gesture::KONAMI;
    use portfolio_fx::renderer::present;
    use portfolio_fx::{OverlayDirector, Settings, Viewport};

    let audio = HeadlessAudio::new();
    let mut director = OverlayDirector::new(
        Settings::load(),
        Viewport::default(),
        Box::new(audio.clone()),
        0x5eed,
    );

    let run = |director: &mut OverlayDirector, frames: usize| {
        let mut drawn = 0;
        for _ in 0..frames {
            if director.frame(FRAME_DT).is_none() {
                break;
            }
            if let Some(scene) = director.scene() {
                drawn = present(scene, director.viewport()).vertices.len();
            }
        }
        drawn
    };

    for key in KONAMI {
        director.key_down(key);
    }
    let vertices = run(&mut director, 200);
    log::info!("{:?}: {} vertices after 200 frames", director.active(), vertices);
    director.click();

    director.roll_dice();
    run(&mut director, 120);
    println!("{}", director.caption().unwrap_or_default());
    director.click();

    for c in "goat".chars() {
        director.key_down(&c.to_string());
    }
    run(&mut director, 600);
    log::info!("Goat closed: {:?}", director.last_closed());

    log::info!("Audio events: {}", audio.events().len());
}
