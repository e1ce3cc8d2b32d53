//! Asteroid Hunter entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, PointerEvent};

    use asteroid_hunter::cosmic::{Notice, NoticeKind};
    use asteroid_hunter::moon::CalendarDate;
    use asteroid_hunter::persistence::{KeyValueStore, default_store};
    use asteroid_hunter::{Driver, Theme};
    use asteroid_hunter::platform::{now_ms, time_seed};
    use asteroid_hunter::renderer::{CanvasPainter, Camera, Palette, Wireframe, build_draw_list};
    use asteroid_hunter::session::SessionPhase;
    use asteroid_hunter::settings::Settings;

    /// Everything the browser callbacks share
    struct App {
        driver: Driver,
        camera: Camera,
        painter: CanvasPainter,
        mesh: Wireframe,
        document: Document,
        /// Where settings changes are written
        store: Box<dyn KeyValueStore>,
        /// Phase shown by the HUD last frame
        shown_phase: Option<SessionPhase>,
        /// Notice ids currently in the DOM
        shown_notices: Vec<u64>,
        /// Game panel collapsed to its header
        minimized: bool,
    }

    impl App {
        /// Asteroid under a pointer event, if any
        fn pick(&self, event: &PointerEvent) -> Option<u32> {
            let rect = self.painter.canvas().get_bounding_client_rect();
            let pointer = Vec2::new(
                (event.client_x() as f64 - rect.left()) as f32,
                (event.client_y() as f64 - rect.top()) as f32,
            );
            self.camera.pick(self.driver.scene().field(), pointer, 1.0)
        }

        fn resize(&mut self) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let canvas = self.painter.canvas();
            let (w, h) = (canvas.client_width() as f64, canvas.client_height() as f64);
            if let Err(e) = self.painter.resize(w, h, dpr) {
                log::warn!("Canvas resize failed: {:?}", e);
            }
            self.camera.resize(w as f32, h as f32);
            self.driver.resize(self.camera.region());
        }

        fn render(&self) {
            let settings = self.driver.settings();
            let list = build_draw_list(
                self.driver.scene(),
                &self.camera,
                Palette::for_theme(settings.theme),
                settings.theme.is_dark(),
                settings.quality,
                &self.mesh,
                self.driver.scene_secs(),
            );
            if let Err(e) = self.painter.paint(&list) {
                log::warn!("Paint failed: {:?}", e);
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_class(&self, id: &str, class: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", class);
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            self.set_class(id, if hidden { "hidden" } else { "" });
        }

        fn layout_panels(&self, phase: SessionPhase) {
            self.set_hidden("start-panel", phase != SessionPhase::Idle);
            self.set_hidden("results-panel", phase != SessionPhase::Ended);
            let hud = match (phase, self.minimized) {
                (SessionPhase::Running, false) => "",
                (SessionPhase::Running, true) => "minimized",
                _ => "hidden",
            };
            self.set_class("game-hud", hud);
        }

        fn toggle_minimized(&mut self) {
            self.minimized = !self.minimized;
            self.layout_panels(self.driver.session().phase());
        }

        fn set_theme(&mut self, theme: Theme) {
            if self.driver.settings().theme == theme {
                return;
            }
            self.driver.set_theme(theme);
            self.save_settings();
        }

        fn toggle_theme(&mut self) {
            self.driver.toggle_theme();
            self.save_settings();
        }

        fn save_settings(&mut self) {
            if let Err(e) = self.driver.settings().save(self.store.as_mut()) {
                log::warn!("Could not persist settings: {}", e);
            }
            let dark = self.driver.settings().theme.is_dark();
            self.set_class("theme-toggle", if dark { "dark" } else { "light" });
        }

        /// Rebuild the toast list when its contents changed
        fn render_notices(&mut self) {
            let feed = self.driver.feed();
            let ids: Vec<u64> = feed.notices().iter().map(|n| n.id).collect();
            if ids == self.shown_notices {
                return;
            }
            let Some(container) = self.document.get_element_by_id("cosmic-notices") else {
                return;
            };
            container.set_inner_html("");
            for notice in feed.notices() {
                match notice_element(&self.document, notice) {
                    Ok(el) => {
                        let _ = container.append_child(&el);
                    }
                    Err(e) => log::warn!("Could not render notice: {:?}", e),
                }
            }
            self.shown_notices = ids;
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let session = self.driver.session();
            let phase = session.phase();
            self.set_text("game-time", &session.time_remaining().to_string());
            self.set_class(
                "game-time",
                if session.is_low_on_time() { "urgent" } else { "" },
            );
            self.set_text("game-score", &session.score().to_string());
            self.set_text("best-score", &session.best_score().to_string());

            if let Some(el) = self.document.get_element_by_id("game-progress") {
                let _ = el.set_attribute(
                    "style",
                    &format!("width: {:.1}%", session.time_fraction() * 100.0),
                );
            }

            if self.shown_phase != Some(phase) {
                self.layout_panels(phase);
                if let Some(outcome) = session.last_outcome() {
                    self.set_text("final-score", &outcome.score.to_string());
                    self.set_hidden("new-best", !outcome.new_best);
                }
                self.shown_phase = Some(phase);
            }

            self.render_notices();
        }
    }

    fn notice_class(kind: NoticeKind) -> &'static str {
        match kind {
            NoticeKind::MeteorShower => "cosmic-notice meteor-shower",
            NoticeKind::SpaceMilestone => "cosmic-notice space-milestone",
            NoticeKind::FunFact => "cosmic-notice fun-fact",
        }
    }

    /// `<div data-notice-id>` with the toast text and a close button
    fn notice_element(document: &Document, notice: &Notice) -> Result<Element, JsValue> {
        let el = document.create_element("div")?;
        el.set_attribute("class", notice_class(notice.event.kind))?;
        el.set_attribute("data-notice-id", &notice.id.to_string())?;

        let title = document.create_element("strong")?;
        title.set_text_content(Some(&format!("{} {}", notice.event.emoji, notice.event.title)));
        el.append_child(&title)?;

        let message = document.create_element("p")?;
        message.set_text_content(Some(&notice.event.message));
        el.append_child(&message)?;

        let close = document.create_element("button")?;
        close.set_attribute("class", "notice-dismiss")?;
        close.set_attribute("aria-label", "Dismiss")?;
        close.set_text_content(Some("\u{00D7}"));
        el.append_child(&close)?;
        Ok(el)
    }
    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Asteroid Hunter starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("hero-canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let painter = CanvasPainter::new(canvas.clone()).expect("no 2d context");

        let store = default_store();
        let settings = Settings::load(store.as_ref());
        let dark = settings.theme.is_dark();
        let mesh = Wireframe::icosphere(settings.quality.asteroid_detail());
        let seed = time_seed();
        let driver = Driver::new(settings, store, seed, now_ms(), CalendarDate::today());

        let phase = driver.moon_phase();
        let app = Rc::new(RefCell::new(App {
            driver,
            camera: Camera::new(canvas.client_width() as f32, canvas.client_height() as f32),
            painter,
            mesh,
            document: document.clone(),
            store: default_store(),
            shown_phase: None,
            shown_notices: Vec::new(),
            minimized: false,
        }));
        {
            let mut a = app.borrow_mut();
            a.resize();
            a.set_text("moon-phase", &format!("{} {}", phase.emoji(), phase.name()));
            a.set_class("theme-toggle", if dark { "dark" } else { "light" });
        }

        setup_pointer_handlers(&canvas, app.clone());
        setup_buttons(&document, app.clone());
        setup_notices(&document, app.clone());
        setup_color_scheme(app.clone());
        setup_visibility(&document, app.clone());
        setup_resize(app.clone());

        request_animation_frame(app);
        log::info!("Asteroid Hunter running!");
    }

    fn set_cursor(document: &Document, cursor: &str) {
        if let Some(body) = document.body() {
            let _ = body.style().set_property("cursor", cursor);
        }
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Hover
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut a = app.borrow_mut();
                let id = a.pick(&event);
                let cursor = a.driver.pointer_move(id);
                set_cursor(&a.document, cursor.as_css());
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut a = app.borrow_mut();
                if let Some(id) = a.pick(&event) {
                    event.stop_propagation();
                    a.driver.pointer_down(id);
                    let cursor = a.driver.pointer_move(None);
                    set_cursor(&a.document, cursor.as_css());
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, app: Rc<RefCell<App>>, action: fn(&mut App)) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                action(&mut app.borrow_mut());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        on_click(document, "start-btn", app.clone(), |a| a.driver.start(now_ms()));
        on_click(document, "play-again-btn", app.clone(), |a| a.driver.start(now_ms()));
        on_click(document, "close-results-btn", app.clone(), |a| a.driver.dismiss());
        on_click(document, "minimize-btn", app.clone(), App::toggle_minimized);
        on_click(document, "theme-toggle", app, App::toggle_theme);
    }

    /// One delegated listener closes whichever toast's button was clicked
    fn setup_notices(document: &Document, app: Rc<RefCell<App>>) {
        let Some(container) = document.get_element_by_id("cosmic-notices") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            if !matches!(target.closest(".notice-dismiss"), Ok(Some(_))) {
                return;
            }
            let id = target
                .closest("[data-notice-id]")
                .ok()
                .flatten()
                .and_then(|el| el.get_attribute("data-notice-id"))
                .and_then(|id| id.parse::<u64>().ok());
            if let Some(id) = id {
                app.borrow_mut().driver.dismiss_notice(id);
            }
        });
        let _ = container.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Follow the system light/dark preference when it changes
    fn setup_color_scheme(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(Some(query)) = window.match_media("(prefers-color-scheme: light)") else {
            return;
        };
        let query_clone = query.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let theme = if query_clone.matches() {
                Theme::Light
            } else {
                Theme::Dark
            };
            app.borrow_mut().set_theme(theme);
        });
        let _ = query.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_visibility(document: &Document, app: Rc<RefCell<App>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let visible = document_clone.visibility_state() == web_sys::VisibilityState::Visible;
            app.borrow_mut().driver.set_visible(visible, now_ms());
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
        {
            let mut a = app.borrow_mut();
            a.driver.frame(time);
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Asteroid Hunter (native) starting...");
    log::info!("Native mode runs a headless demo game - run with `trunk serve` for the web version");

    demo_game();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one game on a virtual clock, clicking at the lowest-id drifting
/// asteroid on screen every half second.
#[cfg(not(target_arch = "wasm32"))]
fn demo_game() {
    use asteroid_hunter::moon::CalendarDate;
    use asteroid_hunter::persistence::MemoryStore;
    use asteroid_hunter::renderer::{Camera, Palette, Wireframe, build_draw_list};
    use asteroid_hunter::{Driver, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    let settings = Settings::default();
    let camera = Camera::new(1280.0, 720.0);
    let mesh = Wireframe::icosphere(settings.quality.asteroid_detail());
    let seed = asteroid_hunter::platform::time_seed();
    let mut driver = Driver::new(
        settings,
        Box::new(MemoryStore::new()),
        seed,
        0.0,
        CalendarDate::today(),
    );
    driver.resize(camera.region());
    let phase = driver.moon_phase();
    println!("Moon tonight: {} {}", phase.emoji(), phase.name());

    driver.start(0.0);
    let mut now = 0.0;
    let mut frames = 0u64;
    let outcome = loop {
        now += FRAME_MS;
        frames += 1;
        if let Some(outcome) = driver.frame(now) {
            break outcome;
        }
        // Every 30 frames, click where the lowest-id drifting asteroid in view projects
        if frames % 30 == 0 {
            let target = driver
                .scene()
                .field()
                .asteroids
                .iter()
                .filter(|a| a.is_drifting())
                .filter_map(|a| camera.project(a.position))
                .next();
            if let Some(id) = target.and_then(|p| camera.pick(driver.scene().field(), p.pos, 1.0)) {
                driver.pointer_down(id);
            }
        }
    };

    let list = build_draw_list(
        driver.scene(),
        &camera,
        Palette::for_theme(driver.settings().theme),
        driver.settings().theme.is_dark(),
        driver.settings().quality,
        &mesh,
        driver.scene_secs(),
    );
    for notice in driver.feed().notices() {
        println!("{} {}: {}", notice.event.emoji, notice.event.title, notice.event.message);
    }
    println!(
        "Game over after {} frames: {} asteroids destroyed (best {}), last frame had {} draw commands",
        frames,
        outcome.score,
        outcome.best,
        list.len()
    );
}
