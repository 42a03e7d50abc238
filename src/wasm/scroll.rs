//! DOM side of the horizontal scroll: binds the track, feeds input into
//! [`ScrollPhysics`] and paints each frame back onto the page.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use log::{debug, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Event, HtmlElement, KeyboardEvent, TouchEvent, WheelEvent, Window};

use super::loader::MediaLoader;
use super::render::{FrameLoop, Surface};
use super::signal::{self, ClassWatch};
use crate::config::ScrollConfig;
use crate::error::ConfigError;
use crate::physics::{KeyNav, ScrollPhysics, ScrollState};

const TRACK_ID: &str = "scroll-track";
const WRAPPER_ID: &str = "scroll-wrapper";
const CONTACT_ID: &str = "nav-contact";
const HINT_ID: &str = "scroll-tip";
const BRAND_SELECTOR: &str = ".nav-brand";
const ENABLED_CLASS: &str = "scroll-enabled";

/// Emitted when the contact shortcut asks the intro to get out of the way.
pub const SKIP_INTRO_EVENT: &str = "skip-intro";
/// Emitted by the intro once the hero tagline has finished animating.
pub const TAGLINE_EVENT: &str = "tagline-complete";
/// JSON overrides for [`ScrollConfig`] on the wrapper element.
pub const CONFIG_ATTR: &str = "data-scroll-config";

/// Reads the page's config overrides. Absent overrides yield the defaults.
pub fn page_config(document: &Document) -> Result<ScrollConfig, ConfigError> {
    match document
        .get_element_by_id(WRAPPER_ID)
        .and_then(|wrapper| wrapper.get_attribute(CONFIG_ATTR))
    {
        Some(raw) => ScrollConfig::from_json(&raw),
        None => Ok(ScrollConfig::default()),
    }
}

/// Horizontal scroll controller for one track.
///
/// Mounting against a document without `#scroll-track` and `#scroll-wrapper`
/// produces an inert controller whose methods do nothing.
pub struct HorizontalScroll {
    controller: Option<Rc<Controller>>,
}

impl HorizontalScroll {
    /// Binds the track and registers the contact shortcut. Input stays off
    /// until [`init`](Self::init) sees the page enable scrolling.
    pub fn mount(document: &Document, config: ScrollConfig) -> Self {
        let controller = Controller::bind(document, config);
        match &controller {
            Some(controller) => controller.bind_contact_link(),
            None => debug!("#{TRACK_ID} or #{WRAPPER_ID} missing, horizontal scroll inert"),
        }
        Self { controller }
    }

    /// Starts now if `body.scroll-enabled` is already set, otherwise once it appears.
    pub fn init(&self) {
        if let Some(controller) = &self.controller {
            controller.init();
        }
    }

    pub fn is_inert(&self) -> bool {
        self.controller.is_none()
    }

    pub fn is_enabled(&self) -> bool {
        self.controller
            .as_ref()
            .is_some_and(|c| c.physics.borrow().is_enabled())
    }

    pub fn state(&self) -> Option<ScrollState> {
        self.controller.as_ref().map(|c| c.physics.borrow().state())
    }

    /// Runs one frame immediately, outside the animation loop.
    pub fn step_frame(&self) {
        if let Some(controller) = &self.controller {
            controller.on_frame();
        }
    }

    /// Cancels the frame loop and removes every listener, timer and watch.
    pub fn teardown(mut self) {
        if let Some(controller) = self.controller.take() {
            controller.shutdown();
        }
    }
}

struct Controller {
    window: Window,
    document: Document,
    surface: Surface,
    physics: RefCell<ScrollPhysics>,
    loader: MediaLoader,
    listeners: RefCell<Vec<EventListener>>,
    contact: RefCell<Option<EventListener>>,
    enable_watch: RefCell<Option<ClassWatch>>,
    frame_loop: RefCell<Option<FrameLoop>>,
    timers: RefCell<Vec<Timeout>>,
    pending_jump: RefCell<Option<Timeout>>,
    tagline: RefCell<Option<EventListener>>,
    hint_fired: Cell<bool>,
}

impl Controller {
    fn bind(document: &Document, config: ScrollConfig) -> Option<Rc<Self>> {
        let window = web_sys::window()?;
        let track = html_element(document, TRACK_ID)?;
        document.get_element_by_id(WRAPPER_ID)?;

        let brand = document
            .query_selector(BRAND_SELECTOR)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let hint = html_element(document, HINT_ID);

        let viewport = viewport_width(&window);
        let max_scroll = f64::from(track.scroll_width()) - viewport;
        let physics = ScrollPhysics::new(config, viewport, max_scroll);

        Some(Rc::new(Self {
            window,
            document: document.clone(),
            surface: Surface { track, brand, hint },
            physics: RefCell::new(physics),
            loader: MediaLoader::new(),
            listeners: RefCell::new(Vec::new()),
            contact: RefCell::new(None),
            enable_watch: RefCell::new(None),
            frame_loop: RefCell::new(None),
            timers: RefCell::new(Vec::new()),
            pending_jump: RefCell::new(None),
            tagline: RefCell::new(None),
            hint_fired: Cell::new(false),
        }))
    }

    fn init(self: &Rc<Self>) {
        let Some(body) = self.document.body() else {
            warn!("document has no body, horizontal scroll not started");
            return;
        };
        if body.class_list().contains(ENABLED_CLASS) {
            self.start();
            return;
        }

        let weak = Rc::downgrade(self);
        match ClassWatch::once(&body, ENABLED_CLASS, move || {
            if let Some(controller) = weak.upgrade() {
                controller.start();
            }
        }) {
            Ok(watch) => *self.enable_watch.borrow_mut() = Some(watch),
            Err(err) => {
                warn!("cannot watch body class ({err:?}), starting immediately");
                self.start();
            }
        }
    }

    fn start(self: &Rc<Self>) {
        if !self.physics.borrow_mut().enable() {
            return;
        }
        if let Some(watch) = self.enable_watch.borrow().as_ref() {
            watch.disconnect();
        }
        info!("horizontal scroll enabled");

        self.bind_events();

        let margin = self.physics.borrow().config().preload_margin_px;
        if let Err(err) = self
            .loader
            .observe_scroll_images(&self.surface.track, margin)
        {
            warn!("lazy image preload unavailable: {err:?}");
        }

        self.arm_hint();
        self.arm_settle();

        let weak = Rc::downgrade(self);
        match FrameLoop::start(self.window.clone(), move || {
            if let Some(controller) = weak.upgrade() {
                controller.on_frame();
            }
        }) {
            Ok(frame_loop) => *self.frame_loop.borrow_mut() = Some(frame_loop),
            Err(err) => warn!("could not start frame loop: {err:?}"),
        }
    }

    fn bind_events(self: &Rc<Self>) {
        let listeners = vec![
            self.listen("resize", true, |c, _| c.on_resize()),
            self.listen("wheel", false, Self::on_wheel),
            self.listen("touchstart", true, Self::on_touch_start),
            self.listen("touchmove", true, Self::on_touch_move),
            self.listen("touchend", true, |c, _| c.physics.borrow_mut().touch_end()),
            self.listen("keydown", false, Self::on_key),
        ];
        *self.listeners.borrow_mut() = listeners;
    }

    fn listen(
        self: &Rc<Self>,
        event_type: &'static str,
        passive: bool,
        handler: impl Fn(&Self, &Event) + 'static,
    ) -> EventListener {
        let options = if passive {
            EventListenerOptions::default()
        } else {
            EventListenerOptions::enable_prevent_default()
        };
        let weak = Rc::downgrade(self);
        EventListener::new_with_options(&self.window, event_type, options, move |event| {
            if let Some(controller) = weak.upgrade() {
                handler(&*controller, event);
            }
        })
    }

    fn bind_contact_link(self: &Rc<Self>) {
        let Some(link) = self.document.get_element_by_id(CONTACT_ID) else {
            return;
        };
        let weak = Rc::downgrade(self);
        let listener = EventListener::new_with_options(
            &link,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                if let Some(controller) = weak.upgrade() {
                    controller.contact_shortcut();
                }
            },
        );
        *self.contact.borrow_mut() = Some(listener);
    }

    /// Skips the intro and glides to the end of the track.
    fn contact_shortcut(self: &Rc<Self>) {
        if let Err(err) = signal::emit(&self.window, SKIP_INTRO_EVENT) {
            warn!("failed to dispatch {SKIP_INTRO_EVENT}: {err:?}");
        }
        if let Some(hint) = &self.surface.hint {
            if let Err(err) = suppress(hint) {
                warn!("failed to hide scroll hint: {err:?}");
            }
        }
        self.start();

        let delay = self.physics.borrow().config().contact_scroll_delay_ms;
        let weak = Rc::downgrade(self);
        let jump = Timeout::new(delay, move || {
            if let Some(controller) = weak.upgrade() {
                controller.refresh_bounds();
                controller.physics.borrow_mut().jump_to_end();
                debug!("contact shortcut: scrolling to end");
            }
        });
        // Replacing a pending jump cancels it.
        *self.pending_jump.borrow_mut() = Some(jump);
    }

    fn arm_hint(self: &Rc<Self>) {
        let delay = self.physics.borrow().config().hint_delay_ms;
        let weak = Rc::downgrade(self);
        let timer = Timeout::new(delay, move || {
            if let Some(controller) = weak.upgrade() {
                controller.reveal_hint();
            }
        });
        self.timers.borrow_mut().push(timer);

        let weak = Rc::downgrade(self);
        let listener = signal::once(&self.window, TAGLINE_EVENT, move || {
            if let Some(controller) = weak.upgrade() {
                controller.reveal_hint();
            }
        });
        *self.tagline.borrow_mut() = Some(listener);
    }

    fn arm_settle(self: &Rc<Self>) {
        let delay = self.physics.borrow().config().settle_delay_ms;
        let weak = Rc::downgrade(self);
        let timer = Timeout::new(delay, move || {
            if let Some(controller) = weak.upgrade() {
                controller.physics.borrow_mut().settle();
            }
        });
        self.timers.borrow_mut().push(timer);
    }

    /// One-shot: whichever of the hint timer and the tagline event comes first.
    fn reveal_hint(&self) {
        if self.hint_fired.replace(true) {
            return;
        }
        let Some(hint) = &self.surface.hint else {
            return;
        };
        if !self.physics.borrow().hint_eligible() {
            return;
        }
        let style = hint.style();
        if style.get_property_value("display").ok().as_deref() == Some("none") {
            return;
        }
        match style.set_property("opacity", "1") {
            Ok(()) => self.physics.borrow_mut().rearm_hint_dismissal(),
            Err(err) => warn!("failed to reveal scroll hint: {err:?}"),
        }
    }

    fn on_frame(&self) {
        let frame = self.physics.borrow_mut().step();
        if let Some(frame) = frame {
            if let Err(err) = self.surface.paint(&frame) {
                warn!("failed to paint scroll frame: {err:?}");
            }
        }
    }

    fn on_resize(&self) {
        let viewport = viewport_width(&self.window);
        let max_scroll = f64::from(self.surface.track.scroll_width()) - viewport;
        let mobile = {
            let mut physics = self.physics.borrow_mut();
            physics.resize(viewport, max_scroll);
            physics.is_mobile()
        };
        if mobile {
            if let Err(err) = self.surface.reset_track() {
                warn!("failed to reset track transform: {err:?}");
            }
        }
    }

    fn on_wheel(&self, event: &Event) {
        let Some(event) = event.dyn_ref::<WheelEvent>() else {
            return;
        };
        self.refresh_bounds();
        if self.physics.borrow_mut().wheel(event.delta_y()) {
            event.prevent_default();
        }
    }

    fn on_touch_start(&self, event: &Event) {
        if let Some((x, y)) = first_touch(event) {
            self.physics.borrow_mut().touch_start(x, y);
        }
    }

    fn on_touch_move(&self, event: &Event) {
        if let Some((x, y)) = first_touch(event) {
            self.refresh_bounds();
            self.physics.borrow_mut().touch_move(x, y);
        }
    }

    fn on_key(&self, event: &Event) {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let Some(nav) = KeyNav::from_key(&event.key()) else {
            return;
        };
        self.refresh_bounds();
        if self.physics.borrow_mut().key(nav) {
            event.prevent_default();
        }
    }

    fn refresh_bounds(&self) {
        let max_scroll =
            f64::from(self.surface.track.scroll_width()) - viewport_width(&self.window);
        self.physics.borrow_mut().set_max_scroll(max_scroll);
    }

    fn shutdown(&self) {
        self.frame_loop.borrow_mut().take();
        self.timers.borrow_mut().clear();
        self.pending_jump.borrow_mut().take();
        self.tagline.borrow_mut().take();
        self.listeners.borrow_mut().clear();
        self.contact.borrow_mut().take();
        self.enable_watch.borrow_mut().take();
        debug!("horizontal scroll torn down");
    }
}

fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
    document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
}

fn viewport_width(window: &Window) -> f64 {
    window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(0.0)
}

fn first_touch(event: &Event) -> Option<(f64, f64)> {
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some((f64::from(touch.client_x()), f64::from(touch.client_y())))
}

fn suppress(hint: &HtmlElement) -> Result<(), JsValue> {
    let style = hint.style();
    style.set_property("display", "none")?;
    style.set_property("opacity", "0")
}
