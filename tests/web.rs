#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo_timers::future::TimeoutFuture;
use scroll_physics_wasm::wasm::{
    FrameLoop, HorizontalScroll, MediaLoader, SKIP_INTRO_EVENT, TAGLINE_EVENT,
};
use scroll_physics_wasm::ScrollConfig;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{
    CustomEvent, Document, Element, Event, HtmlElement, KeyboardEvent, KeyboardEventInit,
    WheelEvent, WheelEventInit,
};

wasm_bindgen_test_configure!(run_in_browser);

const PAGE: &str = r##"
<nav>
  <a id="nav-contact" href="#contact">Contact</a>
  <span class="nav-brand" style="opacity: 0">Brand</span>
</nav>
<div id="scroll-wrapper">
  <div id="scroll-track" style="display: block; width: 6000px; height: 20px">
    <img data-src="data:image/gif;base64,R0lGODlhAQABAAAAACw=" width="10" height="10">
    <picture>
      <source data-srcset="data:image/gif;base64,R0lGODlhAQABAAAAACw=">
      <img class="grid-lazy" data-src="data:image/gif;base64,R0lGODlhAQABAAAAACw=" width="10" height="10">
    </picture>
  </div>
</div>
<div id="scroll-tip" style="opacity: 0">scroll</div>
"##;

struct Fixture {
    root: Element,
}

impl Fixture {
    fn new() -> Self {
        let doc = document();
        let root = doc.create_element("div").unwrap();
        // pinned to the viewport so the lazy images intersect
        root.set_attribute("style", "position: fixed; top: 0; left: 0")
            .unwrap();
        root.set_inner_html(PAGE);
        doc.body().unwrap().append_child(&root).unwrap();
        set_scroll_enabled(false);
        Self { root }
    }

    fn element(&self, id: &str) -> HtmlElement {
        document()
            .get_element_by_id(id)
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.root.remove();
        set_scroll_enabled(false);
    }
}

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn set_scroll_enabled(on: bool) {
    let classes = document().body().unwrap().class_list();
    if on {
        classes.add_1("scroll-enabled").unwrap();
    } else {
        classes.remove_1("scroll-enabled").unwrap();
    }
}

fn test_config() -> ScrollConfig {
    ScrollConfig {
        // keep desktop behaviour whatever the headless window size is
        mobile_breakpoint: 0.0,
        contact_scroll_delay_ms: 50,
        ..ScrollConfig::default()
    }
}

fn wheel(delta_y: f64) {
    let init = WheelEventInit::new();
    init.set_delta_y(delta_y);
    init.set_cancelable(true);
    let event = WheelEvent::new_with_event_init_dict("wheel", &init).unwrap();
    web_sys::window().unwrap().dispatch_event(&event).unwrap();
}

fn key(name: &str) {
    let init = KeyboardEventInit::new();
    init.set_key(name);
    init.set_cancelable(true);
    let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    web_sys::window().unwrap().dispatch_event(&event).unwrap();
}

#[wasm_bindgen_test]
fn missing_track_is_inert() {
    let scroll = HorizontalScroll::mount(&document(), test_config());
    scroll.init();
    scroll.step_frame();
    assert!(scroll.is_inert());
    assert!(!scroll.is_enabled());
    assert_eq!(scroll.state(), None);
}

#[wasm_bindgen_test(async)]
async fn waits_for_scroll_enabled_class() {
    let _page = Fixture::new();
    let scroll = HorizontalScroll::mount(&document(), test_config());
    scroll.init();
    assert!(!scroll.is_enabled());

    wheel(100.0);
    assert_eq!(scroll.state().unwrap().target, 0.0);

    set_scroll_enabled(true);
    TimeoutFuture::new(20).await;
    assert!(scroll.is_enabled());

    scroll.teardown();
}

#[wasm_bindgen_test]
fn wheel_and_keys_move_target() {
    let _page = Fixture::new();
    set_scroll_enabled(true);
    let scroll = HorizontalScroll::mount(&document(), test_config());
    scroll.init();
    assert!(scroll.is_enabled());

    wheel(100.0);
    let state = scroll.state().unwrap();
    assert!(state.max_scroll > 200.0);
    assert!((state.target - 120.0).abs() < 1e-9);

    key("ArrowRight");
    assert!((scroll.state().unwrap().target - 320.0).abs() < 1e-9);
    key("ArrowUp");
    key("ArrowUp");
    assert_eq!(scroll.state().unwrap().target, 0.0);

    scroll.teardown();
}

#[wasm_bindgen_test]
fn frame_writes_track_transform() {
    let page = Fixture::new();
    set_scroll_enabled(true);
    let scroll = HorizontalScroll::mount(&document(), test_config());
    scroll.init();

    wheel(1000.0);
    scroll.step_frame();

    let state = scroll.state().unwrap();
    assert!(state.current > 0.0);
    assert_eq!(state.skew, -0.7);
    let transform = page
        .element("scroll-track")
        .style()
        .get_property_value("transform")
        .unwrap();
    assert!(transform.starts_with("translate3d("), "{transform}");

    scroll.teardown();
}

#[wasm_bindgen_test]
fn resize_clamps_into_shrunk_track() {
    let page = Fixture::new();
    set_scroll_enabled(true);
    let scroll = HorizontalScroll::mount(&document(), test_config());
    scroll.init();

    wheel(100_000.0);
    for _ in 0..400 {
        scroll.step_frame();
    }
    let before = scroll.state().unwrap();
    assert_eq!(before.current, before.max_scroll);

    let track = page.element("scroll-track");
    track.style().set_property("width", "3000px").unwrap();
    web_sys::window()
        .unwrap()
        .dispatch_event(&Event::new("resize").unwrap())
        .unwrap();

    let after = scroll.state().unwrap();
    assert!(after.max_scroll < before.max_scroll);
    assert_eq!(after.target, after.max_scroll);
    assert_eq!(after.current, after.max_scroll);

    scroll.teardown();
}

#[wasm_bindgen_test(async)]
async fn contact_shortcut_skips_intro_and_scrolls_to_end() {
    let page = Fixture::new();
    let skips = Rc::new(Cell::new(0));
    let counter = skips.clone();
    let _listener = EventListener::new(&web_sys::window().unwrap(), SKIP_INTRO_EVENT, move |_| {
        counter.set(counter.get() + 1);
    });

    let scroll = HorizontalScroll::mount(&document(), test_config());
    scroll.init();
    assert!(!scroll.is_enabled());

    page.element("nav-contact").click();
    assert_eq!(skips.get(), 1);
    assert!(scroll.is_enabled());
    assert_eq!(scroll.state().unwrap().target, 0.0);

    let tip = page.element("scroll-tip").style();
    assert_eq!(tip.get_property_value("display").unwrap(), "none");
    assert_eq!(tip.get_property_value("opacity").unwrap(), "0");

    TimeoutFuture::new(120).await;
    let state = scroll.state().unwrap();
    assert!(state.max_scroll > 0.0);
    assert_eq!(state.target, state.max_scroll);
    assert_eq!(skips.get(), 1);

    scroll.teardown();
}

#[wasm_bindgen_test]
fn tagline_reveals_scroll_hint_once() {
    let page = Fixture::new();
    set_scroll_enabled(true);
    let scroll = HorizontalScroll::mount(&document(), test_config());
    scroll.init();

    let window = web_sys::window().unwrap();
    window
        .dispatch_event(&CustomEvent::new(TAGLINE_EVENT).unwrap())
        .unwrap();
    let tip = page.element("scroll-tip");
    assert_eq!(tip.style().get_property_value("opacity").unwrap(), "1");

    tip.style().set_property("opacity", "0").unwrap();
    window
        .dispatch_event(&CustomEvent::new(TAGLINE_EVENT).unwrap())
        .unwrap();
    assert_eq!(tip.style().get_property_value("opacity").unwrap(), "0");

    scroll.teardown();
}

#[wasm_bindgen_test(async)]
async fn loader_promotes_deferred_sources() {
    let page = Fixture::new();
    let track = page.element("scroll-track");
    let loader = MediaLoader::new();
    assert_eq!(loader.observe_scroll_images(&track, 3000).unwrap(), 2);

    TimeoutFuture::new(200).await;
    let images = track.query_selector_all("img").unwrap();
    for i in 0..images.length() {
        let img = images.get(i).unwrap().dyn_into::<Element>().unwrap();
        assert!(img.get_attribute("data-src").is_none());
        assert!(img.get_attribute("src").is_some());
    }
    let source = track.query_selector("source").unwrap().unwrap();
    assert!(source.get_attribute("data-srcset").is_none());
    assert!(source.get_attribute("srcset").is_some());
}

#[wasm_bindgen_test(async)]
async fn frame_loop_runs_until_cancelled() {
    let ticks = Rc::new(Cell::new(0u32));
    let counter = ticks.clone();
    let frames = FrameLoop::start(web_sys::window().unwrap(), move || {
        counter.set(counter.get() + 1);
    })
    .unwrap();
    assert!(frames.is_running());

    TimeoutFuture::new(150).await;
    assert!(ticks.get() > 1);

    frames.cancel();
    assert!(!frames.is_running());
    let seen = ticks.get();
    TimeoutFuture::new(100).await;
    assert_eq!(ticks.get(), seen);
}

#[wasm_bindgen_test]
fn resize_into_mobile_resets_track_transform() {
    let page = Fixture::new();
    set_scroll_enabled(true);
    let config = ScrollConfig {
        mobile_breakpoint: 100_000.0,
        ..test_config()
    };
    let scroll = HorizontalScroll::mount(&document(), config);
    scroll.init();

    let track = page.element("scroll-track");
    track
        .style()
        .set_property("transform", "translate3d(-40px, 0px, 0px)")
        .unwrap();
    web_sys::window()
        .unwrap()
        .dispatch_event(&Event::new("resize").unwrap())
        .unwrap();
    assert_eq!(track.style().get_property_value("transform").unwrap(), "none");

    // frames are skipped on mobile
    scroll.step_frame();
    assert_eq!(track.style().get_property_value("transform").unwrap(), "none");

    scroll.teardown();
}

#[wasm_bindgen_test]
fn brand_shows_once_scrolled_past_reveal_point() {
    let _page = Fixture::new();
    set_scroll_enabled(true);
    let scroll = HorizontalScroll::mount(&document(), test_config());
    scroll.init();
    let brand = document()
        .query_selector(".nav-brand")
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();

    scroll.step_frame();
    assert_eq!(brand.style().get_property_value("opacity").unwrap(), "0");

    wheel(100_000.0);
    for _ in 0..400 {
        scroll.step_frame();
    }
    let viewport = web_sys::window().unwrap().inner_width().unwrap().as_f64().unwrap();
    assert!(scroll.state().unwrap().current > viewport * 0.69);
    assert_eq!(brand.style().get_property_value("opacity").unwrap(), "1");

    scroll.teardown();
}

#[wasm_bindgen_test(async)]
async fn hint_timer_reveals_tip_until_scrolled() {
    let page = Fixture::new();
    set_scroll_enabled(true);
    let config = ScrollConfig {
        hint_delay_ms: 30,
        ..test_config()
    };
    let scroll = HorizontalScroll::mount(&document(), config);
    scroll.init();
    let tip = page.element("scroll-tip");

    TimeoutFuture::new(80).await;
    assert_eq!(tip.style().get_property_value("opacity").unwrap(), "1");

    // the running frame loop hides it again once past 10px
    wheel(25.0);
    TimeoutFuture::new(400).await;
    let current = scroll.state().unwrap().current;
    assert!(current > 10.0, "{current}");
    assert_eq!(tip.style().get_property_value("opacity").unwrap(), "0");

    scroll.teardown();
}
