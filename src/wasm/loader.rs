use std::cell::RefCell;

use js_sys::Array;
use log::{debug, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

/// Images inside the track that still carry a deferred source.
pub const SCROLL_IMAGES: &str = "img[data-src], img.grid-lazy";

type EntryCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

struct Observation {
    observer: IntersectionObserver,
    _callback: EntryCallback,
}

/// Promotes `data-src`/`data-srcset` to real attributes as images near the viewport.
#[derive(Default)]
pub struct MediaLoader {
    scroll: RefCell<Option<Observation>>,
}

impl MediaLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Watches lazy images under `track`, looking `margin_px` ahead to the right.
    /// Returns how many images are observed.
    pub fn observe_scroll_images(&self, track: &Element, margin_px: u32) -> Result<u32, JsValue> {
        let callback: EntryCallback = Closure::wrap(Box::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    if let Err(err) = load_element(&target) {
                        warn!("failed to load deferred image: {err:?}");
                    }
                    observer.unobserve(&target);
                }
            },
        ) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&format!("0px {margin_px}px 0px 0px"));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;

        let images = track.query_selector_all(SCROLL_IMAGES)?;
        let mut observed = 0;
        for i in 0..images.length() {
            if let Some(image) = images.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                observer.observe(&image);
                observed += 1;
            }
        }
        debug!("lazy loader observing {observed} images");

        // A second registration replaces the first.
        if let Some(previous) = self.scroll.borrow_mut().replace(Observation {
            observer,
            _callback: callback,
        }) {
            previous.observer.disconnect();
        }
        Ok(observed)
    }
}

impl Drop for MediaLoader {
    fn drop(&mut self) {
        if let Some(observation) = self.scroll.get_mut().take() {
            observation.observer.disconnect();
        }
    }
}

/// Swaps deferred sources onto `el`, including sibling `<source>`s of a `<picture>`.
pub fn load_element(el: &Element) -> Result<(), JsValue> {
    promote(el, "data-srcset", "srcset")?;
    promote(el, "data-src", "src")?;

    if el.tag_name().eq_ignore_ascii_case("img") {
        if let Some(picture) = el.closest("picture")? {
            let sources = picture.query_selector_all("source[data-srcset]")?;
            for i in 0..sources.length() {
                if let Some(source) = sources.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    promote(&source, "data-srcset", "srcset")?;
                }
            }
        }
    }
    Ok(())
}

fn promote(el: &Element, from: &str, to: &str) -> Result<(), JsValue> {
    if let Some(value) = el.get_attribute(from) {
        el.set_attribute(to, &value)?;
        el.remove_attribute(from)?;
    }
    Ok(())
}
