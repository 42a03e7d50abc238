//! Subscribe-once notifications shared with the rest of the page.

use gloo::events::EventListener;
use js_sys::Array;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{CustomEvent, Element, EventTarget, MutationObserver, MutationObserverInit};

type ObserverCallback = Closure<dyn FnMut(Array, MutationObserver)>;

/// Fires a callback the first time `target` carries a CSS class, then disconnects.
pub struct ClassWatch {
    observer: MutationObserver,
    _callback: ObserverCallback,
}

impl ClassWatch {
    pub fn once(
        target: &Element,
        class: &str,
        on_present: impl FnOnce() + 'static,
    ) -> Result<Self, JsValue> {
        let watched = target.clone();
        let class = class.to_owned();
        let mut pending = Some(on_present);
        let callback: ObserverCallback =
            Closure::wrap(Box::new(move |_records: Array, observer: MutationObserver| {
                if !watched.class_list().contains(&class) {
                    return;
                }
                observer.disconnect();
                if let Some(on_present) = pending.take() {
                    on_present();
                }
            }) as Box<dyn FnMut(Array, MutationObserver)>);

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        let init = MutationObserverInit::new();
        init.set_attributes(true);
        init.set_attribute_filter(&Array::of1(&JsValue::from_str("class")));
        observer.observe_with_options(target, &init)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    /// Stops watching without waiting for the class to appear.
    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for ClassWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Dispatches a bare named event on `target`.
pub fn emit(target: &EventTarget, name: &str) -> Result<bool, JsValue> {
    let event = CustomEvent::new(name)?;
    target.dispatch_event(&event)
}

/// Listens for the next `name` event only.
pub fn once(target: &EventTarget, name: &'static str, f: impl FnOnce() + 'static) -> EventListener {
    EventListener::once(target, name, move |_| f())
}
