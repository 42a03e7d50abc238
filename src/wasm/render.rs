use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::warn;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{HtmlElement, Window};

use crate::physics::Frame;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Perpetual `requestAnimationFrame` loop with an explicit cancel handle.
///
/// The loop reschedules itself after every tick until [`FrameLoop::cancel`]
/// is called or the handle is dropped.
pub struct FrameLoop {
    window: Window,
    // Holds the frame closure so it can keep calling `request_animation_frame`
    // on itself. Emptying it breaks the self-reference.
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn start(window: Window, mut tick: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));

        let f = callback.clone();
        let w = window.clone();
        let next = pending.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            next.set(None);
            tick();

            // schedule next
            if let Some(cb) = f.borrow().as_ref() {
                match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => next.set(Some(id)),
                    Err(err) => warn!("frame loop stopped: {err:?}"),
                }
            }
        }) as Box<dyn FnMut()>));

        let id = window.request_animation_frame(
            callback
                .borrow()
                .as_ref()
                .ok_or("frame callback missing")?
                .as_ref()
                .unchecked_ref(),
        )?;
        pending.set(Some(id));

        Ok(Self {
            window,
            callback,
            pending,
        })
    }

    pub fn is_running(&self) -> bool {
        self.pending.get().is_some()
    }

    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                warn!("cancel_animation_frame failed: {err:?}");
            }
        }
        self.callback.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Elements a [`Frame`] is painted onto.
pub struct Surface {
    pub track: HtmlElement,
    pub brand: Option<HtmlElement>,
    pub hint: Option<HtmlElement>,
}

impl Surface {
    pub fn paint(&self, frame: &Frame) -> Result<(), JsValue> {
        self.track
            .style()
            .set_property("transform", &frame.transform())?;

        if let Some(brand) = &self.brand {
            let opacity = if frame.brand_visible { "1" } else { "0" };
            brand.style().set_property("opacity", opacity)?;
        }
        if frame.dismiss_hint {
            if let Some(hint) = &self.hint {
                hint.style().set_property("opacity", "0")?;
            }
        }
        Ok(())
    }

    /// Drops the track transform so narrow viewports fall back to native layout.
    pub fn reset_track(&self) -> Result<(), JsValue> {
        self.track.style().set_property("transform", "none")
    }
}
