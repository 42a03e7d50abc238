#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod config;
pub mod error;
pub mod physics;

pub use config::ScrollConfig;
pub use error::ConfigError;
pub use physics::{Frame, KeyNav, ScrollPhysics, ScrollState};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::cell::RefCell;

    use gloo::events::EventListener;
    use log::{warn, LevelFilter};
    use wasm_bindgen::prelude::*;
    use web_sys::Document;

    use crate::config::ScrollConfig;

    mod loader;
    mod logging;
    mod render;
    mod scroll;
    mod signal;

    pub use loader::MediaLoader;
    pub use render::FrameLoop;
    pub use scroll::{HorizontalScroll, CONFIG_ATTR, SKIP_INTRO_EVENT, TAGLINE_EVENT};

    thread_local! {
        // The page's controller lives as long as the document.
        static PAGE: RefCell<Option<HorizontalScroll>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if document.ready_state() == "loading" {
            let doc = document.clone();
            EventListener::once(&document, "DOMContentLoaded", move |_| mount_page(&doc))
                .forget();
        } else {
            mount_page(&document);
        }
        Ok(())
    }

    fn mount_page(document: &Document) {
        let config = scroll::page_config(document);
        logging::init(config.as_ref().map_or(LevelFilter::Info, |c| c.log_level));
        let config = config.unwrap_or_else(|err| {
            warn!("ignoring {CONFIG_ATTR}: {err}");
            ScrollConfig::default()
        });

        let scroll = HorizontalScroll::mount(document, config);
        scroll.init();
        PAGE.with(|page| *page.borrow_mut() = Some(scroll));
    }
}
