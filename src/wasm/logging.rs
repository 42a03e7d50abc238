use std::sync::Once;

use log::LevelFilter;

static INIT: Once = Once::new();

/// Routes `log` records to the browser console. Later calls only adjust the level.
pub fn init(level: LevelFilter) {
    INIT.call_once(|| {
        let backend_level = level.to_level().unwrap_or(log::Level::Error);
        if console_log::init_with_level(backend_level).is_err() {
            web_sys::console::warn_1(&"scroll: a logger was already installed".into());
        }
    });
    log::set_max_level(level);
}
