use thiserror::Error;

/// Reasons a [`ScrollConfig`](crate::config::ScrollConfig) is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid scroll config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} = {value} is out of range (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

#[cfg(target_arch = "wasm32")]
impl From<ConfigError> for wasm_bindgen::JsValue {
    fn from(err: ConfigError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
