use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::utils::geo::Coordinates;

pub const DEFAULT_API_BASE_URL: &str = "https://story-api.dicoding.dev/v1";
pub const APP_NAME: &str = "Dicoding Stories";

/// Runtime overrides read from `window.__DICODING_STORIES_ENV`,
/// `window.__DICODING_STORIES_CONFIG` or `./config.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub api_base_url: Option<String>,
    pub page_size: Option<u32>,
}

/// Tunables shared by the services built in the composition root.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub page_size: u32,
    pub cache_ttl_secs: i64,
    pub expiry_check_interval_ms: u32,
    pub search_debounce_ms: u32,
    pub toast_duration_ms: u32,
    pub default_map_center: Coordinates,
    pub default_map_zoom: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: 50,
            cache_ttl_secs: 5 * 60,
            expiry_check_interval_ms: 60_000,
            search_debounce_ms: 300,
            toast_duration_ms: 5_000,
            default_map_center: Coordinates::new(-6.2088, 106.8456),
            default_map_zoom: 10.0,
        }
    }
}

impl AppConfig {
    pub fn with_runtime(runtime: RuntimeConfig) -> Self {
        let mut config = Self::default();
        if let Some(url) = runtime.api_base_url.filter(|url| !url.trim().is_empty()) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(size) = runtime.page_size.filter(|size| *size > 0) {
            config.page_size = size;
        }
        config
    }
}

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

fn read_global(name: &str) -> Option<js_sys::Object> {
    let w = web_sys::window()?;
    let any = js_sys::Reflect::get(&w, &name.into()).ok()?;
    if any.is_undefined() || any.is_null() {
        return None;
    }
    Some(js_sys::Object::from(any))
}

fn read_string(obj: &js_sys::Object, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        js_sys::Reflect::get(obj, &(*key).into())
            .ok()
            .and_then(|v| v.as_string())
    })
}

fn read_number(obj: &js_sys::Object, keys: &[&str]) -> Option<u32> {
    keys.iter().find_map(|key| {
        js_sys::Reflect::get(obj, &(*key).into())
            .ok()
            .and_then(|v| v.as_f64())
            .map(|v| v as u32)
    })
}

fn snapshot_from_globals() -> Option<RuntimeConfig> {
    // window.__DICODING_STORIES_ENV = { API_BASE_URL: "..." } wins over the config object
    let obj = read_global("__DICODING_STORIES_ENV")
        .or_else(|| read_global("__DICODING_STORIES_CONFIG"))?;
    Some(RuntimeConfig {
        api_base_url: read_string(&obj, &["API_BASE_URL", "api_base_url"]),
        page_size: read_number(&obj, &["PAGE_SIZE", "page_size"]),
    })
}

fn config_json_url() -> Option<String> {
    let origin = web_sys::window()?.location().origin().ok()?;
    Some(format!("{}/config.json", origin))
}

async fn fetch_runtime_config() -> Option<RuntimeConfig> {
    let url = config_json_url()?;
    let resp = reqwest::get(url).await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    resp.json::<RuntimeConfig>().await.ok()
}

fn cache_config(config: AppConfig) -> AppConfig {
    let _ = APP_CONFIG.set(config.clone());
    APP_CONFIG.get().cloned().unwrap_or(config)
}

/// Config resolved so far, or the defaults when `init` has not run.
pub fn current() -> AppConfig {
    APP_CONFIG.get().cloned().unwrap_or_default()
}

pub async fn await_config() -> AppConfig {
    if let Some(cached) = APP_CONFIG.get() {
        return cached.clone();
    }
    if let Some(runtime) = snapshot_from_globals() {
        return cache_config(AppConfig::with_runtime(runtime));
    }
    if let Some(runtime) = fetch_runtime_config().await {
        return cache_config(AppConfig::with_runtime(runtime));
    }
    log::debug!("no runtime config found, using {}", DEFAULT_API_BASE_URL);
    cache_config(AppConfig::default())
}

pub async fn init() -> AppConfig {
    await_config().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_api() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "https://story-api.dicoding.dev/v1");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.expiry_check_interval_ms, 60_000);
    }

    #[test]
    fn runtime_overrides_trim_trailing_slash_and_ignore_blank_values() {
        let config = AppConfig::with_runtime(RuntimeConfig {
            api_base_url: Some("http://localhost:8080/v1/".into()),
            page_size: Some(0),
        });
        assert_eq!(config.api_base_url, "http://localhost:8080/v1");
        assert_eq!(config.page_size, 50);

        let blank = AppConfig::with_runtime(RuntimeConfig {
            api_base_url: Some("  ".into()),
            page_size: Some(20),
        });
        assert_eq!(blank.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(blank.page_size, 20);
    }

    #[test]
    fn runtime_config_deserializes_partial_json() {
        let cfg: RuntimeConfig =
            serde_json::from_str(r#"{"api_base_url":"http://example.test"}"#).unwrap();
        assert_eq!(cfg.api_base_url.as_deref(), Some("http://example.test"));
        assert!(cfg.page_size.is_none());
    }
}
