use leptos::*;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast};

mod api;
mod components;
pub mod config;
mod devices;
pub mod error;
mod navigation;
mod pages;
pub mod router;
mod state;
mod test_support;
pub mod utils;

use api::ApiClient;
use config::AppConfig;
use devices::{BrowserCamera, BrowserGeolocation};
use navigation::{BrowserHost, ShellState};
use pages::add_story::CAMERA_VIDEO_ID;
use router::{App, AppServices, Platform};
use state::{
    auth::AuthService,
    notification::{Notifier, ToastStore},
};
use utils::time::SystemClock;

pub const ONLINE_MESSAGE: &str = "Koneksi internet kembali tersedia";
pub const OFFLINE_MESSAGE: &str = "Koneksi internet terputus";
pub const UNEXPECTED_MESSAGE: &str = "Terjadi kesalahan yang tidak terduga";

/// Entry point called by the binary once the wasm module is loaded.
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::error_1(&format!("logger init failed: {}", e).into());
    }
    log::info!("starting {}", config::APP_NAME);

    // Services read the resolved config, so mounting waits for it.
    spawn_local(async move {
        let config = config::init().await;
        log::debug!("runtime config initialized: {}", config.api_base_url);
        mount_to_body(move || boot(config));
    });
}

fn boot(config: AppConfig) -> impl IntoView {
    let shell = ShellState::new();
    let toasts = ToastStore::new(config.toast_duration_ms);
    let platform = Platform {
        api: ApiClient::new(),
        clock: Rc::new(SystemClock),
        notifier: Rc::new(toasts),
        host: Rc::new(BrowserHost::new(shell)),
        location: Rc::new(BrowserGeolocation),
        camera: Rc::new(BrowserCamera::new(CAMERA_VIDEO_ID)),
    };
    let services = AppServices::build(shell, platform, &config);

    if let Some(user) = services.auth.restore() {
        log::debug!("restored session for {}", user.user_id);
    }
    services
        .auth
        .start_expiry_watch(config.expiry_check_interval_ms);
    watch_window(&services.auth, services.notifier.clone());
    services.navigator.start();

    view! { <App services=services toasts=toasts /> }
}

/// App-wide browser events: connectivity notices, session refresh when the
/// tab comes back, and a generic notice for uncaught failures.
fn watch_window(auth: &AuthService, notifier: Rc<dyn Notifier>) {
    let online = notifier.clone();
    window_event_listener(ev::online, move |_| online.success(ONLINE_MESSAGE));
    let offline = notifier.clone();
    window_event_listener(ev::offline, move |_| offline.warning(OFFLINE_MESSAGE));

    let rejected = notifier.clone();
    window_event_listener(ev::unhandledrejection, move |ev| {
        log::error!("unhandled promise rejection: {:?}", ev.reason());
        rejected.error(UNEXPECTED_MESSAGE);
    });
    window_event_listener_untyped("error", move |ev| {
        let message = ev
            .dyn_ref::<web_sys::ErrorEvent>()
            .map(|ev| ev.message())
            .unwrap_or_default();
        log::error!("uncaught error: {}", message);
        // cross-origin scripts only report "Script error."
        if !message.contains("Script error") {
            notifier.error(UNEXPECTED_MESSAGE);
        }
    });

    let auth = auth.clone();
    let on_visible = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
        if document().visibility_state() == web_sys::VisibilityState::Visible {
            auth.restore();
        }
    });
    if let Err(e) = document()
        .add_event_listener_with_callback("visibilitychange", on_visible.as_ref().unchecked_ref())
    {
        log::error!("failed to listen for visibilitychange: {:?}", e);
    }
    on_visible.forget();
}
