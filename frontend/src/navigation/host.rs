use futures::future::LocalBoxFuture;
use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast};

use super::RouteName;
use crate::pages::PageContent;
use crate::utils::storage::window;

/// Everything the navigator needs from the page around it.
pub trait NavigationHost {
    fn current_fragment(&self) -> String;
    fn set_fragment(&self, fragment: &str, replace: bool);
    fn set_title(&self, title: &str);
    fn mark_active(&self, route: RouteName);
    fn show_loading(&self);
    fn hide_loading(&self);
    fn render_error(&self, message: &str);
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
    fn on_fragment_change(&self, callback: Rc<dyn Fn()>);
    fn go_back(&self);
    fn go_forward(&self);
}

/// Reactive state of the app shell: the content slot plus its chrome.
#[derive(Clone, Copy)]
pub struct ShellState {
    pub content: RwSignal<PageContent>,
    pub loading: RwSignal<bool>,
    pub title: RwSignal<String>,
    pub active_route: RwSignal<Option<RouteName>>,
}

impl ShellState {
    pub fn new() -> Self {
        Self {
            content: create_rw_signal(PageContent::Empty),
            loading: create_rw_signal(false),
            title: create_rw_signal(crate::config::APP_NAME.to_string()),
            active_route: create_rw_signal(None),
        }
    }

    pub fn show(&self, content: PageContent) {
        self.content.set(content);
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}

/// Browser-backed host: `location.hash`, `hashchange` and the shell signals.
pub struct BrowserHost {
    shell: ShellState,
    hash_listener: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>>,
}

impl BrowserHost {
    pub fn new(shell: ShellState) -> Self {
        Self {
            shell,
            hash_listener: RefCell::new(None),
        }
    }
}

impl NavigationHost for BrowserHost {
    fn current_fragment(&self) -> String {
        window()
            .ok()
            .and_then(|w| w.location().hash().ok())
            .unwrap_or_default()
    }

    fn set_fragment(&self, fragment: &str, replace: bool) {
        let Ok(window) = window() else {
            return;
        };
        let location = window.location();
        let result = if replace {
            location.replace(&format!("#{}", fragment))
        } else {
            location.set_hash(fragment)
        };
        if let Err(e) = result {
            log::error!("failed to update location hash: {:?}", e);
        }
    }

    fn set_title(&self, title: &str) {
        self.shell.title.set(title.to_string());
    }

    fn mark_active(&self, route: RouteName) {
        self.shell.active_route.set(Some(route));
    }

    fn show_loading(&self) {
        self.shell.loading.set(true);
    }

    fn hide_loading(&self) {
        self.shell.loading.set(false);
    }

    fn render_error(&self, message: &str) {
        self.shell.show(PageContent::Error(message.to_string()));
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        spawn_local(task);
    }

    fn on_fragment_change(&self, callback: Rc<dyn Fn()>) {
        let Ok(window) = window() else {
            return;
        };
        let listener = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            callback();
        });
        if let Err(e) = window
            .add_event_listener_with_callback("hashchange", listener.as_ref().unchecked_ref())
        {
            log::error!("failed to listen for hashchange: {:?}", e);
            return;
        }
        self.hash_listener.replace(Some(listener));
    }

    fn go_back(&self) {
        if let Some(history) = window().ok().and_then(|w| w.history().ok()) {
            let _ = history.back();
        }
    }

    fn go_forward(&self) {
        if let Some(history) = window().ok().and_then(|w| w.history().ok()) {
            let _ = history.forward();
        }
    }
}
