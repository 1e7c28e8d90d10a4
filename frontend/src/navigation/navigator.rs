use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::{
    resolve, route_name_from_fragment, NavigationHost, Presenter, RedirectReason, Resolution,
    Route, RouteName, RouteTable,
};
use crate::config::APP_NAME;
use crate::state::auth::{AuthService, Subscription};
use crate::state::notification::Notifier;

pub const GUARD_DENIED_MESSAGE: &str = "Anda tidak memiliki akses ke halaman ini";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPhase {
    Unresolved,
    Resolving(RouteName),
    Active(RouteName),
}

impl NavigationPhase {
    pub fn route(self) -> Option<RouteName> {
        match self {
            Self::Unresolved => None,
            Self::Resolving(route) | Self::Active(route) => Some(route),
        }
    }
}

/// Programmatic navigation as seen by presenters.
pub trait Navigate {
    fn navigate_to(&self, route: RouteName, replace: bool);
}

struct NavigatorInner {
    host: Rc<dyn NavigationHost>,
    auth: AuthService,
    notifier: Rc<dyn Notifier>,
    routes: RefCell<RouteTable>,
    phase: Cell<NavigationPhase>,
    presenter: RefCell<Option<Rc<dyn Presenter>>>,
    generation: Cell<u64>,
    loading_depth: Cell<u32>,
    auth_subscription: RefCell<Option<Subscription>>,
}

/// Shows the loading overlay while alive. Nested guards keep it up until the
/// last one drops.
struct LoadingGuard {
    inner: Rc<NavigatorInner>,
}

impl LoadingGuard {
    fn show(inner: &Rc<NavigatorInner>) -> Self {
        let depth = inner.loading_depth.get();
        if depth == 0 {
            inner.host.show_loading();
        }
        inner.loading_depth.set(depth + 1);
        Self {
            inner: Rc::clone(inner),
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let depth = self.inner.loading_depth.get().saturating_sub(1);
        self.inner.loading_depth.set(depth);
        if depth == 0 {
            self.inner.host.hide_loading();
        }
    }
}

#[derive(Clone)]
pub struct Navigator {
    inner: Rc<NavigatorInner>,
}

impl Navigator {
    pub fn new(host: Rc<dyn NavigationHost>, auth: AuthService, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            inner: Rc::new(NavigatorInner {
                host,
                auth,
                notifier,
                routes: RefCell::new(RouteTable::default()),
                phase: Cell::new(NavigationPhase::Unresolved),
                presenter: RefCell::new(None),
                generation: Cell::new(0),
                loading_depth: Cell::new(0),
                auth_subscription: RefCell::new(None),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakNavigator {
        WeakNavigator {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn add_route(&self, route: Route) {
        log::debug!("route registered: {}", route.path());
        self.inner.routes.borrow_mut().insert(route);
    }

    /// Attaches a guard to an existing route. Returns `false` for an unknown route.
    pub fn add_route_guard(&self, name: RouteName, guard: impl Fn(RouteName) -> bool + 'static) -> bool {
        match self.inner.routes.borrow_mut().get_mut(name) {
            Some(route) => {
                route.set_guard(Rc::new(guard));
                true
            }
            None => false,
        }
    }

    pub fn has_route(&self, name: RouteName) -> bool {
        self.inner.routes.borrow().contains(name)
    }

    pub fn routes(&self) -> Vec<Route> {
        self.inner.routes.borrow().iter().cloned().collect()
    }

    pub fn current_route(&self) -> Option<RouteName> {
        match self.inner.phase.get() {
            NavigationPhase::Active(route) => Some(route),
            _ => None,
        }
    }

    pub fn phase(&self) -> NavigationPhase {
        self.inner.phase.get()
    }

    /// Hooks fragment changes and auth events, then resolves the initial fragment.
    pub fn start(&self) {
        let weak = self.downgrade();
        self.inner.host.on_fragment_change(Rc::new(move || {
            if let Some(navigator) = weak.upgrade() {
                navigator.schedule_resolution();
            }
        }));

        let weak = self.downgrade();
        let subscription = self.inner.auth.subscribe(move |_| {
            if let Some(navigator) = weak.upgrade() {
                navigator.schedule_resolution();
            }
        });
        self.inner.auth_subscription.replace(Some(subscription));

        self.schedule_resolution();
    }

    pub fn schedule_resolution(&self) {
        let navigator = self.clone();
        self.inner
            .host
            .spawn(Box::pin(async move { navigator.handle_route_change().await }));
    }

    pub fn navigate_to(&self, name: RouteName, replace: bool) {
        if !self.has_route(name) {
            log::error!("route not found: {}", name);
            return;
        }
        let current = self.inner.host.current_fragment();
        if route_name_from_fragment(&current) == name.fragment() {
            self.schedule_resolution();
        } else {
            self.inner.host.set_fragment(name.fragment(), replace);
        }
    }

    pub fn go_back(&self) {
        self.inner.host.go_back();
    }

    pub fn go_forward(&self) {
        self.inner.host.go_forward();
    }

    /// One resolution pass for the current fragment.
    pub async fn handle_route_change(&self) {
        let fragment = self.inner.host.current_fragment();
        let access = self.inner.auth.access_level();
        let resolution = resolve(&self.inner.routes.borrow(), &fragment, access);
        match resolution {
            Resolution::Redirect { to, reason } => {
                match reason {
                    RedirectReason::UnknownRoute => {
                        log::warn!("route not found: {:?}, redirecting to {}", fragment, to)
                    }
                    _ => log::debug!("{:?}: redirecting to {}", reason, to),
                }
                self.navigate_to(to, true);
            }
            Resolution::Enter(name) => self.enter(name).await,
        }
    }

    async fn enter(&self, name: RouteName) {
        let inner = &self.inner;
        if inner.phase.get().route() == Some(name) {
            log::debug!("already on {}", name);
            return;
        }
        let route = inner.routes.borrow().get(name).cloned();
        let Some(route) = route else {
            log::error!("route not found: {}", name);
            return;
        };

        if !route.can_activate() {
            log::warn!("guard denied {}", name);
            inner.notifier.error(GUARD_DENIED_MESSAGE);
            if let Some(current) = inner.phase.get().route() {
                inner.host.set_fragment(current.fragment(), true);
            }
            return;
        }

        let generation = inner.generation.get() + 1;
        inner.generation.set(generation);
        inner.phase.set(NavigationPhase::Resolving(name));
        let _loading = LoadingGuard::show(inner);

        inner.host.set_title(&format!("{} - {}", route.title, APP_NAME));
        inner.host.mark_active(name);

        let previous = inner.presenter.borrow_mut().take();
        if let Some(previous) = previous {
            if let Err(err) = previous.cleanup() {
                log::error!("presenter cleanup failed: {}", err);
            }
        }

        let presenter = route.instantiate();
        let result = presenter.init().await;

        if inner.generation.get() != generation {
            log::debug!("navigation to {} superseded", name);
            if let Err(err) = presenter.cleanup() {
                log::error!("presenter cleanup failed: {}", err);
            }
            return;
        }

        match result {
            Ok(()) => {
                inner.presenter.replace(Some(presenter));
                inner.phase.set(NavigationPhase::Active(name));
                log::debug!("entered {}", name);
            }
            Err(err) => {
                log::error!("failed to load {}: {}", name, err);
                if let Err(cleanup_err) = presenter.cleanup() {
                    log::error!("presenter cleanup failed: {}", cleanup_err);
                }
                inner.host.render_error(&err.user_message());
                inner.phase.set(NavigationPhase::Unresolved);
            }
        }
    }
}

impl Navigate for Navigator {
    fn navigate_to(&self, route: RouteName, replace: bool) {
        Navigator::navigate_to(self, route, replace);
    }
}

/// Non-owning handle given to presenters, which the navigator itself owns.
#[derive(Clone, Default)]
pub struct WeakNavigator {
    inner: Weak<NavigatorInner>,
}

impl WeakNavigator {
    pub fn upgrade(&self) -> Option<Navigator> {
        self.inner.upgrade().map(|inner| Navigator { inner })
    }
}

impl Navigate for WeakNavigator {
    fn navigate_to(&self, route: RouteName, replace: bool) {
        match self.upgrade() {
            Some(navigator) => navigator.navigate_to(route, replace),
            None => log::warn!("navigation to {} after shutdown", route),
        }
    }
}
