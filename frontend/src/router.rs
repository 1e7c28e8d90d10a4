//! Composition root: builds the services once, registers one route per page
//! and renders the shell around the content slot.

use chrono::Duration;
use leptos::*;
use leptos_meta::{provide_meta_context, Title};
use std::rc::Rc;

use crate::{
    api::ApiClient,
    components::{ContentSlot, Footer, Header, LoadingOverlay, ToastList},
    config::AppConfig,
    devices::{CameraDevice, LocationProvider},
    navigation::{NavigationHost, Navigator, Presenter, Route, RouteName, ShellState},
    pages::{
        add_story::{AddStoryPresenter, AddStoryViewModel},
        auth::{AuthPresenter, AuthViewModel},
        home::{presenter::LOGGED_OUT_MESSAGE, HomePresenter, HomeViewModel},
        PageServices,
    },
    state::{
        auth::{AccessLevel, AuthService},
        notification::{Notifier, ToastStore},
        session::CurrentUser,
        stories::StoryRepository,
    },
    utils::time::Clock,
};

pub const LOGIN_FIRST_MESSAGE: &str = "Silakan login terlebih dahulu";

/// Platform pieces the services are built from. The browser and the tests
/// supply different ones.
pub struct Platform {
    pub api: ApiClient,
    pub clock: Rc<dyn Clock>,
    pub notifier: Rc<dyn Notifier>,
    pub host: Rc<dyn NavigationHost>,
    pub location: Rc<dyn LocationProvider>,
    pub camera: Rc<dyn CameraDevice>,
}

#[derive(Clone)]
pub struct AppServices {
    pub shell: ShellState,
    pub auth: AuthService,
    pub stories: StoryRepository,
    pub notifier: Rc<dyn Notifier>,
    pub clock: Rc<dyn Clock>,
    pub location: Rc<dyn LocationProvider>,
    pub camera: Rc<dyn CameraDevice>,
    pub navigator: Navigator,
}

impl AppServices {
    pub fn build(shell: ShellState, platform: Platform, config: &AppConfig) -> Self {
        let Platform {
            api,
            clock,
            notifier,
            host,
            location,
            camera,
        } = platform;
        let auth = AuthService::new(api.clone(), clock.clone(), notifier.clone());
        let stories = StoryRepository::new(
            api,
            auth.clone(),
            clock.clone(),
            config.page_size,
            Duration::seconds(config.cache_ttl_secs),
        );
        let navigator = Navigator::new(host, auth.clone(), notifier.clone());
        let services = Self {
            shell,
            auth,
            stories,
            notifier,
            clock,
            location,
            camera,
            navigator,
        };
        services.register_routes();
        services
    }

    fn page_services(&self) -> PageServices {
        PageServices {
            auth: self.auth.clone(),
            stories: self.stories.clone(),
            notifier: self.notifier.clone(),
            navigator: Rc::new(self.navigator.downgrade()),
            location: self.location.clone(),
        }
    }

    /// View models own signals, so they are created under the shell's owner
    /// rather than inside whichever task resolved the route.
    fn register_routes(&self) {
        let owner = Owner::current();
        let in_shell = move |f: &dyn Fn() -> Rc<dyn Presenter>| match owner {
            Some(owner) => with_owner(owner, f),
            None => f(),
        };

        let (shell, services, clock) = (self.shell, self.page_services(), self.clock.clone());
        self.navigator.add_route(Route::new(RouteName::Home, move || {
            in_shell(&|| {
                let vm = HomeViewModel::new(shell, clock.clone());
                let presenter = HomePresenter::new(Rc::new(vm.clone()), services.clone());
                vm.bind(&presenter);
                presenter as Rc<dyn Presenter>
            })
        }));

        let (shell, services) = (self.shell, self.page_services());
        self.navigator.add_route(Route::new(RouteName::Auth, move || {
            in_shell(&|| {
                let vm = AuthViewModel::new(shell);
                let presenter = AuthPresenter::new(Rc::new(vm.clone()), services.clone());
                vm.bind(&presenter);
                presenter as Rc<dyn Presenter>
            })
        }));

        let (shell, services, camera) = (self.shell, self.page_services(), self.camera.clone());
        self.navigator.add_route(Route::new(RouteName::AddStory, move || {
            in_shell(&|| {
                let vm = AddStoryViewModel::new(shell);
                let presenter =
                    AddStoryPresenter::new(Rc::new(vm.clone()), services.clone(), camera.clone());
                vm.bind(&presenter);
                presenter as Rc<dyn Presenter>
            })
        }));
    }

    pub fn sign_out(&self) {
        self.auth.logout();
        self.notifier.info(LOGGED_OUT_MESSAGE);
    }

    /// Alt+H home, Alt+A add story, Alt+L sign in or out.
    pub fn handle_shortcut(&self, key: &str) -> bool {
        match key {
            "h" => self.navigator.navigate_to(RouteName::Home, false),
            "a" => {
                if self.auth.access_level() == AccessLevel::Anonymous {
                    self.notifier.warning(LOGIN_FIRST_MESSAGE);
                } else {
                    self.navigator.navigate_to(RouteName::AddStory, false);
                }
            }
            "l" => {
                if self.auth.is_authenticated() {
                    self.sign_out();
                } else {
                    self.navigator.navigate_to(RouteName::Auth, false);
                }
            }
            _ => return false,
        }
        true
    }
}

/// Account state for the header, kept current by an auth subscription.
fn account_signals(auth: &AuthService) -> (RwSignal<Option<CurrentUser>>, RwSignal<AccessLevel>) {
    let user = create_rw_signal(auth.current_user());
    let access = create_rw_signal(auth.access_level());
    let subscription = {
        let source = auth.clone();
        auth.subscribe(move |_| {
            user.set(source.current_user());
            access.set(source.access_level());
        })
    };
    let subscription = store_value(Some(subscription));
    on_cleanup(move || subscription.set_value(None));
    (user, access)
}

#[component]
pub fn App(services: AppServices, toasts: ToastStore) -> impl IntoView {
    provide_meta_context();
    let shell = services.shell;
    let title = shell.title;
    let (user, access) = account_signals(&services.auth);

    let on_logout = {
        let services = services.clone();
        Callback::new(move |_| services.sign_out())
    };
    let shortcuts = {
        let services = services.clone();
        window_event_listener(ev::keydown, move |ev| {
            if ev.alt_key() && services.handle_shortcut(&ev.key().to_lowercase()) {
                ev.prevent_default();
            }
        })
    };
    on_cleanup(move || shortcuts.remove());

    view! {
        <Title text=move || title.get() />
        <a href="#page-content" class="sr-only focus:not-sr-only">"Langsung ke konten utama"</a>
        <Header shell=shell user=user.into() access=access.into() on_logout=on_logout />
        <ContentSlot shell=shell />
        <Footer />
        <LoadingOverlay shell=shell />
        <ToastList store=toasts />
    }
}
