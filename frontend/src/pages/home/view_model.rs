use chrono::{DateTime, Utc};
use leptos::*;
use std::cell::RefCell;
use std::future::Future;
use std::rc::{Rc, Weak};

use crate::{
    api::Story,
    config,
    devices::leaflet::MapSlot,
    navigation::ShellState,
    pages::{home::presenter::HomePresenter, PageContent},
    state::{
        auth::AccessLevel,
        session::CurrentUser,
        story_query::{LocationFilter, SortOrder, StoryQuery, StoryStatistics},
    },
    utils::{
        geo::Coordinates,
        time::{Clock, Debounce},
    },
};

use super::presenter::HomeView;

/// Signal-backed home view. Clones share the same signals, map and presenter
/// binding, so the copy stored in the content slot drives the same page.
#[derive(Clone)]
pub struct HomeViewModel {
    pub stories: RwSignal<Vec<Story>>,
    pub filtered: RwSignal<bool>,
    pub statistics: RwSignal<StoryStatistics>,
    pub loading: RwSignal<bool>,
    pub refreshing: RwSignal<bool>,
    pub locating: RwSignal<bool>,
    pub user: RwSignal<Option<CurrentUser>>,
    pub access: RwSignal<AccessLevel>,
    pub search_text: RwSignal<String>,
    pub filter: RwSignal<LocationFilter>,
    pub sort: RwSignal<SortOrder>,
    pub now: RwSignal<DateTime<Utc>>,
    pub map_error: RwSignal<Option<String>>,
    map_stories: StoredValue<Vec<Story>>,
    shell: ShellState,
    clock: Rc<dyn Clock>,
    map: MapSlot,
    search_debounce: Debounce,
    presenter: Rc<RefCell<Weak<HomePresenter>>>,
}

impl HomeViewModel {
    pub fn new(shell: ShellState, clock: Rc<dyn Clock>) -> Self {
        let now = clock.now();
        Self {
            stories: create_rw_signal(Vec::new()),
            filtered: create_rw_signal(false),
            statistics: create_rw_signal(StoryStatistics::default()),
            loading: create_rw_signal(true),
            refreshing: create_rw_signal(false),
            locating: create_rw_signal(false),
            user: create_rw_signal(None),
            access: create_rw_signal(AccessLevel::Anonymous),
            search_text: create_rw_signal(String::new()),
            filter: create_rw_signal(LocationFilter::All),
            sort: create_rw_signal(SortOrder::Newest),
            now: create_rw_signal(now),
            map_error: create_rw_signal(None),
            map_stories: store_value(Vec::new()),
            shell,
            clock,
            map: MapSlot::default(),
            search_debounce: Debounce::default(),
            presenter: Rc::new(RefCell::new(Weak::new())),
        }
    }

    pub fn bind(&self, presenter: &Rc<HomePresenter>) {
        self.presenter.replace(Rc::downgrade(presenter));
    }

    fn presenter(&self) -> Option<Rc<HomePresenter>> {
        self.presenter.borrow().upgrade()
    }

    fn run<Fut>(&self, f: impl FnOnce(Rc<HomePresenter>) -> Fut)
    where
        Fut: Future<Output = ()> + 'static,
    {
        if let Some(presenter) = self.presenter() {
            spawn_local(f(presenter));
        }
    }

    pub fn search_input(&self, text: String) {
        self.search_text.set(text.clone());
        let presenter = self.presenter.clone();
        self.search_debounce
            .call(config::current().search_debounce_ms, move || {
                if let Some(presenter) = presenter.borrow().upgrade() {
                    presenter.on_search(&text);
                }
            });
    }

    /// Enter in the search box skips the debounce.
    pub fn submit_search(&self) {
        self.search_debounce.cancel();
        if let Some(presenter) = self.presenter() {
            presenter.on_search(&self.search_text.get_untracked());
        }
    }

    pub fn clear_search(&self) {
        self.search_debounce.cancel();
        self.search_text.set(String::new());
        if let Some(presenter) = self.presenter() {
            presenter.on_clear_search();
        }
    }

    pub fn select_filter(&self, value: &str) {
        if let Some(presenter) = self.presenter() {
            presenter.on_filter(LocationFilter::parse(value));
        }
    }

    pub fn select_sort(&self, value: &str) {
        if let Some(presenter) = self.presenter() {
            presenter.on_sort(SortOrder::parse(value));
        }
    }

    pub fn refresh(&self) {
        self.run(|presenter| async move { presenter.on_refresh().await });
    }

    pub fn center_on_me(&self) {
        self.run(|presenter| async move { presenter.on_center_on_me().await });
    }

    pub fn fit_markers(&self) {
        if let Some(presenter) = self.presenter() {
            presenter.on_fit_markers();
        }
    }

    pub fn add_story(&self) {
        if let Some(presenter) = self.presenter() {
            presenter.on_add_story();
        }
    }

    pub fn sign_in(&self) {
        if let Some(presenter) = self.presenter() {
            presenter.on_sign_in();
        }
    }

    pub fn logout(&self) {
        if let Some(presenter) = self.presenter() {
            presenter.on_logout();
        }
    }

    /// Mounts the map into its container and draws whatever arrived earlier.
    pub fn mount_map(&self, container: &web_sys::HtmlElement) {
        let app = config::current();
        match self
            .map
            .mount(container, app.default_map_center, app.default_map_zoom)
        {
            Ok(()) => {
                self.map_error.set(None);
                let stories = self.map_stories.get_value();
                self.map.with(|map| {
                    map.refresh_size();
                    map.show_stories(&stories);
                });
            }
            Err(err) => {
                log::error!("map mount failed: {}", err);
                self.map_error.set(Some(err.user_message()));
            }
        }
    }

    pub fn is_member(&self) -> bool {
        self.access.get() == AccessLevel::Member
    }
}

impl HomeView for HomeViewModel {
    fn render(&self) {
        self.shell.show(PageContent::Home(self.clone()));
    }

    fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
    }

    fn set_refreshing(&self, refreshing: bool) {
        self.refreshing.set(refreshing);
    }

    fn set_locating(&self, locating: bool) {
        self.locating.set(locating);
    }

    fn show_stories(&self, stories: Vec<Story>, filtered: bool) {
        self.now.set(self.clock.now());
        self.filtered.set(filtered);
        self.stories.set(stories);
    }

    fn show_query(&self, query: &StoryQuery) {
        self.filter.set(query.filter);
        self.sort.set(query.sort);
    }

    fn show_statistics(&self, statistics: StoryStatistics) {
        self.statistics.set(statistics);
    }

    fn show_account(&self, user: Option<CurrentUser>, access: AccessLevel) {
        self.user.set(user);
        self.access.set(access);
    }

    fn show_map_stories(&self, stories: Vec<Story>) {
        self.map.with(|map| map.show_stories(&stories));
        self.map_stories.set_value(stories);
    }

    fn fit_map(&self) -> bool {
        self.map.with(|map| map.fit_to_markers()).unwrap_or(false)
    }

    fn center_map_on(&self, at: Coordinates) {
        self.map.with(|map| map.mark_current_location(at));
    }

    fn release_map(&self) {
        self.search_debounce.cancel();
        self.map.release();
    }
}
