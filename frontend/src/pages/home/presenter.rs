use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::{
    api::Story,
    error::AppError,
    navigation::{Presenter, RouteName},
    pages::PageServices,
    state::{
        auth::{AccessLevel, Subscription},
        session::CurrentUser,
        story_query::{LocationFilter, SortOrder, StoryQuery, StoryStatistics},
    },
    utils::geo::Coordinates,
};

pub const REFRESHED_MESSAGE: &str = "Stories berhasil dimuat ulang";
pub const NO_LOCATED_STORIES_MESSAGE: &str = "Tidak ada stories dengan lokasi untuk ditampilkan";
pub const FIT_MARKERS_MESSAGE: &str = "Menampilkan semua stories dengan lokasi";
pub const CENTERED_MESSAGE: &str = "Peta dipusatkan pada lokasi Anda";
pub const LOCATION_FAILED_MESSAGE: &str = "Gagal mendapatkan lokasi Anda";
pub const LOGGED_OUT_MESSAGE: &str = "Anda telah logout";

pub trait HomeView {
    fn render(&self);
    fn set_loading(&self, loading: bool);
    fn set_refreshing(&self, refreshing: bool);
    fn set_locating(&self, locating: bool);
    /// `filtered` tells an empty search result apart from an empty feed.
    fn show_stories(&self, stories: Vec<Story>, filtered: bool);
    fn show_query(&self, query: &StoryQuery);
    fn show_statistics(&self, statistics: StoryStatistics);
    fn show_account(&self, user: Option<CurrentUser>, access: AccessLevel);
    fn show_map_stories(&self, stories: Vec<Story>);
    /// Returns `false` when there is no map to fit.
    fn fit_map(&self) -> bool;
    fn center_map_on(&self, at: Coordinates);
    fn release_map(&self);
}

pub struct HomePresenter {
    me: Weak<HomePresenter>,
    view: Rc<dyn HomeView>,
    services: PageServices,
    query: RefCell<StoryQuery>,
    alive: Cell<bool>,
    subscription: RefCell<Option<Subscription>>,
}

impl HomePresenter {
    pub fn new(view: Rc<dyn HomeView>, services: PageServices) -> Rc<Self> {
        Rc::new_cyclic(|me| Self {
            me: me.clone(),
            view,
            services,
            query: RefCell::new(StoryQuery::default()),
            alive: Cell::new(false),
            subscription: RefCell::new(None),
        })
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    pub fn query(&self) -> StoryQuery {
        self.query.borrow().clone()
    }

    fn show_account(&self) {
        let auth = &self.services.auth;
        self.view.show_account(auth.current_user(), auth.access_level());
    }

    async fn load(&self, force_refresh: bool) {
        self.view.set_loading(true);
        let stories = self.services.stories.list(force_refresh).await;
        if !self.alive.get() {
            return;
        }
        log::debug!("home feed has {} stories", stories.len());
        self.refresh_display();
        self.view.show_statistics(self.services.stories.statistics());
        self.view.show_map_stories(self.services.stories.with_location());
        self.view.set_loading(false);
    }

    fn refresh_display(&self) {
        let query = self.query();
        let shown = query.apply(&self.services.stories.snapshot());
        self.view.show_query(&query);
        self.view.show_stories(shown, query.is_filtered());
    }

    /// Called by the view after its search debounce has elapsed.
    pub fn on_search(&self, text: &str) {
        if !self.alive.get() {
            return;
        }
        self.query.borrow_mut().search = text.trim().to_string();
        self.refresh_display();
    }

    pub fn on_clear_search(&self) {
        self.on_search("");
    }

    pub fn on_filter(&self, filter: LocationFilter) {
        if !self.alive.get() {
            return;
        }
        self.query.borrow_mut().filter = filter;
        self.refresh_display();
    }

    pub fn on_sort(&self, sort: SortOrder) {
        if !self.alive.get() {
            return;
        }
        self.query.borrow_mut().sort = sort;
        self.refresh_display();
    }

    pub async fn on_refresh(&self) {
        if !self.alive.get() {
            return;
        }
        self.view.set_refreshing(true);
        self.load(true).await;
        if !self.alive.get() {
            return;
        }
        self.view.set_refreshing(false);
        self.services.notifier.success(REFRESHED_MESSAGE);
    }

    pub fn on_fit_markers(&self) {
        if !self.alive.get() {
            return;
        }
        if self.services.stories.with_location().is_empty() {
            self.services.notifier.info(NO_LOCATED_STORIES_MESSAGE);
            return;
        }
        if self.view.fit_map() {
            self.services.notifier.success(FIT_MARKERS_MESSAGE);
        }
    }

    pub async fn on_center_on_me(&self) {
        if !self.alive.get() {
            return;
        }
        self.view.set_locating(true);
        let position = self.services.location.current_position().await;
        if !self.alive.get() {
            return;
        }
        self.view.set_locating(false);
        match position {
            Ok(at) => {
                self.view.center_map_on(at);
                self.services.notifier.success(CENTERED_MESSAGE);
            }
            Err(err) => {
                log::warn!("current location unavailable: {}", err);
                self.services.notifier.warning(LOCATION_FAILED_MESSAGE);
            }
        }
    }

    pub fn on_add_story(&self) {
        self.services.navigator.navigate_to(RouteName::AddStory, false);
    }

    pub fn on_sign_in(&self) {
        self.services.navigator.navigate_to(RouteName::Auth, false);
    }

    pub fn on_logout(&self) {
        self.services.auth.logout();
        self.services.notifier.info(LOGGED_OUT_MESSAGE);
    }
}

#[async_trait(?Send)]
impl Presenter for HomePresenter {
    async fn init(&self) -> Result<(), AppError> {
        self.alive.set(true);
        self.view.render();
        self.show_account();

        let me = self.me.clone();
        let subscription = self.services.auth.subscribe(move |_| {
            if let Some(presenter) = me.upgrade().filter(|p| p.is_alive()) {
                presenter.show_account();
            }
        });
        self.subscription.replace(Some(subscription));

        self.load(false).await;
        Ok(())
    }

    fn cleanup(&self) -> Result<(), AppError> {
        self.alive.set(false);
        self.subscription.replace(None);
        self.view.release_map();
        Ok(())
    }
}
