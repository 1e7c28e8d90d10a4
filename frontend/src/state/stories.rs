use chrono::{DateTime, Duration, Utc};
use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    api::{ApiClient, ApiError, PhotoFile, Story, StoryListQuery, StoryUpload},
    error::AppError,
    state::{
        auth::{AuthService, SignOutReason},
        cache::TimedCache,
        story_query::{self, StoryStatistics},
        validation,
    },
    utils::{geo::Coordinates, time::Clock},
};

pub const STORIES_CACHE_KEY: &str = "stories";

pub fn story_cache_key(id: &str) -> String {
    format!("story:{}", id)
}

/// Draft assembled by the add-story page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewStory {
    pub description: String,
    pub photo: Option<PhotoFile>,
    pub location: Option<Coordinates>,
}

impl NewStory {
    pub fn validate(&self) -> Result<(), AppError> {
        let errors =
            validation::validate_new_story(&self.description, self.photo.as_ref(), self.location);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }

    fn into_upload(self) -> Result<StoryUpload, AppError> {
        self.validate()?;
        let photo = self
            .photo
            .ok_or_else(|| AppError::validation("Foto harus disertakan"))?;
        Ok(StoryUpload {
            description: self.description.trim().to_string(),
            photo,
            location: self.location,
        })
    }
}

#[derive(Debug, Clone)]
enum Cached {
    List(Vec<Story>),
    One(Story),
}

struct RepositoryInner {
    api: ApiClient,
    auth: AuthService,
    clock: Rc<dyn Clock>,
    page_size: u32,
    cache: RefCell<TimedCache<Cached>>,
    snapshot: RefCell<Vec<Story>>,
}

#[derive(Clone)]
pub struct StoryRepository {
    inner: Rc<RepositoryInner>,
}

impl StoryRepository {
    pub fn new(
        api: ApiClient,
        auth: AuthService,
        clock: Rc<dyn Clock>,
        page_size: u32,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            inner: Rc::new(RepositoryInner {
                api,
                auth,
                clock,
                page_size,
                cache: RefCell::new(TimedCache::new(cache_ttl)),
                snapshot: RefCell::new(Vec::new()),
            }),
        }
    }

    fn fresh(&self, key: &str) -> Option<Cached> {
        let now = self.inner.clock.now();
        self.inner.cache.borrow().get_fresh(key, now)
    }

    fn remember(&self, key: String, payload: Cached) {
        let now = self.inner.clock.now();
        self.inner.cache.borrow_mut().insert(key, payload, now);
    }

    fn on_api_error(&self, err: ApiError) -> AppError {
        if err.is_unauthorized() && self.inner.auth.is_authenticated() {
            self.inner.auth.expire(SignOutReason::Unauthorized);
            return AppError::SessionExpired;
        }
        AppError::Api(err)
    }

    /// Feed for the current viewer. Never fails: errors are logged and an
    /// empty feed is returned.
    pub async fn list(&self, force_refresh: bool) -> Vec<Story> {
        if !force_refresh {
            if let Some(Cached::List(stories)) = self.fresh(STORIES_CACHE_KEY) {
                log::debug!("serving {} cached stories", stories.len());
                self.inner.snapshot.replace(stories.clone());
                return stories;
            }
        }

        let query = StoryListQuery::first_page(self.inner.page_size);
        let result = if self.inner.auth.is_authenticated() {
            self.inner.api.list_stories(query).await
        } else {
            self.inner.api.list_stories_anonymous(query).await
        };

        match result {
            Ok(stories) => {
                self.remember(STORIES_CACHE_KEY.to_string(), Cached::List(stories.clone()));
                self.inner.snapshot.replace(stories.clone());
                stories
            }
            Err(err) => {
                log::error!("failed to load stories: {}", err);
                let _ = self.on_api_error(err);
                self.inner.snapshot.replace(Vec::new());
                Vec::new()
            }
        }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Story, AppError> {
        let key = story_cache_key(id);
        if let Some(Cached::One(story)) = self.fresh(&key) {
            return Ok(story);
        }
        let story = self
            .inner
            .api
            .get_story(id)
            .await
            .map_err(|err| self.on_api_error(err))?;
        self.remember(key, Cached::One(story.clone()));
        Ok(story)
    }

    pub async fn add(&self, story: NewStory) -> Result<String, AppError> {
        let upload = story.into_upload()?;
        let response = self
            .inner
            .api
            .add_story(&upload)
            .await
            .map_err(|err| self.on_api_error(err))?;
        self.clear_cache();
        Ok(response.message)
    }

    pub async fn add_as_guest(&self, story: NewStory) -> Result<String, AppError> {
        let upload = story.into_upload()?;
        let response = self
            .inner
            .api
            .add_guest_story(&upload)
            .await
            .map_err(AppError::Api)?;
        self.clear_cache();
        Ok(response.message)
    }

    pub fn clear_cache(&self) {
        self.inner.cache.borrow_mut().clear();
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.inner.cache.borrow_mut().remove(key)
    }

    /// Stories from the last `list` call.
    pub fn snapshot(&self) -> Vec<Story> {
        self.inner.snapshot.borrow().clone()
    }

    pub fn search(&self, text: &str) -> Vec<Story> {
        story_query::search(&self.inner.snapshot.borrow(), text)
    }

    pub fn with_location(&self) -> Vec<Story> {
        story_query::with_location(&self.inner.snapshot.borrow())
    }

    pub fn without_location(&self) -> Vec<Story> {
        story_query::without_location(&self.inner.snapshot.borrow())
    }

    pub fn sort_by_date(&self, ascending: bool) -> Vec<Story> {
        story_query::sort_by_date(&self.inner.snapshot.borrow(), ascending)
    }

    pub fn sort_by_author(&self) -> Vec<Story> {
        story_query::sort_by_author(&self.inner.snapshot.borrow())
    }

    pub fn filter_by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Story> {
        story_query::filter_by_date_range(&self.inner.snapshot.borrow(), start, end)
    }

    pub fn filter_near_location(&self, center: Coordinates, radius_km: f64) -> Vec<Story> {
        story_query::filter_near_location(&self.inner.snapshot.borrow(), center, radius_km)
    }

    pub fn statistics(&self) -> StoryStatistics {
        story_query::statistics(&self.inner.snapshot.borrow())
    }
}
