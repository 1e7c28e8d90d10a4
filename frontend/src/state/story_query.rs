use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::api::Story;
use crate::utils::geo::{haversine_km, Coordinates};

pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 10.0;

pub fn search(stories: &[Story], text: &str) -> Vec<Story> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return stories.to_vec();
    }
    stories
        .iter()
        .filter(|story| {
            story.author_name.to_lowercase().contains(&needle)
                || story.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

pub fn with_location(stories: &[Story]) -> Vec<Story> {
    stories.iter().filter(|s| s.has_location()).cloned().collect()
}

pub fn without_location(stories: &[Story]) -> Vec<Story> {
    stories.iter().filter(|s| !s.has_location()).cloned().collect()
}

pub fn sort_by_date(stories: &[Story], ascending: bool) -> Vec<Story> {
    let mut sorted = stories.to_vec();
    if ascending {
        sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    } else {
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
    sorted
}

pub fn sort_by_author(stories: &[Story]) -> Vec<Story> {
    let mut sorted = stories.to_vec();
    sorted.sort_by_cached_key(|s| s.author_name.to_lowercase());
    sorted
}

/// Stories created within `[start, end]`.
pub fn filter_by_date_range(
    stories: &[Story],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<Story> {
    stories
        .iter()
        .filter(|s| s.created_at >= start && s.created_at <= end)
        .cloned()
        .collect()
}

pub fn filter_near_location(stories: &[Story], center: Coordinates, radius_km: f64) -> Vec<Story> {
    stories
        .iter()
        .filter(|s| {
            s.coordinates()
                .map(|c| haversine_km(center, c) <= radius_km)
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoryStatistics {
    pub total: usize,
    pub with_location: usize,
    pub without_location: usize,
    pub unique_authors: usize,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

pub fn statistics(stories: &[Story]) -> StoryStatistics {
    let with_location = stories.iter().filter(|s| s.has_location()).count();
    let authors: HashSet<&str> = stories.iter().map(|s| s.author_name.as_str()).collect();
    StoryStatistics {
        total: stories.len(),
        with_location,
        without_location: stories.len() - with_location,
        unique_authors: authors.len(),
        oldest: stories.iter().map(|s| s.created_at).min(),
        newest: stories.iter().map(|s| s.created_at).max(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationFilter {
    #[default]
    All,
    WithLocation,
    WithoutLocation,
}

impl LocationFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::WithLocation => "with-location",
            Self::WithoutLocation => "without-location",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "with-location" => Self::WithLocation,
            "without-location" => Self::WithoutLocation,
            _ => Self::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Name,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Name => "name",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "oldest" => Self::Oldest,
            "name" => Self::Name,
            _ => Self::Newest,
        }
    }
}

/// Search text, location filter and sort order applied together by the feed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoryQuery {
    pub search: String,
    pub filter: LocationFilter,
    pub sort: SortOrder,
}

impl StoryQuery {
    pub fn is_filtered(&self) -> bool {
        !self.search.trim().is_empty() || self.filter != LocationFilter::All
    }

    pub fn apply(&self, stories: &[Story]) -> Vec<Story> {
        let found = search(stories, &self.search);
        let filtered = match self.filter {
            LocationFilter::All => found,
            LocationFilter::WithLocation => with_location(&found),
            LocationFilter::WithoutLocation => without_location(&found),
        };
        match self.sort {
            SortOrder::Newest => sort_by_date(&filtered, false),
            SortOrder::Oldest => sort_by_date(&filtered, true),
            SortOrder::Name => sort_by_author(&filtered),
        }
    }
}
