pub mod header;
pub mod map;
pub mod stats;
pub mod story_card;
pub mod toolbar;

pub use header::HomeHeader;
pub use map::MapSection;
pub use stats::StatsSection;
pub use story_card::{StoryCard, StoryGrid};
pub use toolbar::StoryToolbar;
