pub mod description;
pub mod location;
pub mod photo;
pub mod preview;

pub use description::DescriptionField;
pub use location::LocationSection;
pub use photo::PhotoSection;
pub use preview::StoryPreview;
