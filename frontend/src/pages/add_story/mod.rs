pub mod components;
pub mod panel;
pub mod presenter;
pub mod view_model;

pub use panel::AddStoryPanel;
pub use presenter::{AddStoryPresenter, AddStoryView};
pub use view_model::{AddStoryViewModel, CAMERA_VIDEO_ID};
