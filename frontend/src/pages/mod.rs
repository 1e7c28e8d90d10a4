use std::rc::Rc;

use crate::devices::LocationProvider;
use crate::navigation::Navigate;
use crate::state::{auth::AuthService, notification::Notifier, stories::StoryRepository};

pub mod add_story;
pub mod auth;
pub mod home;

pub use add_story::AddStoryViewModel;
pub use auth::AuthViewModel;
pub use home::HomeViewModel;

/// What the shell's content slot currently shows. Presenters swap it through
/// their view's `render`.
#[derive(Clone, Default)]
pub enum PageContent {
    #[default]
    Empty,
    Home(HomeViewModel),
    Auth(AuthViewModel),
    AddStory(AddStoryViewModel),
    Error(String),
}

/// Shared services handed to every presenter.
#[derive(Clone)]
pub struct PageServices {
    pub auth: AuthService,
    pub stories: StoryRepository,
    pub notifier: Rc<dyn Notifier>,
    pub navigator: Rc<dyn Navigate>,
    pub location: Rc<dyn LocationProvider>,
}
