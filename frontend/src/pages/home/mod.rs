pub mod components;
pub mod panel;
pub mod presenter;
pub mod view_model;

pub use panel::HomePanel;
pub use presenter::{HomePresenter, HomeView};
pub use view_model::HomeViewModel;
