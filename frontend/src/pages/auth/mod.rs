pub mod components;
pub mod panel;
pub mod presenter;
pub mod view_model;

pub use panel::AuthPanel;
pub use presenter::{AuthField, AuthMode, AuthPresenter, AuthView};
pub use view_model::AuthViewModel;
