pub mod empty_state;
pub mod error;
pub mod layout;
pub mod toast;

pub use empty_state::EmptyState;
pub use error::ErrorPage;
pub use layout::{ContentSlot, ErrorMessage, Footer, Header, LoadingOverlay, LoadingSpinner};
pub use toast::ToastList;
