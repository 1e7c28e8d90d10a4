//! Hash-fragment navigation: resolves `#name` to a route, applies the sign-in
//! gate and keeps exactly one presenter alive at a time.

use async_trait::async_trait;

use crate::error::AppError;

mod host;
mod navigator;
mod routes;


pub use host::{BrowserHost, NavigationHost, ShellState};
pub use navigator::{Navigate, NavigationPhase, Navigator, WeakNavigator};
pub use routes::{
    resolve, route_name_from_fragment, RedirectReason, Resolution, Route, RouteGuard, RouteName,
    RouteTable,
};

/// Page controller owned by the navigator while its route is active.
#[async_trait(?Send)]
pub trait Presenter {
    /// Renders the view and loads initial data.
    async fn init(&self) -> Result<(), AppError>;

    /// Releases devices and listeners. Called once, when the route is left.
    fn cleanup(&self) -> Result<(), AppError>;
}
