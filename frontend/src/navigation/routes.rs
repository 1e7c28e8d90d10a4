use std::fmt;
use std::rc::Rc;

use super::Presenter;
use crate::state::auth::AccessLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Home,
    AddStory,
    Auth,
}

impl RouteName {
    pub const ALL: [RouteName; 3] = [RouteName::Home, RouteName::AddStory, RouteName::Auth];

    pub fn fragment(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::AddStory => "add-story",
            Self::Auth => "auth",
        }
    }

    pub fn from_fragment(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.fragment() == name)
    }

    pub fn default_title(self) -> &'static str {
        match self {
            Self::Home => "Beranda",
            Self::AddStory => "Tambah Story",
            Self::Auth => "Autentikasi",
        }
    }

    /// Landing route for an empty fragment or an unknown name.
    pub fn default_for(access: AccessLevel) -> Self {
        match access {
            AccessLevel::Anonymous => Self::Auth,
            AccessLevel::Guest | AccessLevel::Member => Self::Home,
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fragment())
    }
}

pub type PresenterFactory = Rc<dyn Fn() -> Rc<dyn Presenter>>;
pub type RouteGuard = Rc<dyn Fn(RouteName) -> bool>;

#[derive(Clone)]
pub struct Route {
    pub name: RouteName,
    pub title: String,
    pub requires_auth: bool,
    factory: PresenterFactory,
    guard: Option<RouteGuard>,
}

impl Route {
    pub fn new(name: RouteName, factory: impl Fn() -> Rc<dyn Presenter> + 'static) -> Self {
        Self {
            name,
            title: name.default_title().to_string(),
            requires_auth: false,
            factory: Rc::new(factory),
            guard: None,
        }
    }

    pub fn requiring_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub fn path(&self) -> String {
        format!("#{}", self.name.fragment())
    }

    pub fn instantiate(&self) -> Rc<dyn Presenter> {
        (self.factory)()
    }

    pub fn set_guard(&mut self, guard: RouteGuard) {
        self.guard = Some(guard);
    }

    /// `true` when no guard is attached or the guard lets the route activate.
    pub fn can_activate(&self) -> bool {
        self.guard.as_ref().map_or(true, |guard| guard(self.name))
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("requires_auth", &self.requires_auth)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

#[derive(Default, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Adds a route, replacing any earlier one with the same name.
    pub fn insert(&mut self, route: Route) {
        self.routes.retain(|existing| existing.name != route.name);
        self.routes.push(route);
    }

    pub fn get(&self, name: RouteName) -> Option<&Route> {
        self.routes.iter().find(|route| route.name == name)
    }

    pub fn get_mut(&mut self, name: RouteName) -> Option<&mut Route> {
        self.routes.iter_mut().find(|route| route.name == name)
    }

    pub fn contains(&self, name: RouteName) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    UnknownRoute,
    SignInRequired,
    AlreadySignedIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Enter(RouteName),
    Redirect { to: RouteName, reason: RedirectReason },
}

/// `#/home?x=1` -> `home`. Only the route name survives.
pub fn route_name_from_fragment(fragment: &str) -> &str {
    let name = fragment.trim_start_matches('#').trim_start_matches('/');
    let name = match name.find('?') {
        Some(idx) => &name[..idx],
        None => name,
    };
    name.trim_end_matches('/')
}

/// One resolution pass: fragment to route, then the sign-in gate. Produces at
/// most one redirect; the redirected pass resolves again from scratch.
pub fn resolve(table: &RouteTable, fragment: &str, access: AccessLevel) -> Resolution {
    let name = route_name_from_fragment(fragment);
    let target = if name.is_empty() {
        RouteName::default_for(access)
    } else {
        match RouteName::from_fragment(name).filter(|route| table.contains(*route)) {
            Some(route) => route,
            None => {
                return Resolution::Redirect {
                    to: RouteName::default_for(access),
                    reason: RedirectReason::UnknownRoute,
                }
            }
        }
    };

    let member = access == AccessLevel::Member;
    if access == AccessLevel::Anonymous && target != RouteName::Auth {
        return Resolution::Redirect {
            to: RouteName::Auth,
            reason: RedirectReason::SignInRequired,
        };
    }
    if member && target == RouteName::Auth {
        return Resolution::Redirect {
            to: RouteName::Home,
            reason: RedirectReason::AlreadySignedIn,
        };
    }
    let requires_auth = table.get(target).map_or(false, |route| route.requires_auth);
    if requires_auth && !member {
        return Resolution::Redirect {
            to: RouteName::Auth,
            reason: RedirectReason::SignInRequired,
        };
    }
    Resolution::Enter(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait(?Send)]
    impl Presenter for Noop {
        async fn init(&self) -> Result<(), AppError> {
            Ok(())
        }

        fn cleanup(&self) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn table() -> RouteTable {
        let mut table = RouteTable::default();
        for name in RouteName::ALL {
            table.insert(Route::new(name, || Rc::new(Noop) as Rc<dyn Presenter>));
        }
        table
    }

    #[test]
    fn fragment_extraction_ignores_prefixes_and_queries() {
        assert_eq!(route_name_from_fragment("#home"), "home");
        assert_eq!(route_name_from_fragment("#/add-story?draft=1"), "add-story");
        assert_eq!(route_name_from_fragment("/auth/"), "auth");
        assert_eq!(route_name_from_fragment("#"), "");
        assert_eq!(route_name_from_fragment(""), "");
    }

    #[test]
    fn empty_fragment_lands_on_default_for_access() {
        let table = table();
        assert_eq!(
            resolve(&table, "", AccessLevel::Anonymous),
            Resolution::Enter(RouteName::Auth)
        );
        assert_eq!(
            resolve(&table, "#", AccessLevel::Member),
            Resolution::Enter(RouteName::Home)
        );
        assert_eq!(
            resolve(&table, "", AccessLevel::Guest),
            Resolution::Enter(RouteName::Home)
        );
    }

    #[test]
    fn unknown_route_redirects_to_default() {
        let table = table();
        assert_eq!(
            resolve(&table, "#settings", AccessLevel::Member),
            Resolution::Redirect {
                to: RouteName::Home,
                reason: RedirectReason::UnknownRoute
            }
        );
        assert_eq!(
            resolve(&table, "#settings", AccessLevel::Anonymous),
            Resolution::Redirect {
                to: RouteName::Auth,
                reason: RedirectReason::UnknownRoute
            }
        );
    }

    #[test]
    fn anonymous_visitors_are_sent_to_sign_in() {
        let table = table();
        for fragment in ["#home", "#add-story"] {
            assert_eq!(
                resolve(&table, fragment, AccessLevel::Anonymous),
                Resolution::Redirect {
                    to: RouteName::Auth,
                    reason: RedirectReason::SignInRequired
                }
            );
        }
        assert_eq!(
            resolve(&table, "#auth", AccessLevel::Anonymous),
            Resolution::Enter(RouteName::Auth)
        );
    }

    #[test]
    fn members_skip_the_sign_in_page() {
        assert_eq!(
            resolve(&table(), "#auth", AccessLevel::Member),
            Resolution::Redirect {
                to: RouteName::Home,
                reason: RedirectReason::AlreadySignedIn
            }
        );
    }

    #[test]
    fn guests_reach_open_routes_but_not_protected_ones() {
        let mut table = table();
        assert_eq!(
            resolve(&table, "#add-story", AccessLevel::Guest),
            Resolution::Enter(RouteName::AddStory)
        );
        assert_eq!(
            resolve(&table, "#auth", AccessLevel::Guest),
            Resolution::Enter(RouteName::Auth)
        );

        table.insert(
            Route::new(RouteName::Home, || Rc::new(Noop) as Rc<dyn Presenter>).requiring_auth(),
        );
        assert_eq!(
            resolve(&table, "#home", AccessLevel::Guest),
            Resolution::Redirect {
                to: RouteName::Auth,
                reason: RedirectReason::SignInRequired
            }
        );
        assert_eq!(
            resolve(&table, "#home", AccessLevel::Member),
            Resolution::Enter(RouteName::Home)
        );
    }

    #[test]
    fn guard_decides_activation() {
        let mut table = table();
        assert!(table.get(RouteName::AddStory).unwrap().can_activate());
        table
            .get_mut(RouteName::AddStory)
            .unwrap()
            .set_guard(Rc::new(|name| name != RouteName::AddStory));
        assert!(!table.get(RouteName::AddStory).unwrap().can_activate());
        assert_eq!(table.get(RouteName::AddStory).unwrap().path(), "#add-story");
    }
}
