use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::{
    api::{ApiClient, LoginRequest, RegisterRequest},
    error::{AppError, SESSION_EXPIRED_MESSAGE},
    state::{
        notification::Notifier,
        session::{self, CurrentUser, Session, SessionInfo, StoredUser},
        validation,
    },
    utils::time::Clock,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Anonymous,
    /// Opted into guest mode; allowed past the sign-in gate but never counts
    /// as signed in.
    Guest,
    Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutReason {
    UserRequested,
    Expired,
    Unauthorized,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(CurrentUser),
    SignedOut(SignOutReason),
    GuestEntered,
}

type Listener = Rc<dyn Fn(&AuthEvent)>;

#[derive(Default)]
struct Listeners {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Listener)>>,
}

impl Listeners {
    fn add(&self, listener: Listener) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, listener));
        id
    }

    fn remove(&self, id: u64) {
        self.entries.borrow_mut().retain(|(entry, _)| *entry != id);
    }

    fn snapshot(&self) -> Vec<Listener> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

/// Keeps an auth listener registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.remove(self.id);
        }
    }
}

struct AuthInner {
    api: ApiClient,
    clock: Rc<dyn Clock>,
    notifier: Rc<dyn Notifier>,
    session: RefCell<Option<Session>>,
    guest: Cell<bool>,
    listeners: Rc<Listeners>,
    #[cfg(target_arch = "wasm32")]
    expiry_watch: RefCell<Option<gloo_timers::callback::Interval>>,
}

/// Owner of the signed-in session. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct AuthService {
    inner: Rc<AuthInner>,
}

impl AuthService {
    pub fn new(api: ApiClient, clock: Rc<dyn Clock>, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            inner: Rc::new(AuthInner {
                api,
                clock,
                notifier,
                session: RefCell::new(None),
                guest: Cell::new(false),
                listeners: Rc::new(Listeners::default()),
                #[cfg(target_arch = "wasm32")]
                expiry_watch: RefCell::new(None),
            }),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn subscribe(&self, listener: impl Fn(&AuthEvent) + 'static) -> Subscription {
        let id = self.inner.listeners.add(Rc::new(listener));
        Subscription {
            id,
            listeners: Rc::downgrade(&self.inner.listeners),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    fn emit(&self, event: AuthEvent) {
        log::debug!("auth event: {:?}", event);
        for listener in self.inner.listeners.snapshot() {
            listener(&event);
        }
    }

    /// Rebuilds the session from a persisted token. Expired or unreadable
    /// tokens are discarded. Listeners hear about the change when it differs
    /// from the session held so far, e.g. after a logout in another tab.
    pub fn restore(&self) -> Option<CurrentUser> {
        let storage = self.inner.api.storage();
        let held = self.current_user();
        let Some(token) = self.inner.api.token() else {
            if held.is_some() {
                log::info!("stored token removed, signing out");
                self.clear_local_state();
                self.emit(AuthEvent::SignedOut(SignOutReason::UserRequested));
            }
            return None;
        };
        let now = self.inner.clock.now();
        let profile = session::load_profile(storage.as_ref());
        match Session::from_token(&token, profile.as_ref(), now) {
            Some(restored) if !restored.is_expired(now) => {
                let user = restored.user();
                self.inner.session.replace(Some(restored));
                if held.as_ref() != Some(&user) {
                    self.inner.guest.set(false);
                    self.emit(AuthEvent::SignedIn(user.clone()));
                }
                Some(user)
            }
            _ if held.is_some() => {
                self.expire(SignOutReason::Expired);
                None
            }
            _ => {
                log::info!("discarding stored session");
                self.inner.api.clear_token();
                session::clear_profile(storage.as_ref());
                None
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, AppError> {
        let errors = validation::validate_login(email, password);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        let response = self
            .inner
            .api
            .login(LoginRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await?;

        let result = response.login_result;
        let now = self.inner.clock.now();
        let profile = StoredUser {
            user_id: result.user_id,
            name: result.name,
        };
        let session = match Session::from_token(&result.token, Some(&profile), now) {
            Some(session) if session.is_expired(now) => {
                log::warn!("login returned an already expired token");
                self.inner.api.clear_token();
                return Err(AppError::SessionExpired);
            }
            Some(session) => session,
            None => {
                self.inner.api.clear_token();
                return Err(AppError::Unexpected("Token tidak valid".into()));
            }
        };
        session::store_profile(self.inner.api.storage().as_ref(), &session, now);

        let user = session.user();
        self.inner.session.replace(Some(session));
        self.inner.guest.set(false);
        self.emit(AuthEvent::SignedIn(user.clone()));
        Ok(user)
    }

    /// Creates the account without signing in. Returns the server message.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, AppError> {
        let errors = validation::validate_registration(name, email, password);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        let response = self
            .inner
            .api
            .register(RegisterRequest {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await?;
        Ok(response.message)
    }

    pub fn logout(&self) {
        self.clear_local_state();
        self.emit(AuthEvent::SignedOut(SignOutReason::UserRequested));
    }

    fn clear_local_state(&self) {
        self.inner.api.logout();
        session::clear_profile(self.inner.api.storage().as_ref());
        self.inner.session.replace(None);
        self.inner.guest.set(false);
    }

    /// Forced sign-out. A no-op without a session so repeated 401s raise a
    /// single notice.
    pub fn expire(&self, reason: SignOutReason) {
        if self.inner.session.borrow().is_none() {
            return;
        }
        log::warn!("session ended: {:?}", reason);
        self.clear_local_state();
        self.inner.notifier.warning(SESSION_EXPIRED_MESSAGE);
        self.emit(AuthEvent::SignedOut(reason));
    }

    /// Returns `true` when the session had expired and was cleared.
    pub fn check_expiry(&self) -> bool {
        let now = self.inner.clock.now();
        let expired = self
            .inner
            .session
            .borrow()
            .as_ref()
            .map(|s| s.is_expired(now))
            .unwrap_or(false);
        if expired {
            self.expire(SignOutReason::Expired);
        }
        expired
    }

    pub fn continue_as_guest(&self) {
        if self.is_authenticated() {
            return;
        }
        self.inner.guest.set(true);
        self.emit(AuthEvent::GuestEntered);
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.inner.session.borrow().as_ref().map(Session::user)
    }

    pub fn is_authenticated(&self) -> bool {
        let now = self.inner.clock.now();
        self.inner
            .session
            .borrow()
            .as_ref()
            .map(|s| !s.is_expired(now))
            .unwrap_or(false)
    }

    pub fn is_guest(&self) -> bool {
        self.inner.guest.get() && !self.is_authenticated()
    }

    pub fn access_level(&self) -> AccessLevel {
        if self.is_authenticated() {
            AccessLevel::Member
        } else if self.inner.guest.get() {
            AccessLevel::Guest
        } else {
            AccessLevel::Anonymous
        }
    }

    pub fn session_info(&self) -> Option<SessionInfo> {
        let storage = self.inner.api.storage();
        self.inner.session.borrow().as_ref().map(|s| SessionInfo {
            user: s.user(),
            issued_at: s.issued_at,
            expires_at: s.expires_at,
            last_login: session::last_login(storage.as_ref()),
        })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn start_expiry_watch(&self, interval_ms: u32) {
        let weak = Rc::downgrade(&self.inner);
        let interval = gloo_timers::callback::Interval::new(interval_ms, move || {
            if let Some(inner) = weak.upgrade() {
                AuthService { inner }.check_expiry();
            }
        });
        self.inner.expiry_watch.replace(Some(interval));
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn start_expiry_watch(&self, _interval_ms: u32) {}
}
