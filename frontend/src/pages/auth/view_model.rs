use leptos::*;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::{
    navigation::ShellState,
    pages::{
        auth::presenter::{AuthField, AuthMode, AuthPresenter, AuthView},
        PageContent,
    },
};

#[derive(Clone)]
pub struct AuthViewModel {
    pub mode: RwSignal<AuthMode>,
    pub login_email: RwSignal<String>,
    pub login_password: RwSignal<String>,
    pub register_name: RwSignal<String>,
    pub register_email: RwSignal<String>,
    pub register_password: RwSignal<String>,
    pub errors: RwSignal<Vec<(AuthField, String)>>,
    pub submitting: RwSignal<Option<AuthMode>>,
    shell: ShellState,
    presenter: Rc<RefCell<Weak<AuthPresenter>>>,
}

impl AuthViewModel {
    pub fn new(shell: ShellState) -> Self {
        Self {
            mode: create_rw_signal(AuthMode::Login),
            login_email: create_rw_signal(String::new()),
            login_password: create_rw_signal(String::new()),
            register_name: create_rw_signal(String::new()),
            register_email: create_rw_signal(String::new()),
            register_password: create_rw_signal(String::new()),
            errors: create_rw_signal(Vec::new()),
            submitting: create_rw_signal(None),
            shell,
            presenter: Rc::new(RefCell::new(Weak::new())),
        }
    }

    pub fn bind(&self, presenter: &Rc<AuthPresenter>) {
        self.presenter.replace(Rc::downgrade(presenter));
    }

    fn presenter(&self) -> Option<Rc<AuthPresenter>> {
        self.presenter.borrow().upgrade()
    }

    pub fn field(&self, field: AuthField) -> RwSignal<String> {
        match field {
            AuthField::LoginEmail => self.login_email,
            AuthField::LoginPassword => self.login_password,
            AuthField::RegisterName => self.register_name,
            AuthField::RegisterEmail => self.register_email,
            AuthField::RegisterPassword => self.register_password,
        }
    }

    pub fn error_for(&self, field: AuthField) -> Option<String> {
        self.errors.with(|errors| {
            errors
                .iter()
                .find(|(f, _)| *f == field)
                .map(|(_, message)| message.clone())
        })
    }

    /// Typing into a field clears its inline error.
    pub fn edit(&self, field: AuthField, value: String) {
        self.field(field).set(value);
        if self.errors.with_untracked(|errors| errors.iter().any(|(f, _)| *f == field)) {
            self.errors.update(|errors| errors.retain(|(f, _)| *f != field));
        }
    }

    pub fn switch_mode(&self, mode: AuthMode) {
        if let Some(presenter) = self.presenter() {
            presenter.on_switch_mode(mode);
        }
    }

    pub fn submit(&self) {
        match self.mode.get_untracked() {
            AuthMode::Login => self.submit_login(),
            AuthMode::Register => self.submit_register(),
        }
    }

    pub fn submit_login(&self) {
        let Some(presenter) = self.presenter() else {
            return;
        };
        let email = self.login_email.get_untracked();
        let password = self.login_password.get_untracked();
        spawn_local(async move { presenter.on_login(&email, &password).await });
    }

    pub fn submit_register(&self) {
        let Some(presenter) = self.presenter() else {
            return;
        };
        let name = self.register_name.get_untracked();
        let email = self.register_email.get_untracked();
        let password = self.register_password.get_untracked();
        spawn_local(async move { presenter.on_register(&name, &email, &password).await });
    }

    pub fn continue_as_guest(&self) {
        if let Some(presenter) = self.presenter() {
            presenter.on_continue_as_guest();
        }
    }

    pub fn clear(&self) {
        if let Some(presenter) = self.presenter() {
            presenter.on_clear();
        }
    }
}

impl AuthView for AuthViewModel {
    fn render(&self) {
        self.shell.show(PageContent::Auth(self.clone()));
    }

    fn show_mode(&self, mode: AuthMode) {
        self.mode.set(mode);
    }

    fn set_submitting(&self, mode: AuthMode, submitting: bool) {
        self.submitting.set(submitting.then_some(mode));
    }

    fn show_field_error(&self, field: AuthField, message: &str) {
        self.errors.update(|errors| {
            errors.retain(|(f, _)| *f != field);
            errors.push((field, message.to_string()));
        });
    }

    fn clear_errors(&self) {
        self.errors.set(Vec::new());
    }

    fn prefill_login_email(&self, email: &str) {
        self.login_email.set(email.to_string());
        self.login_password.set(String::new());
    }

    fn clear_forms(&self) {
        for field in [
            AuthField::LoginEmail,
            AuthField::LoginPassword,
            AuthField::RegisterName,
            AuthField::RegisterEmail,
            AuthField::RegisterPassword,
        ] {
            self.field(field).set(String::new());
        }
        self.errors.set(Vec::new());
    }
}
