use async_trait::async_trait;
use std::cell::Cell;
use std::rc::Rc;

use crate::{
    error::AppError,
    navigation::{Presenter, RouteName},
    pages::PageServices,
    state::validation,
};

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login berhasil! Selamat datang kembali";
pub const REGISTER_SUCCESS_MESSAGE: &str =
    "Registrasi berhasil! Silakan login dengan akun baru Anda";
pub const GUEST_MESSAGE: &str =
    "Melanjutkan sebagai guest. Anda dapat menambahkan story tanpa registrasi";
pub const UNREACHABLE_MESSAGE: &str =
    "Tidak dapat terhubung ke server. Periksa koneksi internet Anda";
const LOGIN_PASSWORD_MIN_CHARS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthField {
    LoginEmail,
    LoginPassword,
    RegisterName,
    RegisterEmail,
    RegisterPassword,
}

impl AuthField {
    pub fn id(self) -> &'static str {
        match self {
            Self::LoginEmail => "login-email",
            Self::LoginPassword => "login-password",
            Self::RegisterName => "register-name",
            Self::RegisterEmail => "register-email",
            Self::RegisterPassword => "register-password",
        }
    }
}

pub trait AuthView {
    fn render(&self);
    fn show_mode(&self, mode: AuthMode);
    fn set_submitting(&self, mode: AuthMode, submitting: bool);
    fn show_field_error(&self, field: AuthField, message: &str);
    fn clear_errors(&self);
    fn prefill_login_email(&self, email: &str);
    fn clear_forms(&self);
}

pub fn login_field_errors(email: &str, password: &str) -> Vec<(AuthField, String)> {
    let mut errors = Vec::new();
    if let Some(message) = validation::email_error(email) {
        errors.push((AuthField::LoginEmail, message));
    }
    if password.is_empty() {
        errors.push((AuthField::LoginPassword, "Password tidak boleh kosong".into()));
    } else if password.chars().count() < LOGIN_PASSWORD_MIN_CHARS {
        errors.push((AuthField::LoginPassword, "Password minimal 8 karakter".into()));
    }
    errors
}

/// First failed rule per field, for inline display.
pub fn register_field_errors(name: &str, email: &str, password: &str) -> Vec<(AuthField, String)> {
    let mut errors = Vec::new();
    if let Some(message) = validation::name_error(name) {
        errors.push((AuthField::RegisterName, message));
    }
    if let Some(message) = validation::email_error(email) {
        errors.push((AuthField::RegisterEmail, message));
    }
    if let Some(message) = validation::validate_password_strength(password)
        .into_iter()
        .next()
    {
        errors.push((AuthField::RegisterPassword, message));
    }
    errors
}

pub struct AuthPresenter {
    view: Rc<dyn AuthView>,
    services: PageServices,
    mode: Cell<AuthMode>,
    alive: Cell<bool>,
    busy: Cell<bool>,
}

impl AuthPresenter {
    pub fn new(view: Rc<dyn AuthView>, services: PageServices) -> Rc<Self> {
        Rc::new(Self {
            view,
            services,
            mode: Cell::new(AuthMode::Login),
            alive: Cell::new(false),
            busy: Cell::new(false),
        })
    }

    pub fn mode(&self) -> AuthMode {
        self.mode.get()
    }

    pub fn on_switch_mode(&self, mode: AuthMode) {
        if !self.alive.get() {
            return;
        }
        self.mode.set(mode);
        self.view.clear_errors();
        self.view.show_mode(mode);
    }

    pub fn on_clear(&self) {
        if self.alive.get() {
            self.view.clear_forms();
        }
    }

    fn show_errors(&self, errors: &[(AuthField, String)]) {
        self.view.clear_errors();
        for (field, message) in errors {
            self.view.show_field_error(*field, message);
        }
    }

    pub async fn on_login(&self, email: &str, password: &str) {
        if !self.alive.get() || self.busy.get() {
            return;
        }
        let errors = login_field_errors(email, password);
        if !errors.is_empty() {
            self.show_errors(&errors);
            return;
        }
        self.view.clear_errors();
        self.busy.set(true);
        self.view.set_submitting(AuthMode::Login, true);

        let result = self.services.auth.login(email, password).await;
        self.busy.set(false);
        if !self.alive.get() {
            return;
        }
        self.view.set_submitting(AuthMode::Login, false);
        match result {
            // the navigator reacts to the sign-in event and leaves this page
            Ok(user) => {
                log::info!("signed in as {}", user.user_id);
                self.services.notifier.success(LOGIN_SUCCESS_MESSAGE);
            }
            Err(err) => self.handle_error(err, AuthMode::Login),
        }
    }

    pub async fn on_register(&self, name: &str, email: &str, password: &str) {
        if !self.alive.get() || self.busy.get() {
            return;
        }
        let errors = register_field_errors(name, email, password);
        if !errors.is_empty() {
            self.show_errors(&errors);
            return;
        }
        self.view.clear_errors();
        self.busy.set(true);
        self.view.set_submitting(AuthMode::Register, true);

        let result = self.services.auth.register(name, email, password).await;
        self.busy.set(false);
        if !self.alive.get() {
            return;
        }
        self.view.set_submitting(AuthMode::Register, false);
        match result {
            Ok(_) => {
                self.services.notifier.success(REGISTER_SUCCESS_MESSAGE);
                self.view.clear_forms();
                self.on_switch_mode(AuthMode::Login);
                self.view.prefill_login_email(email.trim());
            }
            Err(err) => self.handle_error(err, AuthMode::Register),
        }
    }

    pub fn on_continue_as_guest(&self) {
        if !self.alive.get() {
            return;
        }
        self.services.auth.continue_as_guest();
        self.services.notifier.info(GUEST_MESSAGE);
        self.services
            .navigator
            .navigate_to(RouteName::AddStory, false);
    }

    /// Server messages naming a credential land on that field; everything
    /// else becomes a toast.
    fn handle_error(&self, err: AppError, mode: AuthMode) {
        log::error!("{:?} failed: {}", mode, err);
        let message = match &err {
            AppError::Api(api) if api.is_network() => {
                self.services.notifier.error(UNREACHABLE_MESSAGE);
                return;
            }
            AppError::Api(api) => api.error.clone(),
            other => other.user_message(),
        };

        let lower = message.to_lowercase();
        match mode {
            AuthMode::Login if lower.contains("email") => self
                .view
                .show_field_error(AuthField::LoginEmail, "Email atau password salah"),
            AuthMode::Register if lower.contains("email") => self
                .view
                .show_field_error(AuthField::RegisterEmail, "Email sudah terdaftar"),
            AuthMode::Login if lower.contains("password") => self
                .view
                .show_field_error(AuthField::LoginPassword, "Password tidak valid"),
            AuthMode::Register if lower.contains("password") => self
                .view
                .show_field_error(AuthField::RegisterPassword, "Password tidak valid"),
            _ => self.services.notifier.error(&message),
        }
    }
}

#[async_trait(?Send)]
impl Presenter for AuthPresenter {
    async fn init(&self) -> Result<(), AppError> {
        self.alive.set(true);
        self.view.render();
        self.view.show_mode(self.mode.get());
        Ok(())
    }

    fn cleanup(&self) -> Result<(), AppError> {
        self.alive.set(false);
        self.view.clear_forms();
        Ok(())
    }
}
