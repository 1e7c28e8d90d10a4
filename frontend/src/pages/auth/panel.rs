use leptos::{ev::KeyboardEvent, *};

use crate::pages::auth::{
    components::{LoginForm, RegisterForm},
    presenter::AuthMode,
    AuthViewModel,
};

#[component]
fn ModeTab(vm: AuthViewModel, mode: AuthMode, label: &'static str) -> impl IntoView {
    let active = vm.mode;
    let is_active = move || active.get() == mode;
    view! {
        <button
            type="button"
            role="tab"
            class=move || {
                if is_active() {
                    "flex-1 rounded-lg bg-white px-4 py-2 text-sm font-semibold text-blue-700 shadow"
                } else {
                    "flex-1 rounded-lg px-4 py-2 text-sm font-medium text-slate-600 hover:text-slate-900"
                }
            }
            aria-selected=move || is_active().to_string()
            on:click=move |_| vm.switch_mode(mode)
        >
            {label}
        </button>
    }
}

#[component]
pub fn AuthPanel(vm: AuthViewModel) -> impl IntoView {
    let mode = vm.mode;
    let on_keydown = {
        let vm = vm.clone();
        move |ev: KeyboardEvent| match ev.key().as_str() {
            "Enter" if ev.ctrl_key() || ev.meta_key() => {
                ev.prevent_default();
                vm.submit();
            }
            "Escape" => vm.clear(),
            _ => {}
        }
    };
    let login_vm = vm.clone();
    let register_vm = vm.clone();
    let guest_vm = vm.clone();

    view! {
        <section class="mx-auto max-w-md space-y-6 py-8" on:keydown=on_keydown>
            <header class="text-center">
                <h1 class="text-2xl font-bold text-slate-900">
                    <i class="fas fa-user-circle mr-2" aria-hidden="true"></i>
                    "Autentikasi"
                </h1>
                <p class="mt-1 text-sm text-slate-500">"Masuk atau daftar untuk mulai berbagi cerita"</p>
            </header>
            <div class="flex gap-2 rounded-xl bg-slate-100 p-1" role="tablist">
                <ModeTab vm=vm.clone() mode=AuthMode::Login label="Masuk" />
                <ModeTab vm=vm.clone() mode=AuthMode::Register label="Daftar" />
            </div>
            <div class="rounded-xl bg-white p-6 shadow">
                <Show
                    when=move || mode.get() == AuthMode::Login
                    fallback=move || view! { <RegisterForm vm=register_vm.clone() /> }
                >
                    <LoginForm vm=login_vm.clone() />
                </Show>
            </div>
            <div class="text-center">
                <p class="text-sm text-slate-500">"Ingin mencoba tanpa akun?"</p>
                <button
                    type="button"
                    class="mt-2 inline-flex items-center gap-2 rounded-lg border border-slate-300 px-4 py-2 text-sm font-medium text-slate-700 hover:bg-slate-50"
                    on:click=move |_| guest_vm.continue_as_guest()
                >
                    <i class="fas fa-user-secret" aria-hidden="true"></i>
                    "Lanjutkan sebagai Guest"
                </button>
            </div>
        </section>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::navigation::ShellState;
    use crate::pages::auth::presenter::AuthView;
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn login_mode_shows_login_form() {
        let html = render_to_string(|| {
            let vm = AuthViewModel::new(ShellState::new());
            view! { <AuthPanel vm=vm /> }
        });
        assert!(html.contains("Autentikasi"));
        assert!(html.contains("login-form"));
        assert!(!html.contains("register-form"));
        assert!(html.contains("Lanjutkan sebagai Guest"));
    }

    #[test]
    fn register_mode_shows_register_form() {
        let html = render_to_string(|| {
            let vm = AuthViewModel::new(ShellState::new());
            vm.show_mode(AuthMode::Register);
            view! { <AuthPanel vm=vm /> }
        });
        assert!(html.contains("register-form"));
        assert!(!html.contains("login-form"));
    }
}
