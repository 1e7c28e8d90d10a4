use leptos::{ev::SubmitEvent, *};

use crate::pages::auth::{
    components::FormField,
    presenter::{AuthField, AuthMode},
    AuthViewModel,
};

#[component]
fn SubmitButton(
    vm: AuthViewModel,
    mode: AuthMode,
    icon: &'static str,
    label: &'static str,
    busy_label: &'static str,
) -> impl IntoView {
    let submitting = vm.submitting;
    let busy = move || submitting.get() == Some(mode);
    view! {
        <button
            type="submit"
            class="flex w-full items-center justify-center gap-2 rounded-lg bg-blue-600 px-4 py-2 text-sm font-semibold text-white hover:bg-blue-700 disabled:opacity-60"
            disabled=busy
        >
            <i class=move || if busy() { "fas fa-spinner animate-spin" } else { icon } aria-hidden="true"></i>
            <span>{move || if busy() { busy_label } else { label }}</span>
        </button>
    }
}

#[component]
pub fn LoginForm(vm: AuthViewModel) -> impl IntoView {
    let on_submit = {
        let vm = vm.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            vm.submit_login();
        }
    };

    view! {
        <form id="login-form" class="space-y-4" novalidate on:submit=on_submit>
            <div>
                <h2 class="text-lg font-semibold text-slate-900">
                    <i class="fas fa-sign-in-alt mr-2" aria-hidden="true"></i>
                    "Masuk ke Akun"
                </h2>
                <p class="text-sm text-slate-500">"Gunakan email dan password untuk masuk"</p>
            </div>
            <FormField
                vm=vm.clone()
                field=AuthField::LoginEmail
                label="Email"
                icon="fas fa-envelope"
                input_type="email"
                placeholder="nama@email.com"
                autocomplete="username"
                help="Masukkan alamat email yang valid"
            />
            <FormField
                vm=vm.clone()
                field=AuthField::LoginPassword
                label="Password"
                icon="fas fa-lock"
                input_type="password"
                placeholder="Masukkan password"
                autocomplete="current-password"
                help="Password minimal 8 karakter"
            />
            <SubmitButton vm=vm mode=AuthMode::Login icon="fas fa-sign-in-alt" label="Masuk" busy_label="Memproses..." />
        </form>
    }
}

#[component]
pub fn RegisterForm(vm: AuthViewModel) -> impl IntoView {
    let on_submit = {
        let vm = vm.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            vm.submit_register();
        }
    };

    view! {
        <form id="register-form" class="space-y-4" novalidate on:submit=on_submit>
            <div>
                <h2 class="text-lg font-semibold text-slate-900">
                    <i class="fas fa-user-plus mr-2" aria-hidden="true"></i>
                    "Buat Akun Baru"
                </h2>
                <p class="text-sm text-slate-500">"Daftar untuk mulai berbagi cerita"</p>
            </div>
            <FormField
                vm=vm.clone()
                field=AuthField::RegisterName
                label="Nama Lengkap"
                icon="fas fa-user"
                input_type="text"
                placeholder="Nama lengkap Anda"
                autocomplete="name"
                help="Nama harus 2-50 karakter, hanya huruf dan spasi"
            />
            <FormField
                vm=vm.clone()
                field=AuthField::RegisterEmail
                label="Email"
                icon="fas fa-envelope"
                input_type="email"
                placeholder="nama@email.com"
                autocomplete="username"
                help="Email harus unik dan belum terdaftar"
            />
            <FormField
                vm=vm.clone()
                field=AuthField::RegisterPassword
                label="Password"
                icon="fas fa-lock"
                input_type="password"
                placeholder="Buat password yang kuat"
                autocomplete="new-password"
                help="Password minimal 8 karakter dengan huruf kapital, huruf kecil, angka dan karakter khusus"
            />
            <SubmitButton vm=vm mode=AuthMode::Register icon="fas fa-user-plus" label="Daftar" busy_label="Mendaftarkan..." />
        </form>
    }
}
