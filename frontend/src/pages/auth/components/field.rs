use leptos::*;
use web_sys::HtmlInputElement;

use crate::pages::auth::{presenter::AuthField, AuthViewModel};

/// Labelled input bound to one auth form field, with help text and its
/// inline error.
#[component]
pub fn FormField(
    vm: AuthViewModel,
    field: AuthField,
    label: &'static str,
    icon: &'static str,
    input_type: &'static str,
    placeholder: &'static str,
    autocomplete: &'static str,
    help: &'static str,
) -> impl IntoView {
    let id = field.id();
    let help_id = format!("{}-help", id);
    let error_id = format!("{}-error", id);
    let value = vm.field(field);
    let error = {
        let vm = vm.clone();
        Signal::derive(move || vm.error_for(field))
    };
    let (revealed, set_revealed) = create_signal(false);
    let is_password = input_type == "password";

    view! {
        <div class="space-y-1">
            <label for=id class="flex items-center gap-2 text-sm font-medium text-slate-700">
                <i class=icon aria-hidden="true"></i>
                {label}
                " *"
            </label>
            <div class="relative">
                <input
                    id=id
                    type=move || if is_password && revealed.get() { "text" } else { input_type }
                    class=move || {
                        if error.get().is_some() {
                            "block w-full rounded-lg border border-red-400 px-3 py-2 text-sm focus:outline-none focus:ring-2 focus:ring-red-300"
                        } else {
                            "block w-full rounded-lg border border-slate-300 px-3 py-2 text-sm focus:outline-none focus:ring-2 focus:ring-blue-300"
                        }
                    }
                    placeholder=placeholder
                    autocomplete=autocomplete
                    required
                    aria-describedby=help_id.clone()
                    aria-invalid=move || error.get().is_some().to_string()
                    prop:value=move || value.get()
                    on:input=move |ev| {
                        let target = event_target::<HtmlInputElement>(&ev);
                        vm.edit(field, target.value());
                    }
                />
                <Show when=move || is_password>
                    <button
                        type="button"
                        class="absolute right-3 top-1/2 -translate-y-1/2 text-slate-400 hover:text-slate-600"
                        aria-label=move || if revealed.get() { "Sembunyikan password" } else { "Tampilkan password" }
                        on:click=move |_| set_revealed.update(|shown| *shown = !*shown)
                    >
                        <i class=move || if revealed.get() { "fas fa-eye-slash" } else { "fas fa-eye" } aria-hidden="true"></i>
                    </button>
                </Show>
            </div>
            <p id=help_id class="text-xs text-slate-500">{help}</p>
            {move || error.get().map(|message| view! {
                <p id=error_id.clone() class="text-xs text-red-600" role="alert">{message}</p>
            })}
        </div>
    }
}
