use leptos::*;

fn reload_page() {
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.location().reload() {
            log::error!("reload failed: {:?}", err);
        }
    }
}

/// Rendered into the content slot when a page fails to initialise.
#[component]
pub fn ErrorPage(message: String) -> impl IntoView {
    view! {
        <section class="mx-auto max-w-lg py-16 text-center" role="alert">
            <i class="fas fa-exclamation-triangle text-4xl text-red-500" aria-hidden="true"></i>
            <h1 class="mt-4 text-2xl font-bold text-slate-900">"Error Memuat Halaman"</h1>
            <p class="mt-2 text-sm text-slate-600">{message}</p>
            <button
                type="button"
                class="mt-6 inline-flex items-center gap-2 rounded-lg bg-blue-600 px-4 py-2 text-sm font-semibold text-white hover:bg-blue-700"
                on:click=move |_| reload_page()
            >
                <i class="fas fa-redo" aria-hidden="true"></i>
                "Muat Ulang"
            </button>
        </section>
    }
}
