use leptos::*;

use crate::state::notification::{NoticeKind, ToastStore};

fn toast_style(kind: NoticeKind) -> (&'static str, &'static str) {
    match kind {
        NoticeKind::Success => ("border-green-300 bg-green-50 text-green-800", "fas fa-check-circle"),
        NoticeKind::Info => ("border-blue-300 bg-blue-50 text-blue-800", "fas fa-info-circle"),
        NoticeKind::Warning => ("border-amber-300 bg-amber-50 text-amber-800", "fas fa-exclamation-triangle"),
        NoticeKind::Error => ("border-red-300 bg-red-50 text-red-800", "fas fa-times-circle"),
    }
}

#[component]
pub fn ToastList(store: ToastStore) -> impl IntoView {
    view! {
        <div
            id="notification-container"
            class="fixed top-4 right-4 z-50 flex w-80 flex-col gap-2"
            aria-live="polite"
        >
            <For
                each=move || store.toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let (tone, icon) = toast_style(toast.kind);
                    let id = toast.id;
                    view! {
                        <div
                            class=format!("flex items-start gap-3 rounded-lg border p-3 shadow {}", tone)
                            role=if toast.kind == NoticeKind::Error { "alert" } else { "status" }
                        >
                            <i class=icon aria-hidden="true"></i>
                            <div class="flex-1">
                                <p class="text-sm font-semibold">{toast.kind.title()}</p>
                                <p class="text-sm">{toast.message}</p>
                            </div>
                            <button
                                type="button"
                                class="text-sm opacity-70 hover:opacity-100"
                                aria-label="Tutup notifikasi"
                                on:click=move |_| store.dismiss(id)
                            >
                                <i class="fas fa-times" aria-hidden="true"></i>
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
