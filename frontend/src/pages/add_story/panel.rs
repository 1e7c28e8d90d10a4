use leptos::{
    ev::{self, KeyboardEvent, SubmitEvent},
    *,
};

use crate::pages::add_story::{
    components::{DescriptionField, LocationSection, PhotoSection, StoryPreview},
    AddStoryViewModel,
};

#[component]
pub fn AddStoryPanel(vm: AddStoryViewModel) -> impl IntoView {
    let unsaved = vm.unsaved;
    let submitting = vm.submitting;
    let errors = vm.errors;
    let as_guest = vm.as_guest;

    // Warn before the tab is closed with a draft in progress.
    let unload = window_event_listener(ev::beforeunload, move |ev| {
        if unsaved.get_untracked() {
            ev.prevent_default();
            ev.set_return_value("");
        }
    });
    on_cleanup(move || unload.remove());

    let on_keydown = {
        let vm = vm.clone();
        move |ev: KeyboardEvent| match ev.key().as_str() {
            "Enter" if ev.ctrl_key() || ev.meta_key() => {
                ev.prevent_default();
                vm.submit();
            }
            "Escape" => vm.cancel(),
            _ => {}
        }
    };
    let on_submit = {
        let vm = vm.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            vm.submit();
        }
    };
    let cancel_vm = vm.clone();
    let gate_vm = vm.clone();

    view! {
        <section class="mx-auto max-w-3xl space-y-6 py-8" on:keydown=on_keydown>
            <header>
                <h1 class="text-2xl font-bold text-slate-900">
                    <i class="fas fa-plus mr-2" aria-hidden="true"></i>
                    "Tambah Story Baru"
                </h1>
                <p class="mt-1 text-sm text-slate-500">
                    "Bagikan cerita menarik Anda kepada komunitas Dicoding"
                </p>
                <Show when=move || as_guest.get()>
                    <p class="mt-2 rounded-lg bg-amber-50 p-3 text-sm text-amber-800">
                        <i class="fas fa-user-secret mr-2" aria-hidden="true"></i>
                        "Anda menambahkan story sebagai guest."
                    </p>
                </Show>
            </header>
            <form id="add-story-form" class="space-y-6 rounded-xl bg-white p-6 shadow" novalidate on:submit=on_submit>
                <h2 class="text-lg font-semibold text-slate-900">
                    <i class="fas fa-edit mr-2" aria-hidden="true"></i>
                    "Detail Story"
                </h2>
                <DescriptionField vm=vm.clone() />
                <PhotoSection vm=vm.clone() />
                <LocationSection vm=vm.clone() />
                <Show when=move || errors.with(|e| !e.is_empty())>
                    <ul class="list-inside list-disc rounded-lg bg-red-50 p-3 text-sm text-red-700" role="alert">
                        <For
                            each=move || errors.get()
                            key=|message| message.clone()
                            children=|message| view! { <li>{message}</li> }
                        />
                    </ul>
                </Show>
                <div class="flex justify-end gap-3">
                    <button
                        type="button"
                        id="cancel-btn"
                        class="inline-flex items-center gap-2 rounded-lg border border-slate-300 px-4 py-2 text-sm text-slate-700 hover:bg-slate-50"
                        on:click=move |_| cancel_vm.cancel()
                    >
                        <i class="fas fa-times" aria-hidden="true"></i>
                        "Batal"
                    </button>
                    <button
                        type="submit"
                        id="submit-btn"
                        class="inline-flex items-center gap-2 rounded-lg bg-blue-600 px-4 py-2 text-sm font-semibold text-white hover:bg-blue-700 disabled:bg-slate-400"
                        disabled=move || submitting.get() || !gate_vm.can_submit()
                    >
                        <i
                            class=move || if submitting.get() { "fas fa-spinner animate-spin" } else { "fas fa-paper-plane" }
                            aria-hidden="true"
                        ></i>
                        <span>{move || if submitting.get() { "Membagikan..." } else { "Bagikan Story" }}</span>
                    </button>
                </div>
            </form>
            <StoryPreview vm=vm />
        </section>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::navigation::ShellState;
    use crate::pages::add_story::AddStoryView;
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn empty_draft_renders_disabled_submit() {
        let html = render_to_string(|| {
            let vm = AddStoryViewModel::new(ShellState::new());
            view! { <AddStoryPanel vm=vm /> }
        });
        assert!(html.contains("Tambah Story Baru"));
        assert!(html.contains("sebagai guest"));
        assert!(html.contains("Bagikan Story"));
        assert!(html.contains("disabled"));
    }

    #[test]
    fn errors_and_busy_state_render() {
        let html = render_to_string(|| {
            let vm = AddStoryViewModel::new(ShellState::new());
            vm.show_author(false);
            vm.show_errors(vec!["Deskripsi story harus minimal 10 karakter".into()]);
            vm.set_submitting(true);
            view! { <AddStoryPanel vm=vm /> }
        });
        assert!(!html.contains("sebagai guest"));
        assert!(html.contains("Deskripsi story harus minimal 10 karakter"));
        assert!(html.contains("Membagikan..."));
    }
}
