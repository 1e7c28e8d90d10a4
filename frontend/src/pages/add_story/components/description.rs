use leptos::*;
use web_sys::HtmlTextAreaElement;

use crate::pages::add_story::AddStoryViewModel;
use crate::state::validation::DESCRIPTION_MAX_CHARS;

const COUNTER_WARNING_AT: usize = 800;

fn counter_class(count: usize) -> &'static str {
    if count > DESCRIPTION_MAX_CHARS {
        "text-xs text-red-600"
    } else if count > COUNTER_WARNING_AT {
        "text-xs text-amber-600"
    } else {
        "text-xs text-slate-500"
    }
}

#[component]
pub fn DescriptionField(vm: AddStoryViewModel) -> impl IntoView {
    let description = vm.description;
    let count = {
        let vm = vm.clone();
        Signal::derive(move || vm.char_count())
    };

    view! {
        <div class="space-y-1">
            <label for="story-description" class="text-sm font-medium text-slate-700">
                "Deskripsi Story *"
            </label>
            <textarea
                id="story-description"
                name="description"
                rows="4"
                class="block w-full rounded-lg border border-slate-300 px-3 py-2 text-sm focus:outline-none focus:ring-2 focus:ring-blue-300"
                placeholder="Ceritakan pengalaman menarik Anda di Dicoding..."
                required
                minlength="10"
                maxlength="1000"
                aria-describedby="description-help description-counter"
                prop:value=move || description.get()
                on:input=move |ev| {
                    let target = event_target::<HtmlTextAreaElement>(&ev);
                    vm.edit_description(target.value());
                }
            ></textarea>
            <div class="flex justify-between">
                <p id="description-help" class="text-xs text-slate-500">
                    "Minimal 10 karakter, maksimal 1000 karakter"
                </p>
                <p id="description-counter" class=move || counter_class(count.get())>
                    <span id="char-count">{move || count.get()}</span>
                    "/1000 karakter"
                </p>
            </div>
        </div>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::navigation::ShellState;
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn counter_colour_tracks_length() {
        assert_eq!(counter_class(10), "text-xs text-slate-500");
        assert_eq!(counter_class(801), "text-xs text-amber-600");
        assert_eq!(counter_class(1001), "text-xs text-red-600");
    }

    #[test]
    fn renders_current_count() {
        let html = render_to_string(|| {
            let vm = AddStoryViewModel::new(ShellState::new());
            vm.description.set("Kota Tua".into());
            view! { <DescriptionField vm=vm /> }
        });
        assert!(html.contains("Deskripsi Story *"));
        assert!(html.contains("/1000 karakter"));
        let counter = html
            .split_once("id=\"char-count\"")
            .and_then(|(_, rest)| rest.split_once('>'))
            .and_then(|(_, rest)| rest.split_once("</span>"))
            .map(|(inner, _)| inner.to_string())
            .unwrap();
        assert!(counter.contains('8'));
        assert!(!counter.contains("10"));
    }
}
