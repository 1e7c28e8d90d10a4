use leptos::*;

use crate::pages::add_story::{view_model::preview_url, AddStoryViewModel};

/// Card showing how the story will look once shared.
#[component]
pub fn StoryPreview(vm: AddStoryViewModel) -> impl IntoView {
    let description = vm.description;
    let photo = vm.photo;
    let location = vm.location;
    let as_guest = vm.as_guest;

    view! {
        <Show when=move || vm.show_preview()>
            <section id="story-preview" class="rounded-xl bg-white p-6 shadow">
                <h3 class="mb-4 text-lg font-semibold text-slate-900">
                    <i class="fas fa-eye mr-2" aria-hidden="true"></i>
                    "Preview Story"
                </h3>
                <div class="grid gap-4 md:grid-cols-2">
                    {move || photo.get().map(|file| view! {
                        <img
                            src=preview_url(&file)
                            alt="Preview foto story"
                            class="w-full rounded-lg object-cover"
                        />
                    })}
                    <div class="space-y-2">
                        <h4 class="font-semibold text-slate-900">
                            {move || if as_guest.get() { "Story dari Guest" } else { "Story dari Anda" }}
                        </h4>
                        <p class="text-sm text-slate-700">{move || description.get().trim().to_string()}</p>
                        <div class="flex gap-3 text-xs text-slate-500">
                            <span>
                                <i class="fas fa-calendar mr-1" aria-hidden="true"></i>
                                "Baru saja"
                            </span>
                            <Show when=move || location.get().is_some()>
                                <span>
                                    <i class="fas fa-map-marker-alt mr-1" aria-hidden="true"></i>
                                    "Dengan lokasi"
                                </span>
                            </Show>
                        </div>
                    </div>
                </div>
            </section>
        </Show>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::navigation::ShellState;
    use crate::pages::add_story::AddStoryView;
    use crate::test_support::{helpers::jpeg, ssr::render_to_string};

    #[test]
    fn hidden_until_description_and_photo() {
        let html = render_to_string(|| {
            let vm = AddStoryViewModel::new(ShellState::new());
            vm.description.set("Sore yang tenang di Kota Tua".into());
            view! { <StoryPreview vm=vm /> }
        });
        assert!(!html.contains("Preview Story"));
    }

    #[test]
    fn member_preview_names_the_author() {
        let html = render_to_string(|| {
            let vm = AddStoryViewModel::new(ShellState::new());
            vm.description.set("Sore yang tenang di Kota Tua".into());
            vm.show_photo(Some(jpeg(4)));
            vm.show_author(false);
            view! { <StoryPreview vm=vm /> }
        });
        assert!(html.contains("Preview Story"));
        assert!(html.contains("Story dari Anda"));
        assert!(html.contains("Sore yang tenang di Kota Tua"));
        assert!(!html.contains("Dengan lokasi"));
    }
}
