use chrono::{DateTime, Utc};
use leptos::*;

use crate::api::Story;
use crate::components::{EmptyState, LoadingSpinner};
use crate::utils::time::{format_relative_date, truncate_text};

const SHORT_DESCRIPTION_CHARS: usize = 150;
const BROKEN_IMAGE: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMzAwIiBoZWlnaHQ9IjIwMCIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj48cmVjdCB3aWR0aD0iMzAwIiBoZWlnaHQ9IjIwMCIgZmlsbD0iI2Y4ZmFmYyIvPjx0ZXh0IHg9IjUwJSIgeT0iNTAlIiBmb250LWZhbWlseT0iQXJpYWwiIGZvbnQtc2l6ZT0iMTQiIGZpbGw9IiM2YjcyODAiIHRleHQtYW5jaG9yPSJtaWRkbGUiIGR5PSIuM2VtIj5HYWdhbCBtZW11YXQgZ2FtYmFyPC90ZXh0Pjwvc3ZnPg==";

fn display_name(story: &Story) -> String {
    if story.author_name.trim().is_empty() {
        "Tanpa Nama".to_string()
    } else {
        story.author_name.clone()
    }
}

#[component]
pub fn StoryCard(story: Story, now: DateTime<Utc>) -> impl IntoView {
    let name = display_name(&story);
    let short = truncate_text(&story.description, SHORT_DESCRIPTION_CHARS);
    let alt = format!("Foto story dari {}: {}", name, short);
    let has_location = story.has_location();
    let date = format_relative_date(story.created_at, now);
    let datetime = story.created_at.to_rfc3339();
    let label = format!("Story dari {}", name);

    view! {
        <article
            class="overflow-hidden rounded-2xl bg-white border border-gray-100 shadow-sm hover:shadow-md transition-shadow"
            data-story-id=story.id.clone()
            aria-label=label
        >
            <div class="relative aspect-video bg-slate-100">
                <img
                    src=story.photo_url.clone()
                    alt=alt
                    class="h-full w-full object-cover"
                    loading="lazy"
                    on:error=move |ev| {
                        use wasm_bindgen::JsCast;
                        if let Some(img) = ev
                            .target()
                            .and_then(|t| t.dyn_into::<web_sys::HtmlImageElement>().ok())
                        {
                            img.set_src(BROKEN_IMAGE);
                        }
                    }
                />
                <Show when=move || has_location>
                    <span
                        class="absolute top-2 right-2 rounded-full bg-blue-600 px-2 py-1 text-xs text-white"
                        title="Story ini memiliki lokasi"
                    >
                        <i class="fas fa-map-marker-alt" aria-hidden="true"></i>
                    </span>
                </Show>
            </div>
            <div class="p-4 space-y-2">
                <h3 class="text-base font-semibold text-slate-900">{name}</h3>
                <p class="text-sm text-slate-600">{short}</p>
                <div class="flex items-center justify-between text-xs text-slate-500">
                    <span>
                        <i class="fas fa-calendar mr-1" aria-hidden="true"></i>
                        <time datetime=datetime>{date}</time>
                    </span>
                    <Show when=move || has_location>
                        <span class="text-blue-600">
                            <i class="fas fa-map-marker-alt mr-1" aria-hidden="true"></i>
                            "Lokasi tersedia"
                        </span>
                    </Show>
                </div>
            </div>
        </article>
    }
}

/// Feed grid with its loading, empty and no-result states.
#[component]
pub fn StoryGrid(
    stories: Signal<Vec<Story>>,
    loading: Signal<bool>,
    filtered: Signal<bool>,
    now: Signal<DateTime<Utc>>,
) -> impl IntoView {
    view! {
        <div role="region" aria-label="Grid stories">
            {move || {
                let list = stories.get();
                if loading.get() && list.is_empty() {
                    view! {
                        <div class="flex items-center justify-center gap-2 py-12 text-sm text-slate-500">
                            <LoadingSpinner />
                            <span>"Memuat stories..."</span>
                        </div>
                    }
                    .into_view()
                } else if list.is_empty() && filtered.get() {
                    view! {
                        <EmptyState
                            icon="fas fa-search"
                            title="Tidak ada hasil"
                            description="Tidak ada stories yang cocok dengan pencarian Anda"
                        />
                    }
                    .into_view()
                } else if list.is_empty() {
                    view! {
                        <EmptyState
                            title="Belum ada stories"
                            description="Jadilah yang pertama membagikan cerita"
                        />
                    }
                    .into_view()
                } else {
                    let now = now.get();
                    view! {
                        <div class="grid grid-cols-1 gap-6 sm:grid-cols-2 lg:grid-cols-3">
                            {list
                                .into_iter()
                                .map(|story| view! { <StoryCard story=story now=now /> })
                                .collect_view()}
                        </div>
                    }
                    .into_view()
                }
            }}
        </div>
    }
}
