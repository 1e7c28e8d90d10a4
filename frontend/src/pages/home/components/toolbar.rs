use leptos::*;

use crate::pages::home::HomeViewModel;
use crate::state::story_query::{LocationFilter, SortOrder};

const FILTERS: [(LocationFilter, &str, &str); 3] = [
    (LocationFilter::All, "Semua", "fas fa-globe"),
    (LocationFilter::WithLocation, "Dengan Lokasi", "fas fa-map-marker-alt"),
    (LocationFilter::WithoutLocation, "Tanpa Lokasi", "fas fa-align-left"),
];

const SORTS: [(SortOrder, &str); 3] = [
    (SortOrder::Newest, "Terbaru"),
    (SortOrder::Oldest, "Terlama"),
    (SortOrder::Name, "Nama A-Z"),
];

/// Search box, location filter buttons and sort select above the feed.
#[component]
pub fn StoryToolbar(vm: HomeViewModel) -> impl IntoView {
    let search = vm.search_text;
    let filter = vm.filter;
    let sort = vm.sort;

    let on_input = {
        let vm = vm.clone();
        move |ev| vm.search_input(event_target_value(&ev))
    };
    let on_keydown = {
        let vm = vm.clone();
        move |ev: ev::KeyboardEvent| match ev.key().as_str() {
            "Enter" => {
                ev.prevent_default();
                vm.submit_search();
            }
            "Escape" => vm.clear_search(),
            _ => {}
        }
    };
    let on_clear = {
        let vm = vm.clone();
        move |_| vm.clear_search()
    };
    let on_sort = {
        let vm = vm.clone();
        move |ev| vm.select_sort(&event_target_value(&ev))
    };

    view! {
        <div class="flex flex-col gap-4 lg:flex-row lg:items-center lg:justify-between">
            <div class="relative flex-1">
                <i class="fas fa-search absolute left-3 top-1/2 -translate-y-1/2 text-slate-400" aria-hidden="true"></i>
                <input
                    id="story-search"
                    type="search"
                    class="w-full rounded-lg border border-slate-300 py-2 pl-10 pr-10 text-sm focus:border-blue-500 focus:outline-none"
                    placeholder="Cari story berdasarkan nama atau deskripsi..."
                    aria-label="Cari stories"
                    prop:value=move || search.get()
                    on:input=on_input
                    on:keydown=on_keydown
                />
                <Show when=move || !search.get().is_empty()>
                    <button
                        type="button"
                        class="absolute right-3 top-1/2 -translate-y-1/2 text-slate-400 hover:text-slate-600"
                        aria-label="Hapus pencarian"
                        on:click=on_clear.clone()
                    >
                        <i class="fas fa-times" aria-hidden="true"></i>
                    </button>
                </Show>
            </div>
            <div class="flex flex-wrap items-center gap-2" role="group" aria-label="Filter lokasi">
                {FILTERS
                    .into_iter()
                    .map(|(value, label, icon)| {
                        let vm = vm.clone();
                        view! {
                            <button
                                type="button"
                                data-filter=value.as_str()
                                class=move || {
                                    if filter.get() == value {
                                        "rounded-full bg-blue-600 px-3 py-1 text-sm font-medium text-white"
                                    } else {
                                        "rounded-full bg-slate-100 px-3 py-1 text-sm font-medium text-slate-700 hover:bg-slate-200"
                                    }
                                }
                                aria-pressed=move || (filter.get() == value).to_string()
                                on:click=move |_| vm.select_filter(value.as_str())
                            >
                                <i class=format!("{} mr-1", icon) aria-hidden="true"></i>
                                {label}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            <div class="flex items-center gap-2">
                <label for="sort-select" class="text-sm text-slate-600">"Urutkan:"</label>
                <select
                    id="sort-select"
                    class="rounded-lg border border-slate-300 px-3 py-2 text-sm"
                    on:change=on_sort
                >
                    {SORTS
                        .into_iter()
                        .map(|(value, label)| {
                            view! {
                                <option value=value.as_str() selected=move || sort.get() == value>
                                    {label}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>
        </div>
    }
}
