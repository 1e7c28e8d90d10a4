use crate::state::story_query::StoryStatistics;
use leptos::*;

#[component]
pub fn StatsSection(
    statistics: Signal<StoryStatistics>,
    loading: Signal<bool>,
) -> impl IntoView {
    let value = move |pick: fn(&StoryStatistics) -> usize| {
        move || {
            if loading.get() && statistics.get().total == 0 {
                "-".to_string()
            } else {
                pick(&statistics.get()).to_string()
            }
        }
    };

    view! {
        <section class="grid grid-cols-1 gap-4 sm:grid-cols-3" aria-label="Statistik Stories">
            <Metric icon="fas fa-book" label="Total Stories" value=Signal::derive(value(|s| s.total)) />
            <Metric icon="fas fa-map-marked-alt" label="Dengan Lokasi" value=Signal::derive(value(|s| s.with_location)) />
            <Metric icon="fas fa-users" label="Penulis Unik" value=Signal::derive(value(|s| s.unique_authors)) />
        </section>
    }
}

#[component]
fn Metric(icon: &'static str, label: &'static str, value: Signal<String>) -> impl IntoView {
    view! {
        <div class="flex items-center gap-4 p-5 rounded-2xl bg-white border border-gray-100 shadow-sm">
            <div class="flex h-12 w-12 items-center justify-center rounded-full bg-blue-50 text-blue-600">
                <i class=icon aria-hidden="true"></i>
            </div>
            <div>
                <p class="text-2xl font-bold text-slate-900">{move || value.get()}</p>
                <p class="text-xs font-semibold uppercase tracking-wide text-slate-500">{label}</p>
            </div>
        </div>
    }
}
