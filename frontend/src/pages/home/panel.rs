use leptos::*;

use crate::pages::home::{
    components::{HomeHeader, MapSection, StatsSection, StoryGrid, StoryToolbar},
    HomeViewModel,
};

#[component]
pub fn HomePanel(vm: HomeViewModel) -> impl IntoView {
    let stories = vm.stories;
    let loading = vm.loading;
    let filtered = vm.filtered;
    let now = vm.now;
    let statistics = vm.statistics;

    view! {
        <div class="space-y-8">
            <HomeHeader vm=vm.clone() />
            <StatsSection statistics=statistics.into() loading=loading.into() />
            <MapSection vm=vm.clone() />
            <section class="space-y-4" aria-label="Daftar Stories">
                <h2 class="text-lg font-semibold text-slate-900">
                    <i class="fas fa-list mr-2" aria-hidden="true"></i>
                    "Stories Terbaru"
                </h2>
                <StoryToolbar vm=vm />
                <StoryGrid
                    stories=stories.into()
                    loading=loading.into()
                    filtered=filtered.into()
                    now=now.into()
                />
            </section>
        </div>
    }
}
