use leptos::{html::Div, *};

use crate::components::ErrorMessage;
use crate::pages::home::HomeViewModel;

#[component]
pub fn MapSection(vm: HomeViewModel) -> impl IntoView {
    let container = create_node_ref::<Div>();
    let locating = vm.locating;
    let map_error = vm.map_error;

    {
        let vm = vm.clone();
        container.on_load(move |el| {
            // Leaflet measures the container, so wait until it has been laid out.
            request_animation_frame(move || vm.mount_map(&el));
        });
    }

    let on_center = {
        let vm = vm.clone();
        move |_| vm.center_on_me()
    };
    let on_fit = {
        let vm = vm.clone();
        move |_| vm.fit_markers()
    };

    view! {
        <section class="rounded-2xl bg-white border border-gray-100 shadow-sm" aria-label="Peta Lokasi Stories">
            <div class="flex items-center justify-between border-b border-gray-100 px-5 py-3">
                <h2 class="text-lg font-semibold text-slate-900">
                    <i class="fas fa-map mr-2" aria-hidden="true"></i>
                    "Peta Stories"
                </h2>
                <div class="flex gap-2">
                    <button
                        type="button"
                        class="rounded-lg border border-slate-300 px-3 py-1.5 text-sm text-slate-700 hover:bg-slate-50"
                        on:click=on_fit
                    >
                        <i class="fas fa-expand mr-1" aria-hidden="true"></i>
                        "Tampilkan Semua"
                    </button>
                    <button
                        type="button"
                        class="rounded-lg border border-slate-300 px-3 py-1.5 text-sm text-slate-700 hover:bg-slate-50 disabled:opacity-60"
                        disabled=move || locating.get()
                        on:click=on_center
                    >
                        <i class="fas fa-crosshairs mr-1" aria-hidden="true"></i>
                        {move || if locating.get() { "Mencari Lokasi..." } else { "Lokasi Saya" }}
                    </button>
                </div>
            </div>
            <div class="p-4">
                {move || map_error.get().map(|message| view! {
                    <ErrorMessage message=message />
                })}
                <div
                    id="stories-map"
                    node_ref=container
                    class="h-96 w-full rounded-lg"
                    tabindex="0"
                    role="application"
                    aria-label="Peta interaktif menampilkan lokasi stories"
                ></div>
            </div>
        </section>
    }
}
