use leptos::{html::Div, *};

use crate::components::ErrorMessage;
use crate::pages::add_story::AddStoryViewModel;

#[component]
fn PickerMap(vm: AddStoryViewModel) -> impl IntoView {
    let container = create_node_ref::<Div>();
    let map_error = vm.map_error;
    container.on_load(move |div| {
        request_animation_frame(move || vm.mount_picker(&div));
    });

    view! {
        <div id="location-map-container" class="space-y-2">
            {move || map_error.get().map(|message| view! { <ErrorMessage message=message /> })}
            <div id="location-map" node_ref=container class="h-96 w-full rounded-lg"></div>
        </div>
    }
}

#[component]
pub fn LocationSection(vm: AddStoryViewModel) -> impl IntoView {
    let location = vm.location;
    let locating = vm.locating;
    let picking = vm.picking;
    let current_vm = vm.clone();
    let map_vm = vm.clone();
    let clear_vm = vm.clone();
    let picker_vm = vm.clone();

    view! {
        <div class="space-y-2">
            <span class="text-sm font-medium text-slate-700">"Lokasi Story (Opsional)"</span>
            <div class="flex flex-wrap gap-2">
                <button
                    type="button"
                    id="use-current-location"
                    class="inline-flex items-center gap-2 rounded-lg border border-slate-300 px-3 py-2 text-sm text-slate-700 hover:bg-slate-50 disabled:opacity-60"
                    disabled=move || locating.get()
                    on:click=move |_| current_vm.use_current_location()
                >
                    <i
                        class=move || if locating.get() { "fas fa-spinner animate-spin" } else { "fas fa-crosshairs" }
                        aria-hidden="true"
                    ></i>
                    {move || if locating.get() { "Mendapatkan lokasi..." } else { "Gunakan Lokasi Saat Ini" }}
                </button>
                <button
                    type="button"
                    id="select-on-map"
                    class="inline-flex items-center gap-2 rounded-lg border border-slate-300 px-3 py-2 text-sm text-slate-700 hover:bg-slate-50"
                    on:click=move |_| map_vm.select_on_map()
                >
                    <i class="fas fa-map-marker-alt" aria-hidden="true"></i>
                    "Pilih di Peta"
                </button>
                <Show when=move || location.get().is_some()>
                    <button
                        type="button"
                        id="clear-location"
                        class="inline-flex items-center gap-2 rounded-lg border border-slate-300 px-3 py-2 text-sm text-red-600 hover:bg-red-50"
                        on:click={
                            let vm = clear_vm.clone();
                            move |_| vm.clear_location()
                        }
                    >
                        <i class="fas fa-times" aria-hidden="true"></i>
                        "Hapus Lokasi"
                    </button>
                </Show>
            </div>
            {move || location.get().map(|at| view! {
                <div id="location-display" class="rounded-lg bg-blue-50 p-3 text-sm text-blue-800">
                    <div class="flex items-center gap-2">
                        <i class="fas fa-map-marker-alt" aria-hidden="true"></i>
                        <span>"Lokasi dipilih"</span>
                    </div>
                    <small id="coordinates-text" class="text-xs">
                        {format!("Lat: {:.6}, Lon: {:.6}", at.lat, at.lon)}
                    </small>
                </div>
            })}
            <Show when=move || picking.get()>
                <PickerMap vm=picker_vm.clone() />
            </Show>
            <p class="text-xs text-slate-500">
                "Menambahkan lokasi akan membantu orang lain menemukan story Anda di peta"
            </p>
        </div>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::navigation::ShellState;
    use crate::pages::add_story::AddStoryView;
    use crate::test_support::ssr::render_to_string;
    use crate::utils::geo::Coordinates;

    #[test]
    fn no_location_hides_display_and_clear() {
        let html = render_to_string(|| {
            let vm = AddStoryViewModel::new(ShellState::new());
            view! { <LocationSection vm=vm /> }
        });
        assert!(html.contains("Gunakan Lokasi Saat Ini"));
        assert!(html.contains("Pilih di Peta"));
        assert!(!html.contains("Hapus Lokasi"));
        assert!(!html.contains("location-display"));
        assert!(!html.contains("location-map-container"));
    }

    #[test]
    fn picked_location_shows_coordinates_and_picker() {
        let html = render_to_string(|| {
            let vm = AddStoryViewModel::new(ShellState::new());
            vm.show_location(Some(Coordinates::new(-6.2088, 106.8456)));
            vm.set_picking(true);
            view! { <LocationSection vm=vm /> }
        });
        assert!(html.contains("Lat: -6.208800, Lon: 106.845600"));
        assert!(html.contains("Hapus Lokasi"));
        assert!(html.contains("location-map-container"));
    }
}
