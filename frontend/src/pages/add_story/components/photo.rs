use leptos::*;
use web_sys::HtmlInputElement;

use crate::devices::FacingMode;
use crate::pages::add_story::{view_model::preview_url, AddStoryViewModel, CAMERA_VIDEO_ID};

#[component]
fn CameraControls(vm: AddStoryViewModel) -> impl IntoView {
    let active = vm.camera_active;
    let facing = vm.facing;
    let start_vm = vm.clone();
    let capture_vm = vm.clone();
    let switch_vm = vm.clone();

    view! {
        <div class="flex flex-wrap gap-2">
            <Show
                when=move || active.get()
                fallback=move || {
                    let vm = start_vm.clone();
                    view! {
                        <button
                            type="button"
                            class="inline-flex items-center gap-2 rounded-lg bg-blue-600 px-3 py-2 text-sm font-medium text-white hover:bg-blue-700"
                            on:click=move |_| vm.start_camera()
                        >
                            <i class="fas fa-camera" aria-hidden="true"></i>
                            "Buka Kamera"
                        </button>
                    }
                }
            >
                <button
                    type="button"
                    class="inline-flex items-center gap-2 rounded-lg bg-blue-600 px-3 py-2 text-sm font-medium text-white hover:bg-blue-700"
                    on:click={
                        let vm = capture_vm.clone();
                        move |_| vm.capture()
                    }
                >
                    <i class="fas fa-circle" aria-hidden="true"></i>
                    "Ambil Foto"
                </button>
                <button
                    type="button"
                    class="inline-flex items-center gap-2 rounded-lg border border-slate-300 px-3 py-2 text-sm text-slate-700 hover:bg-slate-50"
                    aria-label="Ganti kamera"
                    on:click={
                        let vm = switch_vm.clone();
                        move |_| vm.switch_camera()
                    }
                >
                    <i class="fas fa-sync-alt" aria-hidden="true"></i>
                    {move || match facing.get() {
                        FacingMode::Environment => "Kamera Depan",
                        FacingMode::User => "Kamera Belakang",
                    }}
                </button>
                <button
                    type="button"
                    class="inline-flex items-center gap-2 rounded-lg border border-slate-300 px-3 py-2 text-sm text-slate-700 hover:bg-slate-50"
                    on:click={
                        let vm = vm.clone();
                        move |_| vm.stop_camera()
                    }
                >
                    <i class="fas fa-stop" aria-hidden="true"></i>
                    "Tutup Kamera"
                </button>
            </Show>
        </div>
    }
}

#[component]
pub fn PhotoSection(vm: AddStoryViewModel) -> impl IntoView {
    let active = vm.camera_active;
    let camera_error = vm.camera_error;
    let photo = vm.photo;
    let file_vm = vm.clone();
    let remove_vm = vm.clone();

    view! {
        <div class="space-y-2">
            <span class="text-sm font-medium text-slate-700">"Foto Story *"</span>
            <div id="camera-section" class="space-y-3 rounded-lg border border-dashed border-slate-300 p-4">
                <video
                    id=CAMERA_VIDEO_ID
                    class=move || if active.get() { "w-full rounded-lg bg-black" } else { "hidden" }
                    autoplay
                    playsinline
                    muted
                ></video>
                {move || camera_error.get().map(|message| view! {
                    <div class="flex items-center gap-2 rounded-lg bg-red-50 p-3 text-sm text-red-700" role="alert">
                        <i class="fas fa-camera-slash" aria-hidden="true"></i>
                        <span>{message}</span>
                    </div>
                })}
                {move || photo.get().map(|file| {
                    let vm = remove_vm.clone();
                    view! {
                        <div class="relative">
                            <img
                                id="captured-photo"
                                src=preview_url(&file)
                                alt="Foto yang akan dibagikan"
                                class="max-h-64 w-full rounded-lg object-cover"
                            />
                            <button
                                type="button"
                                class="absolute right-2 top-2 rounded-full bg-white/90 px-2 py-1 text-xs text-red-600 shadow"
                                on:click=move |_| vm.remove_photo()
                            >
                                <i class="fas fa-trash" aria-hidden="true"></i>
                                " Hapus Foto"
                            </button>
                        </div>
                    }
                })}
                <CameraControls vm=vm.clone() />
                <label class="inline-flex cursor-pointer items-center gap-2 text-sm text-blue-700 hover:underline">
                    <i class="fas fa-images" aria-hidden="true"></i>
                    "Pilih dari Galeri"
                    <input
                        type="file"
                        accept="image/jpeg,image/png,image/webp"
                        class="sr-only"
                        on:change=move |ev| {
                            let input = event_target::<HtmlInputElement>(&ev);
                            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                                file_vm.choose_file(file);
                            }
                            input.set_value("");
                        }
                    />
                </label>
            </div>
            <p class="text-xs text-slate-500">
                "Ambil foto menggunakan kamera atau pilih dari galeri (max 1MB)"
            </p>
        </div>
    }
}
