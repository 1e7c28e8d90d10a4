use leptos::*;

use crate::pages::home::HomeViewModel;

#[component]
pub fn HomeHeader(vm: HomeViewModel) -> impl IntoView {
    let refreshing = vm.refreshing;
    let member = {
        let vm = vm.clone();
        move || vm.is_member()
    };
    let greeting = {
        let user = vm.user;
        move || user.get().map(|u| format!("Halo, {}!", u.name))
    };
    let on_refresh = {
        let vm = vm.clone();
        move |_| vm.refresh()
    };
    let on_add = {
        let vm = vm.clone();
        move |_| vm.add_story()
    };
    let on_sign_in = {
        let vm = vm.clone();
        move |_| vm.sign_in()
    };

    view! {
        <header class="flex flex-col gap-4 md:flex-row md:items-end md:justify-between">
            <div>
                <h1 class="text-2xl font-bold text-slate-900">
                    <i class="fas fa-home mr-2" aria-hidden="true"></i>
                    "Beranda Dicoding Stories"
                </h1>
                <p class="text-sm text-slate-600">"Jelajahi cerita-cerita menarik dari komunitas Dicoding"</p>
                {move || greeting().map(|text| view! { <p class="mt-1 text-sm font-medium text-blue-700">{text}</p> })}
            </div>
            <div class="flex flex-wrap gap-2">
                <button
                    type="button"
                    class="inline-flex items-center gap-2 rounded-lg border border-slate-300 px-4 py-2 text-sm font-medium text-slate-700 hover:bg-slate-50 disabled:opacity-60"
                    disabled=move || refreshing.get()
                    on:click=on_refresh
                >
                    <i
                        class=move || if refreshing.get() { "fas fa-sync-alt animate-spin" } else { "fas fa-sync-alt" }
                        aria-hidden="true"
                    ></i>
                    "Muat Ulang"
                </button>
                <Show
                    when=member
                    fallback=move || view! {
                        <button
                            type="button"
                            class="inline-flex items-center gap-2 rounded-lg bg-blue-600 px-4 py-2 text-sm font-medium text-white hover:bg-blue-700"
                            on:click=on_sign_in.clone()
                        >
                            <i class="fas fa-user" aria-hidden="true"></i>
                            "Login untuk Tambah Story"
                        </button>
                    }
                >
                    <button
                        type="button"
                        class="inline-flex items-center gap-2 rounded-lg bg-blue-600 px-4 py-2 text-sm font-medium text-white hover:bg-blue-700"
                        on:click=on_add.clone()
                    >
                        <i class="fas fa-plus" aria-hidden="true"></i>
                        "Tambah Story"
                    </button>
                </Show>
            </div>
        </header>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::navigation::ShellState;
    use crate::state::{auth::AccessLevel, session::CurrentUser};
    use crate::test_support::{helpers::at, ssr::render_to_string};
    use crate::utils::time::ManualClock;
    use std::rc::Rc;

    fn vm() -> HomeViewModel {
        HomeViewModel::new(ShellState::new(), Rc::new(ManualClock::new(at(2025, 1, 1))))
    }

    #[test]
    fn visitors_are_invited_to_sign_in() {
        let html = render_to_string(|| view! { <HomeHeader vm=vm() /> });
        assert!(html.contains("Muat Ulang"));
        assert!(html.contains("Login untuk Tambah Story"));
        assert!(!html.contains("Halo,"));
    }

    #[test]
    fn members_get_add_story_and_greeting() {
        let html = render_to_string(|| {
            let vm = vm();
            vm.user.set(Some(CurrentUser {
                user_id: "user-1".into(),
                name: "Dimas".into(),
            }));
            vm.access.set(AccessLevel::Member);
            view! { <HomeHeader vm=vm /> }
        });
        assert!(html.contains("Tambah Story"));
        assert!(!html.contains("Login untuk Tambah Story"));
        assert!(html.contains("Halo, Dimas!"));
    }
}
