use leptos::*;

use crate::{
    components::error::ErrorPage,
    config::APP_NAME,
    navigation::{RouteName, ShellState},
    pages::{
        add_story::AddStoryPanel, auth::AuthPanel, home::HomePanel, PageContent,
    },
    state::{auth::AccessLevel, session::CurrentUser},
};

fn nav_class(active: bool) -> &'static str {
    if active {
        "flex items-center gap-2 px-3 py-2 rounded-md text-sm font-semibold text-blue-700 bg-blue-50"
    } else {
        "flex items-center gap-2 px-3 py-2 rounded-md text-sm font-medium text-slate-600 hover:text-slate-900 hover:bg-slate-100"
    }
}

#[component]
fn NavLinks(
    shell: ShellState,
    access: Signal<AccessLevel>,
    on_logout: Callback<()>,
    #[prop(into)] on_navigate: Callback<()>,
) -> impl IntoView {
    let active = shell.active_route;
    let is_active = move |route: RouteName| active.get() == Some(route);
    let link = move |route: RouteName, icon: &'static str, label: &'static str| {
        view! {
            <a
                href=format!("#{}", route.fragment())
                class=move || nav_class(is_active(route))
                aria-current=move || is_active(route).then_some("page")
                on:click=move |_| on_navigate.call(())
            >
                <i class=icon aria-hidden="true"></i>
                {label}
            </a>
        }
    };

    view! {
        {link(RouteName::Home, "fas fa-home", "Beranda")}
        <Show when=move || access.get() != AccessLevel::Anonymous>
            {link(RouteName::AddStory, "fas fa-plus", "Tambah Story")}
        </Show>
        <Show
            when=move || access.get() == AccessLevel::Member
            fallback=move || link(RouteName::Auth, "fas fa-sign-in-alt", "Masuk")
        >
            <button
                type="button"
                class=nav_class(false)
                on:click=move |_| {
                    on_navigate.call(());
                    on_logout.call(());
                }
            >
                <i class="fas fa-sign-out-alt" aria-hidden="true"></i>
                "Logout"
            </button>
        </Show>
    }
}

#[component]
pub fn Header(
    shell: ShellState,
    user: Signal<Option<CurrentUser>>,
    access: Signal<AccessLevel>,
    on_logout: Callback<()>,
) -> impl IntoView {
    let (menu_open, set_menu_open) = create_signal(false);
    let close_menu = Callback::new(move |_| set_menu_open.set(false));

    view! {
        <header class="bg-white shadow-sm border-b border-slate-200">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <a href="#home" class="flex items-center gap-2 text-xl font-semibold text-slate-900">
                        <i class="fas fa-book-open text-blue-600" aria-hidden="true"></i>
                        {APP_NAME}
                    </a>
                    <div class="flex items-center gap-4">
                        {move || user.get().map(|user| view! {
                            <span class="hidden sm:inline text-sm text-slate-500" id="user-name">
                                {user.name}
                            </span>
                        })}
                        <nav class="hidden lg:flex space-x-2" aria-label="Navigasi utama">
                            <NavLinks shell=shell access=access on_logout=on_logout on_navigate=close_menu />
                        </nav>
                        <button
                            type="button"
                            id="mobile-menu-toggle"
                            class="lg:hidden inline-flex items-center justify-center p-2 rounded-md text-slate-600 hover:bg-slate-100"
                            on:click=move |_| set_menu_open.update(|open| *open = !*open)
                            aria-expanded=move || menu_open.get().to_string()
                            aria-controls="mobile-nav"
                        >
                            <span class="sr-only">
                                {move || if menu_open.get() { "Tutup menu" } else { "Buka menu" }}
                            </span>
                            <i class=move || if menu_open.get() { "fas fa-times" } else { "fas fa-bars" } aria-hidden="true"></i>
                        </button>
                    </div>
                </div>
                <Show when=move || menu_open.get()>
                    <nav id="mobile-nav" class="lg:hidden border-t border-slate-200 px-2 py-3 space-y-1">
                        <NavLinks shell=shell access=access on_logout=on_logout on_navigate=close_menu />
                    </nav>
                </Show>
            </div>
        </header>
    }
}

/// Page area swapped by the active presenter.
#[component]
pub fn ContentSlot(shell: ShellState) -> impl IntoView {
    let content = shell.content;
    view! {
        <main id="page-content" class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8" tabindex="-1">
            {move || match content.get() {
                PageContent::Empty => ().into_view(),
                PageContent::Home(vm) => view! { <HomePanel vm=vm /> }.into_view(),
                PageContent::Auth(vm) => view! { <AuthPanel vm=vm /> }.into_view(),
                PageContent::AddStory(vm) => view! { <AddStoryPanel vm=vm /> }.into_view(),
                PageContent::Error(message) => view! { <ErrorPage message=message /> }.into_view(),
            }}
        </main>
    }
}

/// Full-page overlay shown while a route is being entered.
#[component]
pub fn LoadingOverlay(shell: ShellState) -> impl IntoView {
    let loading = shell.loading;
    view! {
        <Show when=move || loading.get()>
            <div
                id="loading-overlay"
                class="fixed inset-0 z-40 flex items-center justify-center bg-white/70"
                role="status"
                aria-live="polite"
            >
                <LoadingSpinner />
                <span class="sr-only">"Memuat..."</span>
            </div>
        </Show>
    }
}

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="mt-12 border-t border-slate-200 py-6 text-center text-sm text-slate-500">
            {format!("{} - Berbagi cerita bersama komunitas Dicoding", APP_NAME)}
        </footer>
    }
}

#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! {
        <div class="flex justify-center items-center p-8">
            <div class="animate-spin rounded-full h-8 w-8 border-b-2 border-blue-600"></div>
        </div>
    }
}

#[component]
pub fn ErrorMessage(message: String) -> impl IntoView {
    view! {
        <div class="bg-red-50 border border-red-200 text-red-700 px-4 py-3 rounded mb-4" role="alert">
            <div class="flex">
                <div class="flex-shrink-0">
                    <i class="fas fa-exclamation-circle"></i>
                </div>
                <div class="ml-3">
                    <p class="text-sm">{message}</p>
                </div>
            </div>
        </div>
    }
}
