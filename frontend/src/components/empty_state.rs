use leptos::*;

/// Placeholder card for a list with nothing to show.
#[component]
pub fn EmptyState(
    #[prop(into)] title: String,
    #[prop(optional, into)] description: Option<String>,
    #[prop(optional, into)] icon: Option<String>,
) -> impl IntoView {
    let icon = icon.unwrap_or_else(|| "fas fa-book-open".to_string());
    view! {
        <div class="text-center py-12 px-4 rounded-lg border-2 border-dashed border-slate-300 bg-slate-50">
            <i class=format!("{} text-4xl text-slate-400", icon) aria-hidden="true"></i>
            <h3 class="mt-3 text-base font-semibold text-slate-800">{title}</h3>
            {description.map(|desc| view! {
                <p class="mt-1 text-sm text-slate-500">{desc}</p>
            })}
        </div>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn renders_title_description_and_icon() {
        let html = render_to_string(|| {
            view! {
                <EmptyState
                    title="Tidak ada hasil"
                    description="Coba kata kunci lain"
                    icon="fas fa-search"
                />
            }
        });
        assert!(html.contains("Tidak ada hasil"));
        assert!(html.contains("Coba kata kunci lain"));
        assert!(html.contains("fas fa-search"));
    }
}
