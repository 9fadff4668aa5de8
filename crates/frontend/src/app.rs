use leptos::prelude::*;

use crate::pages::metas::MetasPage;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <MetasPage />
    }
}
