pub mod global_context;
pub mod header;

use header::Header;
use leptos::prelude::*;

/// Page frame: header on top, routed content below.
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    view! {
        <div class="app-layout">
            <Header />
            <main class="app-main">
                {children()}
            </main>
        </div>
    }
}
