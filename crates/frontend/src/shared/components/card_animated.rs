//! Thaw [`Card`] with the `card-appear` entrance animation from `dashboard.css`.

use leptos::prelude::*;
use thaw::Card;

/// Use increasing `delay_ms` on sibling cards for a stagger effect.
#[component]
pub fn CardAnimated(
    #[prop(optional)]
    delay_ms: u32,
    #[prop(optional, into)]
    class: String,
    children: Children,
) -> impl IntoView {
    let style = format!("animation: card-appear 0.28s ease-out {}ms both;", delay_ms);

    view! {
        <Card class=class attr:style=style>
            {children()}
        </Card>
    }
}
