use contracts::domain::a001_sales_order::OrderStatus;
use leptos::prelude::*;

/// Colored pill for a deal status.
#[component]
pub fn StatusBadge(status: OrderStatus) -> impl IntoView {
    let variant = match status {
        OrderStatus::Won => "badge--success",
        OrderStatus::Lost => "badge--error",
        OrderStatus::InProgress => "badge--warning",
        OrderStatus::Other(_) => "badge--neutral",
    };

    view! {
        <span class=format!("badge {}", variant)>{status.label().to_string()}</span>
    }
}
