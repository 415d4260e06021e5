use super::global_context::AppGlobalContext;
use crate::shared::channel::DashboardChannel;
use contracts::dashboards::d400_sales_overview::CategoryTab;
use contracts::shared::br_states::state_code;
use contracts::shared::channel::ConnectionState;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_location;

#[component]
pub fn Header() -> impl IntoView {
    let ctx = expect_context::<AppGlobalContext>();
    let channel = expect_context::<DashboardChannel>();
    let pathname = use_location().pathname;
    // Tabs and the state chip filter the dashboard only.
    let on_dashboard = move || pathname.with(|p| p == "/");
    let connection = channel.connection_state();
    let store = channel.store();

    let tabs = CategoryTab::ALL
        .into_iter()
        .map(|tab| {
            let class = move || {
                if ctx.filter.with(|f| f.category == tab) {
                    "category-tab category-tab--active"
                } else {
                    "category-tab"
                }
            };
            view! {
                <button class=class on:click=move |_| ctx.select_category(tab)>
                    {tab.label()}
                </button>
            }
        })
        .collect_view();

    let state_chip = move || {
        let state = ctx.filter.with(|f| f.state.clone()).filter(|_| on_dashboard());
        state.map(|state| {
            let label = match state_code(&state) {
                Some(code) => format!("{} · {}", code, state),
                None => state,
            };
            view! {
                <button class="state-chip" title="Limpar filtro de estado" on:click=move |_| ctx.clear_state()>
                    {label}
                    " ×"
                </button>
            }
        })
    };

    let connection_class = move || match connection.get() {
        ConnectionState::Joined => "connection connection--online",
        ConnectionState::Connecting | ConnectionState::Joining => "connection connection--pending",
        _ => "connection connection--offline",
    };

    let clock = move || ctx.now.get().format("%d/%m/%Y %H:%M:%S").to_string();
    let last_updated = move || {
        store.with(|s| s.last_updated().map(str::to_string))
            .map(|ts| format!("Atualizado: {}", ts))
            .unwrap_or_else(|| "Aguardando dados".to_string())
    };

    view! {
        <header class="top-header">
            <div class="top-header__brand">"Painel de Vendas"</div>
            <nav class="top-header__nav">
                <A href="/">"Dashboard"</A>
                <A href="/deals">"Negócios"</A>
            </nav>
            <div
                class="top-header__tabs"
                style:display=move || if on_dashboard() { "flex" } else { "none" }
            >
                {tabs}
            </div>
            {state_chip}
            <div class="top-header__status">
                <span class=connection_class title=move || connection.get().label()></span>
                <span class="top-header__clock">{clock}</span>
                <span class="top-header__updated">{last_updated}</span>
            </div>
        </header>
    }
}
