use crate::dashboards::SalesOverviewDashboard;
use crate::domain::a001_sales_order::ui::DealsPage;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::Shell;
use crate::shared::channel::DashboardChannel;
use crate::shared::config::FrontendConfig;
use crate::shared::toast::{ToastHost, Toasts};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;
use thaw::ConfigProvider;

#[component]
pub fn App() -> impl IntoView {
    let config = FrontendConfig::from_env();
    log::info!("dashboard api: {}", config.api_url);

    // One channel for the whole app; every page reads the same row store.
    let channel = DashboardChannel::new(config);
    channel.connect();
    on_cleanup(move || channel.disconnect());
    provide_context(channel);

    provide_context(Toasts::new());

    let ctx = AppGlobalContext::new();
    ctx.start_clock();
    provide_context(ctx);

    view! {
        <ConfigProvider>
            <Router>
                <Shell>
                    <Routes fallback=|| view! { <div class="not-found">"Página não encontrada"</div> }>
                        <Route path=path!("/") view=SalesOverviewDashboard />
                        <Route path=path!("/deals") view=DealsPage />
                    </Routes>
                </Shell>
            </Router>
            <ToastHost />
        </ConfigProvider>
    }
}
