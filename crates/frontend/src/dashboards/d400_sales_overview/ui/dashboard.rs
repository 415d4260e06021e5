use crate::layout::global_context::AppGlobalContext;
use crate::shared::channel::DashboardChannel;
use crate::shared::components::{BreakdownList, KpiCard, KpiTone};
use contracts::dashboards::d400_sales_overview::compute_metrics;
use leptos::prelude::*;

/// KPI cards over category + state rows; breakdowns over category rows.
#[component]
pub fn SalesOverviewDashboard() -> impl IntoView {
    let ctx = expect_context::<AppGlobalContext>();
    let store = expect_context::<DashboardChannel>().store();

    // Changes only when the header clock crosses midnight.
    let today = Memo::new(move |_| ctx.now.with(|now| now.date_naive()));

    let kpi_metrics = Memo::new(move |_| {
        let rows = store.with(|s| ctx.filter.with(|f| f.kpi_rows(s.rows())));
        compute_metrics(&rows, today.get())
    });
    let breakdown_metrics = Memo::new(move |_| {
        let rows = store.with(|s| ctx.filter.with(|f| f.category_rows(s.rows())));
        compute_metrics(&rows, today.get())
    });

    let closed = Signal::derive(move || kpi_metrics.with(|m| m.closed_volume));
    let quoted = Signal::derive(move || kpi_metrics.with(|m| m.quoted_volume));
    let conversion = Signal::derive(move || kpi_metrics.with(|m| m.conversion_percent()));

    let states = Signal::derive(move || breakdown_metrics.with(|m| m.top_states.clone()));
    let origins = Signal::derive(move || breakdown_metrics.with(|m| m.top_origins.clone()));
    let professionals =
        Signal::derive(move || breakdown_metrics.with(|m| m.top_professionals.clone()));
    let selected_state = Signal::derive(move || ctx.filter.with(|f| f.state.clone()));

    let on_state = Callback::new(move |state: String| ctx.toggle_state(&state));

    view! {
        <div class="dashboard">
            <div class="dashboard__kpis">
                <KpiCard label="Volume fechado" tone=KpiTone::Closed volume=closed delay_ms=0 />
                <KpiCard
                    label="Volume orçado"
                    tone=KpiTone::Quoted
                    volume=quoted
                    conversion=conversion
                    delay_ms=80
                />
            </div>
            <div class="dashboard__breakdowns">
                <BreakdownList
                    title="Vendas por estado"
                    series=states
                    selected=selected_state
                    on_select=on_state
                    limit=27
                />
                <BreakdownList title="Origem" series=origins />
                <BreakdownList title="Profissionais" series=professionals />
            </div>
        </div>
    }
}
