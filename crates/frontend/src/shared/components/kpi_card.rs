use super::card_animated::CardAnimated;
use contracts::dashboards::d400_sales_overview::VolumeSummary;
use contracts::shared::money::format_brl;
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiTone {
    Closed,
    Quoted,
}

impl KpiTone {
    fn class(&self) -> &'static str {
        match self {
            KpiTone::Closed => "kpi-card kpi-card--closed",
            KpiTone::Quoted => "kpi-card kpi-card--quoted",
        }
    }
}

/// Volume card: total on top, today / this month below, optional conversion bar.
#[component]
pub fn KpiCard(
    #[prop(into)]
    label: String,
    tone: KpiTone,
    #[prop(into)]
    volume: Signal<VolumeSummary>,
    /// Closed-over-quoted percentage, shown as a progress bar
    #[prop(optional, into)]
    conversion: Option<Signal<u32>>,
    #[prop(optional)]
    delay_ms: u32,
) -> impl IntoView {
    let total = move || format_brl(volume.get().total, 2);
    let today = move || format_brl(volume.get().today, 2);
    let month = move || format_brl(volume.get().month, 2);

    let conversion_view = conversion.map(|percent| {
        view! {
            <div class="kpi-card__conversion">
                <div class="kpi-card__conversion-label">
                    <span>"Conversão"</span>
                    <span>{move || format!("{}%", percent.get())}</span>
                </div>
                <div class="kpi-card__bar">
                    <div
                        class="kpi-card__bar-fill"
                        style=move || format!("width: {}%;", percent.get().min(100))
                    ></div>
                </div>
            </div>
        }
    });

    view! {
        <CardAnimated delay_ms=delay_ms class=tone.class()>
            <div class="kpi-card__label">{label}</div>
            <div class="kpi-card__value">{total}</div>
            <div class="kpi-card__periods">
                <div>
                    <span class="kpi-card__period-label">"Hoje"</span>
                    <span class="kpi-card__period-value">{today}</span>
                </div>
                <div>
                    <span class="kpi-card__period-label">"Mês"</span>
                    <span class="kpi-card__period-value">{month}</span>
                </div>
            </div>
            {conversion_view}
        </CardAnimated>
    }
}
