use contracts::dashboards::d400_sales_overview::metrics::share_percent;
use contracts::dashboards::d400_sales_overview::SeriesPoint;
use contracts::shared::money::format_brl;
use leptos::prelude::*;

/// Ranked bar list of a grouped series; clicking a row reports its name.
#[component]
pub fn BreakdownList(
    #[prop(into)]
    title: String,
    #[prop(into)]
    series: Signal<Vec<SeriesPoint>>,
    /// Highlighted entry (the active state filter)
    #[prop(optional, into)]
    selected: Option<Signal<Option<String>>>,
    #[prop(optional)]
    on_select: Option<Callback<String>>,
    #[prop(default = 10)]
    limit: usize,
) -> impl IntoView {
    let rows = move || {
        let all = series.get();
        let top = all.first().map(|p| p.value).unwrap_or(0.0);
        all.iter()
            .take(limit)
            .map(|point| {
                let width = if top > 0.0 { point.value / top * 100.0 } else { 0.0 };
                let tooltip = format!("{:.1}% do total", share_percent(point, &all));
                (point.clone(), width, tooltip)
            })
            .collect::<Vec<_>>()
    };

    view! {
        <div class="breakdown">
            <h3 class="breakdown__title">{title}</h3>
            <Show
                when=move || !series.get().is_empty()
                fallback=|| view! { <div class="breakdown__empty">"Sem dados"</div> }
            >
                <ul class="breakdown__list">
                    {move || rows().into_iter().map(|(point, width, tooltip)| {
                        let name = point.name.clone();
                        let is_selected = {
                            let name = name.clone();
                            move || selected.map(|s| s.get().as_deref() == Some(name.as_str())).unwrap_or(false)
                        };
                        let base = if on_select.is_some() {
                            "breakdown__row breakdown__row--clickable"
                        } else {
                            "breakdown__row"
                        };
                        let row_class = move || {
                            if is_selected() {
                                format!("{} breakdown__row--selected", base)
                            } else {
                                base.to_string()
                            }
                        };
                        let click_name = name.clone();
                        view! {
                            <li
                                class=row_class
                                title=tooltip
                                on:click=move |_| {
                                    if let Some(cb) = on_select {
                                        cb.run(click_name.clone());
                                    }
                                }
                            >
                                <span class="breakdown__name">{name}</span>
                                <span class="breakdown__value">{format_brl(point.value, 2)}</span>
                                <div class="breakdown__bar" style=format!("width: {:.1}%;", width)></div>
                            </li>
                        }
                    }).collect_view()}
                </ul>
            </Show>
        </div>
    }
}
