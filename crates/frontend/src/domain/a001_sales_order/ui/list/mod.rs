pub mod state;

use self::state::{visible_deals, DealsDialog, DealsListState};
use super::delete::DeleteOrderModal;
use super::details::{OrderFormModal, OrderFormVm};
use super::use_order_workflow;
use crate::shared::channel::DashboardChannel;
use crate::shared::components::StatusBadge;
use contracts::dashboards::d400_sales_overview::DealColumn;
use contracts::domain::a001_sales_order::{OrderRecord, OrderStatus};
use contracts::shared::money::format_brl;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
pub fn DealsPage() -> impl IntoView {
    let store = expect_context::<DashboardChannel>().store();
    let workflow = use_order_workflow();
    let state = DealsListState::new();

    let deals = Memo::new(move |_| {
        let query = state.search.get();
        let column = state.sort_column.get();
        let ascending = state.sort_ascending.get();
        store.with(|s| visible_deals(s.rows(), &query, column, ascending))
    });

    let change_status = move |id: String, label: String| {
        let status = OrderStatus::parse(&label);
        spawn_local(async move {
            let _ = workflow.update_status(&id, status).await;
        });
    };

    let close_dialog = Callback::new(move |_: ()| state.dialog.set(None));

    let header_cells = DealColumn::ALL
        .into_iter()
        .map(|column| {
            view! {
                <th class="deals-table__sortable" on:click=move |_| state.toggle_sort(column)>
                    {column.label()}
                    {move || state.sort_indicator(column)}
                </th>
            }
        })
        .collect_view();

    let row_view = move |record: OrderRecord| {
        let id = record.id.clone();
        let current = record.status.label().to_string();
        let options = status_options(&record.status);
        let edit_record = record.clone();
        let delete_record = record.clone();

        view! {
            <tr>
                <td>{record.order_number().to_string()}</td>
                <td>{record.issue_date.clone()}</td>
                <td>{record.client.clone()}</td>
                <td>{record.category.clone()}</td>
                <td>{record.product.clone()}</td>
                <td class="deals-table__value">{format_brl(record.value, 2)}</td>
                <td>
                    <div class="deals-table__status">
                        <StatusBadge status=record.status.clone() />
                        <select
                            class="deals-table__status-select"
                            prop:value=current
                            on:change=move |ev| change_status(id.clone(), event_target_value(&ev))
                        >
                            {options
                                .into_iter()
                                .map(|label| view! { <option value=label.clone()>{label.clone()}</option> })
                                .collect_view()}
                        </select>
                    </div>
                </td>
                <td class="deals-table__actions">
                    <Button
                        size=ButtonSize::Small
                        appearance=ButtonAppearance::Subtle
                        on_click=move |_| state.dialog.set(Some(DealsDialog::Edit(edit_record.clone())))
                    >
                        "Editar"
                    </Button>
                    <Button
                        size=ButtonSize::Small
                        appearance=ButtonAppearance::Subtle
                        on_click=move |_| state.dialog.set(Some(DealsDialog::Delete(delete_record.clone())))
                    >
                        "Excluir"
                    </Button>
                </td>
            </tr>
        }
    };

    let dialog = move || {
        state.dialog.get().map(|dialog| match dialog {
            DealsDialog::Create => {
                view! { <OrderFormModal vm=OrderFormVm::new_order() on_close=close_dialog /> }.into_any()
            }
            DealsDialog::Edit(record) => {
                view! { <OrderFormModal vm=OrderFormVm::edit(record) on_close=close_dialog /> }.into_any()
            }
            DealsDialog::Delete(record) => {
                view! { <DeleteOrderModal record=record on_close=close_dialog /> }.into_any()
            }
        })
    };

    view! {
        <div class="deals">
            <div class="deals__toolbar">
                <Input value=state.search placeholder="Buscar por cliente, pedido ou categoria" />
                <span class="deals__count">{move || format!("{} negócios", deals.with(|d| d.len()))}</span>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| state.dialog.set(Some(DealsDialog::Create))
                >
                    "Novo pedido"
                </Button>
            </div>
            <table class="deals-table">
                <thead>
                    <tr>
                        {header_cells}
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {move || deals.get().into_iter().map(row_view).collect_view()}
                </tbody>
            </table>
            <Show when=move || deals.with(|d| d.is_empty())>
                <div class="deals__empty">"Nenhum negócio encontrado"</div>
            </Show>
            {dialog}
        </div>
    }
}

/// Known statuses, plus the current one when the sheet carries an unknown label.
fn status_options(current: &OrderStatus) -> Vec<String> {
    let mut options: Vec<String> = OrderStatus::ALL.iter().map(|s| s.label().to_string()).collect();
    if let OrderStatus::Other(raw) = current {
        options.push(raw.clone());
    }
    options
}
