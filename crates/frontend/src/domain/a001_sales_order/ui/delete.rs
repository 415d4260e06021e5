use super::use_order_workflow;
use crate::shared::modal::Modal;
use contracts::domain::a001_sales_order::{OrderRecord, DELETE_CONFIRMATION};
use contracts::shared::money::format_brl;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

/// Deletion is enabled only once the confirmation literal is typed.
#[component]
pub fn DeleteOrderModal(record: OrderRecord, on_close: Callback<()>) -> impl IntoView {
    let workflow = use_order_workflow();
    let confirmation = RwSignal::new(String::new());
    let deleting = RwSignal::new(false);
    let confirmed = Signal::derive(move || confirmation.get().trim() == DELETE_CONFIRMATION);

    let id = StoredValue::new(record.id.clone());
    let summary = format!(
        "Pedido {} · {} · {}",
        record.order_number(),
        record.client,
        format_brl(record.value, 2)
    );

    let on_delete = move |_| {
        deleting.set(true);
        let id = id.get_value();
        let typed = confirmation.get_untracked();
        spawn_local(async move {
            let _ = workflow.delete(&id, &typed).await;
            deleting.set(false);
            on_close.run(());
        });
    };

    view! {
        <Modal title="Excluir pedido" on_close=on_close>
            <p class="delete-modal__summary">{summary}</p>
            <p class="delete-modal__hint">
                "Esta ação não pode ser desfeita. Digite "
                <strong>{DELETE_CONFIRMATION}</strong>
                " para confirmar."
            </p>
            <Input value=confirmation placeholder=DELETE_CONFIRMATION />
            <div class="modal-footer">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                    "Cancelar"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    class="button--danger"
                    disabled=Signal::derive(move || !confirmed.get() || deleting.get())
                    on_click=on_delete
                >
                    "Excluir"
                </Button>
            </div>
        </Modal>
    }
}
