use super::view_model::OrderFormVm;
use super::super::use_order_workflow;
use crate::shared::modal::Modal;
use contracts::domain::a001_sales_order::{OrderStatus, CATEGORY_OPTIONS};
use leptos::prelude::*;
use thaw::*;

/// Create/edit form in a modal. `vm` decides the mode.
#[component]
pub fn OrderFormModal(vm: OrderFormVm, on_close: Callback<()>) -> impl IntoView {
    let workflow = use_order_workflow();
    let save_disabled = vm.is_save_disabled();

    view! {
        <Modal title=vm.title() on_close=on_close>
            {move || vm.error.get().map(|e| view! { <div class="form__error">{e}</div> })}
            <div class="details-grid--3col">
                <div class="form__group">
                    <label class="form__label">"Pedido *"</label>
                    <Input value=vm.order_number placeholder="Número do pedido" />
                </div>
                <div class="form__group">
                    <label class="form__label">"Emissão *"</label>
                    <Input value=vm.issue_date placeholder="DD/MM/AAAA" />
                </div>
                <div class="form__group">
                    <label class="form__label">"Status"</label>
                    <Select value=vm.status>
                        {OrderStatus::ALL
                            .iter()
                            .map(|s| {
                                let label = s.label().to_string();
                                view! { <option value=label.clone()>{label.clone()}</option> }
                            })
                            .collect_view()}
                    </Select>
                </div>

                <div class="form__group" style="grid-column: 1 / 3;">
                    <label class="form__label">"Cliente *"</label>
                    <Input value=vm.client placeholder="Nome do cliente" />
                </div>
                <div class="form__group">
                    <label class="form__label">"Categoria"</label>
                    <Select value=vm.category>
                        {CATEGORY_OPTIONS
                            .iter()
                            .map(|c| view! { <option value=*c>{*c}</option> })
                            .collect_view()}
                    </Select>
                </div>

                <div class="form__group">
                    <label class="form__label">"Produto"</label>
                    <Input value=vm.product />
                </div>
                <div class="form__group">
                    <label class="form__label">"Origem"</label>
                    <Input value=vm.origin placeholder="Instagram, indicação..." />
                </div>
                <div class="form__group">
                    <label class="form__label">"Valor (R$)"</label>
                    <Input value=vm.value placeholder="0,00" />
                </div>

                <div class="form__group">
                    <label class="form__label">"Fechamento"</label>
                    <Input value=vm.closing_date placeholder="DD/MM/AAAA" />
                </div>
                <div class="form__group">
                    <label class="form__label">"Cidade"</label>
                    <Input value=vm.city />
                </div>
                <div class="form__group">
                    <label class="form__label">"Estado"</label>
                    <Input value=vm.state placeholder="UF" />
                </div>
            </div>
            <div class="modal-footer">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                    "Cancelar"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    disabled=save_disabled
                    on_click=move |_| vm.save(workflow, on_close)
                >
                    {move || if vm.saving.get() { "Salvando..." } else { "Salvar" }}
                </Button>
            </div>
        </Modal>
    }
}
