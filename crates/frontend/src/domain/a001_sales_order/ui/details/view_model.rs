//! ViewModel for the order form (create and edit share it).

use super::super::DashboardWorkflow;
use chrono::Local;
use contracts::domain::a001_sales_order::{
    OrderDraft, OrderError, OrderPatch, OrderRecord, OrderStatus,
};
use contracts::shared::money::mask_currency_input;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy)]
pub struct OrderFormVm {
    // === Form fields ===
    pub id: RwSignal<String>,
    pub order_number: RwSignal<String>,
    pub issue_date: RwSignal<String>,
    pub client: RwSignal<String>,
    pub category: RwSignal<String>,
    pub origin: RwSignal<String>,
    pub product: RwSignal<String>,
    pub value: RwSignal<String>,
    pub status: RwSignal<String>,
    pub closing_date: RwSignal<String>,
    pub city: RwSignal<String>,
    pub state: RwSignal<String>,

    // === UI State ===
    pub saving: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,

    /// Record being edited; `None` in create mode.
    original: StoredValue<Option<OrderRecord>>,
}

impl OrderFormVm {
    pub fn new_order() -> Self {
        Self::from_draft(OrderDraft::new(Local::now().date_naive()), None)
    }

    pub fn edit(record: OrderRecord) -> Self {
        Self::from_draft(OrderDraft::from_record(&record), Some(record))
    }

    fn from_draft(draft: OrderDraft, original: Option<OrderRecord>) -> Self {
        let vm = Self {
            id: RwSignal::new(draft.id),
            order_number: RwSignal::new(draft.order_number),
            issue_date: RwSignal::new(draft.issue_date),
            client: RwSignal::new(draft.client),
            category: RwSignal::new(draft.category),
            origin: RwSignal::new(draft.origin),
            product: RwSignal::new(draft.product),
            value: RwSignal::new(draft.value),
            status: RwSignal::new(draft.status.label().to_string()),
            closing_date: RwSignal::new(draft.closing_date),
            city: RwSignal::new(draft.city),
            state: RwSignal::new(draft.state),
            saving: RwSignal::new(false),
            error: RwSignal::new(None),
            original: StoredValue::new(original),
        };
        vm.mask_value_input();
        vm
    }

    /// Keeps the amount field in `1.234,56` form while the user types digits.
    fn mask_value_input(&self) {
        let value = self.value;
        Effect::new(move |_| {
            let raw = value.get();
            if raw.is_empty() {
                return;
            }
            let masked = mask_currency_input(&raw);
            if masked != raw {
                value.set(masked);
            }
        });
    }

    // === Derived signals ===

    pub fn is_edit_mode(&self) -> bool {
        self.original.with_value(|o| o.is_some())
    }

    pub fn title(&self) -> &'static str {
        if self.is_edit_mode() {
            "Editar pedido"
        } else {
            "Novo pedido"
        }
    }

    pub fn is_save_disabled(&self) -> Signal<bool> {
        let saving = self.saving;
        let order_number = self.order_number;
        let client = self.client;
        Signal::derive(move || {
            saving.get() || order_number.get().trim().is_empty() || client.get().trim().is_empty()
        })
    }

    // === Commands ===

    pub fn save(&self, workflow: DashboardWorkflow, on_saved: Callback<()>) {
        let draft = self.to_draft();
        let this = *self;
        this.saving.set(true);
        this.error.set(None);

        match self.original.get_value() {
            None => spawn_local(async move {
                let outcome = workflow.create(&draft).await;
                this.finish(outcome.map(|_| ()), on_saved);
            }),
            Some(record) => {
                let patch = match OrderPatch::diff(&record, &draft) {
                    Ok(patch) => patch,
                    Err(e) => {
                        this.saving.set(false);
                        this.error.set(Some(e.to_string()));
                        return;
                    }
                };
                if patch.is_empty() {
                    this.saving.set(false);
                    on_saved.run(());
                    return;
                }
                spawn_local(async move {
                    let outcome = workflow.update_row(&record.id, patch).await;
                    this.finish(outcome.map(|_| ()), on_saved);
                });
            }
        }
    }

    /// Local failures keep the form open; remote ones were already applied
    /// optimistically and reported as a notice.
    fn finish(&self, outcome: Result<(), OrderError>, on_saved: Callback<()>) {
        self.saving.set(false);
        match outcome {
            Err(e) if e.is_local() => self.error.set(Some(e.to_string())),
            _ => on_saved.run(()),
        }
    }

    fn to_draft(&self) -> OrderDraft {
        OrderDraft {
            id: self.id.get_untracked(),
            order_number: self.order_number.get_untracked(),
            issue_date: self.issue_date.get_untracked(),
            client: self.client.get_untracked(),
            category: self.category.get_untracked(),
            origin: self.origin.get_untracked(),
            product: self.product.get_untracked(),
            value: self.value.get_untracked(),
            status: OrderStatus::parse(&self.status.get_untracked()),
            closing_date: self.closing_date.get_untracked(),
            city: self.city.get_untracked(),
            state: self.state.get_untracked(),
        }
    }
}
