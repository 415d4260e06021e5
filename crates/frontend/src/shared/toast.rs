use contracts::shared::notice::{Notice, NoticeSink};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

const AUTO_DISMISS_MS: u32 = 5_000;

/// Toast list shared through context; order actions report into it.
#[derive(Clone, Copy)]
pub struct Toasts {
    items: RwSignal<Vec<(u64, Notice)>>,
    next_id: StoredValue<u64>,
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|(item_id, _)| *item_id != id));
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeSink for Toasts {
    fn notify(&self, notice: Notice) {
        if notice.is_error() {
            log::warn!("{}: {}", notice.message, notice.description.as_deref().unwrap_or(""));
        }

        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.items.update(|items| items.push((id, notice)));

        let this = *self;
        spawn_local(async move {
            TimeoutFuture::new(AUTO_DISMISS_MS).await;
            this.dismiss(id);
        });
    }
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = expect_context::<Toasts>();

    view! {
        <div class="toast-host">
            <For
                each=move || toasts.items.get()
                key=|(id, _)| *id
                children=move |(id, notice)| {
                    let class = if notice.is_error() { "toast toast--error" } else { "toast toast--success" };
                    view! {
                        <div class=class role="status">
                            <div class="toast__body">
                                <div class="toast__title">{notice.message.clone()}</div>
                                {notice.description.clone().map(|d| view! { <div class="toast__description">{d}</div> })}
                            </div>
                            <button class="toast__close" aria-label="Fechar" on:click=move |_| toasts.dismiss(id)>
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
