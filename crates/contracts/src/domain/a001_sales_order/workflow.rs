//! Create/edit/delete orchestration: local checks, optimistic edit, push, notice.
//!
//! A rejected or timed-out push leaves the optimistic edit in place; the next
//! server snapshot reconciles the store.

use super::aggregate::{OrderStatus, SalesSnapshot};
use super::commands::{append_order, merge_patch, remove_order, set_status, OrderCommand};
use super::draft::{OrderDraft, OrderPatch};
use crate::shared::channel::{PushError, RowStore};
use crate::shared::money::MoneyParseError;
use crate::shared::notice::{Notice, NoticeSink};
use serde_json::Value;
use thiserror::Error;

/// Literal the user must type to enable deletion.
pub const DELETE_CONFIRMATION: &str = "CONFIRMAR";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    #[error("Pedido duplicado: já existe um registro com a chave '{key}'")]
    Duplicate { key: String },
    #[error(transparent)]
    InvalidValue(#[from] MoneyParseError),
    #[error("O valor não pode ser negativo")]
    NegativeValue,
    #[error("Campo obrigatório não preenchido: {0}")]
    MissingField(&'static str),
    #[error("Digite {DELETE_CONFIRMATION} para confirmar a exclusão")]
    ConfirmationMismatch,
    #[error("Pedido não encontrado: {0}")]
    NotFound(String),
    #[error(transparent)]
    Command(#[from] PushError),
}

impl OrderError {
    /// True for failures detected before anything was mutated or sent.
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Command(_))
    }
}

/// What the workflow needs from the realtime channel.
#[allow(async_fn_in_trait)]
pub trait OrderChannel {
    fn with_store<R>(&self, f: impl FnOnce(&RowStore) -> R) -> R;

    fn manual_update(&self, transform: impl FnOnce(&mut SalesSnapshot));

    async fn push(&self, event: &str, payload: Value) -> Result<Value, PushError>;
}

#[derive(Clone, Copy)]
pub struct OrderWorkflow<C, N> {
    channel: C,
    notices: N,
}

impl<C: OrderChannel, N: NoticeSink> OrderWorkflow<C, N> {
    pub fn new(channel: C, notices: N) -> Self {
        Self { channel, notices }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn notices(&self) -> &N {
        &self.notices
    }

    pub async fn create(&self, draft: &OrderDraft) -> Result<Value, OrderError> {
        let outcome = self.submit_create(draft).await;
        self.report(&outcome, "Pedido criado com sucesso", "Erro ao criar pedido");
        outcome
    }

    pub async fn update_status(&self, id: &str, status: OrderStatus) -> Result<Value, OrderError> {
        let outcome = self.submit_status(id, status).await;
        self.report(&outcome, "Status atualizado", "Erro ao atualizar status");
        outcome
    }

    pub async fn update_row(&self, id: &str, patch: OrderPatch) -> Result<Value, OrderError> {
        let outcome = self.submit_row(id, patch).await;
        self.report(&outcome, "Pedido atualizado", "Erro ao atualizar pedido");
        outcome
    }

    pub async fn delete(&self, id: &str, confirmation: &str) -> Result<Value, OrderError> {
        let outcome = self.submit_delete(id, confirmation).await;
        self.report(&outcome, "Pedido excluído", "Erro ao excluir pedido");
        outcome
    }

    async fn submit_create(&self, draft: &OrderDraft) -> Result<Value, OrderError> {
        let value = draft.validate()?;
        let key = draft.composite_key();
        if self.channel.with_store(|store| store.contains_key(&key)) {
            log::warn!("duplicate order rejected locally: {}", key);
            return Err(OrderError::Duplicate { key });
        }

        let command = OrderCommand::AddOrder {
            row: draft.to_row_array(value),
        };
        let payload = command.payload()?;
        let record = draft.to_record(value);
        self.channel.manual_update(|snapshot| append_order(snapshot, record));
        self.send(command.event(), payload).await
    }

    async fn submit_status(&self, id: &str, status: OrderStatus) -> Result<Value, OrderError> {
        self.ensure_exists(id)?;
        self.channel.manual_update(|snapshot| {
            set_status(snapshot, id, &status);
        });
        let command = OrderCommand::UpdateStatus {
            id: id.to_string(),
            status,
        };
        let payload = command.payload()?;
        self.send(command.event(), payload).await
    }

    async fn submit_row(&self, id: &str, patch: OrderPatch) -> Result<Value, OrderError> {
        self.ensure_exists(id)?;
        let command = OrderCommand::UpdateRow {
            id: id.to_string(),
            patch: patch.clone(),
        };
        let payload = command.payload()?;
        self.channel.manual_update(|snapshot| {
            merge_patch(snapshot, id, &patch);
        });
        self.send(command.event(), payload).await
    }

    async fn submit_delete(&self, id: &str, confirmation: &str) -> Result<Value, OrderError> {
        if confirmation.trim() != DELETE_CONFIRMATION {
            return Err(OrderError::ConfirmationMismatch);
        }
        self.ensure_exists(id)?;
        self.channel.manual_update(|snapshot| {
            remove_order(snapshot, id);
        });
        let command = OrderCommand::DeleteRow { id: id.to_string() };
        let payload = command.payload()?;
        self.send(command.event(), payload).await
    }

    fn ensure_exists(&self, id: &str) -> Result<(), OrderError> {
        if self.channel.with_store(|store| store.find(id).is_some()) {
            Ok(())
        } else {
            Err(OrderError::NotFound(id.to_string()))
        }
    }

    async fn send(&self, event: &str, payload: Value) -> Result<Value, OrderError> {
        match self.channel.push(event, payload).await {
            Ok(reply) => {
                log::debug!("{} acknowledged", event);
                Ok(reply)
            }
            Err(e) => {
                log::error!("{} failed: {}", event, e);
                Err(OrderError::Command(e))
            }
        }
    }

    fn report(&self, outcome: &Result<Value, OrderError>, success: &str, failure: &str) {
        let notice = match outcome {
            Ok(_) => Notice::success(success),
            Err(e) => Notice::error(failure, e.to_string()),
        };
        self.notices.notify(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_sales_order::aggregate::OrderRecord;
    use chrono::NaiveDate;
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::RefCell;

    struct FakeChannel {
        store: RefCell<RowStore>,
        pushes: RefCell<Vec<(String, Value)>>,
        reply: Result<Value, PushError>,
    }

    impl FakeChannel {
        fn with_rows(ids: &[&str], reply: Result<Value, PushError>) -> Self {
            let rows = ids
                .iter()
                .map(|id| OrderRecord {
                    id: id.to_string(),
                    status: OrderStatus::InProgress,
                    ..Default::default()
                })
                .collect();
            Self {
                store: RefCell::new(RowStore::new(SalesSnapshot {
                    rows,
                    last_updated: Some("t0".into()),
                })),
                pushes: RefCell::new(Vec::new()),
                reply,
            }
        }
    }

    impl OrderChannel for FakeChannel {
        fn with_store<R>(&self, f: impl FnOnce(&RowStore) -> R) -> R {
            f(&self.store.borrow())
        }

        fn manual_update(&self, transform: impl FnOnce(&mut SalesSnapshot)) {
            self.store.borrow_mut().manual_update(transform);
        }

        async fn push(&self, event: &str, payload: Value) -> Result<Value, PushError> {
            self.pushes.borrow_mut().push((event.to_string(), payload));
            self.reply.clone()
        }
    }

    #[derive(Default)]
    struct Recorder(RefCell<Vec<Notice>>);

    impl NoticeSink for Recorder {
        fn notify(&self, notice: Notice) {
            self.0.borrow_mut().push(notice);
        }
    }

    fn workflow(ids: &[&str], reply: Result<Value, PushError>) -> OrderWorkflow<FakeChannel, Recorder> {
        OrderWorkflow::new(FakeChannel::with_rows(ids, reply), Recorder::default())
    }

    fn draft(order: &str, product: &str) -> OrderDraft {
        OrderDraft {
            order_number: order.into(),
            product: product.into(),
            client: "ACME".into(),
            value: "1.000,00".into(),
            ..OrderDraft::new(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap())
        }
    }

    #[test]
    fn test_duplicate_rejected_before_push() {
        let wf = workflow(&["123-WidgetA"], Ok(json!({})));
        let result = block_on(wf.create(&draft("123", "widgeta")));

        assert_eq!(
            result,
            Err(OrderError::Duplicate {
                key: "123-widgeta".into()
            })
        );
        assert!(wf.channel().pushes.borrow().is_empty());
        assert_eq!(wf.channel().store.borrow().rows().len(), 1);
        let notices = wf.notices().0.borrow();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].is_error());
    }

    #[test]
    fn test_create_appends_then_pushes() {
        let wf = workflow(&["1"], Ok(json!({"id": "2"})));
        let result = block_on(wf.create(&draft("123", "WidgetB")));

        assert_eq!(result, Ok(json!({"id": "2"})));
        let store = wf.channel().store.borrow();
        assert_eq!(store.rows().len(), 2);
        assert_eq!(store.rows()[1].id, "123-WidgetB");

        let pushes = wf.channel().pushes.borrow();
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].0, "add_order");
        assert_eq!(pushes[0].1["row"][1], json!("123"));
        assert_eq!(pushes[0].1["row"][7], json!("1.000,00"));
        assert!(!wf.notices().0.borrow()[0].is_error());
    }

    #[test]
    fn test_invalid_value_stops_before_mutation() {
        let wf = workflow(&[], Ok(json!({})));
        let mut bad = draft("9", "");
        bad.value = "abc".into();

        let result = block_on(wf.create(&bad));
        assert!(matches!(result, Err(OrderError::InvalidValue(_))));
        assert!(wf.channel().store.borrow().rows().is_empty());
        assert!(wf.channel().pushes.borrow().is_empty());
    }

    #[test]
    fn test_status_timeout_keeps_optimistic_edit() {
        let wf = workflow(&["1"], Err(PushError::Timeout));
        let result = block_on(wf.update_status("1", OrderStatus::Lost));

        assert_eq!(result, Err(OrderError::Command(PushError::Timeout)));
        assert_eq!(
            wf.channel().store.borrow().find("1").map(|r| r.status.label().to_string()),
            Some("Perdido".to_string())
        );
        assert_eq!(
            wf.channel().pushes.borrow()[0],
            ("update_status".to_string(), json!({"id": "1", "status": "Perdido"}))
        );
        let notices = wf.notices().0.borrow();
        assert!(notices[0].is_error());
        assert_eq!(notices[0].description.as_deref(), Some("Tempo de resposta esgotado"));
    }

    #[test]
    fn test_update_row_merges_patch() {
        let wf = workflow(&["1"], Ok(Value::Null));
        let patch = OrderPatch {
            client: Some("Nova Loja".into()),
            ..Default::default()
        };
        assert!(block_on(wf.update_row("1", patch)).is_ok());
        assert_eq!(wf.channel().store.borrow().rows()[0].client, "Nova Loja");
        assert_eq!(
            wf.channel().pushes.borrow()[0].1,
            json!({"id": "1", "row": {"cliente": "Nova Loja"}})
        );
    }

    #[test]
    fn test_unknown_id_is_local_error() {
        let wf = workflow(&["1"], Ok(Value::Null));
        let result = block_on(wf.update_status("7", OrderStatus::Won));
        assert_eq!(result, Err(OrderError::NotFound("7".into())));
        assert!(result.unwrap_err().is_local());
        assert!(wf.channel().pushes.borrow().is_empty());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let wf = workflow(&["1", "2"], Ok(Value::Null));

        let result = block_on(wf.delete("1", "confirmar"));
        assert_eq!(result, Err(OrderError::ConfirmationMismatch));
        assert_eq!(wf.channel().store.borrow().rows().len(), 2);

        assert!(block_on(wf.delete("1", DELETE_CONFIRMATION)).is_ok());
        assert!(wf.channel().store.borrow().find("1").is_none());
        assert_eq!(wf.channel().pushes.borrow()[0].0, "delete_row");
    }

    #[test]
    fn test_rejected_delete_is_not_rolled_back() {
        let wf = workflow(&["1"], Err(PushError::Rejected(json!({"reason": "locked"}))));
        let result = block_on(wf.delete("1", DELETE_CONFIRMATION));

        assert!(matches!(result, Err(OrderError::Command(PushError::Rejected(_)))));
        assert!(wf.channel().store.borrow().rows().is_empty());
        assert_eq!(
            wf.notices().0.borrow()[0].description.as_deref(),
            Some("Servidor recusou o comando: locked")
        );
    }
}
