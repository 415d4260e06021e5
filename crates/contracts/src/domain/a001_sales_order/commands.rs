//! Client-to-server order commands and the optimistic edits that precede them.

use super::aggregate::{OrderRecord, OrderStatus, SalesSnapshot};
use super::draft::OrderPatch;
use crate::shared::channel::PushError;
use serde_json::{json, Value};

pub const EVENT_ADD_ORDER: &str = "add_order";
pub const EVENT_UPDATE_STATUS: &str = "update_status";
pub const EVENT_UPDATE_ROW: &str = "update_row";
pub const EVENT_DELETE_ROW: &str = "delete_row";

#[derive(Debug, Clone, PartialEq)]
pub enum OrderCommand {
    AddOrder { row: Vec<Value> },
    UpdateStatus { id: String, status: OrderStatus },
    UpdateRow { id: String, patch: OrderPatch },
    DeleteRow { id: String },
}

impl OrderCommand {
    pub fn event(&self) -> &'static str {
        match self {
            Self::AddOrder { .. } => EVENT_ADD_ORDER,
            Self::UpdateStatus { .. } => EVENT_UPDATE_STATUS,
            Self::UpdateRow { .. } => EVENT_UPDATE_ROW,
            Self::DeleteRow { .. } => EVENT_DELETE_ROW,
        }
    }

    pub fn payload(&self) -> Result<Value, PushError> {
        Ok(match self {
            Self::AddOrder { row } => json!({ "row": row }),
            Self::UpdateStatus { id, status } => json!({ "id": id, "status": status.label() }),
            Self::UpdateRow { id, patch } => {
                let row = serde_json::to_value(patch).map_err(|e| PushError::Encode(e.to_string()))?;
                json!({ "id": id, "row": row })
            }
            Self::DeleteRow { id } => json!({ "id": id }),
        })
    }
}

pub fn append_order(snapshot: &mut SalesSnapshot, record: OrderRecord) {
    snapshot.rows.push(record);
}

/// Returns `false` when no row carries `id`.
pub fn set_status(snapshot: &mut SalesSnapshot, id: &str, status: &OrderStatus) -> bool {
    match snapshot.rows.iter_mut().find(|r| r.id == id) {
        Some(row) => {
            row.status = status.clone();
            true
        }
        None => false,
    }
}

pub fn merge_patch(snapshot: &mut SalesSnapshot, id: &str, patch: &OrderPatch) -> bool {
    match snapshot.rows.iter_mut().find(|r| r.id == id) {
        Some(row) => {
            patch.apply(row);
            true
        }
        None => false,
    }
}

pub fn remove_order(snapshot: &mut SalesSnapshot, id: &str) -> bool {
    let before = snapshot.rows.len();
    snapshot.rows.retain(|r| r.id != id);
    snapshot.rows.len() != before
}
