//! Form-side representations of an order: a new-order draft and a field patch.

use super::aggregate::{composite_key, OrderRecord, OrderStatus, UNASSIGNED_PROFESSIONAL};
use super::workflow::OrderError;
use crate::shared::dates::today_day_first;
use crate::shared::money::{format_brl_amount, parse_brl};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use serde_json::Value;

pub const DEFAULT_CATEGORY: &str = "Projetos";

pub const CATEGORY_OPTIONS: [&str; 5] = [
    "Projetos",
    "Iluminação Técnica",
    "Pendentes e Lustres",
    "ORGLIGHT",
    "PERFIL",
];

/// Order form contents, exactly as typed (amount in `1.234,56` form).
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    /// Sequential id when one is already known; empty lets the server assign it.
    pub id: String,
    pub order_number: String,
    pub issue_date: String,
    pub client: String,
    pub category: String,
    pub origin: String,
    pub product: String,
    pub value: String,
    pub status: OrderStatus,
    pub closing_date: String,
    pub city: String,
    pub state: String,
}

impl OrderDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            id: String::new(),
            order_number: String::new(),
            issue_date: today_day_first(today),
            client: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            origin: String::new(),
            product: String::new(),
            value: String::new(),
            status: OrderStatus::InProgress,
            closing_date: String::new(),
            city: String::new(),
            state: String::new(),
        }
    }

    /// Prefills the edit form from an existing record.
    pub fn from_record(record: &OrderRecord) -> Self {
        Self {
            id: record.id.clone(),
            order_number: record.order_number().to_string(),
            issue_date: record.issue_date.clone(),
            client: record.client.clone(),
            category: record.category.clone(),
            origin: record.origin.clone(),
            product: record.product.clone(),
            value: format_brl_amount(record.value, 2),
            status: record.status.clone(),
            closing_date: record.closing_date.clone().unwrap_or_default(),
            city: record.city.clone(),
            state: record.state.clone(),
        }
    }

    pub fn composite_key(&self) -> String {
        composite_key(&self.order_number, &self.product)
    }

    /// Required fields and a parsable amount; returns the amount.
    pub fn validate(&self) -> Result<f64, OrderError> {
        if self.order_number.trim().is_empty() {
            return Err(OrderError::MissingField("Pedido"));
        }
        if self.client.trim().is_empty() {
            return Err(OrderError::MissingField("Cliente"));
        }
        if self.issue_date.trim().is_empty() {
            return Err(OrderError::MissingField("Data de emissão"));
        }
        parse_amount(&self.value)
    }

    /// Local id of the optimistic row until the server snapshot brings the real one.
    pub fn candidate_id(&self) -> String {
        if self.id.trim().is_empty() {
            self.composite_key()
        } else {
            self.id.trim().to_string()
        }
    }

    /// Optimistic row shown before the server confirms the creation.
    pub fn to_record(&self, value: f64) -> OrderRecord {
        OrderRecord {
            id: self.candidate_id(),
            order_number_original: Some(self.order_number.trim().to_string()),
            client: self.client.trim().to_string(),
            professional: UNASSIGNED_PROFESSIONAL.to_string(),
            status: self.status.clone(),
            category: self.category.clone(),
            origin: self.origin.trim().to_string(),
            product: self.product.trim().to_string(),
            issue_date: self.issue_date.trim().to_string(),
            closing_date: non_empty(&self.closing_date),
            value,
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
        }
    }

    /// Positional `add_order` row:
    /// `[id, order, issue, client, category, origin, product, value, status, closing, city, state]`.
    ///
    /// The id slot carries the candidate id; the server assigns the real one.
    pub fn to_row_array(&self, value: f64) -> Vec<Value> {
        [
            self.candidate_id(),
            self.order_number.trim().to_string(),
            self.issue_date.trim().to_string(),
            self.client.trim().to_string(),
            self.category.clone(),
            self.origin.trim().to_string(),
            self.product.trim().to_string(),
            format_brl_amount(value, 2),
            self.status.label().to_string(),
            self.closing_date.trim().to_string(),
            self.city.trim().to_string(),
            self.state.trim().to_string(),
        ]
        .into_iter()
        .map(Value::String)
        .collect()
    }
}

/// Field-level changes for `update_row`; `None` leaves a field untouched.
///
/// `closing_date: Some("")` clears the closing date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderPatch {
    #[serde(rename = "pedido_original", skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(rename = "data_emissao", skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(rename = "cliente", skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "origem", skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(rename = "produto", skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(
        rename = "valor",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_brl"
    )]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(rename = "data_fechamento", skip_serializing_if = "Option::is_none")]
    pub closing_date: Option<String>,
    #[serde(rename = "cidade", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl OrderPatch {
    /// Changes between a stored record and the edited form.
    pub fn diff(original: &OrderRecord, edited: &OrderDraft) -> Result<Self, OrderError> {
        let value = parse_amount(&edited.value)?;
        let changed = |before: &str, after: &str| -> Option<String> {
            let after = after.trim();
            (before.trim() != after).then(|| after.to_string())
        };

        Ok(Self {
            order_number: changed(original.order_number(), &edited.order_number),
            issue_date: changed(&original.issue_date, &edited.issue_date),
            client: changed(&original.client, &edited.client),
            category: changed(&original.category, &edited.category),
            origin: changed(&original.origin, &edited.origin),
            product: changed(&original.product, &edited.product),
            value: ((original.value - value).abs() >= 0.005).then_some(value),
            status: (original.status != edited.status).then(|| edited.status.clone()),
            closing_date: changed(
                original.closing_date.as_deref().unwrap_or_default(),
                &edited.closing_date,
            ),
            city: changed(&original.city, &edited.city),
            state: changed(&original.state, &edited.state),
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, record: &mut OrderRecord) {
        if let Some(v) = &self.order_number {
            record.order_number_original = Some(v.clone());
        }
        if let Some(v) = &self.issue_date {
            record.issue_date = v.clone();
        }
        if let Some(v) = &self.client {
            record.client = v.clone();
        }
        if let Some(v) = &self.category {
            record.category = v.clone();
        }
        if let Some(v) = &self.origin {
            record.origin = v.clone();
        }
        if let Some(v) = &self.product {
            record.product = v.clone();
        }
        if let Some(v) = self.value {
            record.value = v;
        }
        if let Some(v) = &self.status {
            record.status = v.clone();
        }
        if let Some(v) = &self.closing_date {
            record.closing_date = non_empty(v);
        }
        if let Some(v) = &self.city {
            record.city = v.clone();
        }
        if let Some(v) = &self.state {
            record.state = v.clone();
        }
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

fn serialize_brl<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_str(&format_brl_amount(*v, 2)),
        None => serializer.serialize_none(),
    }
}

fn parse_amount(raw: &str) -> Result<f64, OrderError> {
    let value = parse_brl(raw)?;
    if value < 0.0 {
        return Err(OrderError::NegativeValue);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft() -> OrderDraft {
        OrderDraft {
            order_number: "123".into(),
            client: "ACME".into(),
            product: "WidgetA".into(),
            value: "1.500,00".into(),
            state: "SP".into(),
            ..OrderDraft::new(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap())
        }
    }

    #[test]
    fn test_new_draft_defaults() {
        let d = OrderDraft::new(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        assert_eq!(d.issue_date, "05/03/2025");
        assert_eq!(d.category, DEFAULT_CATEGORY);
        assert_eq!(d.status, OrderStatus::InProgress);
    }

    #[test]
    fn test_validate() {
        assert_eq!(draft().validate(), Ok(1500.0));

        let mut missing = draft();
        missing.client = "  ".into();
        assert_eq!(missing.validate(), Err(OrderError::MissingField("Cliente")));

        let mut bad_value = draft();
        bad_value.value = "mil".into();
        assert!(matches!(bad_value.validate(), Err(OrderError::InvalidValue(_))));

        let mut negative = draft();
        negative.value = "-5".into();
        assert_eq!(negative.validate(), Err(OrderError::NegativeValue));
        assert_eq!(
            OrderPatch::diff(&draft().to_record(1500.0), &negative),
            Err(OrderError::NegativeValue)
        );
    }

    #[test]
    fn test_row_array_column_order() {
        let row = draft().to_row_array(1500.0);
        assert_eq!(row.len(), 12);
        assert_eq!(
            Value::Array(row),
            json!([
                "123-WidgetA", "123", "05/03/2025", "ACME", "Projetos", "", "WidgetA",
                "1.500,00", "Em andamento", "", "", "SP"
            ])
        );
    }

    #[test]
    fn test_optimistic_record_uses_composite_key() {
        let record = draft().to_record(1500.0);
        assert_eq!(record.id, "123-WidgetA");
        assert_eq!(record.order_number(), "123");
        assert_eq!(record.professional, UNASSIGNED_PROFESSIONAL);
        assert_eq!(record.closing_date, None);

        let mut with_id = draft();
        with_id.id = "57".into();
        assert_eq!(with_id.to_record(1.0).id, "57");
    }

    #[test]
    fn test_patch_diff_only_changed_fields() {
        let original = draft().to_record(1500.0);
        let mut edited = OrderDraft::from_record(&original);
        assert!(OrderPatch::diff(&original, &edited).unwrap().is_empty());

        edited.client = "ACME Ltda".into();
        edited.value = "2.000,00".into();
        edited.closing_date = "10/03/2025".into();
        let patch = OrderPatch::diff(&original, &edited).unwrap();
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({
                "cliente": "ACME Ltda",
                "valor": "2.000,00",
                "data_fechamento": "10/03/2025"
            })
        );
    }

    #[test]
    fn test_patch_apply() {
        let mut record = draft().to_record(1500.0);
        let patch = OrderPatch {
            status: Some(OrderStatus::Won),
            closing_date: Some("10/03/2025".into()),
            value: Some(99.9),
            ..Default::default()
        };
        patch.apply(&mut record);
        assert_eq!(record.status, OrderStatus::Won);
        assert_eq!(record.closing_date.as_deref(), Some("10/03/2025"));
        assert_eq!(record.value, 99.9);
        assert_eq!(record.client, "ACME");

        OrderPatch {
            closing_date: Some(String::new()),
            ..Default::default()
        }
        .apply(&mut record);
        assert_eq!(record.closing_date, None);
    }
}
