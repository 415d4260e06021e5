use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Sentinel stored in `profissional` when the sheet has no owner for the deal.
pub const UNASSIGNED_PROFESSIONAL: &str = "N/A";

/// Deal status as written in the sheet.
///
/// Parsing is case-insensitive; unknown labels are preserved verbatim so they
/// still show up in listings even though no volume bucket counts them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    InProgress,
    Won,
    Lost,
    Other(String),
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [OrderStatus::InProgress, OrderStatus::Won, OrderStatus::Lost];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "EM ANDAMENTO" => OrderStatus::InProgress,
            "GANHO" => OrderStatus::Won,
            "PERDIDO" => OrderStatus::Lost,
            _ => OrderStatus::Other(raw.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            OrderStatus::InProgress => "Em andamento",
            OrderStatus::Won => "Ganho",
            OrderStatus::Lost => "Perdido",
            OrderStatus::Other(raw) => raw.as_str(),
        }
    }

    pub fn is_won(&self) -> bool {
        matches!(self, OrderStatus::Won)
    }

    /// Won or still being negotiated: the rows that make up quoted volume.
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Won | OrderStatus::InProgress)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::InProgress
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(OrderStatus::parse(&raw))
    }
}

/// One line of the sales sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(
        rename = "pedido_original",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub order_number_original: Option<String>,
    #[serde(rename = "cliente", default, deserialize_with = "null_as_default")]
    pub client: String,
    #[serde(
        rename = "profissional",
        default = "default_professional",
        deserialize_with = "professional_or_sentinel"
    )]
    pub professional: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(rename = "categoria", default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(rename = "origem", default, deserialize_with = "null_as_default")]
    pub origin: String,
    #[serde(rename = "produto", default, deserialize_with = "null_as_default")]
    pub product: String,
    /// Day-first text (`DD/MM/YYYY`), kept as received.
    #[serde(rename = "data_emissao", default, deserialize_with = "null_as_default")]
    pub issue_date: String,
    #[serde(
        rename = "data_fechamento",
        default,
        deserialize_with = "empty_as_none"
    )]
    pub closing_date: Option<String>,
    #[serde(rename = "valor", default, deserialize_with = "null_as_default")]
    pub value: f64,
    #[serde(rename = "cidade", default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(rename = "estado", default, deserialize_with = "null_as_default")]
    pub state: String,
}

impl OrderRecord {
    /// Human-facing order number (several lines can share it).
    pub fn order_number(&self) -> &str {
        self.order_number_original
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.id)
    }

    /// Closed volume counts only won deals that carry a closing date.
    pub fn counts_as_closed(&self) -> bool {
        self.status.is_won() && self.closing_date.is_some()
    }
}

impl Default for OrderRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            order_number_original: None,
            client: String::new(),
            professional: default_professional(),
            status: OrderStatus::default(),
            category: String::new(),
            origin: String::new(),
            product: String::new(),
            issue_date: String::new(),
            closing_date: None,
            value: 0.0,
            city: String::new(),
            state: String::new(),
        }
    }
}

/// Complete row set held by the dashboard plus the sheet timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesSnapshot {
    #[serde(default, deserialize_with = "decode_rows")]
    pub rows: Vec<OrderRecord>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Composite key used to tell apart several lines of the same order.
pub fn composite_key(order_number: &str, product: &str) -> String {
    let order_number = order_number.trim();
    let product = product.trim();
    if product.is_empty() {
        order_number.to_string()
    } else {
        format!("{}-{}", order_number, product)
    }
}

fn default_professional() -> String {
    UNASSIGNED_PROFESSIONAL.to_string()
}

fn professional_or_sentinel<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(default_professional))
}

/// Blank sheet cells arrive as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes rows one by one; a row that does not decode is logged and skipped.
fn decode_rows<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<OrderRecord>, D::Error> {
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value::<OrderRecord>(row) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("skipping sheet row {}: {}", index, e);
                None
            }
        })
        .collect())
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Integer(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(OrderStatus::parse("ganho"), OrderStatus::Won);
        assert_eq!(OrderStatus::parse("  EM ANDAMENTO "), OrderStatus::InProgress);
        assert_eq!(OrderStatus::parse("Perdido"), OrderStatus::Lost);
        assert_eq!(
            OrderStatus::parse("Cancelado"),
            OrderStatus::Other("Cancelado".to_string())
        );
    }

    #[test]
    fn test_unknown_status_round_trips_verbatim() {
        let status: OrderStatus = serde_json::from_value(json!("Aguardando")).unwrap();
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("Aguardando"));
    }

    #[test]
    fn test_record_decodes_sheet_row() {
        let row = json!({
            "id": 42,
            "cliente": "ACME",
            "status": "ganho",
            "categoria": "ORGLIGHT",
            "origem": "Instagram",
            "produto": "Pendente X",
            "data_emissao": "05/03/2025",
            "data_fechamento": "",
            "valor": 1500.5,
            "cidade": "Campinas",
            "estado": "SP"
        });
        let record: OrderRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.status, OrderStatus::Won);
        assert_eq!(record.closing_date, None);
        assert_eq!(record.professional, UNASSIGNED_PROFESSIONAL);
        assert!(!record.counts_as_closed());
        assert_eq!(record.order_number(), "42");
    }

    #[test]
    fn test_null_professional_falls_back_to_sentinel() {
        let record: OrderRecord =
            serde_json::from_value(json!({"id": "1", "profissional": null})).unwrap();
        assert_eq!(record.professional, UNASSIGNED_PROFESSIONAL);
    }

    #[test]
    fn test_snapshot_with_null_timestamp() {
        let snapshot: SalesSnapshot =
            serde_json::from_value(json!({"rows": [], "last_updated": null})).unwrap();
        assert!(snapshot.rows.is_empty());
        assert!(snapshot.last_updated.is_none());
    }

    #[test]
    fn test_blank_cells_decode_to_defaults() {
        let record: OrderRecord = serde_json::from_value(json!({
            "id": "9",
            "cliente": null,
            "valor": null,
            "categoria": null,
            "estado": null,
            "data_emissao": null
        }))
        .unwrap();
        assert_eq!(record.client, "");
        assert_eq!(record.value, 0.0);
        assert_eq!(record.state, "");
        assert_eq!(record.issue_date, "");
    }

    #[test]
    fn test_snapshot_skips_rows_that_do_not_decode() {
        let snapshot: SalesSnapshot = serde_json::from_value(json!({
            "rows": [
                {"id": "1", "cliente": null},
                42,
                {"cliente": "sem id"},
                {"id": 3, "valor": "muito"},
                {"id": 4, "valor": 10.5}
            ],
            "last_updated": "2025-03-05 10:00"
        }))
        .unwrap();
        let ids: Vec<&str> = snapshot.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(snapshot.last_updated.as_deref(), Some("2025-03-05 10:00"));
    }

    #[test]
    fn test_composite_key() {
        assert_eq!(composite_key("123", "WidgetA"), "123-WidgetA");
        assert_eq!(composite_key(" 123 ", ""), "123");
    }
}
