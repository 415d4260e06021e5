//! Category tabs, state filter, deals search and column sorting.

use crate::domain::a001_sales_order::aggregate::OrderRecord;
use crate::shared::br_states::normalize_state_name;
use crate::shared::dates::parse_date_or_epoch;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryTab {
    #[default]
    General,
    Orglight,
    Perfil,
}

impl CategoryTab {
    pub const ALL: [CategoryTab; 3] = [CategoryTab::General, CategoryTab::Orglight, CategoryTab::Perfil];

    pub fn label(&self) -> &'static str {
        match self {
            CategoryTab::General => "Geral",
            CategoryTab::Orglight => "Orglight",
            CategoryTab::Perfil => "Perfil",
        }
    }

    /// Sheet category the tab narrows to; `None` for all rows.
    pub fn category(&self) -> Option<&'static str> {
        match self {
            CategoryTab::General => None,
            CategoryTab::Orglight => Some("ORGLIGHT"),
            CategoryTab::Perfil => Some("PERFIL"),
        }
    }

    pub fn matches(&self, record: &OrderRecord) -> bool {
        match self.category() {
            None => true,
            Some(category) => record.category.trim().eq_ignore_ascii_case(category),
        }
    }
}

/// Header selection: category tab plus an optional state picked in the breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardFilter {
    pub category: CategoryTab,
    pub state: Option<String>,
}

impl DashboardFilter {
    /// Switching tabs drops the state selection.
    pub fn select_category(&mut self, tab: CategoryTab) {
        self.category = tab;
        self.state = None;
    }

    /// Selecting the current state again clears it.
    pub fn toggle_state(&mut self, state: &str) {
        let picked = normalize_state_name(state);
        if picked.is_empty() || self.state.as_deref() == Some(picked.as_str()) {
            self.state = None;
        } else {
            self.state = Some(picked);
        }
    }

    pub fn matches_state(&self, record: &OrderRecord) -> bool {
        match &self.state {
            None => true,
            Some(state) => normalize_state_name(&record.state).to_lowercase() == state.to_lowercase(),
        }
    }

    /// Rows behind the breakdown series.
    pub fn category_rows(&self, rows: &[OrderRecord]) -> Vec<OrderRecord> {
        rows.iter()
            .filter(|r| self.category.matches(r))
            .cloned()
            .collect()
    }

    /// Rows behind the KPI cards.
    pub fn kpi_rows(&self, rows: &[OrderRecord]) -> Vec<OrderRecord> {
        rows.iter()
            .filter(|r| self.category.matches(r) && self.matches_state(r))
            .cloned()
            .collect()
    }
}

/// Case-insensitive substring match on client, id or category.
pub fn matches_search(record: &OrderRecord, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    [&record.client, &record.id, &record.category]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
}

pub fn search_deals(rows: &[OrderRecord], query: &str) -> Vec<OrderRecord> {
    rows.iter()
        .filter(|r| matches_search(r, query))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DealColumn {
    OrderNumber,
    IssueDate,
    Client,
    Category,
    Product,
    Value,
    Status,
}

impl DealColumn {
    pub const ALL: [DealColumn; 7] = [
        DealColumn::OrderNumber,
        DealColumn::IssueDate,
        DealColumn::Client,
        DealColumn::Category,
        DealColumn::Product,
        DealColumn::Value,
        DealColumn::Status,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DealColumn::OrderNumber => "Pedido",
            DealColumn::IssueDate => "Emissão",
            DealColumn::Client => "Cliente",
            DealColumn::Category => "Categoria",
            DealColumn::Product => "Produto",
            DealColumn::Value => "Valor",
            DealColumn::Status => "Status",
        }
    }

    pub fn compare(&self, a: &OrderRecord, b: &OrderRecord) -> Ordering {
        match self {
            DealColumn::OrderNumber => compare_order_numbers(a.order_number(), b.order_number()),
            DealColumn::IssueDate => parse_date_or_epoch(Some(&a.issue_date))
                .cmp(&parse_date_or_epoch(Some(&b.issue_date))),
            DealColumn::Client => compare_text(&a.client, &b.client),
            DealColumn::Category => compare_text(&a.category, &b.category),
            DealColumn::Product => compare_text(&a.product, &b.product),
            DealColumn::Value => a.value.total_cmp(&b.value),
            DealColumn::Status => compare_text(a.status.label(), b.status.label()),
        }
    }
}

pub fn sort_deals(rows: &mut [OrderRecord], column: DealColumn, ascending: bool) {
    rows.sort_by(|a, b| {
        let cmp = column.compare(a, b);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Numeric order numbers sort numerically; anything else falls back to text.
fn compare_order_numbers(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<u64>(), b.trim().parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => compare_text(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, category: &str, state: &str, client: &str) -> OrderRecord {
        OrderRecord {
            id: id.into(),
            category: category.into(),
            state: state.into(),
            client: client.into(),
            ..Default::default()
        }
    }

    fn rows() -> Vec<OrderRecord> {
        vec![
            rec("1", "ORGLIGHT", "SP", "Loja Azul"),
            rec("2", "perfil", "São Paulo", "Casa Verde"),
            rec("3", "Projetos", "RJ", "Arquiteta Ana"),
            rec("10", "Orglight", "rio de janeiro", "Loja Azul"),
        ]
    }

    #[test]
    fn test_category_tabs() {
        let rows = rows();
        let mut filter = DashboardFilter::default();
        assert_eq!(filter.category_rows(&rows).len(), 4);

        filter.select_category(CategoryTab::Orglight);
        let ids: Vec<String> = filter.category_rows(&rows).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["1", "10"]);

        filter.select_category(CategoryTab::Perfil);
        assert_eq!(filter.category_rows(&rows).len(), 1);
    }

    #[test]
    fn test_state_filter_applies_to_kpi_rows_only() {
        let rows = rows();
        let mut filter = DashboardFilter::default();
        filter.toggle_state("SP");
        assert_eq!(filter.state.as_deref(), Some("São Paulo"));
        assert_eq!(filter.kpi_rows(&rows).len(), 2);
        assert_eq!(filter.category_rows(&rows).len(), 4);

        filter.toggle_state("São Paulo");
        assert_eq!(filter.state, None);

        filter.toggle_state("RJ");
        filter.select_category(CategoryTab::Orglight);
        assert_eq!(filter.state, None);
    }

    #[test]
    fn test_search() {
        let rows = rows();
        assert_eq!(search_deals(&rows, "").len(), 4);
        assert_eq!(search_deals(&rows, "loja").len(), 2);
        assert_eq!(search_deals(&rows, "PROJ").len(), 1);
        assert_eq!(search_deals(&rows, "10").len(), 1);
        assert!(search_deals(&rows, "inexistente").is_empty());
    }

    #[test]
    fn test_sort_columns() {
        let mut rows = rows();
        sort_deals(&mut rows, DealColumn::OrderNumber, true);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "10"]);

        sort_deals(&mut rows, DealColumn::Client, false);
        assert_eq!(rows[0].client, "Loja Azul");
        assert_eq!(rows[3].client, "Arquiteta Ana");
    }
}
