use contracts::dashboards::d400_sales_overview::filter::{search_deals, sort_deals};
use contracts::dashboards::d400_sales_overview::DealColumn;
use contracts::domain::a001_sales_order::OrderRecord;
use leptos::prelude::*;

/// Which modal the deals page currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DealsDialog {
    Create,
    Edit(OrderRecord),
    Delete(OrderRecord),
}

#[derive(Clone, Copy)]
pub struct DealsListState {
    pub search: RwSignal<String>,
    pub sort_column: RwSignal<DealColumn>,
    pub sort_ascending: RwSignal<bool>,
    pub dialog: RwSignal<Option<DealsDialog>>,
}

impl DealsListState {
    pub fn new() -> Self {
        Self {
            search: RwSignal::new(String::new()),
            sort_column: RwSignal::new(DealColumn::IssueDate),
            sort_ascending: RwSignal::new(false),
            dialog: RwSignal::new(None),
        }
    }

    /// Clicking the sorted column flips direction; another column sorts ascending.
    pub fn toggle_sort(&self, column: DealColumn) {
        if self.sort_column.get_untracked() == column {
            self.sort_ascending.update(|asc| *asc = !*asc);
        } else {
            self.sort_column.set(column);
            self.sort_ascending.set(true);
        }
    }

    pub fn sort_indicator(&self, column: DealColumn) -> &'static str {
        if self.sort_column.get() != column {
            ""
        } else if self.sort_ascending.get() {
            " ▲"
        } else {
            " ▼"
        }
    }
}

impl Default for DealsListState {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows shown in the deals table: every row, searched, then sorted.
///
/// The category tabs and state filter belong to the dashboard and do not
/// narrow this list.
pub fn visible_deals(
    rows: &[OrderRecord],
    query: &str,
    column: DealColumn,
    ascending: bool,
) -> Vec<OrderRecord> {
    let mut deals = search_deals(rows, query);
    sort_deals(&mut deals, column, ascending);
    deals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, category: &str, client: &str, value: f64) -> OrderRecord {
        OrderRecord {
            id: id.into(),
            category: category.into(),
            client: client.into(),
            value,
            ..Default::default()
        }
    }

    #[test]
    fn test_visible_deals_searches_then_sorts() {
        let rows = vec![
            rec("1", "ORGLIGHT", "Loja Azul", 300.0),
            rec("2", "PERFIL", "Loja Rosa", 100.0),
            rec("3", "ORGLIGHT", "Casa Verde", 200.0),
            rec("4", "ORGLIGHT", "Loja Lilás", 50.0),
        ];

        let deals = visible_deals(&rows, "loja", DealColumn::Value, true);
        let ids: Vec<&str> = deals.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "2", "1"]);
    }

    #[test]
    fn test_new_order_outside_dashboard_category_is_listed() {
        let mut rows = vec![rec("1", "ORGLIGHT", "Loja Azul", 300.0)];
        rows.push(rec("77-Luminária", "Projetos", "Cliente Novo", 900.0));

        let deals = visible_deals(&rows, "", DealColumn::Value, false);
        let ids: Vec<&str> = deals.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["77-Luminária", "1"]);
    }
}
