use crate::domain::a001_sales_order::aggregate::{OrderRecord, SalesSnapshot};

/// Canonical in-memory row set of the dashboard.
///
/// Server snapshots replace it wholesale; local CRUD actions mutate it
/// optimistically through [`RowStore::manual_update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowStore {
    snapshot: SalesSnapshot,
}

impl RowStore {
    pub fn new(snapshot: SalesSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &SalesSnapshot {
        &self.snapshot
    }

    pub fn rows(&self) -> &[OrderRecord] {
        &self.snapshot.rows
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.snapshot.last_updated.as_deref()
    }

    pub fn find(&self, id: &str) -> Option<&OrderRecord> {
        self.snapshot.rows.iter().find(|r| r.id == id)
    }

    /// Case-insensitive lookup of a composite key among existing ids.
    pub fn contains_key(&self, key: &str) -> bool {
        let key = key.trim().to_lowercase();
        self.snapshot
            .rows
            .iter()
            .any(|r| r.id.trim().to_lowercase() == key)
    }

    /// Last write from the server wins: no merge with pending local edits.
    pub fn replace(&mut self, snapshot: SalesSnapshot) {
        log::debug!(
            "row store replaced: {} rows, updated {:?}",
            snapshot.rows.len(),
            snapshot.last_updated
        );
        self.snapshot = snapshot;
    }

    pub fn manual_update(&mut self, transform: impl FnOnce(&mut SalesSnapshot)) {
        transform(&mut self.snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str) -> OrderRecord {
        OrderRecord {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_server_snapshot_overwrites_optimistic_rows() {
        let mut store = RowStore::new(SalesSnapshot {
            rows: vec![row("1")],
            last_updated: Some("t0".into()),
        });
        store.manual_update(|s| s.rows.push(row("optimistic")));
        assert_eq!(store.rows().len(), 2);

        let server = SalesSnapshot {
            rows: vec![row("10"), row("11")],
            last_updated: Some("t1".into()),
        };
        store.replace(server.clone());
        assert_eq!(store.snapshot(), &server);
        assert!(store.find("optimistic").is_none());
    }

    #[test]
    fn test_contains_key_ignores_case() {
        let store = RowStore::new(SalesSnapshot {
            rows: vec![row("123-WidgetA")],
            last_updated: None,
        });
        assert!(store.contains_key("123-widgeta"));
        assert!(store.contains_key(" 123-WIDGETA "));
        assert!(!store.contains_key("123"));
    }
}
